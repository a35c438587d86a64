// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::engines::stealth;
use crate::engines::traits::{BrowserSession, EngineError, SessionFactory, SessionProfile};
use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::emulation::{
    SetDeviceMetricsOverrideParams, SetLocaleOverrideParams, SetTimezoneOverrideParams,
    SetUserAgentOverrideParams,
};
use chromiumoxide::cdp::browser_protocol::input::{
    DispatchMouseEventParams, DispatchMouseEventType,
};
use chromiumoxide::cdp::browser_protocol::browser::BrowserContextId;
use chromiumoxide::cdp::browser_protocol::page::{
    AddScriptToEvaluateOnNewDocumentParams, CaptureScreenshotFormat, EventLifecycleEvent,
    SetLifecycleEventsEnabledParams,
};
use chromiumoxide::cdp::browser_protocol::target::{CreateBrowserContextParams, CreateTargetParams};
use chromiumoxide::error::CdpError;
use chromiumoxide::page::ScreenshotParams;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::path::Path;
use std::time::{Duration, Instant};
use tempfile::TempDir;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

const SELECTOR_POLL_INTERVAL: Duration = Duration::from_millis(250);
/// load 之后等待网络空闲的上限
const NETWORK_IDLE_WAIT: Duration = Duration::from_secs(5);

impl From<CdpError> for EngineError {
    fn from(err: CdpError) -> Self {
        match err {
            CdpError::Timeout => EngineError::Timeout,
            other => EngineError::Interaction(other.to_string()),
        }
    }
}

/// Chromium 会话工厂
///
/// 每次 `launch` 都启动一个使用全新临时用户目录的浏览器进程；
/// 连接远程 Chrome 时则为本次调用单独创建一个浏览器上下文。
/// cookie、localStorage 和历史记录都不会在调用之间共享。
pub struct ChromiumSessionFactory;

/// 为一次会话创建独立的 Chrome 用户目录，`TempDir` 被丢弃时目录随之删除
fn fresh_profile_dir() -> Result<TempDir, EngineError> {
    tempfile::Builder::new()
        .prefix("serpscout-chrome-")
        .tempdir()
        .map_err(|e| EngineError::Launch(format!("Failed to create profile dir: {}", e)))
}

fn launch_config(profile: &SessionProfile, user_data_dir: &Path) -> Result<BrowserConfig, EngineError> {
    let mut builder = BrowserConfig::builder()
        .no_sandbox()
        .user_data_dir(user_data_dir)
        .window_size(profile.viewport_width, profile.viewport_height)
        .request_timeout(profile.navigation_timeout)
        .arg("--disable-gpu")
        .arg("--disable-dev-shm-usage")
        .arg(format!("--lang={}", profile.locale));

    for arg in stealth::STEALTH_ARGS {
        builder = builder.arg(*arg);
    }
    if !profile.headless {
        builder = builder.with_head();
    }
    if let Some(ref path) = profile.chrome_executable {
        builder = builder.chrome_executable(path);
    }

    builder.build().map_err(EngineError::Launch)
}

#[async_trait]
impl SessionFactory for ChromiumSessionFactory {
    async fn launch(
        &self,
        profile: &SessionProfile,
    ) -> Result<Box<dyn BrowserSession>, EngineError> {
        let (mut browser, mut handler, profile_dir) =
            if let Some(ref url) = profile.remote_debugging_url {
                info!("Connecting to remote Chrome instance at: {}", url);
                let (browser, handler) = Browser::connect(url).await.map_err(|e| {
                    EngineError::Launch(format!("Failed to connect to remote Chrome: {}", e))
                })?;
                (browser, handler, None)
            } else {
                let dir = fresh_profile_dir()?;
                debug!("Launching Chromium with profile dir {}", dir.path().display());
                let (browser, handler) = Browser::launch(launch_config(profile, dir.path())?)
                    .await
                    .map_err(|e| EngineError::Launch(e.to_string()))?;
                (browser, handler, Some(dir))
            };

        // Spawn a handler to process browser events
        let handler_task = tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        let owns_browser = profile_dir.is_some();
        let browser_context = if owns_browser {
            None
        } else {
            match browser
                .create_browser_context(CreateBrowserContextParams::default())
                .await
            {
                Ok(id) => Some(id),
                Err(e) => {
                    handler_task.abort();
                    return Err(EngineError::Launch(format!(
                        "Failed to create browser context: {}",
                        e
                    )));
                }
            }
        };

        let mut session = ChromiumSession {
            browser,
            page: None,
            handler_task,
            owns_browser,
            browser_context,
            profile_dir,
            closed: false,
            navigation_timeout: profile.navigation_timeout,
        };

        if let Err(e) = session.open_page(profile).await {
            session.shutdown().await;
            return Err(e);
        }

        Ok(Box::new(session))
    }

    fn name(&self) -> &'static str {
        "chromium"
    }
}

/// 基于 chromiumoxide 的浏览器会话
pub struct ChromiumSession {
    browser: Browser,
    page: Option<Page>,
    handler_task: JoinHandle<()>,
    owns_browser: bool,
    /// 远程模式下本次会话独占的浏览器上下文
    browser_context: Option<BrowserContextId>,
    /// 本地模式下的临时用户目录，浏览器退出后删除
    profile_dir: Option<TempDir>,
    closed: bool,
    navigation_timeout: Duration,
}

impl ChromiumSession {
    /// 新建页面并在任何页面脚本执行之前完成伪装
    async fn open_page(&mut self, profile: &SessionProfile) -> Result<(), EngineError> {
        let mut target = CreateTargetParams::new("about:blank");
        target.browser_context_id = self.browser_context.clone();

        let page = self
            .browser
            .new_page(target)
            .await
            .map_err(|e| EngineError::Launch(format!("Failed to open page: {}", e)))?;

        page.execute(SetLifecycleEventsEnabledParams::new(true))
            .await?;

        page.evaluate_on_new_document(AddScriptToEvaluateOnNewDocumentParams::new(
            stealth::stealth_script(&profile.locale),
        ))
        .await?;

        let mut user_agent = SetUserAgentOverrideParams::new(profile.user_agent.clone());
        user_agent.accept_language = Some(profile.accept_language());
        user_agent.platform = Some("Win32".to_string());
        page.execute(user_agent).await?;

        page.execute(SetDeviceMetricsOverrideParams::new(
            i64::from(profile.viewport_width),
            i64::from(profile.viewport_height),
            1.0,
            false,
        ))
        .await?;

        page.execute(SetLocaleOverrideParams {
            locale: Some(profile.locale.clone()),
        })
        .await?;

        page.execute(SetTimezoneOverrideParams::new(profile.timezone.clone()))
            .await?;

        self.page = Some(page);
        Ok(())
    }

    fn page(&self) -> Result<&Page, EngineError> {
        if self.closed {
            return Err(EngineError::Closed);
        }
        self.page.as_ref().ok_or(EngineError::Closed)
    }
}

#[async_trait]
impl BrowserSession for ChromiumSession {
    async fn goto(&mut self, url: &str) -> Result<(), EngineError> {
        let timeout = self.navigation_timeout;
        let page = self.page()?;
        let mut lifecycle = page.event_listener::<EventLifecycleEvent>().await?;

        // goto resolves on the load event
        tokio::time::timeout(timeout, page.goto(url))
            .await
            .map_err(|_| EngineError::Timeout)?
            .map_err(|e| EngineError::Navigation(e.to_string()))?;

        let idle = tokio::time::timeout(NETWORK_IDLE_WAIT, async {
            while let Some(event) = lifecycle.next().await {
                if event.name == "networkIdle" {
                    return true;
                }
            }
            false
        })
        .await
        .unwrap_or(false);
        if !idle {
            debug!("Network not idle after load, continuing: {}", url);
        }
        Ok(())
    }

    async fn wait_for_any(
        &mut self,
        selectors: &[&str],
        timeout: Duration,
    ) -> Result<Option<String>, EngineError> {
        let page = self.page()?;
        let deadline = Instant::now() + timeout;

        let polled = tokio::time::timeout(timeout + SELECTOR_POLL_INTERVAL, async {
            loop {
                for selector in selectors {
                    if page.find_element(*selector).await.is_ok() {
                        return Some(selector.to_string());
                    }
                }
                if Instant::now() >= deadline {
                    return None;
                }
                tokio::time::sleep(SELECTOR_POLL_INTERVAL).await;
            }
        })
        .await;

        Ok(polled.unwrap_or(None))
    }

    async fn move_mouse(&mut self, x: f64, y: f64) -> Result<(), EngineError> {
        let page = self.page()?;
        page.execute(DispatchMouseEventParams::new(
            DispatchMouseEventType::MouseMoved,
            x,
            y,
        ))
        .await?;
        Ok(())
    }

    async fn click(&mut self, selector: &str) -> Result<(), EngineError> {
        let page = self.page()?;
        page.find_element(selector)
            .await
            .map_err(|e| EngineError::ElementNotFound(format!("{}: {}", selector, e)))?
            .click()
            .await?;
        Ok(())
    }

    async fn type_text(&mut self, selector: &str, text: &str) -> Result<(), EngineError> {
        let page = self.page()?;
        page.find_element(selector)
            .await
            .map_err(|e| EngineError::ElementNotFound(format!("{}: {}", selector, e)))?
            .type_str(text)
            .await?;
        Ok(())
    }

    async fn press_enter(&mut self, selector: &str) -> Result<(), EngineError> {
        let page = self.page()?;
        page.find_element(selector)
            .await
            .map_err(|e| EngineError::ElementNotFound(format!("{}: {}", selector, e)))?
            .press_key("Enter")
            .await?;
        Ok(())
    }

    async fn content(&mut self) -> Result<String, EngineError> {
        Ok(self.page()?.content().await?)
    }

    async fn screenshot(&mut self) -> Result<Vec<u8>, EngineError> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(false)
            .build();
        Ok(self.page()?.screenshot(params).await?)
    }

    async fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;

        if let Some(page) = self.page.take() {
            if let Err(e) = page.close().await {
                debug!("Failed to close page: {}", e);
            }
        }

        if let Some(context) = self.browser_context.take() {
            if let Err(e) = self.browser.dispose_browser_context(context).await {
                warn!("Failed to dispose browser context: {}", e);
            }
        }

        if self.owns_browser {
            if let Err(e) = self.browser.close().await {
                warn!("Failed to close browser: {}", e);
            }
            if let Err(e) = self.browser.wait().await {
                warn!("Failed to reap browser process: {}", e);
            }
        }

        if let Some(dir) = self.profile_dir.take() {
            if let Err(e) = dir.close() {
                debug!("Failed to remove profile dir: {}", e);
            }
        }

        self.handler_task.abort();
        debug!("Browser session released");
    }
}

impl Drop for ChromiumSession {
    fn drop(&mut self) {
        if !self.closed {
            warn!("Browser session dropped without shutdown");
            self.handler_task.abort();
        }
    }
}
