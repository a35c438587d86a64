// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use async_trait::async_trait;
use scraper::{Html, Selector};
use serpscout::config::settings::{BackendSettings, FetchSettings, GeminiSettings, ScraperSettings};
use serpscout::domain::services::serp_scraper::SerpScraper;
use serpscout::engines::traits::{BrowserSession, EngineError, SessionFactory, SessionProfile};
use serpscout::infrastructure::page_fetcher::PageFetcher;
use serpscout::infrastructure::proxy::UpstreamProxy;
use serpscout::presentation::routes::AppComponents;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// 会话计数器，测试结束后检查资源是否释放
#[derive(Default)]
pub struct SessionStats {
    pub launches: AtomicUsize,
    pub shutdowns: AtomicUsize,
    pub active: AtomicUsize,
    pub max_active: AtomicUsize,
    pub typed: Mutex<String>,
    pub visited: Mutex<Vec<String>>,
}

impl SessionStats {
    pub fn launches(&self) -> usize {
        self.launches.load(Ordering::SeqCst)
    }

    pub fn shutdowns(&self) -> usize {
        self.shutdowns.load(Ordering::SeqCst)
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    pub fn typed(&self) -> String {
        self.typed.lock().unwrap().clone()
    }
}

/// 不启动浏览器的会话工厂
///
/// 首页返回 `home_html`，按下回车后页面切换为 `results_html`
pub struct FakeSessionFactory {
    pub home_html: String,
    pub results_html: String,
    pub fail_launch: bool,
    pub fail_goto: bool,
    pub fail_screenshot: bool,
    pub stats: Arc<SessionStats>,
}

impl FakeSessionFactory {
    pub fn new(home_html: &str, results_html: &str) -> Self {
        Self {
            home_html: home_html.to_string(),
            results_html: results_html.to_string(),
            fail_launch: false,
            fail_goto: false,
            fail_screenshot: false,
            stats: Arc::new(SessionStats::default()),
        }
    }
}

#[async_trait]
impl SessionFactory for FakeSessionFactory {
    async fn launch(&self, _profile: &SessionProfile) -> Result<Box<dyn BrowserSession>, EngineError> {
        if self.fail_launch {
            return Err(EngineError::Launch("no chrome in test".to_string()));
        }
        self.stats.launches.fetch_add(1, Ordering::SeqCst);
        let active = self.stats.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.stats.max_active.fetch_max(active, Ordering::SeqCst);

        Ok(Box::new(FakeSession {
            home_html: self.home_html.clone(),
            results_html: self.results_html.clone(),
            current: String::new(),
            fail_goto: self.fail_goto,
            fail_screenshot: self.fail_screenshot,
            closed: false,
            stats: self.stats.clone(),
        }))
    }

    fn name(&self) -> &'static str {
        "fake"
    }
}

pub struct FakeSession {
    home_html: String,
    results_html: String,
    current: String,
    fail_goto: bool,
    fail_screenshot: bool,
    closed: bool,
    stats: Arc<SessionStats>,
}

fn first_match(html: &str, selectors: &[&str]) -> Option<String> {
    let document = Html::parse_document(html);
    selectors
        .iter()
        .find(|raw| {
            Selector::parse(raw)
                .map(|s| document.select(&s).next().is_some())
                .unwrap_or(false)
        })
        .map(|raw| raw.to_string())
}

#[async_trait]
impl BrowserSession for FakeSession {
    async fn goto(&mut self, url: &str) -> Result<(), EngineError> {
        self.stats.visited.lock().unwrap().push(url.to_string());
        if self.fail_goto {
            return Err(EngineError::Navigation("net::ERR_NAME_NOT_RESOLVED".to_string()));
        }
        self.current = self.home_html.clone();
        Ok(())
    }

    async fn wait_for_any(
        &mut self,
        selectors: &[&str],
        _timeout: Duration,
    ) -> Result<Option<String>, EngineError> {
        Ok(first_match(&self.current, selectors))
    }

    async fn move_mouse(&mut self, _x: f64, _y: f64) -> Result<(), EngineError> {
        Ok(())
    }

    async fn click(&mut self, _selector: &str) -> Result<(), EngineError> {
        Ok(())
    }

    async fn type_text(&mut self, _selector: &str, text: &str) -> Result<(), EngineError> {
        self.stats.typed.lock().unwrap().push_str(text);
        Ok(())
    }

    async fn press_enter(&mut self, _selector: &str) -> Result<(), EngineError> {
        self.current = self.results_html.clone();
        Ok(())
    }

    async fn content(&mut self) -> Result<String, EngineError> {
        Ok(self.current.clone())
    }

    async fn screenshot(&mut self) -> Result<Vec<u8>, EngineError> {
        if self.fail_screenshot {
            return Err(EngineError::Interaction("capture failed".to_string()));
        }
        Ok(FAKE_PNG.to_vec())
    }

    async fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.stats.shutdowns.fetch_add(1, Ordering::SeqCst);
        self.stats.active.fetch_sub(1, Ordering::SeqCst);
    }
}

/// 假会话截图返回的字节
pub const FAKE_PNG: &[u8] = &[0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a];

/// 不等待的抓取配置
pub fn fast_settings() -> ScraperSettings {
    ScraperSettings {
        human_delay_min_ms: 0,
        human_delay_max_ms: 0,
        typing_delay_min_ms: 0,
        typing_delay_max_ms: 0,
        ..Default::default()
    }
}

pub fn scraper_with(factory: FakeSessionFactory) -> (SerpScraper, Arc<SessionStats>) {
    scraper_with_settings(factory, fast_settings())
}

pub fn scraper_with_settings(
    factory: FakeSessionFactory,
    settings: ScraperSettings,
) -> (SerpScraper, Arc<SessionStats>) {
    let stats = factory.stats.clone();
    (SerpScraper::new(Arc::new(factory), settings), stats)
}

pub const BING_HOME: &str = r#"<html><body><form><textarea id="sb_form_q" name="q"></textarea></form></body></html>"#;

/// 5 条自然结果和 2 条广告的 Bing 结果页
pub const BING_COFFEE_RESULTS: &str = r#"
<html><body>
<ol id="b_results">
  <li class="b_algo b_ad"><h2><a href="https://promo.example/beans">Fresh beans delivered</a></h2></li>
  <li class="b_algo"><h2><a href="https://www.bing.com/ck/a?u=a1aHR0cHM6Ly9yb2FzdGVyeS1vbmUuZXhhbXBsZS8">Roastery One</a></h2></li>
  <li class="b_algo"><h2><a href="https://roastery-two.example/">Roastery Two</a></h2></li>
  <li class="b_algo"><h2><a href="https://deals.example/">Sponsored · Coffee Deals</a></h2></li>
  <li class="b_algo"><h2><a href="https://roastery-three.example/">Roastery Three</a></h2></li>
  <li class="b_algo"><h2><a href="https://roastery-four.example/">Roastery Four</a></h2></li>
  <li class="b_algo"><h2><a href="https://roastery-five.example/">Roastery Five</a></h2></li>
</ol>
</body></html>
"#;

/// 路由组件：抓取用假会话，代理和抓取指向给定地址
pub fn components(factory: FakeSessionFactory, upstream: &str, api_key: Option<&str>) -> AppComponents {
    let (scraper, _) = scraper_with(factory);
    AppComponents {
        scraper: Arc::new(scraper),
        proxy: Arc::new(
            UpstreamProxy::new(
                GeminiSettings {
                    base_url: upstream.to_string(),
                    api_key: api_key.map(str::to_string),
                },
                BackendSettings {
                    base_url: upstream.to_string(),
                },
            )
            .unwrap(),
        ),
        fetcher: Arc::new(
            PageFetcher::new(
                FetchSettings {
                    max_bytes: 64,
                    timeout_secs: 1,
                    allow_private_hosts: true,
                },
                "serpscout-test",
            )
            .unwrap(),
        ),
    }
}
