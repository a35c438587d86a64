// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::ScraperSettings;
use crate::domain::models::scrape_report::{ScrapeOutcome, ScrapeReport};
use crate::domain::models::search_result::SearchResult;
use crate::domain::search::engine::{SearchEngine, SearchError};
use crate::engines::stealth;
use crate::engines::traits::{BrowserSession, SessionFactory, SessionProfile};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

/// 单次抓取返回的自然结果上限，配置值只能调低
pub const MAX_RESULTS: usize = 3;

/// 搜索结果抓取服务
///
/// 每次调用都新建一个隔离的浏览器会话，只尝试一次导航，不重试。
/// 同一时刻只运行一个浏览器会话。
pub struct SerpScraper {
    factory: Arc<dyn SessionFactory>,
    settings: ScraperSettings,
    permits: Semaphore,
}

/// 一次驱动浏览器的中间结果
struct DriveResult {
    results: Vec<SearchResult>,
    results_appeared: bool,
}

impl SerpScraper {
    pub fn new(factory: Arc<dyn SessionFactory>, settings: ScraperSettings) -> Self {
        Self {
            factory,
            settings,
            permits: Semaphore::new(1),
        }
    }

    pub fn settings(&self) -> &ScraperSettings {
        &self.settings
    }

    /// 抓取最多三条自然结果
    ///
    /// 从不返回错误：任何失败都记录日志并折叠为空列表。
    pub async fn scrape(&self, engine: &dyn SearchEngine, keyword: &str) -> Vec<SearchResult> {
        self.scrape_report(engine, keyword).await.results
    }

    /// 抓取并返回带结局的完整报告
    pub async fn scrape_report(&self, engine: &dyn SearchEngine, keyword: &str) -> ScrapeReport {
        let start = Instant::now();

        if keyword.trim().is_empty() {
            info!(engine = engine.name(), "Empty keyword, skipping browser session");
            return ScrapeReport::empty(engine.name(), keyword, ScrapeOutcome::EmptyKeyword, 0);
        }

        // Semaphore is never closed
        let _permit = self.permits.acquire().await.ok();

        let profile = SessionProfile::from(&self.settings);
        let mut session = match self.factory.launch(&profile).await {
            Ok(session) => session,
            Err(e) => {
                warn!(engine = engine.name(), "Failed to launch browser session: {}", e);
                return ScrapeReport::empty(
                    engine.name(),
                    keyword,
                    ScrapeOutcome::NavigationFailed(e.to_string()),
                    start.elapsed().as_millis() as u64,
                );
            }
        };

        let driven = self.drive(session.as_mut(), engine, keyword).await;
        session.shutdown().await;

        let elapsed_ms = start.elapsed().as_millis() as u64;
        match driven {
            Ok(DriveResult {
                results,
                results_appeared,
            }) => {
                let outcome = if !results_appeared {
                    ScrapeOutcome::SelectorTimeout
                } else if results.is_empty() {
                    ScrapeOutcome::ZeroResults
                } else {
                    ScrapeOutcome::Completed
                };
                info!(
                    engine = engine.name(),
                    keyword,
                    results = results.len(),
                    ?outcome,
                    elapsed_ms,
                    "Scrape finished"
                );
                ScrapeReport {
                    engine: engine.name().to_string(),
                    keyword: keyword.to_string(),
                    outcome,
                    results,
                    elapsed_ms,
                    scraped_at: Utc::now(),
                }
            }
            Err(e) => {
                warn!(engine = engine.name(), keyword, "Scrape failed: {}", e);
                ScrapeReport::empty(
                    engine.name(),
                    keyword,
                    ScrapeOutcome::NavigationFailed(e.to_string()),
                    elapsed_ms,
                )
            }
        }
    }

    async fn drive(
        &self,
        session: &mut dyn BrowserSession,
        engine: &dyn SearchEngine,
        keyword: &str,
    ) -> Result<DriveResult, SearchError> {
        let settings = &self.settings;

        session.goto(engine.home_url()).await?;
        self.pause().await;

        for (x, y) in stealth::cursor_path(settings.viewport_width, settings.viewport_height, 6) {
            session.move_mouse(x, y).await?;
            tokio::time::sleep(stealth::jitter(10, 40)).await;
        }

        let input = session
            .wait_for_any(
                engine.search_input_selectors(),
                Duration::from_secs(settings.input_timeout_secs),
            )
            .await?
            .ok_or_else(|| SearchError::SearchInputNotFound(engine.search_input_selectors().join(", ")))?;
        debug!(engine = engine.name(), selector = %input, "Found search input");

        session.click(&input).await?;
        self.pause().await;
        for ch in keyword.chars() {
            session.type_text(&input, &ch.to_string()).await?;
            tokio::time::sleep(stealth::jitter(
                settings.typing_delay_min_ms,
                settings.typing_delay_max_ms,
            ))
            .await;
        }
        self.pause().await;
        session.press_enter(&input).await?;

        let matched = session
            .wait_for_any(
                engine.results_wait_selectors(),
                Duration::from_secs(settings.results_timeout_secs),
            )
            .await?;
        let results_appeared = matched.is_some();
        if results_appeared {
            self.pause().await;
        } else {
            warn!(
                engine = engine.name(),
                "Results selector did not appear in time, extracting from current page"
            );
        }

        let html = session.content().await?;
        self.save_debug_screenshot(session, engine).await;

        let results = engine.extract(&html, settings.max_results.min(MAX_RESULTS));
        Ok(DriveResult {
            results,
            results_appeared,
        })
    }

    async fn pause(&self) {
        tokio::time::sleep(stealth::jitter(
            self.settings.human_delay_min_ms,
            self.settings.human_delay_max_ms,
        ))
        .await;
    }

    async fn save_debug_screenshot(&self, session: &mut dyn BrowserSession, engine: &dyn SearchEngine) {
        let Some(ref dir) = self.settings.screenshot_dir else {
            return;
        };

        let path = PathBuf::from(dir).join(format!("{}-{}.png", engine.name(), Utc::now().timestamp()));
        let saved = async {
            let bytes = session.screenshot().await?;
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| anyhow::anyhow!(e))?;
            tokio::fs::write(&path, bytes)
                .await
                .map_err(|e| anyhow::anyhow!(e))?;
            Ok::<(), anyhow::Error>(())
        }
        .await;

        match saved {
            Ok(()) => info!("Saved debug screenshot to {}", path.display()),
            Err(e) => warn!("Failed to save debug screenshot: {}", e),
        }
    }
}
