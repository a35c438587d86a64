// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::extract::{Extension, Json};
use serde::Deserialize;
use std::sync::Arc;

use crate::domain::models::scrape_report::ScrapeReport;
use crate::domain::services::serp_scraper::SerpScraper;
use crate::infrastructure::search::engine_by_name;
use crate::presentation::errors::AppError;

/// 搜索结果抓取请求
#[derive(Debug, Clone, Deserialize)]
pub struct SerpRequest {
    pub keyword: String,
    #[serde(default = "default_engine")]
    pub engine: String,
}

fn default_engine() -> String {
    "bing".to_string()
}

/// 处理搜索结果抓取请求
///
/// 抓取在服务内部串行执行；空关键词返回 `empty_keyword` 报告而不是错误，
/// 未知引擎返回 400
pub async fn serp(
    Extension(scraper): Extension<Arc<SerpScraper>>,
    Json(payload): Json<SerpRequest>,
) -> Result<Json<ScrapeReport>, AppError> {
    let engine = engine_by_name(&payload.engine)?;
    let report = scraper.scrape_report(engine.as_ref(), &payload.keyword).await;
    Ok(Json(report))
}
