// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::services::serp_scraper::SerpScraper;
use crate::infrastructure::page_fetcher::PageFetcher;
use crate::infrastructure::proxy::UpstreamProxy;
use crate::presentation::handlers::{fetch_handler, proxy_handler, search_handler};
use axum::{
    extract::DefaultBodyLimit,
    routing::{any, get, post},
    Extension, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// 透传到本地后端的路径前缀
pub const BACKEND_PREFIXES: &[&str] = &[
    "/api/search-console",
    "/api/competitor-analysis",
    "/api/competitor-search",
    "/api/simple-search",
    "/api/seo-audit",
];

/// 代理请求体上限（图像生成请求会携带 base64 图片）
const PROXY_BODY_LIMIT: usize = 20 * 1024 * 1024;

/// 路由依赖的组件
#[derive(Clone)]
pub struct AppComponents {
    pub scraper: Arc<SerpScraper>,
    pub proxy: Arc<UpstreamProxy>,
    pub fetcher: Arc<PageFetcher>,
}

/// 创建应用路由
pub fn routes(components: AppComponents) -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let mut proxy_routes = Router::new()
        .route("/api/gemini/{*path}", any(proxy_handler::gemini))
        .route("/api/imagen/{*path}", any(proxy_handler::gemini));
    for prefix in BACKEND_PREFIXES {
        proxy_routes = proxy_routes
            .route(prefix, any(proxy_handler::backend))
            .route(&format!("{}/{{*rest}}", prefix), any(proxy_handler::backend));
    }
    let proxy_routes = proxy_routes
        .layer(DefaultBodyLimit::max(PROXY_BODY_LIMIT))
        .layer(Extension(components.proxy));

    let fetch_routes = Router::new()
        .route("/api/fetch", get(fetch_handler::fetch_page))
        .layer(CorsLayer::permissive())
        .layer(Extension(components.fetcher));

    let serp_routes = Router::new()
        .route("/api/serp", post(search_handler::serp))
        .layer(Extension(components.scraper));

    Router::new()
        .merge(public_routes)
        .merge(proxy_routes)
        .merge(fetch_routes)
        .merge(serp_routes)
        .layer(TraceLayer::new_for_http())
}

/// 健康检查端点
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
