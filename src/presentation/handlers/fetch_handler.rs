// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Query},
    http::{header::CONTENT_TYPE, StatusCode},
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;

use crate::infrastructure::page_fetcher::{FetchError, PageFetcher};
use crate::presentation::errors::AppError;

#[derive(Debug, Deserialize)]
pub struct FetchParams {
    pub url: Option<String>,
}

/// 代抓页面并返回原始 HTML，状态码沿用上游
pub async fn fetch_page(
    Extension(fetcher): Extension<Arc<PageFetcher>>,
    Query(params): Query<FetchParams>,
) -> Result<impl IntoResponse, AppError> {
    let url = params
        .url
        .filter(|u| !u.trim().is_empty())
        .ok_or_else(|| FetchError::InvalidUrl("missing url parameter".to_string()))?;

    let page = fetcher.fetch(url.trim()).await?;
    let status = StatusCode::from_u16(page.status).unwrap_or(StatusCode::BAD_GATEWAY);
    Ok((status, [(CONTENT_TYPE, "text/html; charset=utf-8")], page.body))
}
