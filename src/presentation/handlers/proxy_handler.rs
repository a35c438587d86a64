// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    body::{Body, Bytes},
    extract::{Extension, Path, RawQuery},
    http::{header::CONTENT_TYPE, HeaderMap, Method, StatusCode, Uri},
    response::Response,
};
use std::sync::Arc;

use crate::infrastructure::proxy::{ProxyResponse, UpstreamProxy};
use crate::presentation::errors::AppError;

/// 转发到 Gemini / Imagen 接口，注入 API 密钥
pub async fn gemini(
    Extension(proxy): Extension<Arc<UpstreamProxy>>,
    Path(path): Path<String>,
    RawQuery(query): RawQuery,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let url = proxy.build_gemini_url(&path, query.as_deref())?;
    let upstream = proxy.forward(method, url, &headers, body).await?;
    relay(upstream)
}

/// 原样转发到本地后端
pub async fn backend(
    Extension(proxy): Extension<Arc<UpstreamProxy>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let url = proxy.build_backend_url(uri.path(), uri.query())?;
    let upstream = proxy.forward(method, url, &headers, body).await?;
    relay(upstream)
}

/// 把上游的状态码、内容类型和响应体原样交回
fn relay(upstream: ProxyResponse) -> Result<Response, AppError> {
    let status = StatusCode::from_u16(upstream.status).unwrap_or(StatusCode::BAD_GATEWAY);
    let mut builder = Response::builder().status(status);
    if let Some(content_type) = upstream.content_type {
        builder = builder.header(CONTENT_TYPE, content_type);
    }
    Ok(builder.body(Body::from(upstream.body))?)
}
