// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::config::settings::{BackendSettings, GeminiSettings};
use crate::utils::url_utils::{append_query_param, join_upstream};
use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderName, CONTENT_TYPE};
use reqwest::Method;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

/// 不转发的逐跳头
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "host",
    "content-length",
];

/// 代理错误
#[derive(Debug, Error)]
pub enum ProxyError {
    /// 未配置 Gemini API 密钥
    #[error("GEMINI_API_KEY is not configured")]
    MissingApiKey,
    /// 无法构造上游地址
    #[error("Invalid upstream url: {0}")]
    InvalidTarget(String),
    /// 上游不可达或请求失败
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

/// 上游返回的原始响应
#[derive(Debug, Clone)]
pub struct ProxyResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// 是否转发该请求头
pub fn should_forward_header(name: &HeaderName) -> bool {
    !HOP_BY_HOP.contains(&name.as_str())
}

/// AI / 后端接口透传代理
///
/// 不重试、不限流，只注入凭据并原样转发响应
pub struct UpstreamProxy {
    client: reqwest::Client,
    gemini: GeminiSettings,
    backend: BackendSettings,
}

impl UpstreamProxy {
    pub fn new(gemini: GeminiSettings, backend: BackendSettings) -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            gemini,
            backend,
        })
    }

    /// Gemini / Imagen 上游地址，附加 `key` 查询参数
    pub fn build_gemini_url(&self, path: &str, query: Option<&str>) -> Result<Url, ProxyError> {
        let key = self
            .gemini
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(ProxyError::MissingApiKey)?;

        let mut url = join_upstream(&self.gemini.base_url, path, query)
            .map_err(|e| ProxyError::InvalidTarget(e.to_string()))?;
        append_query_param(&mut url, "key", key);
        Ok(url)
    }

    /// 本地后端地址，路径与查询串保持不变
    pub fn build_backend_url(&self, path: &str, query: Option<&str>) -> Result<Url, ProxyError> {
        join_upstream(&self.backend.base_url, path, query)
            .map_err(|e| ProxyError::InvalidTarget(e.to_string()))
    }

    /// 转发请求并返回上游响应
    pub async fn forward(
        &self,
        method: Method,
        url: Url,
        headers: &HeaderMap,
        body: Bytes,
    ) -> Result<ProxyResponse, ProxyError> {
        let mut forwarded = HeaderMap::new();
        for (name, value) in headers {
            if should_forward_header(name) {
                forwarded.append(name.clone(), value.clone());
            }
        }

        debug!(%method, host = url.host_str().unwrap_or_default(), path = url.path(), "Forwarding request");
        let response = self
            .client
            .request(method, url)
            .headers(forwarded)
            .body(body)
            .send()
            .await
            .inspect_err(|e| warn!("Upstream request failed: {}", e))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await?;

        Ok(ProxyResponse {
            status,
            content_type,
            body,
        })
    }
}
