// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::config::settings::FetchSettings;
use crate::engines::validators;
use reqwest::redirect;
use std::net::IpAddr;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};
use url::Url;

/// 原始页面抓取错误
#[derive(Debug, Error)]
pub enum FetchError {
    /// 地址缺失或不是 http(s)
    #[error("Invalid url: {0}")]
    InvalidUrl(String),
    /// 目标地址被 SSRF 防护拒绝
    #[error("Blocked target: {0}")]
    Blocked(String),
    /// 响应体超过上限
    #[error("Response body exceeds {limit} bytes")]
    TooLarge { limit: usize },
    /// 请求超时
    #[error("Upstream request timed out")]
    Timeout,
    /// 上游请求失败
    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

/// 抓取到的页面
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub url: String,
    pub status: u16,
    pub body: String,
}

/// 服务端代抓页面，绕过浏览器的跨域限制
///
/// 只发 GET，响应体有上限，整体有超时，默认拒绝内网地址
pub struct PageFetcher {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl PageFetcher {
    pub fn new(settings: FetchSettings, user_agent: &str) -> Result<Self, FetchError> {
        let guard_redirects = !settings.allow_private_hosts;
        let policy = redirect::Policy::custom(move |attempt| {
            if attempt.previous().len() >= 5 {
                return attempt.error("too many redirects");
            }
            if guard_redirects && is_literal_private_host(attempt.url()) {
                return attempt.error("redirect to private address");
            }
            attempt.follow()
        });

        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .redirect(policy)
            .build()?;

        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// 校验目标地址
    pub async fn validate(&self, url: &str) -> Result<Url, FetchError> {
        let parsed =
            validators::validate_scheme(url).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;
        if self.settings.allow_private_hosts {
            return Ok(parsed);
        }
        validators::validate_url(url)
            .await
            .map_err(|e| FetchError::Blocked(e.to_string()))
    }

    /// 抓取页面原始 HTML
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let target = self.validate(url).await?;
        let limit = self.settings.max_bytes;
        let timeout = Duration::from_secs(self.settings.timeout_secs);

        let fetched = tokio::time::timeout(timeout, async {
            let mut response = self.client.get(target.as_str()).send().await?;
            let status = response.status().as_u16();

            if response.content_length().is_some_and(|len| len > limit as u64) {
                return Err(FetchError::TooLarge { limit });
            }

            let mut body: Vec<u8> = Vec::new();
            while let Some(chunk) = response.chunk().await? {
                if body.len() + chunk.len() > limit {
                    return Err(FetchError::TooLarge { limit });
                }
                body.extend_from_slice(&chunk);
            }
            debug!(status, bytes = body.len(), "Fetched {}", target);

            Ok::<FetchedPage, FetchError>(FetchedPage {
                url: response.url().to_string(),
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            })
        })
        .await
        .map_err(|_| FetchError::Timeout)?;

        match fetched {
            Err(FetchError::Upstream(e)) if e.is_timeout() => Err(FetchError::Timeout),
            other => {
                if let Ok(ref page) = other {
                    info!(status = page.status, "Fetched page {}", page.url);
                }
                other
            }
        }
    }
}

/// 跳转目标是否为 localhost 或内网 IP 字面量
fn is_literal_private_host(url: &Url) -> bool {
    match url.host_str() {
        Some("localhost") => true,
        Some(host) => host
            .trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<IpAddr>()
            .is_ok_and(validators::is_private_ip),
        None => true,
    }
}
