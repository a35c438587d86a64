// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::search::engine::SearchEngine;
use crate::utils::url_utils::{query_param, resolve_url};
use url::Url;

/// DuckDuckGo 搜索结果页策略
///
/// 新版页面用 `data-testid` 标注结果，旧版 HTML 页面使用 `.result`。
/// 链接可能经过 `/l/?uddg=` 跳转。
#[derive(Debug, Default, Clone, Copy)]
pub struct DuckDuckGoSearchEngine;

impl DuckDuckGoSearchEngine {
    pub fn new() -> Self {
        Self
    }

    /// 拆开 `/l/?uddg=` 跳转，其他链接原样返回
    pub fn unwrap_redirect(&self, url: &Url) -> String {
        let is_redirect = url
            .host_str()
            .is_some_and(|h| h.ends_with("duckduckgo.com"))
            && url.path().starts_with("/l/");
        if is_redirect {
            if let Some(target) = query_param(url, "uddg") {
                return target;
            }
        }
        url.to_string()
    }
}

impl SearchEngine for DuckDuckGoSearchEngine {
    fn name(&self) -> &'static str {
        "duckduckgo"
    }

    fn home_url(&self) -> &'static str {
        "https://duckduckgo.com/"
    }

    fn own_domain(&self) -> &'static str {
        "duckduckgo.com"
    }

    fn search_input_selectors(&self) -> &'static [&'static str] {
        &["#searchbox_input", "input[name='q']", "#search_form_input_homepage"]
    }

    fn results_wait_selectors(&self) -> &'static [&'static str] {
        &["[data-testid='result']", "#links", ".react-results--main", ".results"]
    }

    fn candidate_selectors(&self) -> &'static [&'static str] {
        &[
            "article[data-testid='result']",
            "[data-testid='result']",
            ".result",
            "li[data-layout='organic']",
        ]
    }

    fn title_selectors(&self) -> &'static [&'static str] {
        &["a[data-testid='result-title-a']", "h2 a", "a.result__a", "h2"]
    }

    fn ad_marker_selectors(&self) -> &'static [&'static str] {
        &["[data-testid='ad']", ".result--ad", "[data-layout='ad']"]
    }

    fn resolve_url(&self, href: &str) -> Option<String> {
        let base = Url::parse(self.home_url()).ok()?;
        let absolute = resolve_url(&base, href.trim()).ok()?;
        Some(self.unwrap_redirect(&absolute))
    }
}
