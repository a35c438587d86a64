// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::search::engine::SearchEngine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use url::Url;

/// Bing 搜索结果页策略
///
/// Bing 的结果标记随实验分组变化：主结构是 `li.b_algo`，部分分组只保留
/// `.b_algo` 类或直接挂在 `#b_results` 下。结果链接有时是 `/ck/a` 跳转，
/// 真实地址以 `a1` + URL-safe Base64 的形式放在 `u` 参数中。
#[derive(Debug, Default, Clone, Copy)]
pub struct BingSearchEngine;

impl BingSearchEngine {
    pub fn new() -> Self {
        Self
    }

    /// 解码 Bing `/ck/a` 跳转链接
    ///
    /// 非跳转链接或无法解码时原样返回
    pub fn decode_bing_url(&self, url: &str) -> String {
        let Ok(parsed) = Url::parse(url) else {
            return url.to_string();
        };

        let is_redirect = parsed
            .host_str()
            .is_some_and(|h| h.ends_with("bing.com"))
            && parsed.path() == "/ck/a";
        if !is_redirect {
            return url.to_string();
        }

        parsed
            .query_pairs()
            .find(|(key, _)| key == "u")
            .and_then(|(_, value)| {
                let encoded = value.strip_prefix("a1")?;
                let bytes = URL_SAFE_NO_PAD.decode(encoded.trim_end_matches('=')).ok()?;
                String::from_utf8(bytes).ok()
            })
            .unwrap_or_else(|| url.to_string())
    }
}

impl SearchEngine for BingSearchEngine {
    fn name(&self) -> &'static str {
        "bing"
    }

    fn home_url(&self) -> &'static str {
        "https://www.bing.com/"
    }

    fn own_domain(&self) -> &'static str {
        "bing.com"
    }

    fn search_input_selectors(&self) -> &'static [&'static str] {
        &["#sb_form_q", "textarea[name='q']", "input[name='q']"]
    }

    fn results_wait_selectors(&self) -> &'static [&'static str] {
        &["#b_results", "li.b_algo", "ol#b_results > li"]
    }

    fn candidate_selectors(&self) -> &'static [&'static str] {
        &["li.b_algo", ".b_algo", "#b_results > li"]
    }

    fn title_selectors(&self) -> &'static [&'static str] {
        &["h2 a", "h2", "a.tilk"]
    }

    fn ad_marker_selectors(&self) -> &'static [&'static str] {
        &[".b_ad", ".b_adSlug", ".b_adurl"]
    }

    fn resolve_url(&self, href: &str) -> Option<String> {
        let base = Url::parse(self.home_url()).ok()?;
        let absolute = crate::utils::url_utils::resolve_url(&base, href.trim()).ok()?;
        Some(self.decode_bing_url(absolute.as_str()))
    }
}
