// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::search_result::SearchResult;
use crate::domain::search::engine::SearchEngine;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info, warn};

/// 从渲染后的搜索结果页中提取自然结果
///
/// 流程：
/// 1. 依次尝试引擎的候选选择器，第一个有匹配的选择器胜出
/// 2. 对每个候选元素定位标题和链接，缺任意一项即跳过
/// 3. 丢弃非 HTTP(S) 链接、指向引擎自身域名的链接、带广告标记的候选
///    以及标题表明是赞助位的候选
/// 4. 收集满 `limit` 条或候选耗尽后停止，名次按文档顺序从 1 开始编号
pub fn extract_results<E>(engine: &E, html: &str, limit: usize) -> Vec<SearchResult>
where
    E: SearchEngine + ?Sized,
{
    if limit == 0 || html.trim().is_empty() {
        return Vec::new();
    }

    let document = Html::parse_document(html);
    let Some((strategy, candidates)) = select_candidates(engine, &document) else {
        info!(
            engine = engine.name(),
            "No candidate result elements matched any selector"
        );
        return Vec::new();
    };

    info!(
        engine = engine.name(),
        strategy,
        candidates = candidates.len(),
        "Matched candidate result elements"
    );

    let title_selectors = parse_selectors(engine.title_selectors());
    let ad_selectors = parse_selectors(engine.ad_marker_selectors());
    let link_selector = Selector::parse("a[href]").ok();
    let own_domain = engine.own_domain().to_ascii_lowercase();

    let mut results: Vec<SearchResult> = Vec::with_capacity(limit);
    for candidate in candidates {
        if results.len() >= limit {
            break;
        }

        if has_ad_marker(candidate, &ad_selectors) {
            debug!(engine = engine.name(), "Skipping candidate with ad marker");
            continue;
        }

        let Some((title, title_element)) = find_title(candidate, &title_selectors) else {
            continue;
        };

        let Some(href) = find_link(title_element, candidate, link_selector.as_ref()) else {
            continue;
        };

        let Some(url) = engine.resolve_url(&href) else {
            continue;
        };

        if !is_http_url(&url) {
            debug!(engine = engine.name(), %url, "Skipping non-HTTP result");
            continue;
        }

        if url.to_ascii_lowercase().contains(&own_domain) {
            debug!(engine = engine.name(), %url, "Skipping link back to the engine");
            continue;
        }

        if engine.is_sponsored_title(&title) {
            debug!(engine = engine.name(), %title, "Skipping sponsored result");
            continue;
        }

        if results.iter().any(|r| r.url == url) {
            continue;
        }

        let position = results.len() as u32 + 1;
        results.push(SearchResult::new(title, url, position));
    }

    results
}

/// 是否为绝对 HTTP(S) 地址
pub fn is_http_url(url: &str) -> bool {
    (url.starts_with("http://") || url.starts_with("https://"))
        && url::Url::parse(url)
            .map(|u| u.host_str().is_some())
            .unwrap_or(false)
}

/// 合并空白并去掉首尾空白
pub fn normalize_text(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn select_candidates<'a, E>(
    engine: &E,
    document: &'a Html,
) -> Option<(&'static str, Vec<ElementRef<'a>>)>
where
    E: SearchEngine + ?Sized,
{
    for raw in engine.candidate_selectors() {
        let Ok(selector) = Selector::parse(raw) else {
            warn!(engine = engine.name(), selector = raw, "Invalid candidate selector");
            continue;
        };
        let elements: Vec<_> = document.select(&selector).collect();
        if !elements.is_empty() {
            return Some((*raw, elements));
        }
    }
    None
}

fn parse_selectors(raw: &[&str]) -> Vec<Selector> {
    raw.iter()
        .filter_map(|s| match Selector::parse(s) {
            Ok(selector) => Some(selector),
            Err(_) => {
                warn!(selector = s, "Invalid selector ignored");
                None
            }
        })
        .collect()
}

fn has_ad_marker(candidate: ElementRef<'_>, ad_selectors: &[Selector]) -> bool {
    ad_selectors
        .iter()
        .any(|s| s.matches(&candidate) || candidate.select(s).next().is_some())
}

fn find_title<'a>(
    candidate: ElementRef<'a>,
    title_selectors: &[Selector],
) -> Option<(String, ElementRef<'a>)> {
    for selector in title_selectors {
        for element in candidate.select(selector) {
            let text = normalize_text(&element.text().collect::<String>());
            if !text.is_empty() {
                return Some((text, element));
            }
        }
    }
    None
}

fn find_link(
    title_element: ElementRef<'_>,
    candidate: ElementRef<'_>,
    link_selector: Option<&Selector>,
) -> Option<String> {
    let href_of = |e: ElementRef<'_>| {
        e.value()
            .attr("href")
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .map(str::to_string)
    };

    if title_element.value().name() == "a" {
        if let Some(href) = href_of(title_element) {
            return Some(href);
        }
    }

    let link_selector = link_selector?;
    if let Some(href) = title_element.select(link_selector).find_map(href_of) {
        return Some(href);
    }

    // 标题被链接包裹，例如 <a href><h3>..</h3></a>
    let wrapping = title_element
        .ancestors()
        .take_while(|node| node.id() != candidate.id())
        .filter_map(ElementRef::wrap)
        .filter(|e| e.value().name() == "a")
        .find_map(href_of);
    if wrapping.is_some() {
        return wrapping;
    }

    candidate.select(link_selector).find_map(href_of)
}
