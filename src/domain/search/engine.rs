// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::search_result::SearchResult;
use crate::domain::search::extraction;
use crate::engines::traits::EngineError;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Search keyword is empty")]
    EmptyKeyword,
    #[error("Unknown search engine: {0}")]
    UnknownEngine(String),
    #[error("Search input not found with any of: {0}")]
    SearchInputNotFound(String),
    #[error("Browser error: {0}")]
    Engine(#[from] EngineError),
}

/// 搜索引擎策略
///
/// 每个搜索引擎只描述自己的页面结构：首页地址、自身域名、搜索框、
/// 结果容器、候选元素和标题的选择器回退链，以及广告标记。
/// 提取流程（[`extraction::extract_results`]）对所有引擎相同，
/// 新增引擎不需要改动控制流。
pub trait SearchEngine: Send + Sync {
    /// 引擎名称
    fn name(&self) -> &'static str;

    /// 首页地址
    fn home_url(&self) -> &'static str;

    /// 引擎自身域名，指向该域名的结果会被丢弃
    fn own_domain(&self) -> &'static str;

    /// 搜索框选择器，按优先级排列
    fn search_input_selectors(&self) -> &'static [&'static str];

    /// 结果容器选择器，任意一个出现即认为结果已渲染
    fn results_wait_selectors(&self) -> &'static [&'static str];

    /// 候选结果元素选择器回退链，第一个有匹配的选择器胜出
    fn candidate_selectors(&self) -> &'static [&'static str];

    /// 候选元素内的标题选择器，按优先级排列
    fn title_selectors(&self) -> &'static [&'static str];

    /// 候选元素（或其后代）上的广告标记
    fn ad_marker_selectors(&self) -> &'static [&'static str] {
        &[]
    }

    /// 将候选链接还原为目标地址
    ///
    /// 默认按首页地址解析相对链接；引擎可以覆盖以拆开自己的跳转链接。
    fn resolve_url(&self, href: &str) -> Option<String> {
        let base = Url::parse(self.home_url()).ok()?;
        crate::utils::url_utils::resolve_url(&base, href.trim())
            .ok()
            .map(|u| u.to_string())
    }

    /// 标题是否表明这是付费/赞助位
    fn is_sponsored_title(&self, title: &str) -> bool {
        title.contains("Ad") || title.contains("Sponsored")
    }

    /// 从渲染后的页面中提取最多 `limit` 条自然结果
    fn extract(&self, html: &str, limit: usize) -> Vec<SearchResult> {
        extraction::extract_results(self, html, limit)
    }
}
