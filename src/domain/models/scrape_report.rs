// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::search_result::SearchResult;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 一次抓取调用的结局
///
/// 普通调用方只看 `results`，所有结局都会折叠成（可能为空的）结果列表；
/// 需要排查问题时可以据此区分超时、导航失败和零结果。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum ScrapeOutcome {
    /// 结果容器出现且完成提取
    Completed,
    /// 完成提取，但没有符合条件的结果
    ZeroResults,
    /// 结果容器在限定时间内未出现，仍对当前页面尝试了提取
    SelectorTimeout,
    /// 浏览器启动、首页导航或搜索框定位失败
    NavigationFailed(String),
    /// 关键词为空，未启动浏览器
    EmptyKeyword,
}

/// 抓取报告
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeReport {
    pub engine: String,
    pub keyword: String,
    pub outcome: ScrapeOutcome,
    pub results: Vec<SearchResult>,
    pub elapsed_ms: u64,
    pub scraped_at: DateTime<Utc>,
}

impl ScrapeReport {
    pub fn empty(engine: &str, keyword: &str, outcome: ScrapeOutcome, elapsed_ms: u64) -> Self {
        Self {
            engine: engine.to_string(),
            keyword: keyword.to_string(),
            outcome,
            results: Vec::new(),
            elapsed_ms,
            scraped_at: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ScrapeOutcome::Completed)
    }
}
