// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::search::engine::{SearchEngine, SearchError};
use crate::infrastructure::search::bing::BingSearchEngine;
use crate::infrastructure::search::duckduckgo::DuckDuckGoSearchEngine;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::Arc;

/// 搜索引擎类型枚举
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// Bing 搜索引擎
    #[default]
    Bing,
    /// DuckDuckGo 搜索引擎
    #[serde(alias = "ddg")]
    #[value(name = "duckduckgo", alias = "ddg")]
    DuckDuckGo,
}

impl EngineKind {
    /// 获取引擎名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::Bing => "bing",
            Self::DuckDuckGo => "duckduckgo",
        }
    }

    /// 创建对应的引擎策略
    pub fn build(&self) -> Arc<dyn SearchEngine> {
        match self {
            Self::Bing => Arc::new(BingSearchEngine::new()),
            Self::DuckDuckGo => Arc::new(DuckDuckGoSearchEngine::new()),
        }
    }
}

impl FromStr for EngineKind {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bing" => Ok(Self::Bing),
            "duckduckgo" | "ddg" => Ok(Self::DuckDuckGo),
            other => Err(SearchError::UnknownEngine(other.to_string())),
        }
    }
}

/// 按名称查找搜索引擎策略
pub fn engine_by_name(name: &str) -> Result<Arc<dyn SearchEngine>, SearchError> {
    Ok(name.parse::<EngineKind>()?.build())
}
