// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};

/// 单条自然搜索结果
///
/// `strengths` / `weaknesses` 为下游分析预留，抓取时始终为空。
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    /// 在返回结果集中的名次，从 1 开始
    pub position: u32,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub weaknesses: Vec<String>,
}

impl SearchResult {
    pub fn new(title: String, url: String, position: u32) -> Self {
        Self {
            title,
            url,
            position,
            strengths: Vec::new(),
            weaknesses: Vec::new(),
        }
    }
}
