// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// - 搜索结果（search_result）：单条自然搜索结果
/// - 抓取报告（scrape_report）：一次抓取调用的结果与结局
pub mod scrape_report;
pub mod search_result;
