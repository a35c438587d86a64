// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// - 搜索结果抓取服务（serp_scraper）：为每次调用启动独立浏览器会话，
///   输入关键词、等待结果并按引擎策略提取最多三条自然结果
pub mod serp_scraper;
