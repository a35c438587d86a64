// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 基础设施层
///
/// 搜索引擎策略、数据库命令、上游代理和页面抓取
pub mod database;
pub mod page_fetcher;
pub mod proxy;
pub mod search;
