// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域层模块
///
/// 该模块包含系统的核心逻辑，包括：
/// - 领域模型（models）：搜索结果与抓取报告
/// - 搜索（search）：搜索引擎策略接口与通用结果提取流程
/// - 服务（services）：单次浏览器会话的搜索结果抓取服务
///
/// 领域层不依赖具体的浏览器或搜索引擎实现。
pub mod models;
pub mod search;
pub mod services;
