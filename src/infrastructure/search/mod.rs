// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 搜索引擎策略模块
///
/// 每个搜索引擎只提供自己的选择器和跳转链接解码，
/// 提取流程由 `domain::search::extraction` 统一完成
pub mod bing;
pub mod duckduckgo;
pub mod factory;

pub use factory::{engine_by_name, EngineKind};
