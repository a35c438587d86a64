// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 搜索领域模块
///
/// 定义搜索引擎策略接口以及与引擎无关的结果提取流程
pub mod engine;
pub mod extraction;
