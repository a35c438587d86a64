// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 配置模块
///
/// 处理应用程序的配置设置和环境变量
pub mod config;

/// 领域模块
///
/// 搜索结果模型、搜索引擎策略接口和抓取服务
pub mod domain;

/// 引擎模块
///
/// 基于 chromiumoxide 的浏览器会话和反检测设置
pub mod engines;

/// 基础设施模块
///
/// 搜索引擎策略实现、数据库工具、上游代理和页面抓取
pub mod infrastructure;

/// 表示层模块
///
/// HTTP 路由、处理器以及命令行入口
pub mod presentation;

/// 工具模块
pub mod utils;
