// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工具模块
///
/// 环境文件维护、日志初始化和 URL 辅助函数
pub mod env_file;
pub mod telemetry;
pub mod url_utils;
