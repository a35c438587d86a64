// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 数据库模块
///
/// 提供连接池、只读结构查看和客户记录修补命令
pub mod client_records;
pub mod connection;
pub mod entities;
pub mod error;
pub mod inspector;

pub use error::DbToolError;
