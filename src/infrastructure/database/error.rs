// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// 数据库运维命令错误
#[derive(Error, Debug)]
pub enum DbToolError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 未配置连接地址
    #[error("No database URL configured (set database.url or DATABASE_URL)")]
    MissingUrl,
    /// 表名不在允许列表中
    #[error("Unknown table: {0}")]
    UnknownTable(String),
    /// 字段不可修改
    #[error("Unknown or read-only field: {0}")]
    UnknownField(String),
    /// 记录未找到
    #[error("Client not found: {0}")]
    NotFound(Uuid),
}
