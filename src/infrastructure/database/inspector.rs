// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::infrastructure::database::error::DbToolError;
use sea_orm::{ConnectionTrait, DatabaseConnection, DbBackend, FromQueryResult, Statement};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, FromQueryResult)]
struct TableName {
    table_name: String,
}

/// 表结构中的一列
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromQueryResult)]
pub struct ColumnInfo {
    pub column_name: String,
    pub data_type: String,
    pub nullable: bool,
}

#[derive(Debug, FromQueryResult)]
struct RowCount {
    count: i64,
}

/// 校验表名是否在允许列表中
///
/// 返回允许列表中的原始名称，后续拼接 SQL 只使用该值
pub fn ensure_allowed<'a>(name: &str, allowed: &'a [String]) -> Result<&'a str, DbToolError> {
    allowed
        .iter()
        .find(|t| t.as_str() == name)
        .map(String::as_str)
        .ok_or_else(|| DbToolError::UnknownTable(name.to_string()))
}

/// 为 Postgres 标识符加双引号，内部的双引号加倍
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// 只读的数据库结构查看器
pub struct SchemaInspector<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> SchemaInspector<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// 列出 `public` 模式下的全部基础表，按名称排序
    pub async fn list_tables(&self) -> Result<Vec<String>, DbToolError> {
        let stmt = Statement::from_string(
            DbBackend::Postgres,
            "SELECT table_name::text AS table_name \
             FROM information_schema.tables \
             WHERE table_schema = 'public' AND table_type = 'BASE TABLE' \
             ORDER BY table_name",
        );
        let rows = TableName::find_by_statement(stmt).all(self.db).await?;
        Ok(rows.into_iter().map(|r| r.table_name).collect())
    }

    /// 按列序返回表结构
    pub async fn describe_table(&self, name: &str) -> Result<Vec<ColumnInfo>, DbToolError> {
        let tables = self.list_tables().await?;
        let table = ensure_allowed(name, &tables)?;

        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT column_name::text AS column_name, \
                    data_type::text AS data_type, \
                    (is_nullable = 'YES') AS nullable \
             FROM information_schema.columns \
             WHERE table_schema = 'public' AND table_name = $1 \
             ORDER BY ordinal_position",
            [table.into()],
        );
        Ok(ColumnInfo::find_by_statement(stmt).all(self.db).await?)
    }

    /// 统计表的行数
    pub async fn count_rows(&self, name: &str) -> Result<i64, DbToolError> {
        let tables = self.list_tables().await?;
        let table = ensure_allowed(name, &tables)?;

        let sql = format!(
            "SELECT COUNT(*)::bigint AS count FROM public.{}",
            quote_identifier(table)
        );
        debug!("Counting rows: {}", sql);
        let row = RowCount::find_by_statement(Statement::from_string(self.db.get_database_backend(), sql))
            .one(self.db)
            .await?;
        Ok(row.map(|r| r.count).unwrap_or(0))
    }
}
