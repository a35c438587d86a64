// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::infrastructure::database::entities::client;
use crate::infrastructure::database::error::DbToolError;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbBackend, EntityTrait, QueryFilter,
    Set, Statement, TransactionTrait,
};
use serde::Deserialize;
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;

/// 允许修改的客户字段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientField {
    BusinessName,
    Website,
    ContactEmail,
    Industry,
    Location,
}

impl ClientField {
    pub fn column(&self) -> client::Column {
        match self {
            Self::BusinessName => client::Column::BusinessName,
            Self::Website => client::Column::Website,
            Self::ContactEmail => client::Column::ContactEmail,
            Self::Industry => client::Column::Industry,
            Self::Location => client::Column::Location,
        }
    }
}

impl FromStr for ClientField {
    type Err = DbToolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "business_name" => Ok(Self::BusinessName),
            "website" => Ok(Self::Website),
            "contact_email" => Ok(Self::ContactEmail),
            "industry" => Ok(Self::Industry),
            "location" => Ok(Self::Location),
            other => Err(DbToolError::UnknownField(other.to_string())),
        }
    }
}

/// 重建客户记录时的输入
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewClient {
    pub business_name: String,
    pub website: Option<String>,
    pub contact_email: Option<String>,
    pub industry: Option<String>,
    pub location: Option<String>,
}

/// 转义 LIKE 通配符，使用户输入按字面匹配
pub fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// 客户记录的查询与修补
pub struct ClientRecords<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> ClientRecords<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// 按商户名称做不区分大小写的模糊查找
    pub async fn find_clients(&self, business_name: &str) -> Result<Vec<client::Model>, DbToolError> {
        let pattern = format!("%{}%", escape_like(business_name.trim()));
        let stmt = Statement::from_sql_and_values(
            DbBackend::Postgres,
            "SELECT id, business_name, website, contact_email, industry, location \
             FROM clients WHERE business_name ILIKE $1 ORDER BY business_name",
            [pattern.into()],
        );
        Ok(client::Entity::find().from_raw_sql(stmt).all(self.db).await?)
    }

    /// 修改单条客户记录的一个字段
    ///
    /// 字段名必须在 [`ClientField`] 中，值总是作为绑定参数传入
    pub async fn patch_client(&self, id: Uuid, field: &str, value: &str) -> Result<u64, DbToolError> {
        let field: ClientField = field.parse()?;
        let result = client::Entity::update_many()
            .col_expr(field.column(), Expr::value(value.to_string()))
            .filter(ColumnTrait::eq(&client::Column::Id, id))
            .exec(self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(DbToolError::NotFound(id));
        }
        info!(%id, ?field, "Patched client record");
        Ok(result.rows_affected)
    }

    /// 在一个事务中删除同名客户并插入新记录，返回新记录 ID
    pub async fn rebuild_client(&self, record: NewClient) -> Result<Uuid, DbToolError> {
        let txn = self.db.begin().await?;

        let deleted = client::Entity::delete_many()
            .filter(
                Expr::expr(Func::lower(Expr::col(client::Column::BusinessName)))
                    .eq(record.business_name.trim().to_lowercase()),
            )
            .exec(&txn)
            .await?;

        let id = Uuid::new_v4();
        client::ActiveModel {
            id: Set(id),
            business_name: Set(record.business_name.trim().to_string()),
            website: Set(record.website),
            contact_email: Set(record.contact_email),
            industry: Set(record.industry),
            location: Set(record.location),
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        info!(%id, deleted = deleted.rows_affected, "Rebuilt client record");
        Ok(id)
    }
}
