// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::config::settings::DatabaseSettings;
use crate::infrastructure::database::error::DbToolError;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::debug;

/// 根据配置构造连接选项
///
/// 连接地址只来自配置或环境变量，未配置时返回 [`DbToolError::MissingUrl`]
pub fn connect_options(settings: &DatabaseSettings) -> Result<ConnectOptions, DbToolError> {
    let url = settings
        .url
        .as_deref()
        .filter(|u| !u.trim().is_empty())
        .ok_or(DbToolError::MissingUrl)?;
    let mut opt = ConnectOptions::new(url.to_owned());

    if let Some(max) = settings.max_connections {
        opt.max_connections(max);
    }

    if let Some(min) = settings.min_connections {
        opt.min_connections(min);
    }

    if let Some(timeout) = settings.connect_timeout {
        opt.connect_timeout(Duration::from_secs(timeout));
        opt.acquire_timeout(Duration::from_secs(timeout));
    }

    if let Some(idle) = settings.idle_timeout {
        opt.idle_timeout(Duration::from_secs(idle));
    }

    opt.max_lifetime(Duration::from_secs(3600))
        .sqlx_logging(false);

    Ok(opt)
}

/// 创建数据库连接池
pub async fn create_pool(settings: &DatabaseSettings) -> Result<DatabaseConnection, DbToolError> {
    let opt = connect_options(settings)?;
    debug!("Connecting to database");
    Ok(Database::connect(opt).await?)
}
