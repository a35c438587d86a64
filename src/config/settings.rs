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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含服务器、数据库、抓取器、Gemini、后端代理和页面抓取等所有配置项
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// 服务器配置
    pub server: ServerSettings,
    /// 数据库配置
    #[serde(default)]
    pub database: DatabaseSettings,
    /// 搜索结果抓取器配置
    #[serde(default)]
    pub scraper: ScraperSettings,
    /// Gemini / Imagen 代理配置
    #[serde(default)]
    pub gemini: GeminiSettings,
    /// 本地后端代理配置
    #[serde(default)]
    pub backend: BackendSettings,
    /// 原始页面抓取配置
    #[serde(default)]
    pub fetch: FetchSettings,
}

/// 服务器配置设置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 数据库配置设置
///
/// 连接串只来自配置文件或环境变量，从不写死在代码里
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: Option<String>,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
}

/// 抓取器配置设置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScraperSettings {
    pub user_agent: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
    /// BCP 47 语言标记，例如 en-US
    pub locale: String,
    /// IANA 时区，例如 America/New_York
    pub timezone: String,
    pub headless: bool,
    /// Chrome 可执行文件路径，不设置时由 chromiumoxide 自动探测
    pub chrome_executable: Option<String>,
    /// 已运行的 Chrome 远程调试地址，设置后不再启动本地浏览器
    pub remote_debugging_url: Option<String>,
    /// 首页导航超时（秒）
    pub navigation_timeout_secs: u64,
    /// 等待搜索框出现的超时（秒）
    pub input_timeout_secs: u64,
    /// 等待结果容器出现的超时（秒）
    pub results_timeout_secs: u64,
    /// 每次调用最多返回的结果数
    pub max_results: usize,
    pub human_delay_min_ms: u64,
    pub human_delay_max_ms: u64,
    pub typing_delay_min_ms: u64,
    pub typing_delay_max_ms: u64,
    /// 调试截图目录，仅供人工排查
    pub screenshot_dir: Option<String>,
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36".to_string(),
            viewport_width: 1366,
            viewport_height: 768,
            locale: "en-US".to_string(),
            timezone: "America/New_York".to_string(),
            headless: true,
            chrome_executable: None,
            remote_debugging_url: None,
            navigation_timeout_secs: 30,
            input_timeout_secs: 5,
            results_timeout_secs: 10,
            max_results: 3,
            human_delay_min_ms: 150,
            human_delay_max_ms: 600,
            typing_delay_min_ms: 40,
            typing_delay_max_ms: 140,
            screenshot_dir: None,
        }
    }
}

/// Gemini / Imagen 生成式接口配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeminiSettings {
    /// 上游主机，例如 https://generativelanguage.googleapis.com
    pub base_url: String,
    /// API 密钥，以 key 查询参数附加到上游请求
    pub api_key: Option<String>,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            api_key: None,
        }
    }
}

/// 本地后端服务配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendSettings {
    pub base_url: String,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3001".to_string(),
        }
    }
}

/// 原始页面抓取配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchSettings {
    /// 响应体上限（字节）
    pub max_bytes: usize,
    /// 请求超时（秒）
    pub timeout_secs: u64,
    /// 是否允许抓取内网/环回地址（仅用于本地调试）
    pub allow_private_hosts: bool,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            max_bytes: 5 * 1024 * 1024,
            timeout_secs: 10,
            allow_private_hosts: false,
        }
    }
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 依次叠加代码默认值、`config/default`、`config/{APP_ENVIRONMENT}`
    /// 以及 `SERPSCOUT__` 前缀的环境变量。`DATABASE_URL` 和
    /// `GEMINI_API_KEY` 在对应配置项缺失时作为兜底。
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::with_prefix("SERPSCOUT")
                    .prefix_separator("__")
                    .separator("__"),
            );

        let mut settings: Settings = builder.build()?.try_deserialize()?;
        settings.apply_well_known_env();
        Ok(settings)
    }

    fn apply_well_known_env(&mut self) {
        if self.database.url.is_none() {
            self.database.url = std::env::var("DATABASE_URL").ok().filter(|v| !v.is_empty());
        }
        if self.gemini.api_key.is_none() {
            self.gemini.api_key = std::env::var("GEMINI_API_KEY").ok().filter(|v| !v.is_empty());
        }
    }
}
