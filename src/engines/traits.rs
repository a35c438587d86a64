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

use crate::config::settings::ScraperSettings;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// 浏览器引擎错误类型
#[derive(Error, Debug)]
pub enum EngineError {
    /// 浏览器启动或连接失败
    #[error("Browser launch failed: {0}")]
    Launch(String),
    /// 页面导航失败
    #[error("Navigation failed: {0}")]
    Navigation(String),
    /// 元素未找到
    #[error("Element not found: {0}")]
    ElementNotFound(String),
    /// 页面交互或脚本执行失败
    #[error("Page interaction failed: {0}")]
    Interaction(String),
    /// 超时
    #[error("Timeout")]
    Timeout,
    /// 会话已关闭
    #[error("Session already closed")]
    Closed,
}

/// 浏览器会话配置
///
/// 每次抓取调用都按这份配置新建一个隔离的会话
#[derive(Debug, Clone)]
pub struct SessionProfile {
    pub user_agent: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub locale: String,
    pub timezone: String,
    pub headless: bool,
    pub chrome_executable: Option<String>,
    pub remote_debugging_url: Option<String>,
    pub navigation_timeout: Duration,
}

impl SessionProfile {
    /// Accept-Language 头，例如 `en-US,en;q=0.9`
    pub fn accept_language(&self) -> String {
        match self.locale.split('-').next() {
            Some(lang) if lang != self.locale => format!("{},{};q=0.9", self.locale, lang),
            _ => self.locale.clone(),
        }
    }
}

impl From<&ScraperSettings> for SessionProfile {
    fn from(settings: &ScraperSettings) -> Self {
        Self {
            user_agent: settings.user_agent.clone(),
            viewport_width: settings.viewport_width,
            viewport_height: settings.viewport_height,
            locale: settings.locale.clone(),
            timezone: settings.timezone.clone(),
            headless: settings.headless,
            chrome_executable: settings.chrome_executable.clone(),
            remote_debugging_url: settings.remote_debugging_url.clone(),
            navigation_timeout: Duration::from_secs(settings.navigation_timeout_secs),
        }
    }
}

/// 单个浏览器会话（一个浏览器进程或远程上下文中的一个页面）
#[async_trait]
pub trait BrowserSession: Send {
    /// 导航到指定地址并等待页面加载完成
    async fn goto(&mut self, url: &str) -> Result<(), EngineError>;

    /// 等待任意一个选择器出现
    ///
    /// 返回最先匹配的选择器；超时返回 `Ok(None)` 而不是错误
    async fn wait_for_any(
        &mut self,
        selectors: &[&str],
        timeout: Duration,
    ) -> Result<Option<String>, EngineError>;

    /// 移动鼠标到视口坐标
    async fn move_mouse(&mut self, x: f64, y: f64) -> Result<(), EngineError>;

    /// 点击元素
    async fn click(&mut self, selector: &str) -> Result<(), EngineError>;

    /// 向元素输入文本
    async fn type_text(&mut self, selector: &str, text: &str) -> Result<(), EngineError>;

    /// 在元素上按下回车
    async fn press_enter(&mut self, selector: &str) -> Result<(), EngineError>;

    /// 当前渲染后的 HTML
    async fn content(&mut self) -> Result<String, EngineError>;

    /// 当前视口截图（PNG）
    async fn screenshot(&mut self) -> Result<Vec<u8>, EngineError>;

    /// 释放页面、浏览器进程和事件处理任务，可重复调用
    async fn shutdown(&mut self);
}

/// 浏览器会话工厂
#[async_trait]
pub trait SessionFactory: Send + Sync {
    /// 按配置启动一个全新的会话
    async fn launch(&self, profile: &SessionProfile) -> Result<Box<dyn BrowserSession>, EngineError>;

    /// 引擎名称
    fn name(&self) -> &'static str;
}
