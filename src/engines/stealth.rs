// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

//! 反自动化检测与拟人化输入
//!
//! 注入脚本在任何页面脚本之前执行，抹掉 `navigator.webdriver` 等常见的
//! 自动化信号；拟人化辅助函数生成随机停顿和鼠标轨迹。

use rand::Rng;
use std::time::Duration;

/// 生成在新文档上提前执行的反检测脚本
///
/// `locale` 用于伪造 `navigator.languages`。
pub fn stealth_script(locale: &str) -> String {
    let primary = locale.split('-').next().unwrap_or(locale);
    let languages = if primary == locale {
        format!("['{}']", locale)
    } else {
        format!("['{}', '{}']", locale, primary)
    };

    format!(
        r#"(() => {{
    Object.defineProperty(Navigator.prototype, 'webdriver', {{ get: () => undefined }});
    Object.defineProperty(navigator, 'languages', {{ get: () => {languages} }});
    Object.defineProperty(navigator, 'plugins', {{ get: () => [1, 2, 3, 4, 5] }});
    Object.defineProperty(navigator, 'hardwareConcurrency', {{ get: () => 8 }});
    if (!window.chrome) {{
        window.chrome = {{ runtime: {{}}, loadTimes: () => ({{}}), csi: () => ({{}}) }};
    }}
    const originalQuery = window.navigator.permissions && window.navigator.permissions.query;
    if (originalQuery) {{
        window.navigator.permissions.query = (parameters) =>
            parameters.name === 'notifications'
                ? Promise.resolve({{ state: Notification.permission }})
                : originalQuery(parameters);
    }}
}})();"#
    )
}

/// 额外的 Chrome 启动参数，关闭 Blink 的自动化特征
pub const STEALTH_ARGS: &[&str] = &[
    "--disable-blink-features=AutomationControlled",
    "--disable-infobars",
    "--no-first-run",
    "--no-default-browser-check",
];

/// `[min_ms, max_ms]` 之间的随机停顿
pub fn jitter(min_ms: u64, max_ms: u64) -> Duration {
    if max_ms <= min_ms {
        return Duration::from_millis(min_ms);
    }
    Duration::from_millis(rand::rng().random_range(min_ms..=max_ms))
}

/// 在视口内生成一段鼠标轨迹
///
/// 轨迹从视口中部附近出发，逐步靠近搜索框所在的上半区域。
pub fn cursor_path(width: u32, height: u32, steps: usize) -> Vec<(f64, f64)> {
    let mut rng = rand::rng();
    let width = f64::from(width.max(1));
    let height = f64::from(height.max(1));

    let mut x = width * rng.random_range(0.35..0.65);
    let mut y = height * rng.random_range(0.55..0.8);
    let target_x = width * rng.random_range(0.4..0.6);
    let target_y = height * rng.random_range(0.2..0.35);

    (0..steps)
        .map(|step| {
            let remaining = (steps - step) as f64;
            x += (target_x - x) / remaining + rng.random_range(-6.0..6.0);
            y += (target_y - y) / remaining + rng.random_range(-4.0..4.0);
            (x.clamp(0.0, width - 1.0), y.clamp(0.0, height - 1.0))
        })
        .collect()
}
