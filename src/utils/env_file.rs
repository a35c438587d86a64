// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// 门户需要的环境变量
pub const RECOGNIZED_KEYS: &[&str] = &[
    "CONTEXT7_API_KEY",
    "GEMINI_API_KEY",
    "SUPABASE_URL",
    "SUPABASE_ANON_KEY",
    "GOOGLE_SERVICE_ACCOUNT_EMAIL",
    "GOOGLE_PRIVATE_KEY",
];

/// 环境文件错误
#[derive(Error, Debug)]
pub enum EnvFileError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse env file: {0}")]
    Parse(#[from] dotenvy::Error),
}

/// 读取文件中已赋值的键；文件不存在时返回空集合
pub fn existing_keys(path: &Path) -> Result<HashSet<String>, EnvFileError> {
    if !path.exists() {
        return Ok(HashSet::new());
    }
    let mut keys = HashSet::new();
    for item in dotenvy::from_path_iter(path)? {
        let (key, _) = item?;
        keys.insert(key);
    }
    Ok(keys)
}

/// 文件中尚未配置的已知键，保持 [`RECOGNIZED_KEYS`] 的顺序
pub fn missing_keys(path: &Path) -> Result<Vec<&'static str>, EnvFileError> {
    let existing = existing_keys(path)?;
    Ok(RECOGNIZED_KEYS
        .iter()
        .copied()
        .filter(|key| !existing.contains(*key))
        .collect())
}

/// 按 dotenv 语法格式化值
///
/// 含空白、`#`、引号、`$`、反斜杠或换行的值用双引号包裹，换行写成 `\n`
pub fn format_value(value: &str) -> String {
    let needs_quotes = value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '#' | '"' | '\'' | '$' | '\\'));
    if !needs_quotes {
        return value.to_string();
    }

    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for ch in value.chars() {
        match ch {
            '\n' => quoted.push_str("\\n"),
            '\r' => {}
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '$' => quoted.push_str("\\$"),
            other => quoted.push(other),
        }
    }
    quoted.push('"');
    quoted
}

/// 追加 `KEY=value` 行，已存在的键不会被覆盖
///
/// 返回实际写入的键
pub fn append_entries(
    path: &Path,
    entries: &[(String, String)],
) -> Result<Vec<String>, EnvFileError> {
    let mut seen = existing_keys(path)?;
    let mut lines = Vec::new();
    let mut written = Vec::new();

    for (key, value) in entries {
        let key = key.trim();
        if key.is_empty() || !seen.insert(key.to_string()) {
            debug!(key, "Skipping existing env key");
            continue;
        }
        lines.push(format!("{}={}", key, format_value(value)));
        written.push(key.to_string());
    }

    if lines.is_empty() {
        return Ok(written);
    }

    let mut file = OpenOptions::new()
        .create(true)
        .read(true)
        .append(true)
        .open(path)?;

    let mut prefix = String::new();
    let len = file.metadata()?.len();
    if len > 0 {
        let mut last = [0u8; 1];
        file.seek(SeekFrom::Start(len - 1))?;
        file.read_exact(&mut last)?;
        if last[0] != b'\n' {
            prefix.push('\n');
        }
    }

    file.write_all(format!("{}{}\n", prefix, lines.join("\n")).as_bytes())?;
    info!(count = written.len(), "Appended entries to {}", path.display());
    Ok(written)
}
