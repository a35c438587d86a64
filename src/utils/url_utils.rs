// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use url::{ParseError, Url};

/// 将可能为相对路径的URL转换为绝对路径URL
pub fn resolve_url(base_url: &Url, path: &str) -> Result<Url, ParseError> {
    base_url.join(path)
}

/// 读取查询参数（已完成百分号解码）
pub fn query_param(url: &Url, name: &str) -> Option<String> {
    url.query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}

/// 在保留原有查询串的前提下追加一个参数
pub fn append_query_param(url: &mut Url, name: &str, value: &str) {
    url.query_pairs_mut().append_pair(name, value);
}

/// 拼接上游基础地址与转发路径
///
/// 基础地址自身的路径前缀会被保留，`path` 的前导斜杠会被去掉
pub fn join_upstream(base: &str, path: &str, query: Option<&str>) -> Result<Url, ParseError> {
    let mut url = Url::parse(base)?;
    let prefix = url.path().trim_end_matches('/').to_string();
    let suffix = path.trim_start_matches('/');
    if suffix.is_empty() {
        url.set_path(if prefix.is_empty() { "/" } else { &prefix });
    } else {
        url.set_path(&format!("{}/{}", prefix, suffix));
    }
    url.set_query(query.filter(|q| !q.is_empty()));
    Ok(url)
}
