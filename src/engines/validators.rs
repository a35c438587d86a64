// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::net::IpAddr;
use tokio::net::lookup_host;
use url::Url;

/// 验证 URL 是否为可抓取的公网 HTTP(S) 地址 (防止 SSRF)
///
/// 检查协议，并确认解析后的 IP 不是私有地址或环回地址
pub async fn validate_url(url_str: &str) -> anyhow::Result<Url> {
    let url = validate_scheme(url_str)?;
    let host = url
        .host_str()
        .ok_or_else(|| anyhow::anyhow!("Missing host"))?;

    if host == "localhost" {
        return Err(anyhow::anyhow!("SSRF protection: localhost is not allowed"));
    }

    let port = url.port_or_known_default().unwrap_or(80);
    let host = host.trim_start_matches('[').trim_end_matches(']');
    let addrs = lookup_host((host, port)).await?;

    for addr in addrs {
        if is_private_ip(addr.ip()) {
            return Err(anyhow::anyhow!(
                "SSRF protection: Private IP access is not allowed: {}",
                addr.ip()
            ));
        }
    }

    Ok(url)
}

/// 只校验协议和主机，不做 DNS 解析
pub fn validate_scheme(url_str: &str) -> anyhow::Result<Url> {
    let url = Url::parse(url_str)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(anyhow::anyhow!("Unsupported scheme: {}", url.scheme()));
    }
    if url.host_str().is_none() {
        return Err(anyhow::anyhow!("Missing host"));
    }
    Ok(url)
}

pub fn is_private_ip(ip: IpAddr) -> bool {
    match ip {
        IpAddr::V4(ipv4) => {
            let octets = ipv4.octets();
            // 10.0.0.0/8
            octets[0] == 10
                // 172.16.0.0/12
                || (octets[0] == 172 && (16..=31).contains(&octets[1]))
                // 192.168.0.0/16
                || (octets[0] == 192 && octets[1] == 168)
                || ipv4.is_loopback()
                || ipv4.is_link_local()
                || ipv4.is_unspecified()
                // 224.0.0.0/4
                || (224..=239).contains(&octets[0])
        }
        IpAddr::V6(ipv6) => {
            let first = ipv6.segments()[0];
            ipv6.is_loopback()
                || ipv6.is_unspecified()
                // Unique Local Address (fc00::/7)
                || (first & 0xfe00) == 0xfc00
                // Link-local (fe80::/10)
                || (first & 0xffc0) == 0xfe80
                // Multicast (ff00::/8)
                || (first & 0xff00) == 0xff00
        }
    }
}
