// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{components, FakeSessionFactory, BING_COFFEE_RESULTS, BING_HOME};
use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use serpscout::presentation::routes;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn server(upstream: &str, api_key: Option<&str>) -> TestServer {
    let app = routes::routes(components(
        FakeSessionFactory::new(BING_HOME, BING_COFFEE_RESULTS),
        upstream,
        api_key,
    ));
    TestServer::new(app).unwrap()
}

/// 附加 API 密钥，保留原有查询串，原样转发请求体
#[tokio::test]
async fn gemini_proxy_appends_key_and_keeps_query() {
    let upstream = MockServer::start().await;
    let request = json!({ "contents": [{ "parts": [{ "text": "Summarise Roastery One" }] }] });

    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-pro:generateContent"))
        .and(query_param("alt", "sse"))
        .and(query_param("key", "test-key"))
        .and(header("content-type", "application/json"))
        .and(body_json(&request))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "candidates": [] })))
        .expect(1)
        .mount(&upstream)
        .await;

    let server = server(&upstream.uri(), Some("test-key"));
    let response = server
        .post("/api/gemini/v1beta/models/gemini-pro:generateContent")
        .add_query_param("alt", "sse")
        .json(&request)
        .await;

    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!({ "candidates": [] }));
}

#[tokio::test]
async fn imagen_proxy_shares_the_gemini_upstream() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/imagen-3.0-generate-002:predict"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "predictions": [] })))
        .expect(1)
        .mount(&upstream)
        .await;

    let server = server(&upstream.uri(), Some("test-key"));
    server
        .post("/api/imagen/v1beta/models/imagen-3.0-generate-002:predict")
        .json(&json!({ "instances": [{ "prompt": "latte art" }] }))
        .await
        .assert_status_ok();
}

/// 未配置密钥时直接返回 500，不请求上游
#[tokio::test]
async fn gemini_proxy_without_key_is_500() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&upstream)
        .await;

    let server = server(&upstream.uri(), None);
    let response = server
        .post("/api/gemini/v1beta/models/gemini-pro:generateContent")
        .json(&json!({}))
        .await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    assert!(response.json::<Value>()["error"]
        .as_str()
        .unwrap()
        .contains("GEMINI_API_KEY"));
}

/// 后端代理保留路径和查询串，原样返回状态码和内容类型
#[tokio::test]
async fn backend_proxy_relays_status_and_body() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/seo-audit/report"))
        .and(query_param("site", "roastery-one.example"))
        .respond_with(
            ResponseTemplate::new(201)
                .insert_header("content-type", "text/plain")
                .set_body_string("queued"),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let server = server(&upstream.uri(), None);
    let response = server
        .get("/api/seo-audit/report")
        .add_query_param("site", "roastery-one.example")
        .await;

    response.assert_status(StatusCode::CREATED);
    assert_eq!(response.text(), "queued");
    assert_eq!(response.header("content-type"), "text/plain");
}

#[tokio::test]
async fn backend_proxy_matches_bare_prefix() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/competitor-search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "competitors": 2 })))
        .expect(1)
        .mount(&upstream)
        .await;

    let server = server(&upstream.uri(), None);
    let response = server
        .post("/api/competitor-search")
        .json(&json!({ "keyword": "coffee roasters" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["competitors"], 2);
}

/// 上游不可达时返回 502
#[tokio::test]
async fn unreachable_upstream_is_bad_gateway() {
    let server = server("http://127.0.0.1:1", Some("test-key"));

    server
        .get("/api/simple-search")
        .await
        .assert_status(StatusCode::BAD_GATEWAY);
    server
        .post("/api/gemini/v1beta/models")
        .json(&json!({}))
        .await
        .assert_status(StatusCode::BAD_GATEWAY);
}
