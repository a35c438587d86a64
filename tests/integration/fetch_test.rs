// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use super::helpers::{components, FakeSessionFactory, BING_COFFEE_RESULTS, BING_HOME};
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum_test::TestServer;
use serpscout::config::settings::FetchSettings;
use serpscout::infrastructure::page_fetcher::{FetchError, PageFetcher};
use serpscout::presentation::routes;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PAGE: &str = "<html><body>Roastery One</body></html>";

fn server() -> TestServer {
    let app = routes::routes(components(
        FakeSessionFactory::new(BING_HOME, BING_COFFEE_RESULTS),
        "http://127.0.0.1:1",
        None,
    ));
    TestServer::new(app).unwrap()
}

async fn upstream_with(route: &str, template: ResponseTemplate) -> MockServer {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(template)
        .mount(&upstream)
        .await;
    upstream
}

#[tokio::test]
async fn fetch_returns_raw_html_with_cors() {
    let upstream = upstream_with("/about", ResponseTemplate::new(200).set_body_string(PAGE)).await;

    let response = server()
        .get("/api/fetch")
        .add_query_param("url", format!("{}/about", upstream.uri()))
        .add_header(
            HeaderName::from_static("origin"),
            HeaderValue::from_static("http://portal.example"),
        )
        .await;

    response.assert_status_ok();
    assert_eq!(response.text(), PAGE);
    assert_eq!(response.header("content-type"), "text/html; charset=utf-8");
    assert_eq!(response.header("access-control-allow-origin"), "*");
}

#[tokio::test]
async fn fetch_relays_upstream_error_status() {
    let upstream = upstream_with(
        "/gone",
        ResponseTemplate::new(404).set_body_string("<h1>Not Found</h1>"),
    )
    .await;

    let response = server()
        .get("/api/fetch")
        .add_query_param("url", format!("{}/gone", upstream.uri()))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.text(), "<h1>Not Found</h1>");
}

#[tokio::test]
async fn fetch_answers_preflight() {
    let response = server()
        .method(Method::OPTIONS, "/api/fetch")
        .add_header(
            HeaderName::from_static("origin"),
            HeaderValue::from_static("http://portal.example"),
        )
        .add_header(
            HeaderName::from_static("access-control-request-method"),
            HeaderValue::from_static("GET"),
        )
        .await;

    response.assert_status_ok();
    assert_eq!(response.header("access-control-allow-origin"), "*");
}

#[tokio::test]
async fn fetch_rejects_missing_or_bad_url() {
    let server = server();
    server.get("/api/fetch").await.assert_status(StatusCode::BAD_REQUEST);
    server
        .get("/api/fetch")
        .add_query_param("url", "file:///etc/passwd")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server
        .get("/api/fetch")
        .add_query_param("url", "not a url")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

/// 响应体超过上限返回 413
#[tokio::test]
async fn fetch_rejects_oversized_body() {
    let upstream = upstream_with(
        "/big",
        ResponseTemplate::new(200).set_body_string("x".repeat(1024)),
    )
    .await;

    server()
        .get("/api/fetch")
        .add_query_param("url", format!("{}/big", upstream.uri()))
        .await
        .assert_status(StatusCode::PAYLOAD_TOO_LARGE);
}

/// 超时返回 504
#[tokio::test]
async fn fetch_times_out() {
    let upstream = upstream_with(
        "/slow",
        ResponseTemplate::new(200)
            .set_body_string(PAGE)
            .set_delay(Duration::from_secs(3)),
    )
    .await;

    server()
        .get("/api/fetch")
        .add_query_param("url", format!("{}/slow", upstream.uri()))
        .await
        .assert_status(StatusCode::GATEWAY_TIMEOUT);
}

/// 默认配置拒绝环回地址
#[tokio::test]
async fn default_fetcher_blocks_loopback() {
    let upstream = upstream_with("/", ResponseTemplate::new(200).set_body_string(PAGE)).await;
    let fetcher = PageFetcher::new(FetchSettings::default(), "serpscout-test").unwrap();

    let result = fetcher.fetch(&format!("{}/", upstream.uri())).await;
    assert!(matches!(result, Err(FetchError::Blocked(_))));
}
