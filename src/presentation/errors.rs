// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::warn;

use crate::domain::search::engine::SearchError;
use crate::infrastructure::page_fetcher::FetchError;
use crate::infrastructure::proxy::ProxyError;

/// 应用错误类型
///
/// 封装所有可能的应用层错误，按底层错误类型映射 HTTP 状态码
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl AppError {
    /// 对应的 HTTP 状态码
    pub fn status(&self) -> StatusCode {
        if let Some(err) = self.0.downcast_ref::<SearchError>() {
            return match err {
                SearchError::EmptyKeyword | SearchError::UnknownEngine(_) => StatusCode::BAD_REQUEST,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            };
        }

        if let Some(err) = self.0.downcast_ref::<ProxyError>() {
            return match err {
                ProxyError::MissingApiKey => StatusCode::INTERNAL_SERVER_ERROR,
                ProxyError::InvalidTarget(_) => StatusCode::BAD_REQUEST,
                ProxyError::Upstream(_) => StatusCode::BAD_GATEWAY,
            };
        }

        if let Some(err) = self.0.downcast_ref::<FetchError>() {
            return match err {
                FetchError::InvalidUrl(_) | FetchError::Blocked(_) => StatusCode::BAD_REQUEST,
                FetchError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                FetchError::Timeout => StatusCode::GATEWAY_TIMEOUT,
                FetchError::Upstream(_) => StatusCode::BAD_GATEWAY,
            };
        }

        StatusCode::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = self.0.to_string();
        if status.is_server_error() {
            warn!(status = status.as_u16(), "Request failed: {}", error_message);
        }

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
