use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

pub mod account;
pub mod message;

/// Handler outcome where a missing record is a `200 OK` with an empty body
/// rather than a `404`.
#[derive(Debug)]
#[must_use]
pub enum ApiResponse<T> {
    Body(T),
    Empty,
    Error(StatusCode),
}

impl<T> From<Option<T>> for ApiResponse<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Self::Body)
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        match self {
            Self::Body(body) => Json(body).into_response(),
            Self::Empty => StatusCode::OK.into_response(),
            Self::Error(status_code) => status_code.into_response(),
        }
    }
}
