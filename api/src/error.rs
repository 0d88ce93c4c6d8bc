use axum::{
    http::{header::HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::any::Any;

use crate::trace_id;

/// Every failure the HTTP layer can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// No raffle stored for the requested address.
    NotFound,
    RouteNotFound,
    BadRequest,
    UnsupportedMediaType,
    PayloadTooLarge,
    Internal,
}

impl ApiErrorKind {
    pub fn status(self) -> StatusCode {
        match self {
            ApiErrorKind::NotFound | ApiErrorKind::RouteNotFound => StatusCode::NOT_FOUND,
            ApiErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            ApiErrorKind::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            ApiErrorKind::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Numeric code reported in the `status` field of the error body. Only a
    /// missing raffle carries a service-specific code; the rest echo the HTTP
    /// status.
    pub fn code(self) -> u16 {
        match self {
            ApiErrorKind::NotFound => 10404,
            other => other.status().as_u16(),
        }
    }

    /// Kind for a failure the framework reported only as a status code.
    /// Unreadable or mistyped bodies are plain bad requests.
    pub fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::NOT_FOUND => ApiErrorKind::RouteNotFound,
            StatusCode::UNSUPPORTED_MEDIA_TYPE => ApiErrorKind::UnsupportedMediaType,
            StatusCode::PAYLOAD_TOO_LARGE => ApiErrorKind::PayloadTooLarge,
            s if s.is_server_error() => ApiErrorKind::Internal,
            _ => ApiErrorKind::BadRequest,
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    kind: ApiErrorKind,
    message: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub trace_id: String,
    pub status: u16,
    pub message: String,
}

impl ApiError {
    pub fn new(kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::NotFound, message)
    }

    pub fn route_not_found(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::RouteNotFound, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ApiErrorKind::Internal, message)
    }

    pub fn kind(&self) -> ApiErrorKind {
        self.kind
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let trace_id = trace_id::current();
        if self.kind == ApiErrorKind::Internal {
            tracing::error!(trace_id = %trace_id, message = %self.message, "request failed");
        } else {
            tracing::debug!(trace_id = %trace_id, kind = ?self.kind, message = %self.message, "request rejected");
        }

        let payload = ErrorResponse {
            trace_id: trace_id.clone(),
            status: self.kind.code(),
            message: self.message,
        };

        let mut response = (self.kind.status(), Json(payload)).into_response();
        if let Ok(value) = HeaderValue::from_str(&trace_id) {
            response
                .headers_mut()
                .insert(HeaderName::from_static(trace_id::TRACE_ID_HEADER), value);
        }
        response
    }
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

/// Turn a handler panic into a 500 error body.
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    ApiError::internal(format!("Internal server error: {detail}")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(ApiErrorKind::NotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiErrorKind::NotFound.code(), 10404);
        assert_eq!(ApiErrorKind::RouteNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiErrorKind::RouteNotFound.code(), 404);
        assert_eq!(ApiErrorKind::BadRequest.code(), 400);
        assert_eq!(ApiErrorKind::UnsupportedMediaType.code(), 415);
        assert_eq!(ApiErrorKind::Internal.code(), 500);
    }

    #[test]
    fn test_kind_from_framework_status() {
        assert_eq!(
            ApiErrorKind::from_status(StatusCode::UNSUPPORTED_MEDIA_TYPE),
            ApiErrorKind::UnsupportedMediaType
        );
        assert_eq!(
            ApiErrorKind::from_status(StatusCode::UNPROCESSABLE_ENTITY),
            ApiErrorKind::BadRequest
        );
        assert_eq!(
            ApiErrorKind::from_status(StatusCode::PAYLOAD_TOO_LARGE),
            ApiErrorKind::PayloadTooLarge
        );
        assert_eq!(
            ApiErrorKind::from_status(StatusCode::INTERNAL_SERVER_ERROR),
            ApiErrorKind::Internal
        );
    }

    #[tokio::test]
    async fn test_error_body_shape() {
        let response = ApiError::not_found("Raffle not found").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().contains_key(trace_id::TRACE_ID_HEADER));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], 10404);
        assert_eq!(json["message"], "Raffle not found");
        assert!(json["traceId"].as_str().is_some_and(|id| !id.is_empty()));
    }
}
