use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::{error, warn};

use crate::envelope::Envelope;

/// Errors surfaced by the `/comics` handlers, rendered as a failure envelope.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid comic ID format")]
    InvalidId,
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{message}")]
    Store { status: StatusCode, message: String },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::InvalidId | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Store { status, .. } => *status,
        }
    }

    /// Metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidId => "invalid_id",
            Self::Validation(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Store { .. } => "store",
        }
    }

    /// Store failures on read paths are server errors.
    pub fn read(e: ServiceError) -> Self {
        Self::from_service(e, StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Store failures on write paths usually mean input the store rejected.
    pub fn write(e: ServiceError) -> Self {
        Self::from_service(e, StatusCode::BAD_REQUEST)
    }

    fn from_service(e: ServiceError, store_status: StatusCode) -> Self {
        match e {
            ServiceError::Validation(msg) => Self::Validation(msg),
            ServiceError::NotFound(msg) => Self::NotFound(msg),
            ServiceError::Db(msg) => Self::Store { status: store_status, message: msg },
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(r: JsonRejection) -> Self { Self::Validation(r.body_text()) }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let msg = self.to_string();
        if status.is_server_error() {
            error!(error = %msg, kind = self.kind(), "request failed");
        } else {
            warn!(error = %msg, kind = self.kind(), status = status.as_u16(), "request rejected");
        }
        (status, Json(Envelope::failure(msg))).into_response()
    }
}

/// Path ids must be positive integers.
pub fn parse_comic_id(raw: &str) -> Result<i64, ApiError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ApiError::InvalidId),
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_only_positive_integers() {
        assert_eq!(parse_comic_id("1").unwrap(), 1);
        assert_eq!(parse_comic_id("999999").unwrap(), 999999);
        for bad in ["invalid-id", "0", "-3", "1.5", "", "64b1f0c2e4b0a1a2b3c4d5e6"] {
            assert!(matches!(parse_comic_id(bad), Err(ApiError::InvalidId)), "{bad}");
        }
    }

    #[test]
    fn store_errors_depend_on_path() {
        let read = ApiError::read(ServiceError::Db("boom".into()));
        assert_eq!(read.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let write = ApiError::write(ServiceError::Db("check violated".into()));
        assert_eq!(write.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn service_errors_keep_their_meaning() {
        let nf = ApiError::read(ServiceError::not_found("Comic"));
        assert_eq!(nf.status(), StatusCode::NOT_FOUND);
        assert_eq!(nf.to_string(), "Comic not found");
        let v = ApiError::write(ServiceError::Validation("Price must be between 0 and 1000".into()));
        assert_eq!(v.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::InvalidId.to_string(), "Invalid comic ID format");
    }
}
