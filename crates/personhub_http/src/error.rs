//! HTTP error mapping.
//!
//! # Responsibility
//! - Collapse every failure into one of four client-visible kinds.
//! - Render failures as `{"message": "..."}` with the matching status code.
//!
//! # Invariants
//! - Internal error details never reach the response body.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use personhub_core::{PersonValidationError, ServiceError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Client-visible error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("given param is not valid")]
    BadParamInput,

    #[error("your requested item is not found")]
    NotFound,

    #[error("your email already exist, must be unique")]
    Conflict,

    #[error("internal Server Error")]
    InternalServer,
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadParamInput => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict => StatusCode::CONFLICT,
            ApiError::InternalServer => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub message: String,
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::BadParamInput(_) => ApiError::BadParamInput,
            ServiceError::NotFound => ApiError::NotFound,
            ServiceError::Conflict => ApiError::Conflict,
            ServiceError::Internal(_) => ApiError::InternalServer,
        }
    }
}

impl From<PersonValidationError> for ApiError {
    fn from(err: PersonValidationError) -> Self {
        warn!(
            "event=person_validate module=http status=rejected field={}",
            err.field()
        );
        ApiError::BadParamInput
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(
            "event=body_parse module=http status=rejected http_status={} error={}",
            rejection.status().as_u16(),
            rejection.body_text()
        );
        ApiError::BadParamInput
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("event=http_error module=http status={} message={}", status.as_u16(), self);
        } else {
            warn!("event=http_error module=http status={} message={}", status.as_u16(), self);
        }
        let body = Json(ErrorBody {
            message: self.to_string(),
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use personhub_core::{DbError, RepoError};

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(ApiError::BadParamInput.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::Conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::InternalServer.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn service_errors_map_without_leaking_details() {
        let internal = ServiceError::Internal(RepoError::Db(DbError::UnsupportedSchemaVersion {
            db_version: 9,
            latest_supported: 2,
        }));
        let mapped = ApiError::from(internal);
        assert_eq!(mapped, ApiError::InternalServer);
        assert_eq!(mapped.to_string(), "internal Server Error");
        assert_eq!(ApiError::from(ServiceError::Conflict), ApiError::Conflict);
    }
}
