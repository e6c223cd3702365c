//! Mapping from service failures to HTTP responses.

use crate::analytics::services::AnalyticsError;
use crate::error::ErrorKind;
use crate::identity::services::AccountError;
use crate::task::services::TaskServiceError;
use crate::theme::services::ThemeServiceError;
use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt::Display;
use tracing::error;

/// JSON error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    /// Machine-readable error code.
    pub code: &'static str,
    /// Human-readable message.
    pub message: String,
}

/// An error response: status code plus [`ErrorBody`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    /// Creates an error response.
    #[must_use]
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                code,
                message: message.into(),
            },
        }
    }

    /// 400 with code `invalid_argument`.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "invalid_argument", message)
    }

    /// 401 with code `unauthorized`.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthorized", message)
    }

    /// Builds the response for a classified service error.
    ///
    /// Internal failures are logged and replaced by a generic message.
    #[must_use]
    pub fn classified(kind: ErrorKind, err: &impl Display) -> Self {
        match kind {
            ErrorKind::NotFound => Self::new(StatusCode::NOT_FOUND, "not_found", err.to_string()),
            ErrorKind::InvalidArgument => Self::bad_request(err.to_string()),
            ErrorKind::Forbidden => Self::new(StatusCode::FORBIDDEN, "forbidden", err.to_string()),
            ErrorKind::Unauthorized => Self::unauthorized(err.to_string()),
            ErrorKind::Internal => {
                error!(error = %err, "request failed");
                Self::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal server error",
                )
            }
        }
    }

    /// Response status code.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Response body.
    #[must_use]
    pub const fn body(&self) -> &ErrorBody {
        &self.body
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response = (self.status, Json(self.body)).into_response();
        if self.status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        Self::classified(err.kind(), &err)
    }
}

impl From<ThemeServiceError> for ApiError {
    fn from(err: ThemeServiceError) -> Self {
        Self::classified(err.kind(), &err)
    }
}

impl From<TaskServiceError> for ApiError {
    fn from(err: TaskServiceError) -> Self {
        Self::classified(err.kind(), &err)
    }
}

impl From<AnalyticsError> for ApiError {
    fn from(err: AnalyticsError) -> Self {
        Self::classified(err.kind(), &err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}
