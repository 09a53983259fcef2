//! Mapping of domain errors onto HTTP responses

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use tracing::error;

use super::common::ApiResponse;
use crate::domain::DomainError;

/// A `DomainError` on its way out of a handler.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

pub fn status_for(err: &DomainError) -> StatusCode {
    match err {
        DomainError::EmailAlreadyRegistered | DomainError::DuplicateEmail => StatusCode::CONFLICT,
        DomainError::InvalidCredentials
        | DomainError::InvalidToken
        | DomainError::ExpiredToken => StatusCode::UNAUTHORIZED,
        DomainError::IdentityNotFound => StatusCode::NOT_FOUND,
        DomainError::SecretTooLong => StatusCode::UNPROCESSABLE_ENTITY,
        DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        if let DomainError::Internal(cause) = &err {
            error!(%cause, "Internal error while handling request");
        }

        let body = ApiResponse::<()>::error_with_code(err.to_string(), err.code());
        (status_for(&err), Json(body)).into_response()
    }
}
