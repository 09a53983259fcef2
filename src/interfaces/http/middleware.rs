//! Bearer-token authentication middleware for Axum

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use super::common::ApiResponse;
use super::error::ApiError;
use super::state::AppState;
use crate::domain::PublicIdentity;
use crate::infrastructure::crypto::extract_bearer;

/// Profile of the bearer token's subject, stored in request extensions.
#[derive(Clone, Debug)]
pub struct AuthenticatedIdentity(pub PublicIdentity);

/// Rejects requests without a valid, unexpired bearer token whose subject
/// still exists.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(auth_header) = auth_header else {
        return missing_token_response();
    };

    let Some(token) = extract_bearer(auth_header) else {
        return missing_token_response();
    };

    match state.auth.authenticate(token).await {
        Ok(profile) => {
            request.extensions_mut().insert(AuthenticatedIdentity(profile));
            next.run(request).await
        }
        Err(err) => ApiError::from(err).into_response(),
    }
}

fn missing_token_response() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, "Bearer")],
        Json(ApiResponse::<()>::error_with_code(
            "Missing authentication token",
            "MISSING_TOKEN",
        )),
    )
        .into_response()
}
