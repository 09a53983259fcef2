//! Authentication API handlers

use axum::{extract::State, http::StatusCode, Extension, Json};

use super::dto::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use crate::domain::PublicIdentity;
use crate::interfaces::http::common::{ApiResponse, ValidatedJson};
use crate::interfaces::http::error::ApiError;
use crate::interfaces::http::middleware::AuthenticatedIdentity;
use crate::interfaces::http::state::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Identity created", body = ApiResponse<RegisterResponse>),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RegisterResponse>>), ApiError> {
    let user = state
        .auth
        .register(&request.name, &request.email, &request.password)
        .await?;

    let response = RegisterResponse {
        message: "Identity registered successfully".to_string(),
        user,
    };

    Ok((StatusCode::CREATED, Json(ApiResponse::success(response))))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<LoginResponse>),
        (status = 401, description = "Invalid credentials"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let result = state.auth.login(&request.email, &request.password).await?;
    Ok(Json(ApiResponse::success(result.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/auth/profile",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Profile of the authenticated identity", body = ApiResponse<PublicIdentity>),
        (status = 401, description = "Missing, invalid or expired token"),
        (status = 404, description = "Identity no longer exists")
    )
)]
pub async fn profile(
    Extension(AuthenticatedIdentity(profile)): Extension<AuthenticatedIdentity>,
) -> Json<ApiResponse<PublicIdentity>> {
    Json(ApiResponse::success(profile))
}
