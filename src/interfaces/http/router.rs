//! API router with OpenAPI documentation

use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use super::middleware::auth_middleware;
use super::modules::auth::dto::{LoginRequest, LoginResponse, RegisterRequest, RegisterResponse};
use super::modules::auth::handlers as auth;
use super::modules::health::handlers::{self as health, HealthResponse};
use super::modules::metrics::{http_metrics_middleware, prometheus_metrics, MetricsState};
use super::state::{AppState, SharedAuthService};
use crate::domain::PublicIdentity;

#[derive(OpenApi)]
#[openapi(
    info(title = "Credential Auth API", description = "Registration, login and profile lookup"),
    paths(
        health::health_check,
        auth::register,
        auth::login,
        auth::profile,
    ),
    components(schemas(
        HealthResponse,
        RegisterRequest,
        RegisterResponse,
        LoginRequest,
        LoginResponse,
        PublicIdentity,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Credential-based authentication"),
        (name = "Health", description = "Liveness")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Build the complete HTTP router.
pub fn create_api_router(auth_service: SharedAuthService, prometheus: PrometheusHandle) -> Router {
    let state = AppState { auth: auth_service };

    let protected = Router::new()
        .route("/api/v1/auth/profile", get(auth::profile))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let auth_routes = Router::new()
        .route("/api/v1/auth/register", post(auth::register))
        .route("/api/v1/auth/login", post(auth::login))
        .merge(protected)
        .with_state(state);

    let metrics_routes = Router::new()
        .route("/metrics", get(prometheus_metrics))
        .with_state(MetricsState { handle: prometheus });

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(auth_routes)
        .merge(metrics_routes)
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
