//! HTTP REST API interfaces
//!
//! - `middleware`: Bearer-token authentication middleware
//! - `modules`: Request handlers and DTOs per resource
//! - `router`: API router with OpenAPI documentation

pub mod common;
pub mod error;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;

pub use router::create_api_router;
pub use state::{AppState, SharedAuthService};
