//! Identity module — registration & authentication
//!
//! Contains the `AuthService` which orchestrates the register, login and
//! profile use-cases.

pub mod service;

pub use service::{AuthResult, AuthService};
