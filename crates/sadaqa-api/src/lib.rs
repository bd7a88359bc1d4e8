//! REST API server for the donation platform
//!
//! Exposes the donation intake flow, the payment webhook endpoint, and
//! read endpoints for donations and appeals over HTTP using Axum.
//!
//! # Architecture
//!
//! - `routes` - URL structure and router assembly
//! - `handlers` - request handlers, one module per resource
//! - `extractors` - custom extractors (validated JSON bodies)
//! - `middleware` - request IDs, tracing, timeouts, CORS, rate limiting
//! - `response` - API error type and error body format
//! - `state` - shared application state
//! - `server` - application bootstrap and serving

pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, create_app_state, create_app_with_config, run};
pub use state::AppState;
