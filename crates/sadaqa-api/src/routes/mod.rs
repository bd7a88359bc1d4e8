//! Route definitions
//!
//! All API routes organized by domain and mounted under /api.

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{appeals, donations, health, webhooks};
use crate::state::AppState;

/// Create the main API router with all routes (excluding health for separate middleware handling)
pub fn create_router() -> Router<AppState> {
    Router::new()
        // API endpoints
        .nest("/api", api_routes())
}

/// Health check routes (exported separately to bypass rate limiting)
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::readiness_check))
}

/// API routes
fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(donation_routes())
        .merge(appeal_routes())
}

/// Donation routes
fn donation_routes() -> Router<AppState> {
    Router::new()
        .route("/donations/create-payment", post(donations::create_payment))
        .route("/donations/webhook", post(webhooks::handle_webhook))
        .route("/donations/:donation_id", get(donations::get_donation))
}

/// Appeal routes
fn appeal_routes() -> Router<AppState> {
    Router::new().route("/appeals/:appeal_id", get(appeals::get_appeal))
}
