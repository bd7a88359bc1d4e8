//! Server setup and initialization
//!
//! Provides the main application builder and server runner.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use sadaqa_common::{AppConfig, AppError};
use sadaqa_core::ReceiptNotifier;
use sadaqa_db::{
    create_pool, PgAppealRepository, PgDonationRepository, PgDonorRepository, PgEventLedger,
    PgSubscriptionRepository,
};
use sadaqa_notify::{LogReceiptNotifier, SmtpReceiptNotifier};
use sadaqa_pay::HttpPaymentGateway;
use sadaqa_service::ServiceContextBuilder;
use tokio::net::TcpListener;
use tracing::info;

use crate::middleware::{apply_middleware, apply_middleware_with_config, apply_rate_limit};
use crate::routes::{create_router, health_routes};
use crate::state::AppState;

/// Build the Axum application with routes and the base middleware stack
///
/// No CORS or rate limiting; used by tests and the configured builder.
pub fn create_app(state: AppState) -> Router {
    let router = create_router().merge(health_routes());
    let router = apply_middleware(router);
    router.with_state(state)
}

/// Build the complete Axum application with CORS and rate limiting from config
///
/// Rate limiting wraps the API routes only, so health probes stay
/// reachable while the limiter is saturated.
pub fn create_app_with_config(state: AppState, config: &AppConfig) -> Router {
    let api = apply_rate_limit(create_router(), &config.rate_limit);
    let router = api.merge(health_routes());
    let router = apply_middleware_with_config(router, &config.cors, config.app.env.is_production());
    router.with_state(state)
}

/// Initialize all dependencies and create AppState
pub async fn create_app_state(config: AppConfig) -> Result<AppState, AppError> {
    // Create database pool
    info!("Connecting to PostgreSQL...");
    let db_config = sadaqa_db::DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        min_connections: config.database.min_connections,
        ..Default::default()
    };
    let pool = create_pool(&db_config)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    info!("PostgreSQL connection established");

    // Create payment gateway client
    let gateway = Arc::new(
        HttpPaymentGateway::new(&config.gateway)
            .map_err(|e| AppError::Config(e.to_string()))?,
    );

    // Create receipt notifier
    let notifier: Arc<dyn ReceiptNotifier> = if config.mail.enabled {
        info!(host = %config.mail.smtp_host, "Receipts will be sent over SMTP");
        Arc::new(
            SmtpReceiptNotifier::new(&config.mail)
                .map_err(|e| AppError::Config(e.to_string()))?,
        )
    } else {
        info!("Mail disabled; receipts will be logged only");
        Arc::new(LogReceiptNotifier::new())
    };

    // Create repositories
    let donor_repo = Arc::new(PgDonorRepository::new(pool.clone()));
    let donation_repo = Arc::new(PgDonationRepository::new(pool.clone()));
    let appeal_repo = Arc::new(PgAppealRepository::new(pool.clone()));
    let subscription_repo = Arc::new(PgSubscriptionRepository::new(pool.clone()));
    let event_ledger = Arc::new(PgEventLedger::new(pool.clone()));

    // Build service context
    let service_context = ServiceContextBuilder::new()
        .pool(pool)
        .donor_repo(donor_repo)
        .donation_repo(donation_repo)
        .appeal_repo(appeal_repo)
        .subscription_repo(subscription_repo)
        .event_ledger(event_ledger)
        .gateway(gateway)
        .notifier(notifier)
        .donation_config(config.donations.clone())
        .build()
        .map_err(|e| AppError::Config(e.to_string()))?;

    Ok(AppState::new(service_context, config))
}

/// Run the HTTP server
pub async fn run_server(app: Router, addr: SocketAddr) -> Result<(), AppError> {
    info!("Starting HTTP server on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {}: {}", addr, e)))?;

    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {}", e)))?;

    Ok(())
}

/// Run the complete server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    config.validate().map_err(|e| AppError::Config(e.to_string()))?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.api.port));

    // Create app state
    let state = create_app_state(config).await?;

    // Build application
    let app_config = state.config().clone();
    let app = create_app_with_config(state, &app_config);

    // Run server
    run_server(app, addr).await
}
