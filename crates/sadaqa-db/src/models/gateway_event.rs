//! Processed gateway event model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for the gateway_events ledger table
///
/// One row per processed webhook event. The primary key on `event_ref` is
/// what makes row-creating webhook effects idempotent under redelivery.
#[derive(Debug, Clone, FromRow)]
pub struct GatewayEventModel {
    pub event_ref: String,
    pub kind: String,
    pub processed_at: DateTime<Utc>,
}
