//! PostgreSQL implementation of the processed-event ledger

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use sadaqa_core::traits::{EventLedger, RepoResult};

use super::error::map_db_error;

/// PostgreSQL implementation of EventLedger
///
/// Claims ride on the primary key of gateway_events: the first insert wins
/// and every redelivery of the same event reference comes back unclaimed.
#[derive(Clone)]
pub struct PgEventLedger {
    pool: PgPool,
}

impl PgEventLedger {
    /// Create a new PgEventLedger
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventLedger for PgEventLedger {
    #[instrument(skip(self))]
    async fn claim(&self, event_ref: &str, kind: &str) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            INSERT INTO gateway_events (event_ref, kind)
            VALUES ($1, $2)
            ON CONFLICT (event_ref) DO NOTHING
            ",
        )
        .bind(event_ref)
        .bind(kind)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
