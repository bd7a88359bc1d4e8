//! PostgreSQL implementation of SubscriptionRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use sadaqa_core::entities::Subscription;
use sadaqa_core::traits::{RepoResult, SubscriptionRepository};
use sadaqa_core::value_objects::SubscriptionStatus;

use crate::mappers::SubscriptionInsert;
use crate::models::SubscriptionModel;

use super::error::map_db_error;

/// PostgreSQL implementation of SubscriptionRepository
#[derive(Clone)]
pub struct PgSubscriptionRepository {
    pool: PgPool,
}

impl PgSubscriptionRepository {
    /// Create a new PgSubscriptionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SubscriptionRepository for PgSubscriptionRepository {
    #[instrument(skip(self))]
    async fn find_by_processor_ref(
        &self,
        processor_ref: &str,
    ) -> RepoResult<Option<Subscription>> {
        let result = sqlx::query_as::<_, SubscriptionModel>(
            r"
            SELECT id, donor_id, processor_ref, frequency, amount, currency, status,
                   next_payment_at, created_at, updated_at
            FROM subscriptions
            WHERE processor_ref = $1
            ",
        )
        .bind(processor_ref)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Subscription::from))
    }

    #[instrument(skip(self))]
    async fn list_for_donor(&self, donor_id: Uuid) -> RepoResult<Vec<Subscription>> {
        let result = sqlx::query_as::<_, SubscriptionModel>(
            r"
            SELECT id, donor_id, processor_ref, frequency, amount, currency, status,
                   next_payment_at, created_at, updated_at
            FROM subscriptions
            WHERE donor_id = $1
            ORDER BY created_at DESC
            ",
        )
        .bind(donor_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.into_iter().map(Subscription::from).collect())
    }

    #[instrument(skip(self, subscription), fields(subscription_id = %subscription.id))]
    async fn create(&self, subscription: &Subscription) -> RepoResult<()> {
        let insert = SubscriptionInsert::new(subscription);
        sqlx::query(
            r"
            INSERT INTO subscriptions (id, donor_id, processor_ref, frequency, amount,
                                       currency, status, next_payment_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ",
        )
        .bind(insert.id)
        .bind(insert.donor_id)
        .bind(insert.processor_ref)
        .bind(insert.frequency)
        .bind(insert.amount)
        .bind(insert.currency)
        .bind(insert.status)
        .bind(insert.next_payment_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_cycle(
        &self,
        processor_ref: &str,
        status: SubscriptionStatus,
        next_payment_at: Option<DateTime<Utc>>,
    ) -> RepoResult<bool> {
        // A missing schedule in the event leaves the stored one in place.
        let result = sqlx::query(
            r"
            UPDATE subscriptions
            SET status = $2,
                next_payment_at = COALESCE($3, next_payment_at),
                updated_at = NOW()
            WHERE processor_ref = $1
            ",
        )
        .bind(processor_ref)
        .bind(status.as_str())
        .bind(next_payment_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn cancel(&self, processor_ref: &str) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE subscriptions
            SET status = 'cancelled', next_payment_at = NULL, updated_at = NOW()
            WHERE processor_ref = $1 AND status <> 'cancelled'
            ",
        )
        .bind(processor_ref)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
