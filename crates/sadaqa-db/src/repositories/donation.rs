//! PostgreSQL implementation of DonationRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use sadaqa_core::entities::Donation;
use sadaqa_core::traits::{DonationRepository, RepoResult};

use crate::mappers::DonationInsert;
use crate::models::DonationModel;

use super::error::map_db_error;

/// PostgreSQL implementation of DonationRepository
///
/// Settlement transitions are status-guarded in SQL (`WHERE status =
/// 'pending'`) so the row, not the caller, decides whether a redelivered
/// webhook has any effect.
#[derive(Clone)]
pub struct PgDonationRepository {
    pool: PgPool,
}

impl PgDonationRepository {
    /// Create a new PgDonationRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DonationRepository for PgDonationRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Donation>> {
        let result = sqlx::query_as::<_, DonationModel>(
            r"
            SELECT id, donor_id, appeal_id, reference, amount, currency, frequency,
                   donation_type, contact_email, contact_first_name, contact_last_name,
                   contact_phone, contact_address, anonymous, display_name,
                   gift_aid_enabled, gift_aid_amount, gift_aid_declared,
                   fee_enabled, fee_basis_points, fee_amount, payment_method,
                   intent_ref, subscription_ref, customer_ref, status, total,
                   marketing_consent, notes, created_at, completed_at
            FROM donations
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Donation::from))
    }

    #[instrument(skip(self))]
    async fn find_by_intent_ref(&self, intent_ref: &str) -> RepoResult<Option<Donation>> {
        let result = sqlx::query_as::<_, DonationModel>(
            r"
            SELECT id, donor_id, appeal_id, reference, amount, currency, frequency,
                   donation_type, contact_email, contact_first_name, contact_last_name,
                   contact_phone, contact_address, anonymous, display_name,
                   gift_aid_enabled, gift_aid_amount, gift_aid_declared,
                   fee_enabled, fee_basis_points, fee_amount, payment_method,
                   intent_ref, subscription_ref, customer_ref, status, total,
                   marketing_consent, notes, created_at, completed_at
            FROM donations
            WHERE intent_ref = $1
            ",
        )
        .bind(intent_ref)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Donation::from))
    }

    #[instrument(skip(self, donation), fields(donation_id = %donation.id))]
    async fn create(&self, donation: &Donation) -> RepoResult<()> {
        let insert = DonationInsert::new(donation);
        sqlx::query(
            r"
            INSERT INTO donations (id, donor_id, appeal_id, reference, amount, currency,
                                   frequency, donation_type, contact_email,
                                   contact_first_name, contact_last_name, contact_phone,
                                   contact_address, anonymous, display_name,
                                   gift_aid_enabled, gift_aid_amount, gift_aid_declared,
                                   fee_enabled, fee_basis_points, fee_amount,
                                   payment_method, intent_ref, subscription_ref,
                                   customer_ref, status, total, marketing_consent, notes,
                                   created_at, completed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                    $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28,
                    $29, $30, $31)
            ",
        )
        .bind(insert.id)
        .bind(insert.donor_id)
        .bind(insert.appeal_id)
        .bind(insert.reference)
        .bind(insert.amount)
        .bind(insert.currency)
        .bind(insert.frequency)
        .bind(insert.donation_type)
        .bind(insert.contact_email)
        .bind(insert.contact_first_name)
        .bind(insert.contact_last_name)
        .bind(insert.contact_phone)
        .bind(insert.contact_address)
        .bind(insert.anonymous)
        .bind(insert.display_name)
        .bind(insert.gift_aid_enabled)
        .bind(insert.gift_aid_amount)
        .bind(insert.gift_aid_declared)
        .bind(insert.fee_enabled)
        .bind(insert.fee_basis_points)
        .bind(insert.fee_amount)
        .bind(insert.payment_method)
        .bind(insert.intent_ref)
        .bind(insert.subscription_ref)
        .bind(insert.customer_ref)
        .bind(insert.status)
        .bind(insert.total)
        .bind(insert.marketing_consent)
        .bind(insert.notes)
        .bind(insert.created_at)
        .bind(insert.completed_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn complete(&self, id: Uuid, at: DateTime<Utc>) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE donations
            SET status = 'completed', completed_at = $2
            WHERE id = $1 AND status = 'pending'
            ",
        )
        .bind(id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self))]
    async fn fail(&self, id: Uuid, reason: Option<&str>) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            UPDATE donations
            SET status = 'failed', notes = $2
            WHERE id = $1 AND status = 'pending'
            ",
        )
        .bind(id)
        .bind(reason)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
