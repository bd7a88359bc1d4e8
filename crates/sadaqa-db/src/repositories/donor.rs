//! PostgreSQL implementation of DonorRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use sadaqa_core::entities::Donor;
use sadaqa_core::error::DomainError;
use sadaqa_core::traits::{DonorRepository, RepoResult};
use sadaqa_core::value_objects::{EmailAddress, MinorUnits};

use crate::mappers::{DonorContactUpdate, DonorInsert};
use crate::models::DonorModel;

use super::error::{donor_not_found, map_db_error, map_unique_violation};

/// PostgreSQL implementation of DonorRepository
#[derive(Clone)]
pub struct PgDonorRepository {
    pool: PgPool,
}

impl PgDonorRepository {
    /// Create a new PgDonorRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DonorRepository for PgDonorRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Donor>> {
        let result = sqlx::query_as::<_, DonorModel>(
            r"
            SELECT id, email, customer_ref, first_name, last_name, display_name,
                   anonymous, phone, address, gift_aid_eligible, gift_aid_declared_at,
                   marketing_consent, total_donated, donation_count, last_donation_at,
                   created_at, updated_at
            FROM donors
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Donor::from))
    }

    #[instrument(skip(self))]
    async fn find_by_email(&self, email: &EmailAddress) -> RepoResult<Option<Donor>> {
        let result = sqlx::query_as::<_, DonorModel>(
            r"
            SELECT id, email, customer_ref, first_name, last_name, display_name,
                   anonymous, phone, address, gift_aid_eligible, gift_aid_declared_at,
                   marketing_consent, total_donated, donation_count, last_donation_at,
                   created_at, updated_at
            FROM donors
            WHERE email = $1
            ",
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Donor::from))
    }

    #[instrument(skip(self, donor), fields(donor_id = %donor.id))]
    async fn create(&self, donor: &Donor) -> RepoResult<()> {
        let insert = DonorInsert::new(donor);
        sqlx::query(
            r"
            INSERT INTO donors (id, email, customer_ref, first_name, last_name, display_name,
                                anonymous, phone, address, gift_aid_eligible,
                                gift_aid_declared_at, marketing_consent)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ",
        )
        .bind(insert.id)
        .bind(insert.email)
        .bind(insert.customer_ref)
        .bind(insert.first_name)
        .bind(insert.last_name)
        .bind(insert.display_name)
        .bind(insert.anonymous)
        .bind(insert.phone)
        .bind(insert.address)
        .bind(insert.gift_aid_eligible)
        .bind(insert.gift_aid_declared_at)
        .bind(insert.marketing_consent)
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::EmailAlreadyExists))?;

        Ok(())
    }

    #[instrument(skip(self, donor), fields(donor_id = %donor.id))]
    async fn update_contact(&self, donor: &Donor) -> RepoResult<()> {
        let update = DonorContactUpdate::new(donor);
        let result = sqlx::query(
            r"
            UPDATE donors
            SET first_name = $2, last_name = $3, display_name = $4, anonymous = $5,
                phone = $6, address = $7, gift_aid_eligible = $8,
                gift_aid_declared_at = $9, marketing_consent = $10, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(update.id)
        .bind(update.first_name)
        .bind(update.last_name)
        .bind(update.display_name)
        .bind(update.anonymous)
        .bind(update.phone)
        .bind(update.address)
        .bind(update.gift_aid_eligible)
        .bind(update.gift_aid_declared_at)
        .bind(update.marketing_consent)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(donor_not_found(donor.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_customer_ref(&self, id: Uuid, customer_ref: &str) -> RepoResult<String> {
        // COALESCE keeps the reference attached by the first writer when two
        // requests for the same donor race.
        let stored = sqlx::query_scalar::<_, String>(
            r"
            UPDATE donors
            SET customer_ref = COALESCE(customer_ref, $2), updated_at = NOW()
            WHERE id = $1
            RETURNING customer_ref
            ",
        )
        .bind(id)
        .bind(customer_ref)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        stored.ok_or_else(|| donor_not_found(id))
    }

    #[instrument(skip(self))]
    async fn record_completed_donation(
        &self,
        id: Uuid,
        amount: MinorUnits,
        at: DateTime<Utc>,
    ) -> RepoResult<()> {
        // GREATEST keeps last_donation_at from moving backwards when
        // settlement events arrive out of order.
        let result = sqlx::query(
            r"
            UPDATE donors
            SET total_donated = total_donated + $2,
                donation_count = donation_count + 1,
                last_donation_at = GREATEST(COALESCE(last_donation_at, $3), $3),
                updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(amount)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(donor_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn recompute_totals(&self, id: Uuid) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE donors d
            SET total_donated = s.total,
                donation_count = s.count,
                last_donation_at = s.last_at,
                updated_at = NOW()
            FROM (
                SELECT COALESCE(SUM(amount), 0) AS total,
                       COUNT(*) AS count,
                       MAX(completed_at) AS last_at
                FROM donations
                WHERE donor_id = $1 AND status = 'completed'
            ) s
            WHERE d.id = $1
            ",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(donor_not_found(id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgDonorRepository>();
    }
}
