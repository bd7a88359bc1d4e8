//! PostgreSQL implementation of AppealRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use sadaqa_core::entities::Appeal;
use sadaqa_core::traits::{AppealRepository, RepoResult};
use sadaqa_core::value_objects::MinorUnits;

use crate::mappers::AppealInsert;
use crate::models::AppealModel;

use super::error::{appeal_not_found, map_db_error};

/// PostgreSQL implementation of AppealRepository
#[derive(Clone)]
pub struct PgAppealRepository {
    pool: PgPool,
}

impl PgAppealRepository {
    /// Create a new PgAppealRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AppealRepository for PgAppealRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> RepoResult<Option<Appeal>> {
        let result = sqlx::query_as::<_, AppealModel>(
            r"
            SELECT id, name, target_amount, raised_amount, donor_count, active,
                   created_at, updated_at
            FROM appeals
            WHERE id = $1
            ",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Appeal::from))
    }

    #[instrument(skip(self, appeal), fields(appeal_id = %appeal.id))]
    async fn create(&self, appeal: &Appeal) -> RepoResult<()> {
        let insert = AppealInsert::new(appeal);
        sqlx::query(
            r"
            INSERT INTO appeals (id, name, target_amount, active)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(insert.id)
        .bind(insert.name)
        .bind(insert.target_amount)
        .bind(insert.active)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn record_donation(&self, id: Uuid, amount: MinorUnits) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE appeals
            SET raised_amount = raised_amount + $2,
                donor_count = donor_count + 1,
                updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(id)
        .bind(amount)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(appeal_not_found(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn recompute_totals(&self, id: Uuid) -> RepoResult<()> {
        // The projection counts each donor once however many times they gave.
        let result = sqlx::query(
            r"
            UPDATE appeals a
            SET raised_amount = s.total,
                donor_count = s.donors,
                updated_at = NOW()
            FROM (
                SELECT COALESCE(SUM(amount), 0) AS total,
                       COUNT(DISTINCT donor_id) AS donors
                FROM donations
                WHERE appeal_id = $1 AND status = 'completed'
            ) s
            WHERE a.id = $1
            ",
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(appeal_not_found(id));
        }

        Ok(())
    }
}
