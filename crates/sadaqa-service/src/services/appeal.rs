//! Appeal lookup service
//!
//! Campaign progress for the donation page's appeal cards.

use tracing::instrument;
use uuid::Uuid;

use crate::dto::AppealResponse;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Appeal lookup service
pub struct AppealService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AppealService<'a> {
    /// Create a new AppealService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Get an appeal's progress by id
    #[instrument(skip(self))]
    pub async fn get_appeal(&self, appeal_id: Uuid) -> ServiceResult<AppealResponse> {
        let appeal = self
            .ctx
            .appeal_repo()
            .find_by_id(appeal_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Appeal", appeal_id.to_string()))?;

        Ok(AppealResponse::from(&appeal))
    }
}
