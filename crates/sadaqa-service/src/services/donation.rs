//! Donation lookup service
//!
//! Backs the wizard's completion step, which polls the donation it just
//! created until the webhook settles it.

use tracing::instrument;
use uuid::Uuid;

use crate::dto::DonationResponse;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Donation lookup service
pub struct DonationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> DonationService<'a> {
    /// Create a new DonationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Get a donation's status and money breakdown by id
    #[instrument(skip(self))]
    pub async fn get_donation(&self, donation_id: Uuid) -> ServiceResult<DonationResponse> {
        let donation = self
            .ctx
            .donation_repo()
            .find_by_id(donation_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Donation", donation_id.to_string()))?;

        Ok(DonationResponse::from(&donation))
    }
}
