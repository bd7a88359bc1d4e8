//! Donation handlers
//!
//! Endpoints for the donation intake flow and donation lookups.

use axum::{
    extract::{Path, State},
    Json,
};
use sadaqa_service::dto::{CreateDonationRequest, CreateDonationResponse, DonationResponse};
use sadaqa_service::services::{DonationIntakeService, DonationService};

use crate::extractors::ValidatedJson;
use crate::response::ApiResult;
use crate::state::AppState;

/// Open a payment for a new donation
///
/// POST /donations/create-payment
pub async fn create_payment(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateDonationRequest>,
) -> ApiResult<Json<CreateDonationResponse>> {
    let service = DonationIntakeService::new(state.service_context());
    let response = service.create_payment(request).await?;
    Ok(Json(response))
}

/// Get donation by ID
///
/// GET /donations/{donation_id}
pub async fn get_donation(
    State(state): State<AppState>,
    Path(donation_id): Path<String>,
) -> ApiResult<Json<DonationResponse>> {
    let donation_id = donation_id
        .parse()
        .map_err(|_| crate::response::ApiError::invalid_path("Invalid donation_id format"))?;

    let service = DonationService::new(state.service_context());
    let response = service.get_donation(donation_id).await?;
    Ok(Json(response))
}
