//! Appeal handlers
//!
//! Endpoints for fundraising appeal lookups.

use axum::{
    extract::{Path, State},
    Json,
};
use sadaqa_service::dto::AppealResponse;
use sadaqa_service::services::AppealService;

use crate::response::ApiResult;
use crate::state::AppState;

/// Get appeal by ID
///
/// GET /appeals/{appeal_id}
pub async fn get_appeal(
    State(state): State<AppState>,
    Path(appeal_id): Path<String>,
) -> ApiResult<Json<AppealResponse>> {
    let appeal_id = appeal_id
        .parse()
        .map_err(|_| crate::response::ApiError::invalid_path("Invalid appeal_id format"))?;

    let service = AppealService::new(state.service_context());
    let response = service.get_appeal(appeal_id).await?;
    Ok(Json(response))
}
