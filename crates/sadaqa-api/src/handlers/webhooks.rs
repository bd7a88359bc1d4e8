//! Payment webhook handler
//!
//! Receives gateway event deliveries, verifies their signatures, and
//! hands them to the reconciliation service. The raw body bytes are
//! passed through untouched so the signature check covers exactly what
//! the gateway signed.

use axum::{
    body::Bytes,
    extract::State,
    http::HeaderMap,
    Json,
};
use sadaqa_service::dto::WebhookAckResponse;
use sadaqa_service::services::WebhookService;

use crate::response::ApiResult;
use crate::state::AppState;

/// Header carrying the gateway's timestamped HMAC signature
pub const SIGNATURE_HEADER: &str = "x-gateway-signature";

/// Receive a payment gateway event
///
/// POST /donations/webhook
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Json<WebhookAckResponse>> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let service = WebhookService::new(state.service_context());
    service.process_event(&body, signature).await?;

    Ok(Json(WebhookAckResponse::received()))
}
