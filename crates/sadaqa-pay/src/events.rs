//! Webhook event envelope parsing
//!
//! Deliveries arrive as `{"id": ..., "type": ..., "data": {"object": ...}}`.
//! Only the kinds the reconciliation service acts on get a typed payload;
//! everything else comes back as `Unrecognized` and is acknowledged without
//! action.

use chrono::{TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;

use sadaqa_core::traits::{EventPayload, GatewayError, GatewayEvent, GatewayResult};

#[derive(Debug, Deserialize)]
struct Envelope {
    id: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    data: EnvelopeData,
}

#[derive(Debug, Default, Deserialize)]
struct EnvelopeData {
    #[serde(default)]
    object: Value,
}

/// Parse a verified delivery body into a typed event
pub fn parse_event(payload: &[u8]) -> GatewayResult<GatewayEvent> {
    let envelope: Envelope =
        serde_json::from_slice(payload).map_err(|e| GatewayError::MalformedEvent(e.to_string()))?;

    let object = &envelope.data.object;
    let payload = match envelope.kind.as_str() {
        "payment_intent.succeeded" => EventPayload::PaymentSucceeded {
            intent_ref: require_str(object, "id", &envelope.kind)?,
        },
        "payment_intent.payment_failed" => EventPayload::PaymentFailed {
            intent_ref: require_str(object, "id", &envelope.kind)?,
            reason: failure_reason(object),
        },
        "invoice.paid" => match optional_str(object, "subscription") {
            Some(subscription_ref) => EventPayload::InvoicePaid {
                invoice_ref: require_str(object, "id", &envelope.kind)?,
                subscription_ref,
                amount: object.get("amount_paid").and_then(Value::as_i64),
                currency: optional_str(object, "currency"),
            },
            // One-off invoices carry no subscription and are not cycle charges.
            None => EventPayload::Unrecognized {
                kind: envelope.kind.clone(),
            },
        },
        "customer.subscription.updated" => EventPayload::SubscriptionUpdated {
            subscription_ref: require_str(object, "id", &envelope.kind)?,
            status: require_str(object, "status", &envelope.kind)?,
            next_payment_at: object
                .get("current_period_end")
                .and_then(Value::as_i64)
                .and_then(|secs| Utc.timestamp_opt(secs, 0).single()),
        },
        "customer.subscription.deleted" => EventPayload::SubscriptionDeleted {
            subscription_ref: require_str(object, "id", &envelope.kind)?,
        },
        _ => EventPayload::Unrecognized {
            kind: envelope.kind.clone(),
        },
    };

    Ok(GatewayEvent {
        event_ref: envelope.id,
        payload,
    })
}

fn require_str(object: &Value, field: &str, kind: &str) -> GatewayResult<String> {
    optional_str(object, field)
        .ok_or_else(|| GatewayError::MalformedEvent(format!("{kind} missing {field}")))
}

fn optional_str(object: &Value, field: &str) -> Option<String> {
    object.get(field).and_then(Value::as_str).map(str::to_string)
}

/// Pull the processor's decline reason out of a failed intent
fn failure_reason(object: &Value) -> Option<String> {
    object
        .get("last_payment_error")
        .and_then(|err| err.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
}
