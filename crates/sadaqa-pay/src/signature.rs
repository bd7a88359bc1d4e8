//! Webhook signature verification
//!
//! The processor signs each delivery as `t={unix},v1={hex hmac-sha256}` over
//! `"{timestamp}.{body}"` with the shared endpoint secret. The timestamp
//! bounds how long a captured delivery can be replayed.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use sadaqa_core::traits::{GatewayError, GatewayResult};

type HmacSha256 = Hmac<Sha256>;

/// Seconds a signed timestamp may differ from the local clock before the
/// delivery is treated as a replay
pub const SIGNATURE_TOLERANCE_SECS: i64 = 300;

/// Verifies processor webhook signatures against the shared endpoint secret
#[derive(Clone)]
pub struct WebhookVerifier {
    secret: String,
    tolerance_secs: i64,
}

impl WebhookVerifier {
    /// Create a verifier with the default replay tolerance
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.to_string(),
            tolerance_secs: SIGNATURE_TOLERANCE_SECS,
        }
    }

    /// Override the replay tolerance
    pub fn with_tolerance(mut self, tolerance_secs: i64) -> Self {
        self.tolerance_secs = tolerance_secs;
        self
    }

    /// Check a delivery's signature header against the raw body
    pub fn verify(&self, payload: &[u8], signature_header: &str) -> GatewayResult<()> {
        let header = signature_header.trim();
        if header.is_empty() {
            return Err(GatewayError::SignatureMissing);
        }

        let (timestamp_raw, signature) = parse_header(header)?;
        let timestamp: i64 = timestamp_raw.parse().map_err(|_| {
            GatewayError::SignatureMalformed(format!("bad timestamp: {timestamp_raw}"))
        })?;

        let age = (chrono::Utc::now().timestamp() - timestamp).abs();
        if age > self.tolerance_secs {
            return Err(GatewayError::SignatureExpired);
        }

        let expected = self.compute(payload, timestamp_raw);
        if !constant_time_eq(signature, &expected) {
            return Err(GatewayError::SignatureMismatch);
        }

        Ok(())
    }

    /// Produce a signature header for a body, used by tests and local tooling
    pub fn sign(&self, payload: &[u8], timestamp: i64) -> String {
        let timestamp = timestamp.to_string();
        let signature = self.compute(payload, &timestamp);
        format!("t={timestamp},v1={signature}")
    }

    fn compute(&self, payload: &[u8], timestamp: &str) -> String {
        let signed_payload = format!("{}.{}", timestamp, String::from_utf8_lossy(payload));
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC can take key of any size");
        mac.update(signed_payload.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }
}

/// Pull the `t=` and `v1=` elements out of the header
fn parse_header(header: &str) -> GatewayResult<(&str, &str)> {
    let mut timestamp = None;
    let mut signature = None;

    for part in header.split(',') {
        let mut kv = part.trim().splitn(2, '=');
        match (kv.next(), kv.next()) {
            (Some("t"), Some(value)) => timestamp = Some(value),
            (Some("v1"), Some(value)) => signature = Some(value),
            _ => {}
        }
    }

    match (timestamp, signature) {
        (Some(t), Some(s)) => Ok((t, s)),
        _ => Err(GatewayError::SignatureMalformed(
            "missing t= or v1= element".to_string(),
        )),
    }
}

/// Constant-time comparison to prevent timing attacks
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }
    result == 0
}
