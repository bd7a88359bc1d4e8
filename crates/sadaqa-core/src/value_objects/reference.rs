//! Human-readable donation reference codes
//!
//! Printed on receipts and quoted by donors when contacting the office, so
//! they avoid ambiguous characters (no 0/O, 1/I/L).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A receipt reference like `SDQ-7KF2M9XP`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceCode(String);

impl ReferenceCode {
    const PREFIX: &'static str = "SDQ";
    const CHARSET: &'static [u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
    const CODE_LEN: usize = 8;

    /// Generate a fresh random reference.
    #[must_use]
    pub fn generate() -> Self {
        use rand::Rng;

        let mut rng = rand::thread_rng();
        let body: String = (0..Self::CODE_LEN)
            .map(|_| Self::CHARSET[rng.gen_range(0..Self::CHARSET.len())] as char)
            .collect();
        Self(format!("{}-{body}", Self::PREFIX))
    }

    /// Wrap an already-stored reference without re-validating it.
    #[must_use]
    pub fn from_stored(code: String) -> Self {
        Self(code)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReferenceCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
