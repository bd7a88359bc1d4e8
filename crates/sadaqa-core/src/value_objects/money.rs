//! Money arithmetic in minor currency units
//!
//! All amounts are integer minor units (pence, cents). Percentages are carried
//! as basis points so fractional rates like 12.5% stay exact. Rounding is
//! round-half-up to the minor unit, applied identically everywhere an amount
//! is derived, so the recorded breakdown always matches what is charged.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Amount in minor currency units (e.g. pence).
pub type MinorUnits = i64;

/// Basis points in one whole (100%).
const BASIS_POINTS_SCALE: i64 = 10_000;

/// Gift Aid reclaim rate: 25% of the base donation.
pub const GIFT_AID_BASIS_POINTS: i64 = 2_500;

/// A platform-fee percentage, stored as basis points.
///
/// `FeePercent::from_percent(12.5)` holds 1250 basis points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FeePercent(i64);

impl FeePercent {
    /// No fee.
    pub const ZERO: Self = Self(0);

    /// Create from basis points (1250 = 12.5%).
    pub fn from_basis_points(basis_points: i64) -> Result<Self, DomainError> {
        if !(0..=BASIS_POINTS_SCALE).contains(&basis_points) {
            return Err(DomainError::InvalidFeePercent(format!(
                "{basis_points} basis points"
            )));
        }
        Ok(Self(basis_points))
    }

    /// Create from a percentage value (e.g. 12.5), as submitted by clients.
    pub fn from_percent(percent: f64) -> Result<Self, DomainError> {
        if !percent.is_finite() || !(0.0..=100.0).contains(&percent) {
            return Err(DomainError::InvalidFeePercent(format!("{percent}%")));
        }
        #[allow(clippy::cast_possible_truncation)]
        let basis_points = (percent * 100.0).round() as i64;
        Self::from_basis_points(basis_points)
    }

    /// Raw basis points.
    #[must_use]
    pub fn basis_points(self) -> i64 {
        self.0
    }

    /// Percentage representation (1250 -> 12.5).
    #[must_use]
    pub fn as_percent(self) -> f64 {
        #[allow(clippy::cast_precision_loss)]
        let bps = self.0 as f64;
        bps / 100.0
    }

    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for FeePercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.as_percent())
    }
}

/// Round-half-up share of `amount` at `basis_points`.
///
/// Callers pass non-negative amounts; intake validation rejects the rest.
fn share_of(amount: MinorUnits, basis_points: i64) -> MinorUnits {
    (amount * basis_points + BASIS_POINTS_SCALE / 2) / BASIS_POINTS_SCALE
}

/// Platform fee for a donation: `round_half_up(amount * pct / 100)`.
#[must_use]
pub fn platform_fee(amount: MinorUnits, percent: FeePercent) -> MinorUnits {
    share_of(amount, percent.basis_points())
}

/// Gift Aid reclaim amount: 25% of the base when declared, else zero.
///
/// Informational only. It is reclaimed from the tax authority, never charged
/// to the payer.
#[must_use]
pub fn gift_aid(amount: MinorUnits, enabled: bool) -> MinorUnits {
    if enabled {
        share_of(amount, GIFT_AID_BASIS_POINTS)
    } else {
        0
    }
}

/// Total charged to the payer: base amount plus platform fee.
#[must_use]
pub fn total(amount: MinorUnits, fee: MinorUnits) -> MinorUnits {
    amount + fee
}
