//! Appeal entity - a fundraising campaign aggregate

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::value_objects::MinorUnits;

/// Appeal entity
///
/// `raised_amount` and `donor_count` are projections over completed donations
/// referencing this appeal; the storage layer increments them atomically and
/// can recompute them from donation rows if drift is suspected.
#[derive(Debug, Clone, PartialEq)]
pub struct Appeal {
    pub id: Uuid,
    pub name: String,
    pub target_amount: Option<MinorUnits>,
    pub raised_amount: MinorUnits,
    pub donor_count: i64,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Appeal {
    /// Create a new Appeal with nothing raised yet
    pub fn new(id: Uuid, name: String, target_amount: Option<MinorUnits>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name,
            target_amount,
            raised_amount: 0,
            donor_count: 0,
            active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Fold one completed donation into the campaign totals
    pub fn record_donation(&mut self, amount: MinorUnits, at: DateTime<Utc>) {
        self.raised_amount += amount;
        self.donor_count += 1;
        self.updated_at = at;
    }

    /// Progress toward the target, if one is set
    pub fn percent_funded(&self) -> Option<f64> {
        let target = self.target_amount?;
        if target <= 0 {
            return None;
        }
        #[allow(clippy::cast_precision_loss)]
        let percent = (self.raised_amount as f64 / target as f64) * 100.0;
        Some(percent)
    }

    pub fn is_fully_funded(&self) -> bool {
        self.target_amount
            .is_some_and(|target| self.raised_amount >= target)
    }
}
