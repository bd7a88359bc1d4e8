//! Donation frequency and its mapping onto processor billing intervals

use chrono::{DateTime, Duration, Months, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// How often a donation recurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    OneTime,
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    /// String form used on the wire and in the database.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OneTime => "one-time",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }

    #[must_use]
    pub fn is_recurring(self) -> bool {
        !matches!(self, Self::OneTime)
    }

    /// Billing interval for the processor-side plan. `None` for one-time.
    ///
    /// Quarterly maps to a month interval with count 3.
    #[must_use]
    pub fn billing_interval(self) -> Option<BillingInterval> {
        match self {
            Self::OneTime => None,
            Self::Weekly => Some(BillingInterval::new(IntervalUnit::Week, 1)),
            Self::Monthly => Some(BillingInterval::new(IntervalUnit::Month, 1)),
            Self::Quarterly => Some(BillingInterval::new(IntervalUnit::Month, 3)),
            Self::Yearly => Some(BillingInterval::new(IntervalUnit::Year, 1)),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "one-time" | "one_time" | "once" => Ok(Self::OneTime),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" | "annually" => Ok(Self::Yearly),
            other => Err(DomainError::InvalidFrequency(other.to_string())),
        }
    }
}

/// Unit of a recurring billing interval, named as the processor expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IntervalUnit {
    Day,
    Week,
    Month,
    Year,
}

impl IntervalUnit {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

/// A recurring charge cadence: `count` units between charges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingInterval {
    pub unit: IntervalUnit,
    pub count: u32,
}

impl BillingInterval {
    #[must_use]
    pub fn new(unit: IntervalUnit, count: u32) -> Self {
        Self { unit, count }
    }

    /// Next charge date after `from`.
    ///
    /// Month arithmetic clamps to the end of shorter months, matching how the
    /// processor schedules cycles. Falls back to `from` on calendar overflow.
    #[must_use]
    pub fn next_occurrence(&self, from: DateTime<Utc>) -> DateTime<Utc> {
        let next = match self.unit {
            IntervalUnit::Day => from.checked_add_signed(Duration::days(i64::from(self.count))),
            IntervalUnit::Week => from.checked_add_signed(Duration::weeks(i64::from(self.count))),
            IntervalUnit::Month => from.checked_add_months(Months::new(self.count)),
            IntervalUnit::Year => from.checked_add_months(Months::new(self.count * 12)),
        };
        next.unwrap_or(from)
    }
}

impl fmt::Display for BillingInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.count == 1 {
            write!(f, "every {}", self.unit.as_str())
        } else {
            write!(f, "every {} {}s", self.count, self.unit.as_str())
        }
    }
}
