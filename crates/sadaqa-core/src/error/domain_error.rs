//! Domain errors - error types for the domain layer

use thiserror::Error;
use uuid::Uuid;

use crate::value_objects::DonationStatus;

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Donor not found: {0}")]
    DonorNotFound(Uuid),

    #[error("Donation not found: {0}")]
    DonationNotFound(Uuid),

    #[error("Appeal not found: {0}")]
    AppealNotFound(Uuid),

    #[error("Subscription not found: {0}")]
    SubscriptionNotFound(String),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Invalid donation amount: {0} (must be a positive number of minor units)")]
    InvalidAmount(i64),

    #[error("Invalid platform fee percentage: {0}")]
    InvalidFeePercent(String),

    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    #[error("Invalid donation frequency: {0}")]
    InvalidFrequency(String),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("A donor with this email already exists")]
    EmailAlreadyExists,

    #[error("Event already processed: {0}")]
    EventAlreadyProcessed(String),

    // =========================================================================
    // Business Rule Violations
    // =========================================================================
    #[error("Illegal donation status transition: {from} -> {to}")]
    InvalidStatusTransition {
        from: DonationStatus,
        to: DonationStatus,
    },

    #[error("Donation is already in a terminal state")]
    DonationAlreadySettled,

    #[error("Subscription is already cancelled")]
    SubscriptionAlreadyCancelled,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::DonorNotFound(_) => "UNKNOWN_DONOR",
            Self::DonationNotFound(_) => "UNKNOWN_DONATION",
            Self::AppealNotFound(_) => "UNKNOWN_APPEAL",
            Self::SubscriptionNotFound(_) => "UNKNOWN_SUBSCRIPTION",

            // Validation
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidEmail(_) => "INVALID_EMAIL",
            Self::InvalidAmount(_) => "INVALID_AMOUNT",
            Self::InvalidFeePercent(_) => "INVALID_FEE_PERCENT",
            Self::InvalidCurrency(_) => "INVALID_CURRENCY",
            Self::InvalidFrequency(_) => "INVALID_FREQUENCY",

            // Conflict
            Self::EmailAlreadyExists => "EMAIL_ALREADY_EXISTS",
            Self::EventAlreadyProcessed(_) => "EVENT_ALREADY_PROCESSED",

            // Business Rules
            Self::InvalidStatusTransition { .. } => "INVALID_STATUS_TRANSITION",
            Self::DonationAlreadySettled => "DONATION_ALREADY_SETTLED",
            Self::SubscriptionAlreadyCancelled => "SUBSCRIPTION_ALREADY_CANCELLED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::DonorNotFound(_)
                | Self::DonationNotFound(_)
                | Self::AppealNotFound(_)
                | Self::SubscriptionNotFound(_)
        )
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::InvalidEmail(_)
                | Self::InvalidAmount(_)
                | Self::InvalidFeePercent(_)
                | Self::InvalidCurrency(_)
                | Self::InvalidFrequency(_)
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::EmailAlreadyExists | Self::EventAlreadyProcessed(_))
    }
}
