//! # sadaqa-service
//!
//! Application layer containing business logic, services, and DTOs.
//!
//! The two entry points are [`services::DonationIntakeService`], which turns a
//! validated donation request into processor-side payment objects and a
//! `pending` donation row, and [`services::WebhookService`], which reconciles
//! asynchronous processor events back into donation, donor, and appeal state.

pub mod dto;
pub mod services;

pub use services::{ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult};
