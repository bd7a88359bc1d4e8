//! Axum extractors for request handling
//!
//! Custom extractors for validated request bodies.

mod validated;

pub use validated::ValidatedJson;
