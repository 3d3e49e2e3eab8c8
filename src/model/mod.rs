//! Typed request and response shapes for the bound PayPal resources.
//!
//! Pass-through serde shapes only; the client serializes and deserializes
//! them without validating provider-side rules.

pub mod common;
pub mod orders;
pub mod payments;
pub mod plans;
pub mod products;
pub mod subscriptions;
pub mod webhooks;
