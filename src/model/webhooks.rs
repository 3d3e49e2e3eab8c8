//! Webhook notification shapes, `/v1/notifications`.
//!
//! Carried as types for listener endpoints to deserialize into; this client
//! issues no webhook calls itself.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::LinkDescription;

/// A webhook notification as delivered to a listener endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: String,
    /// E.g. `PAYMENT.CAPTURE.COMPLETED` or `BILLING.SUBSCRIPTION.ACTIVATED`.
    pub event_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    /// The affected resource, shaped per `event_type`; carried verbatim.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<LinkDescription>>,
}
