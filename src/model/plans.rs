//! Billing plans, `/v1/billing/plans`.

use serde::{Deserialize, Serialize};

use super::common::{LinkDescription, Money};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanStatus {
    Created,
    Active,
    Inactive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntervalUnit {
    Day,
    Week,
    SemiMonth,
    Month,
    Year,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TenureType {
    Regular,
    Trial,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SetupFeeFailureAction {
    Continue,
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frequency {
    pub interval_unit: IntervalUnit,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_count: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PricingScheme {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_price: Option<Money>,
}

/// One stage of a plan's schedule. `sequence` orders the cycles; trial
/// cycles must precede the regular one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingCycle {
    pub frequency: Frequency,
    pub tenure_type: TenureType,
    pub sequence: u32,
    /// `0` means the cycle repeats until the subscription is cancelled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cycles: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pricing_scheme: Option<PricingScheme>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentPreferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_bill_outstanding: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup_fee: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub setup_fee_failure_action: Option<SetupFeeFailureAction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_failure_threshold: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Taxes {
    /// Percentage as a decimal string, e.g. `"10"`.
    pub percentage: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inclusive: Option<bool>,
}

/// Body of `POST /v1/billing/plans`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    pub product_id: String,
    pub name: String,
    pub billing_cycles: Vec<BillingCycle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PlanStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_preferences: Option<PaymentPreferences>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxes: Option<Taxes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_supported: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PlanStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_cycles: Option<Vec<BillingCycle>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_preferences: Option<PaymentPreferences>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub taxes: Option<Taxes>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub update_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<LinkDescription>>,
}

/// Page of plans from `GET /v1/billing/plans`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanList {
    #[serde(default)]
    pub plans: Vec<Plan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_items: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Vec<LinkDescription>>,
}

/// Filters for `GET /v1/billing/plans`. Fields left `None` are omitted from
/// the request URL.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ListPlansParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    /// Comma-separated plan ids, at most ten.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_ids: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_required: Option<bool>,
}
