//! Typed client for the PayPal REST API.
//!
//! Authentication uses the OAuth2 client credentials grant. Access tokens are
//! cached per client instance and renewed behind a safety margin, so callers
//! just invoke resource operations.
//!
//! ```rust,no_run
//! use paypal_rest::{
//!     client::{Client, Config, SANDBOX_API_URL},
//!     model::orders::{AmountWithBreakdown, OrderIntent, OrderRequest, PurchaseUnitRequest},
//! };
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(Config {
//!     client_id: "client-id".into(),
//!     client_secret: "client-secret".into(),
//!     api_url: SANDBOX_API_URL.into(),
//! });
//!
//! let order = client
//!     .create_order(&OrderRequest {
//!         intent: OrderIntent::Capture,
//!         purchase_units: vec![PurchaseUnitRequest {
//!             reference_id: None,
//!             amount: AmountWithBreakdown {
//!                 currency_code: "USD".into(),
//!                 value: "100.00".into(),
//!                 breakdown: None,
//!             },
//!             description: None,
//!             custom_id: None,
//!             invoice_id: None,
//!         }],
//!         payer: None,
//!         application_context: None,
//!     })
//!     .await?;
//! println!("created order {}", order.id);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod model;
mod utils;

pub use auth::client_credentials::AuthenticationError;
pub use client::{ApiError, Client, Config, Error, InvalidPathParam, LIVE_API_URL, SANDBOX_API_URL};
