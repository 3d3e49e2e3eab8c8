//! Create a sandbox order from credentials in the environment.

use paypal_rest::{
    client::{Client, Config, SANDBOX_API_URL},
    model::orders::{AmountWithBreakdown, OrderIntent, OrderRequest, PurchaseUnitRequest},
};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let client_id = getenv("PAYPAL_CLIENT_ID");
    let client_secret = getenv("PAYPAL_CLIENT_SECRET");
    let api_url = std::env::var("PAYPAL_API_URL").unwrap_or_else(|_| SANDBOX_API_URL.to_owned());

    let client = Client::new(Config {
        client_id,
        client_secret,
        api_url,
    });

    let order = client
        .create_order(&OrderRequest {
            intent: OrderIntent::Capture,
            purchase_units: vec![PurchaseUnitRequest {
                reference_id: None,
                amount: AmountWithBreakdown {
                    currency_code: "USD".into(),
                    value: "100.00".into(),
                    breakdown: None,
                },
                description: Some("Demo purchase".into()),
                custom_id: None,
                invoice_id: None,
            }],
            payer: None,
            application_context: None,
        })
        .await?;

    info!(message = "Order created", order_id = %order.id, order_status = ?order.status);

    Ok(())
}

fn getenv(key: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| panic!("env var {} is not set", key))
}
