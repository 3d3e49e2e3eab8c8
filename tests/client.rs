//! End-to-end behavior against a mock PayPal server.

use paypal_rest::{
    auth::{client_credentials, token_manager},
    client::{Client, Config, Error},
    model::{
        orders::{
            AmountWithBreakdown, OrderIntent, OrderRequest, OrderStatus, PurchaseUnitRequest,
        },
        plans::ListPlansParams,
        subscriptions::SubscriptionStatus,
    },
};
use serde_json::json;
use wiremock::matchers::{body_string, header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

// base64("client-id:client-secret")
const EXPECTED_BASIC_AUTH: &str = "Basic Y2xpZW50LWlkOmNsaWVudC1zZWNyZXQ=";

fn test_config(server: &MockServer) -> Config {
    Config {
        client_id: "client-id".into(),
        client_secret: "client-secret".into(),
        api_url: server.uri(),
    }
}

async fn mount_token_endpoint(server: &MockServer, expires_in: u64, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/v1/oauth2/token"))
        .and(header("authorization", EXPECTED_BASIC_AUTH))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string("grant_type=client_credentials"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "access-token-1",
            "token_type": "Bearer",
            "expires_in": expires_in,
        })))
        .expect(expected_calls)
        .mount(server)
        .await;
}

fn minimal_order() -> OrderRequest {
    OrderRequest {
        intent: OrderIntent::Capture,
        purchase_units: vec![PurchaseUnitRequest {
            reference_id: None,
            amount: AmountWithBreakdown {
                currency_code: "USD".into(),
                value: "100.00".into(),
                breakdown: None,
            },
            description: None,
            custom_id: None,
            invoice_id: None,
        }],
        payer: None,
        application_context: None,
    }
}

#[tokio::test]
async fn first_call_exchanges_once_then_reuses_the_token() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 3600, 1).await;

    Mock::given(method("POST"))
        .and(path("/v2/checkout/orders"))
        .and(header("authorization", "Bearer access-token-1"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "ORDER1",
            "status": "CREATED",
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = Client::new(test_config(&server));

    let order = client.create_order(&minimal_order()).await.unwrap();
    assert_eq!(order.id, "ORDER1");
    assert_eq!(order.status, OrderStatus::Created);

    // Runs on the cached token; the token mock's single-call expectation is
    // verified when the server drops.
    client.create_order(&minimal_order()).await.unwrap();
}

#[tokio::test]
async fn stale_token_is_renewed_before_the_next_call() {
    let server = MockServer::start().await;
    // A lifetime below the 60s safety margin is stale on arrival, so every
    // call renews.
    mount_token_endpoint(&server, 30, 2).await;

    Mock::given(method("POST"))
        .and(path("/v2/checkout/orders"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "ORDER1",
            "status": "CREATED",
        })))
        .expect(2)
        .mount(&server)
        .await;

    let client = Client::new(test_config(&server));
    client.create_order(&minimal_order()).await.unwrap();
    client.create_order(&minimal_order()).await.unwrap();
}

#[tokio::test]
async fn token_endpoint_failure_surfaces_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/oauth2/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string(r#"{"error":"invalid_client"}"#))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(test_config(&server));
    let err = client.create_order(&minimal_order()).await.unwrap_err();

    match err {
        Error::Auth(token_manager::Error::Source(client_credentials::Error::Authentication(
            auth,
        ))) => {
            assert_eq!(auth.status_code, 401);
            assert_eq!(auth.body, r#"{"error":"invalid_client"}"#);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn resource_failure_carries_the_raw_body() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 3600, 1).await;

    Mock::given(method("POST"))
        .and(path("/v2/checkout/orders"))
        .respond_with(
            ResponseTemplate::new(422).set_body_string(r#"{"message":"INVALID_REQUEST"}"#),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(test_config(&server));
    let err = client.create_order(&minimal_order()).await.unwrap_err();

    match err {
        Error::Api(api) => {
            assert_eq!(api.status_code, 422);
            assert_eq!(api.body, r#"{"message":"INVALID_REQUEST"}"#);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn deactivate_plan_returns_no_value_on_204() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 3600, 1).await;

    Mock::given(method("POST"))
        .and(path("/v1/billing/plans/P-123/deactivate"))
        .and(header("authorization", "Bearer access-token-1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(test_config(&server));
    client.deactivate_plan("P-123").await.unwrap();
}

#[tokio::test]
async fn list_plans_sends_only_the_set_filters() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 3600, 1).await;

    Mock::given(method("GET"))
        .and(path("/v1/billing/plans"))
        .and(query_param("product_id", "PROD-1"))
        .and(query_param("page_size", "20"))
        .and(query_param_is_missing("page"))
        .and(query_param_is_missing("total_required"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "plans": [] })))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(test_config(&server));
    let plans = client
        .list_plans(&ListPlansParams {
            product_id: Some("PROD-1".into()),
            page_size: Some(20),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(plans.plans.is_empty());
}

#[tokio::test]
async fn get_subscription_resolves_the_id_into_the_path() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 3600, 1).await;

    Mock::given(method("GET"))
        .and(path("/v1/billing/subscriptions/I-55TF3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "I-55TF3",
            "status": "ACTIVE",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(test_config(&server));
    let subscription = client.get_subscription("I-55TF3").await.unwrap();

    assert_eq!(subscription.id, "I-55TF3");
    assert_eq!(subscription.status, Some(SubscriptionStatus::Active));
}

#[tokio::test]
async fn capture_without_a_body_posts_empty() {
    let server = MockServer::start().await;
    mount_token_endpoint(&server, 3600, 1).await;

    Mock::given(method("POST"))
        .and(path("/v2/payments/authorizations/AUTH-1/capture"))
        .and(header("content-length", "0"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": "CAP-1",
            "status": "COMPLETED",
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = Client::new(test_config(&server));
    let capture = client.capture_authorization("AUTH-1", None).await.unwrap();
    assert_eq!(capture.id, "CAP-1");
}
