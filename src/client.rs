//! Authenticated PayPal REST client.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{
    auth::{self, client_credentials::ClientCredentials, token_manager::TokenManager, AccessToken},
    model::{
        orders::{Order, OrderRequest},
        payments::{Capture, CaptureRequest},
        plans::{ListPlansParams, Plan, PlanList, PlanRequest},
        products::{Product, ProductRequest},
        subscriptions::{Subscription, SubscriptionRequest},
    },
    utils::{split_status, Status},
};

/// Sandbox API origin.
pub const SANDBOX_API_URL: &str = "https://api-m.sandbox.paypal.com";
/// Live API origin.
pub const LIVE_API_URL: &str = "https://api-m.paypal.com";

/// Construction-time settings. Never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    /// API origin, e.g. [`SANDBOX_API_URL`]. A trailing slash is trimmed.
    pub api_url: String,
}

pub struct Client<AuthTokenSource> {
    pub client: reqwest::Client,
    pub api_url: String,
    pub token_source: AuthTokenSource,
}

/// Path parameter that would produce a malformed URL.
#[derive(Debug, thiserror::Error)]
#[error("path parameter must be non-empty and free of '/', '?' and '#'")]
pub struct InvalidPathParam;

/// Non-success response from a resource endpoint. `body` is the raw response
/// text; failure payloads are not guaranteed to be JSON.
#[derive(Debug, thiserror::Error)]
#[error("{status_code} status code: {body}")]
pub struct ApiError {
    pub status_code: u16,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum Error<AuthError> {
    #[error("auth: {0}")]
    Auth(#[source] AuthError),
    #[error("reqwest: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("api: {0}")]
    Api(#[from] ApiError),
    #[error("query string: {0}")]
    Query(#[from] serde_urlencoded::ser::Error),
    #[error(transparent)]
    InvalidPathParam(#[from] InvalidPathParam),
}

fn path_param(value: &str) -> Result<&str, InvalidPathParam> {
    if value.is_empty() || value.contains(|c| matches!(c, '/' | '?' | '#')) {
        return Err(InvalidPathParam);
    }
    Ok(value)
}

impl Client<TokenManager<ClientCredentials>> {
    /// Build a client over its own connection pool.
    pub fn new(config: Config) -> Self {
        Self::with_http_client(config, reqwest::Client::new())
    }

    /// Build a client over a shared `reqwest::Client`.
    pub fn with_http_client(config: Config, client: reqwest::Client) -> Self {
        let Config {
            client_id,
            client_secret,
            api_url,
        } = config;
        let api_url = api_url.trim_end_matches('/').to_owned();

        let credentials = ClientCredentials {
            client: client.clone(),
            client_id,
            client_secret,
            api_url: api_url.clone(),
        };

        Self {
            client,
            api_url,
            token_source: TokenManager::new(credentials),
        }
    }
}

impl<AuthTokenSource> Client<AuthTokenSource>
where
    AuthTokenSource: auth::TokenSource,
{
    fn orders_url(&self) -> String {
        format!("{}/v2/checkout/orders", self.api_url)
    }

    fn order_url(&self, order_id: &str) -> Result<String, InvalidPathParam> {
        Ok(format!(
            "{}/v2/checkout/orders/{}",
            self.api_url,
            path_param(order_id)?
        ))
    }

    fn products_url(&self) -> String {
        format!("{}/v1/catalogs/products", self.api_url)
    }

    fn plans_url(&self) -> String {
        format!("{}/v1/billing/plans", self.api_url)
    }

    fn plans_list_url(
        &self,
        params: &ListPlansParams,
    ) -> Result<String, serde_urlencoded::ser::Error> {
        let query = serde_urlencoded::to_string(params)?;
        if query.is_empty() {
            return Ok(self.plans_url());
        }
        Ok(format!("{}?{}", self.plans_url(), query))
    }

    fn plan_url(&self, plan_id: &str) -> Result<String, InvalidPathParam> {
        Ok(format!(
            "{}/v1/billing/plans/{}",
            self.api_url,
            path_param(plan_id)?
        ))
    }

    fn plan_deactivate_url(&self, plan_id: &str) -> Result<String, InvalidPathParam> {
        Ok(format!("{}/deactivate", self.plan_url(plan_id)?))
    }

    fn subscriptions_url(&self) -> String {
        format!("{}/v1/billing/subscriptions", self.api_url)
    }

    fn subscription_url(&self, subscription_id: &str) -> Result<String, InvalidPathParam> {
        Ok(format!(
            "{}/v1/billing/subscriptions/{}",
            self.api_url,
            path_param(subscription_id)?
        ))
    }

    fn authorization_capture_url(
        &self,
        authorization_id: &str,
    ) -> Result<String, InvalidPathParam> {
        Ok(format!(
            "{}/v2/payments/authorizations/{}/capture",
            self.api_url,
            path_param(authorization_id)?
        ))
    }

    async fn bearer_token(&self) -> Result<String, Error<AuthTokenSource::Error>> {
        let token = self.token_source.token().await.map_err(Error::Auth)?;
        Ok(token.bearer().to_owned())
    }

    fn build_request(
        &self,
        bearer_token: &str,
        method: Method,
        url: &str,
    ) -> Result<reqwest::Request, Error<AuthTokenSource::Error>> {
        let builder = self
            .client
            .request(method.clone(), url)
            .bearer_auth(bearer_token);

        let builder = if method == Method::POST {
            builder.header(reqwest::header::CONTENT_LENGTH, 0)
        } else {
            builder
        };

        builder.build().map_err(Error::Reqwest)
    }

    fn build_json_request<B>(
        &self,
        bearer_token: &str,
        method: Method,
        url: &str,
        body: &B,
    ) -> Result<reqwest::Request, Error<AuthTokenSource::Error>>
    where
        B: Serialize + ?Sized,
    {
        self.client
            .request(method, url)
            .bearer_auth(bearer_token)
            .json(body)
            .build()
            .map_err(Error::Reqwest)
    }

    async fn exec(
        &self,
        request: reqwest::Request,
    ) -> Result<reqwest::Response, Error<AuthTokenSource::Error>> {
        let res = self.client.execute(request).await.map_err(Error::Reqwest)?;
        match split_status(res).await.map_err(Error::Reqwest)? {
            Status::Success(res) => Ok(res),
            Status::Failure { status_code, body } => {
                Err(Error::Api(ApiError { status_code, body }))
            }
        }
    }

    async fn parse_json<T>(res: reqwest::Response) -> Result<T, Error<AuthTokenSource::Error>>
    where
        T: DeserializeOwned,
    {
        res.json().await.map_err(Error::Reqwest)
    }

    /// Create an order. `POST /v2/checkout/orders`.
    pub async fn create_order(
        &self,
        order: &OrderRequest,
    ) -> Result<Order, Error<AuthTokenSource::Error>> {
        let token = self.bearer_token().await?;
        let req = self.build_json_request(&token, Method::POST, &self.orders_url(), order)?;
        let res = self.exec(req).await?;
        Self::parse_json(res).await
    }

    /// Fetch an order by id. `GET /v2/checkout/orders/{id}`.
    pub async fn get_order(&self, order_id: &str) -> Result<Order, Error<AuthTokenSource::Error>> {
        let token = self.bearer_token().await?;
        let url = self.order_url(order_id)?;
        let req = self.build_request(&token, Method::GET, &url)?;
        let res = self.exec(req).await?;
        Self::parse_json(res).await
    }

    /// Create a catalog product. `POST /v1/catalogs/products`.
    pub async fn create_product(
        &self,
        product: &ProductRequest,
    ) -> Result<Product, Error<AuthTokenSource::Error>> {
        let token = self.bearer_token().await?;
        let req = self.build_json_request(&token, Method::POST, &self.products_url(), product)?;
        let res = self.exec(req).await?;
        Self::parse_json(res).await
    }

    /// Create a billing plan. `POST /v1/billing/plans`.
    pub async fn create_plan(
        &self,
        plan: &PlanRequest,
    ) -> Result<Plan, Error<AuthTokenSource::Error>> {
        let token = self.bearer_token().await?;
        let req = self.build_json_request(&token, Method::POST, &self.plans_url(), plan)?;
        let res = self.exec(req).await?;
        Self::parse_json(res).await
    }

    /// List billing plans. `GET /v1/billing/plans`.
    pub async fn list_plans(
        &self,
        params: &ListPlansParams,
    ) -> Result<PlanList, Error<AuthTokenSource::Error>> {
        let token = self.bearer_token().await?;
        let url = self.plans_list_url(params)?;
        let req = self.build_request(&token, Method::GET, &url)?;
        let res = self.exec(req).await?;
        Self::parse_json(res).await
    }

    /// Fetch a billing plan by id. `GET /v1/billing/plans/{id}`.
    pub async fn get_plan(&self, plan_id: &str) -> Result<Plan, Error<AuthTokenSource::Error>> {
        let token = self.bearer_token().await?;
        let url = self.plan_url(plan_id)?;
        let req = self.build_request(&token, Method::GET, &url)?;
        let res = self.exec(req).await?;
        Self::parse_json(res).await
    }

    /// Deactivate a billing plan. `POST /v1/billing/plans/{id}/deactivate`,
    /// succeeds with no content.
    pub async fn deactivate_plan(
        &self,
        plan_id: &str,
    ) -> Result<(), Error<AuthTokenSource::Error>> {
        let token = self.bearer_token().await?;
        let url = self.plan_deactivate_url(plan_id)?;
        let req = self.build_request(&token, Method::POST, &url)?;
        self.exec(req).await?;
        Ok(())
    }

    /// Create a subscription to a plan. `POST /v1/billing/subscriptions`.
    pub async fn create_subscription(
        &self,
        subscription: &SubscriptionRequest,
    ) -> Result<Subscription, Error<AuthTokenSource::Error>> {
        let token = self.bearer_token().await?;
        let req =
            self.build_json_request(&token, Method::POST, &self.subscriptions_url(), subscription)?;
        let res = self.exec(req).await?;
        Self::parse_json(res).await
    }

    /// Fetch a subscription by id. `GET /v1/billing/subscriptions/{id}`.
    pub async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<Subscription, Error<AuthTokenSource::Error>> {
        let token = self.bearer_token().await?;
        let url = self.subscription_url(subscription_id)?;
        let req = self.build_request(&token, Method::GET, &url)?;
        let res = self.exec(req).await?;
        Self::parse_json(res).await
    }

    /// Capture an authorized payment.
    /// `POST /v2/payments/authorizations/{id}/capture`; with no body the full
    /// authorized amount is captured.
    pub async fn capture_authorization(
        &self,
        authorization_id: &str,
        capture: Option<&CaptureRequest>,
    ) -> Result<Capture, Error<AuthTokenSource::Error>> {
        let token = self.bearer_token().await?;
        let url = self.authorization_capture_url(authorization_id)?;
        let req = match capture {
            Some(capture) => self.build_json_request(&token, Method::POST, &url, capture)?,
            None => self.build_request(&token, Method::POST, &url)?,
        };
        let res = self.exec(req).await?;
        Self::parse_json(res).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> Client<TokenManager<ClientCredentials>> {
        Client::new(Config {
            client_id: "id".into(),
            client_secret: "secret".into(),
            api_url: "https://api-m.sandbox.paypal.com/".into(),
        })
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client = test_client();
        assert_eq!(client.api_url, "https://api-m.sandbox.paypal.com");
    }

    #[test]
    fn plan_url_substitutes_the_id() {
        let client = test_client();
        assert_eq!(
            client.plan_url("P-123").unwrap(),
            "https://api-m.sandbox.paypal.com/v1/billing/plans/P-123"
        );
    }

    #[test]
    fn deactivate_url_nests_under_the_plan() {
        let client = test_client();
        assert_eq!(
            client.plan_deactivate_url("P-123").unwrap(),
            "https://api-m.sandbox.paypal.com/v1/billing/plans/P-123/deactivate"
        );
    }

    #[test]
    fn malformed_path_params_are_rejected() {
        let client = test_client();
        assert!(client.plan_url("").is_err());
        assert!(client.plan_url("P-1/deactivate").is_err());
        assert!(client.order_url("ORDER?x=1").is_err());
        assert!(client.subscription_url("I-1#frag").is_err());
    }

    #[test]
    fn absent_list_params_are_omitted() {
        let client = test_client();

        let url = client.plans_list_url(&ListPlansParams::default()).unwrap();
        assert_eq!(url, "https://api-m.sandbox.paypal.com/v1/billing/plans");

        let url = client
            .plans_list_url(&ListPlansParams {
                product_id: Some("PROD-1".into()),
                page_size: Some(20),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(
            url,
            "https://api-m.sandbox.paypal.com/v1/billing/plans?product_id=PROD-1&page_size=20"
        );
    }
}
