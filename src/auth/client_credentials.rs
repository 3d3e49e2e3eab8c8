//! OAuth2 client credentials grant against the PayPal token endpoint.

use std::time::{Duration, Instant};

use serde::Deserialize;

use crate::utils::{split_status, Status};

/// Path of the token endpoint, relative to the API origin.
pub const OAUTH_TOKEN_PATH: &str = "/v1/oauth2/token";

/// Subtracted from the declared lifetime so a token counts as stale slightly
/// before PayPal actually invalidates it.
const EXPIRY_SAFETY_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("reqwest: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("token endpoint: {0}")]
    Authentication(#[from] AuthenticationError),
}

/// Non-success response from the token endpoint.
#[derive(Debug, thiserror::Error)]
#[error("{status_code} status code: {body}")]
pub struct AuthenticationError {
    pub status_code: u16,
    pub body: String,
}

pub struct ClientCredentials {
    pub client: reqwest::Client,
    pub client_id: String,
    pub client_secret: String,
    /// API origin with no trailing slash, e.g. `https://api-m.sandbox.paypal.com`.
    pub api_url: String,
}

impl ClientCredentials {
    /// Exchange the configured credentials for an access token.
    pub async fn perform(&self) -> Result<AuthResponse, Error> {
        let url = format!("{}{}", self.api_url, OAUTH_TOKEN_PATH);

        let req = self
            .client
            .post(url)
            .basic_auth(&self.client_id, Some(&self.client_secret))
            .header("Content-Type", "application/x-www-form-urlencoded")
            .body("grant_type=client_credentials")
            .build()?;

        let res = self.client.execute(req).await?;
        match split_status(res).await? {
            Status::Success(res) => Ok(res.json().await?),
            Status::Failure { status_code, body } => {
                Err(AuthenticationError { status_code, body }.into())
            }
        }
    }
}

/// Token endpoint success payload.
#[derive(Debug, Deserialize)]
pub struct AuthResponse {
    /// The requested access token.
    pub access_token: String,
    /// Always `Bearer` for the client credentials grant.
    pub token_type: String,
    /// The amount of time that the token is valid, in seconds.
    pub expires_in: u64,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub access_token: String,
    pub expires_at: Instant,
}

impl From<AuthResponse> for Token {
    fn from(auth: AuthResponse) -> Self {
        let AuthResponse {
            access_token,
            token_type: _,
            expires_in,
        } = auth;
        // Saturating: a lifetime shorter than the margin yields a token that
        // is stale on arrival and renewed on next use.
        let lifetime = Duration::from_secs(expires_in).saturating_sub(EXPIRY_SAFETY_MARGIN);
        let expires_at = Instant::now() + lifetime;
        Self {
            access_token,
            expires_at,
        }
    }
}

#[async_trait::async_trait]
impl super::TokenSource for ClientCredentials {
    type Token = Token;
    type Error = Error;

    async fn token(&self) -> Result<Self::Token, Self::Error> {
        let auth_response = self.perform().await?;
        Ok(auth_response.into())
    }
}

impl super::AccessToken for Token {
    fn bearer(&self) -> &str {
        self.access_token.as_str()
    }
}

impl super::ExpiringToken for Token {
    fn expires_at(&self) -> Instant {
        self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auth_response(expires_in: u64) -> AuthResponse {
        AuthResponse {
            access_token: "A21AA".into(),
            token_type: "Bearer".into(),
            expires_in,
        }
    }

    #[test]
    fn expiry_applies_the_safety_margin() {
        let before = Instant::now();
        let token = Token::from(auth_response(3600));
        let after = Instant::now();

        assert!(token.expires_at >= before + Duration::from_secs(3540));
        assert!(token.expires_at <= after + Duration::from_secs(3540));
    }

    #[test]
    fn lifetime_below_the_margin_is_stale_on_arrival() {
        let token = Token::from(auth_response(30));
        assert!(token.expires_at <= Instant::now());
    }
}
