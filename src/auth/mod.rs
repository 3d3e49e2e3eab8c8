//! Token acquisition and caching.

pub mod client_credentials;
pub mod token_manager;

/// Anything that can produce an access token for outgoing requests.
#[async_trait::async_trait]
pub trait TokenSource: Send + Sync {
    type Token: AccessToken;
    type Error: Send + Sync;

    async fn token(&self) -> Result<Self::Token, Self::Error>;
}

pub trait AccessToken: Send {
    /// The value placed after `Bearer ` in the authorization header.
    fn bearer(&self) -> &str;
}

/// A token whose validity window is known, making it eligible for caching.
pub trait ExpiringToken: AccessToken {
    fn expires_at(&self) -> std::time::Instant;
}
