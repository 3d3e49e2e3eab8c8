use std::time::Instant;

use tokio::sync::Mutex;
use tracing::{debug, info};

use super::TokenSource;

/// Caches tokens from an underlying source, renewing only once the cached
/// one's adjusted expiry has passed.
///
/// The cache lock is held across a renewal, so concurrent callers that
/// observe a stale token share one outstanding exchange instead of racing
/// independent ones.
pub struct TokenManager<Source>
where
    Source: TokenSource,
{
    source: Source,
    cached: Mutex<Option<CachedToken>>,
}

#[derive(Debug, thiserror::Error)]
pub enum Error<RenewalError> {
    #[error("token source: {0}")]
    Source(#[source] RenewalError),
}

#[derive(Debug, Clone)]
pub struct CachedToken {
    pub access_token: String,
    pub expires_at: Instant,
}

impl CachedToken {
    pub fn from_expiring_token<T: super::ExpiringToken>(token: T) -> Self {
        Self {
            access_token: token.bearer().to_owned(),
            expires_at: token.expires_at(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

impl super::AccessToken for CachedToken {
    fn bearer(&self) -> &str {
        &self.access_token
    }
}

impl<Source> TokenManager<Source>
where
    Source: TokenSource,
    <Source as TokenSource>::Token: super::ExpiringToken,
{
    pub fn new(source: Source) -> Self {
        Self {
            source,
            cached: Mutex::const_new(None),
        }
    }

    async fn renew(&self) -> Result<CachedToken, Error<Source::Error>> {
        let token = self.source.token().await.map_err(Error::Source)?;
        Ok(CachedToken::from_expiring_token(token))
    }

    pub async fn get_token(&self) -> Result<CachedToken, Error<Source::Error>> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = &*cached {
            if !token.is_expired() {
                debug!(message = "Reusing cached token", expires_at = ?token.expires_at);
                return Ok(token.clone());
            }
            debug!(message = "Cached token expired", expires_at = ?token.expires_at);
        }

        info!(
            message = "Requesting a new access token",
            had_stale_token = cached.is_some(),
        );

        let renewed = self.renew().await?;
        cached.replace(renewed.clone());

        debug!(message = "Token renewed", expires_at = ?renewed.expires_at);

        Ok(renewed)
    }
}

#[async_trait::async_trait]
impl<Source> TokenSource for TokenManager<Source>
where
    Source: TokenSource,
    <Source as TokenSource>::Token: super::ExpiringToken,
{
    type Token = CachedToken;
    type Error = Error<Source::Error>;

    async fn token(&self) -> Result<Self::Token, Self::Error> {
        self.get_token().await
    }
}
