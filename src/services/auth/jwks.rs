//! Public signing keys published by the token issuer (JWKS).
//!
//! `RemoteKeySetProvider` performs one HTTP GET per call. Wrap it in
//! [`CachedKeySetProvider`](crate::services::auth::jwks_cache::CachedKeySetProvider)
//! to share a fetched set across requests.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use jsonwebtoken::DecodingKey;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};
use url::Url;

#[derive(Debug, Error)]
pub enum KeySetError {
    #[error("jwks request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("jwks endpoint returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("invalid jwks document: {0}")]
    Malformed(#[source] reqwest::Error),

    #[error("jwks refresh this request waited on failed")]
    RefreshFailed,

    #[error("unsupported key type '{kty}' for kid '{kid}'")]
    UnsupportedKey { kid: String, kty: String },

    #[error("invalid rsa key material for kid '{kid}': {source}")]
    InvalidKey {
        kid: String,
        #[source]
        source: jsonwebtoken::errors::Error,
    },
}

/// One entry of the `keys` array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningKey {
    pub kid: String,
    pub kty: String,
    #[serde(rename = "use")]
    pub key_use: String,
    /// RSA modulus, base64url.
    pub n: String,
    /// RSA public exponent, base64url.
    pub e: String,
}

impl SigningKey {
    /// Build the RSA verification key for this entry.
    pub fn decoding_key(&self) -> Result<DecodingKey, KeySetError> {
        if self.kty != "RSA" {
            return Err(KeySetError::UnsupportedKey {
                kid: self.kid.clone(),
                kty: self.kty.clone(),
            });
        }

        DecodingKey::from_rsa_components(&self.n, &self.e).map_err(|source| {
            KeySetError::InvalidKey {
                kid: self.kid.clone(),
                source,
            }
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeySet {
    keys: Vec<SigningKey>,
}

impl KeySet {
    pub fn new(keys: Vec<SigningKey>) -> Self {
        Self { keys }
    }

    pub fn find(&self, kid: &str) -> Option<&SigningKey> {
        self.keys.iter().find(|key| key.kid == kid)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Source of the issuer's current key set.
///
/// Implementations must be safe to call from many requests at once.
#[async_trait]
pub trait KeySetProvider: Send + Sync {
    async fn fetch_key_set(&self) -> Result<Arc<KeySet>, KeySetError>;
}

/// Fetches the key set from the discovery URL on every call.
#[derive(Debug, Clone)]
pub struct RemoteKeySetProvider {
    jwks_url: Url,
    http_client: reqwest::Client,
}

impl RemoteKeySetProvider {
    pub fn new(jwks_url: Url, timeout: Duration) -> Result<Self, KeySetError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(KeySetError::Transport)?;

        Ok(Self {
            jwks_url,
            http_client,
        })
    }
}

#[async_trait]
impl KeySetProvider for RemoteKeySetProvider {
    async fn fetch_key_set(&self) -> Result<Arc<KeySet>, KeySetError> {
        let response = self
            .http_client
            .get(self.jwks_url.clone())
            .send()
            .await
            .map_err(|e| {
                error!(jwks_url = %self.jwks_url, error = %e, "failed to fetch jwks");
                KeySetError::Transport(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(jwks_url = %self.jwks_url, %status, "jwks endpoint returned error status");
            return Err(KeySetError::Status(status));
        }

        let key_set: KeySet = response.json().await.map_err(|e| {
            error!(jwks_url = %self.jwks_url, error = %e, "failed to parse jwks document");
            KeySetError::Malformed(e)
        })?;

        info!(jwks_url = %self.jwks_url, key_count = key_set.len(), "fetched jwks");

        Ok(Arc::new(key_set))
    }
}
