//! Factory: build the access-check stack from application `Config`.
use std::sync::Arc;

use tracing::info;

use crate::config::Config;
use crate::services::auth::{
    Authorizer, CachedKeySetProvider, KeySetError, KeySetProvider, RemoteKeySetProvider,
    TokenVerifier,
};

pub fn build_authorizer(config: &Config) -> Result<Authorizer, KeySetError> {
    let remote = RemoteKeySetProvider::new(config.jwks_url.clone(), config.jwks_fetch_timeout)?;

    let keys: Arc<dyn KeySetProvider> = if config.jwks_cache_ttl.is_zero() {
        Arc::new(remote)
    } else {
        Arc::new(CachedKeySetProvider::new(remote, config.jwks_cache_ttl))
    };

    info!(
        jwks_url = %config.jwks_url,
        cache_ttl_secs = config.jwks_cache_ttl.as_secs(),
        audience = %config.auth_audience,
        issuer = %config.auth_issuer,
        "access verification configured"
    );

    let verifier = TokenVerifier::new(keys, config.verifier_settings());
    Ok(Authorizer::new(Arc::new(verifier)))
}
