//! Extract, verify, authorize: the whole access check behind one call.
//!
//! Framework-neutral; the axum route layer in `middleware::auth::access`
//! is a thin wrapper around [`Authorizer::authorize`].
use std::sync::Arc;

use axum::http::HeaderMap;

use crate::services::auth::access_jwt::{ClaimsPayload, TokenVerifier};
use crate::services::auth::bearer;
use crate::services::auth::failure::AuthFailure;
use crate::services::auth::permissions::{self, RequiredPermissions};

#[derive(Clone, Debug)]
pub struct Authorizer {
    verifier: Arc<TokenVerifier>,
}

impl Authorizer {
    pub fn new(verifier: Arc<TokenVerifier>) -> Self {
        Self { verifier }
    }

    pub async fn authorize(
        &self,
        headers: &HeaderMap,
        required: &RequiredPermissions,
    ) -> Result<ClaimsPayload, AuthFailure> {
        let token = bearer::extract(headers)?;
        let claims = self.verifier.verify(&token).await?;
        permissions::authorize(&claims, required)?;

        Ok(claims)
    }
}
