use std::{collections::BTreeSet, fmt};

use tracing::debug;

use crate::services::auth::access_jwt::ClaimsPayload;
use crate::services::auth::failure::AuthFailure;

/// Permissions a route demands, fixed when the route is registered.
///
/// Empty means any authenticated caller is accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequiredPermissions(BTreeSet<String>);

impl RequiredPermissions {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(permissions.into_iter().map(Into::into).collect())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl<const N: usize> From<[&str; N]> for RequiredPermissions {
    fn from(permissions: [&str; N]) -> Self {
        Self::new(permissions)
    }
}

impl fmt::Display for RequiredPermissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        f.write_str(&joined.join(","))
    }
}

/// Every required permission must be granted (conjunctive check).
pub fn authorize(claims: &ClaimsPayload, required: &RequiredPermissions) -> Result<(), AuthFailure> {
    if required.is_empty() {
        return Ok(());
    }

    if !claims.has_permissions_claim() {
        return Err(AuthFailure::MissingPermissionsClaim);
    }

    let granted = claims.permissions();
    if let Some(missing) = required
        .iter()
        .find(|needed| !granted.iter().any(|held| held == needed))
    {
        debug!(missing, "caller lacks required permission");
        return Err(AuthFailure::Forbidden);
    }

    Ok(())
}
