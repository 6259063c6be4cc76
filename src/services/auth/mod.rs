pub mod access_jwt;
pub mod authorizer;
pub mod bearer;
pub mod factory;
pub mod failure;
pub mod jwks;
pub mod jwks_cache;
pub mod permissions;

pub use access_jwt::{ClaimsPayload, TokenVerifier, UnverifiedHeader, VerifierSettings};
pub use authorizer::Authorizer;
pub use bearer::RawToken;
pub use factory::build_authorizer;
pub use failure::{AuthFailure, TokenDefect};
pub use jwks::{KeySet, KeySetError, KeySetProvider, RemoteKeySetProvider, SigningKey};
pub use jwks_cache::CachedKeySetProvider;
pub use permissions::RequiredPermissions;
