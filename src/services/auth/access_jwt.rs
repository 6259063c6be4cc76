use std::{fmt, str::FromStr, sync::Arc};

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use jsonwebtoken::{Algorithm, Validation, errors::ErrorKind};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::services::auth::bearer::RawToken;
use crate::services::auth::failure::{AuthFailure, TokenDefect};
use crate::services::auth::jwks::{KeySetError, KeySetProvider};

/// What a token must satisfy besides a valid signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifierSettings {
    pub audience: String,
    pub issuer: String,
    /// RSA-family algorithms only; anything else is rejected at config load.
    pub algorithms: Vec<Algorithm>,
    pub leeway_seconds: u64,
}

/// Token header decoded without any trust. Only used to pick a key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UnverifiedHeader {
    #[serde(default)]
    pub kid: Option<String>,
    #[serde(default)]
    pub alg: Option<String>,
}

impl UnverifiedHeader {
    pub fn decode(token: &str) -> Result<Self, AuthFailure> {
        let unparseable = AuthFailure::MalformedToken(TokenDefect::Unparseable);

        let mut segments = token.split('.');
        let (Some(header), Some(_), Some(_), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(unparseable);
        };

        let Ok(bytes) = URL_SAFE_NO_PAD.decode(header) else {
            return Err(unparseable);
        };

        serde_json::from_slice(&bytes).map_err(|_| unparseable)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Audience {
    One(String),
    Many(Vec<String>),
}

#[derive(Deserialize)]
struct StandardClaims {
    iss: String,
    aud: Audience,
    exp: u64,
    #[serde(default)]
    sub: Option<String>,
    #[serde(default)]
    permissions: Option<Vec<String>>,
}

/// Claims of a token that passed signature and claim validation.
///
/// Only [`TokenVerifier`] produces values of this type. All claims are
/// retained; the standard ones are also exposed typed.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimsPayload {
    issuer: String,
    audience: Vec<String>,
    expiry: u64,
    subject: Option<String>,
    permissions: Option<Vec<String>>,
    claims: Map<String, Value>,
}

impl ClaimsPayload {
    pub(crate) fn from_claims(claims: Map<String, Value>) -> Result<Self, AuthFailure> {
        let standard: StandardClaims = serde_json::from_value(Value::Object(claims.clone()))
            .map_err(|e| {
                debug!(error = %e, "claims do not have the expected shape");
                AuthFailure::MalformedToken(TokenDefect::Unparseable)
            })?;

        let audience = match standard.aud {
            Audience::One(aud) => vec![aud],
            Audience::Many(auds) => auds,
        };

        Ok(Self {
            issuer: standard.iss,
            audience,
            expiry: standard.exp,
            subject: standard.sub,
            permissions: standard.permissions,
            claims,
        })
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &[String] {
        &self.audience
    }

    /// `exp`, seconds since the Unix epoch.
    pub fn expiry(&self) -> u64 {
        self.expiry
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Granted permissions in token order; empty when the claim is absent.
    pub fn permissions(&self) -> &[String] {
        self.permissions.as_deref().unwrap_or_default()
    }

    pub fn has_permissions_claim(&self) -> bool {
        self.permissions.is_some()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.claims.get(name)
    }

    pub fn claims(&self) -> &Map<String, Value> {
        &self.claims
    }
}

/// RS256-style access token verifier backed by the issuer's JWKS.
#[derive(Clone)]
pub struct TokenVerifier {
    keys: Arc<dyn KeySetProvider>,
    settings: VerifierSettings,
}

impl fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenVerifier")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl TokenVerifier {
    pub fn new(keys: Arc<dyn KeySetProvider>, settings: VerifierSettings) -> Self {
        Self { keys, settings }
    }

    /// Verify the signature and the `exp`/`aud`/`iss` claims.
    ///
    /// Order matters for the reported failure: header shape, then `kid`
    /// lookup, then algorithm, then signature, then claims.
    pub async fn verify(&self, token: &RawToken) -> Result<ClaimsPayload, AuthFailure> {
        let header = UnverifiedHeader::decode(token.as_str())?;

        let kid = header
            .kid
            .as_deref()
            .filter(|kid| !kid.is_empty())
            .ok_or(AuthFailure::InvalidHeader)?;

        let key_set = self
            .keys
            .fetch_key_set()
            .await
            .map_err(AuthFailure::KeySetUnavailable)?;

        let key = key_set.find(kid).ok_or_else(|| {
            debug!(kid, known = key_set.len(), "no signing key for token kid");
            AuthFailure::KeyNotFound
        })?;

        let algorithm = self.allowed_algorithm(header.alg.as_deref())?;
        let decoding_key = key.decoding_key().map_err(AuthFailure::KeySetUnavailable)?;

        let mut validation = Validation::new(algorithm);
        validation.set_audience(&[&self.settings.audience]);
        validation.set_issuer(&[&self.settings.issuer]);
        validation.set_required_spec_claims(&["exp", "aud", "iss"]);
        validation.leeway = self.settings.leeway_seconds;

        let data = jsonwebtoken::decode::<Map<String, Value>>(
            token.as_str(),
            &decoding_key,
            &validation,
        )
        .map_err(|e| classify(kid, e))?;

        ClaimsPayload::from_claims(data.claims)
    }

    fn allowed_algorithm(&self, alg: Option<&str>) -> Result<Algorithm, AuthFailure> {
        let algorithm = alg
            .and_then(|alg| Algorithm::from_str(alg).ok())
            .ok_or(AuthFailure::InvalidHeader)?;

        if !self.settings.algorithms.contains(&algorithm) {
            warn!(?algorithm, allowed = ?self.settings.algorithms, "token algorithm not allowed");
            return Err(AuthFailure::InvalidHeader);
        }

        Ok(algorithm)
    }
}

fn classify(kid: &str, err: jsonwebtoken::errors::Error) -> AuthFailure {
    debug!(kid, error = %err, "token rejected");

    if matches!(
        err.kind(),
        ErrorKind::InvalidRsaKey(_) | ErrorKind::InvalidKeyFormat
    ) {
        return AuthFailure::KeySetUnavailable(KeySetError::InvalidKey {
            kid: kid.to_string(),
            source: err,
        });
    }

    match err.kind() {
        ErrorKind::ExpiredSignature => AuthFailure::TokenExpired,
        ErrorKind::InvalidAudience
        | ErrorKind::InvalidIssuer
        | ErrorKind::ImmatureSignature
        | ErrorKind::MissingRequiredClaim(_) => AuthFailure::InvalidClaims,
        ErrorKind::InvalidSignature => AuthFailure::MalformedToken(TokenDefect::BadSignature),
        ErrorKind::InvalidAlgorithm => AuthFailure::InvalidHeader,
        _ => AuthFailure::MalformedToken(TokenDefect::Unparseable),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn encode_segment(value: &Value) -> String {
        URL_SAFE_NO_PAD.encode(serde_json::to_vec(value).unwrap())
    }

    #[test]
    fn header_decodes_without_alg() {
        let token = format!("{}.def.ghi", encode_segment(&json!({ "kid": "X" })));
        let header = UnverifiedHeader::decode(&token).unwrap();

        assert_eq!(header.kid.as_deref(), Some("X"));
        assert_eq!(header.alg, None);
    }

    #[test]
    fn header_requires_three_segments() {
        let header = encode_segment(&json!({ "kid": "X", "alg": "RS256" }));

        for token in [header.clone(), format!("{header}.a"), format!("{header}.a.b.c")] {
            assert!(matches!(
                UnverifiedHeader::decode(&token),
                Err(AuthFailure::MalformedToken(TokenDefect::Unparseable))
            ));
        }
    }

    #[test]
    fn header_must_be_base64url_json() {
        for token in ["!!!.a.b", "bm90LWpzb24.a.b"] {
            assert!(matches!(
                UnverifiedHeader::decode(token),
                Err(AuthFailure::MalformedToken(TokenDefect::Unparseable))
            ));
        }
    }

    #[test]
    fn claims_payload_keeps_every_claim() {
        let claims = json!({
            "iss": "https://issuer/",
            "aud": ["cafee", "https://issuer/userinfo"],
            "exp": 1_900_000_000u64,
            "sub": "auth0|123",
            "permissions": ["get:drinks-detail", "post:drinks"],
            "azp": "client"
        });
        let Value::Object(map) = claims else { unreachable!() };

        let payload = ClaimsPayload::from_claims(map.clone()).unwrap();

        assert_eq!(payload.issuer(), "https://issuer/");
        assert_eq!(payload.audience(), ["cafee", "https://issuer/userinfo"]);
        assert_eq!(payload.subject(), Some("auth0|123"));
        assert_eq!(payload.permissions(), ["get:drinks-detail", "post:drinks"]);
        assert_eq!(payload.get("azp"), Some(&json!("client")));
        assert_eq!(payload.claims(), &map);
    }

    #[test]
    fn absent_permissions_is_remembered() {
        let Value::Object(map) = json!({ "iss": "i", "aud": "a", "exp": 1 }) else {
            unreachable!()
        };

        let payload = ClaimsPayload::from_claims(map).unwrap();

        assert!(payload.permissions().is_empty());
        assert!(!payload.has_permissions_claim());
    }

    #[test]
    fn permissions_of_wrong_type_are_unparseable() {
        let Value::Object(map) = json!({
            "iss": "i", "aud": "a", "exp": 1, "permissions": "get:drinks"
        }) else {
            unreachable!()
        };

        assert!(matches!(
            ClaimsPayload::from_claims(map),
            Err(AuthFailure::MalformedToken(TokenDefect::Unparseable))
        ));
    }
}
