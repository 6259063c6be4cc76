//! Shared fixtures: RSA test keys, token signing, an in-process key provider.

#![allow(dead_code)]

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::Value;
use tower::ServiceExt;

use coffee_shop_api::{
    api,
    repos::InMemoryDrinkRepo,
    services::auth::{
        Authorizer, KeySet, KeySetError, KeySetProvider, SigningKey, TokenVerifier,
        VerifierSettings,
    },
    state::AppState,
};

pub const AUDIENCE: &str = "cafee";
pub const ISSUER: &str = "https://issuer/";

pub const PRIMARY_KID: &str = "primary-2026";
pub const PRIMARY_PEM: &str = include_str!("../fixtures/rsa_primary.pem");
pub const PRIMARY_N: &str = "2JaSkBDmKM2tHM3z9A9ZZgAWSr7aTQzo5yMLS04oHZUoBrvkK_rvsynYZaFBZgF1vZRu89Zi7TvS6tgDnYszloF1WvwoKGpijFqbFS-zjoU79hbWuW4dGganbn0JymJ1TOVMTwvkQ6vyhkBq10w93KoHr-hZf5-WmjR-0qXwuKedVKKqpv69IheT4GjrH5wlDnjS1jVKQr09fH_67LRtMIss0JAmBWx-IgUmm2LFSyD6ISAQyO6zmPr8FVbSxnIjVH9-uuUNsqc2bXUgZ9oYWpLfXs_QTBXuZDPEPdkmwWlUZXcZeMtVzGB2nIql8JAR0ouENANfUqi8z82XAyd3qw";

/// Not published in the key set unless a test adds it.
pub const SECONDARY_KID: &str = "secondary-2026";
pub const SECONDARY_PEM: &str = include_str!("../fixtures/rsa_secondary.pem");
pub const SECONDARY_N: &str = "zeUBYiGpQBfuL-zgFJ-zUSMPGhJjyesdcUPYHqEUQwOHR4shd5cttopQhAM1x26AdXT5eJpRbNec4zPKePmUNXEcTTnT4WEyKyXgy2k-l8R0v-L0t5BbWtIacT_NUWXCnPybMXeOlhe4JxsZPCMQTSqFvmGHQT8wSJdszmAGqKSpN4UMakkzU9b77BJujWc5Ki2SU7xYeSGEWCPLmlyWIKHUPh2SH_bsONHiY03DpD-BCPrTo79FG6mXVzEWl4bR49clhuyAU1Zj9fYpHeslTLz82Wb3AB9OLkfWvEpAasNXa3AQKZEeGyKAufPXH4fi0USbyVdJYUqCmTc3wXxd3Q";

pub fn rsa_key(kid: &str, n: &str) -> SigningKey {
    SigningKey {
        kid: kid.to_string(),
        kty: "RSA".to_string(),
        key_use: "sig".to_string(),
        n: n.to_string(),
        e: "AQAB".to_string(),
    }
}

pub fn primary_key_set() -> KeySet {
    KeySet::new(vec![rsa_key(PRIMARY_KID, PRIMARY_N)])
}

pub fn now() -> u64 {
    jsonwebtoken::get_current_timestamp()
}

pub fn sign_with(claims: &Value, kid: &str, pem: &str) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(kid.to_string());
    let key = EncodingKey::from_rsa_pem(pem.as_bytes()).unwrap();
    jsonwebtoken::encode(&header, claims, &key).unwrap()
}

/// RS256 token signed by the primary key under its own kid.
pub fn sign(claims: &Value) -> String {
    sign_with(claims, PRIMARY_KID, PRIMARY_PEM)
}

pub fn settings() -> VerifierSettings {
    VerifierSettings {
        audience: AUDIENCE.to_string(),
        issuer: ISSUER.to_string(),
        algorithms: vec![Algorithm::RS256],
        leeway_seconds: 0,
    }
}

/// Serves a fixed key set and counts how often it was asked.
#[derive(Default)]
pub struct StaticKeys {
    keys: Option<Arc<KeySet>>,
    calls: AtomicUsize,
}

impl StaticKeys {
    pub fn new(keys: KeySet) -> Self {
        Self {
            keys: Some(Arc::new(keys)),
            calls: AtomicUsize::new(0),
        }
    }

    /// Every fetch fails as if the endpoint answered 503.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl KeySetProvider for StaticKeys {
    async fn fetch_key_set(&self) -> Result<Arc<KeySet>, KeySetError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.keys
            .clone()
            .ok_or(KeySetError::Status(reqwest::StatusCode::SERVICE_UNAVAILABLE))
    }
}

pub fn verifier(keys: Arc<dyn KeySetProvider>) -> TokenVerifier {
    TokenVerifier::new(keys, settings())
}

pub fn authorizer(keys: Arc<dyn KeySetProvider>) -> Authorizer {
    Authorizer::new(Arc::new(verifier(keys)))
}

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let keys: Arc<dyn KeySetProvider> = Arc::new(StaticKeys::new(primary_key_set()));
        let state = AppState::new(Arc::new(InMemoryDrinkRepo::new()), authorizer(keys));
        Self {
            router: api::router(state.clone()),
            state,
        }
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        send(self.router.clone(), req).await
    }
}

pub async fn send(router: Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = router.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

pub fn request(method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}
