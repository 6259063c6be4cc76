/*
 * Responsibility
 * - 環境変数からの設定読み込み (PORT, CORS, Auth0 domain / audience / issuer など)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 */
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use jsonwebtoken::Algorithm;
use thiserror::Error;
use url::Url;

use crate::services::auth::VerifierSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    fn parse(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub cors_allowed_origins: Vec<String>,

    /// Auth0 tenant host, e.g. `dev-tv8ilm54.us.auth0.com`.
    pub auth0_domain: String,
    pub auth_audience: String,
    pub auth_issuer: String,
    pub auth_algorithms: Vec<Algorithm>,
    pub jwks_url: Url,
    pub jwks_cache_ttl: Duration,
    pub jwks_fetch_timeout: Duration,
    pub access_token_leeway_seconds: u64,

    pub seed_drinks: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key/value source (`from_env` passes the process env).
    pub fn from_lookup<F>(var: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = match var("PORT") {
            Some(s) => s.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            None => 5000,
        };
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let app_env = AppEnv::parse(var("APP_ENV").as_deref());

        let cors_allowed_origins = var("CORS_ALLOWED_ORIGINS")
            .unwrap_or_default()
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>();

        let auth0_domain = var("AUTH0_DOMAIN")
            .map(|d| normalize_domain(&d))
            .filter(|d| !d.is_empty())
            .ok_or(ConfigError::Missing("AUTH0_DOMAIN"))?;

        let auth_audience = var("AUTH_AUDIENCE")
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("AUTH_AUDIENCE"))?;

        // Auth0 issues `iss` as the tenant URL with a trailing slash.
        let auth_issuer = var("AUTH_ISSUER").unwrap_or_else(|| format!("https://{auth0_domain}/"));

        let auth_algorithms = parse_algorithms(var("AUTH_ALGORITHMS").as_deref().unwrap_or("RS256"))?;

        let jwks_url = match var("AUTH_JWKS_URL") {
            Some(url) => Url::parse(&url).map_err(|_| ConfigError::Invalid("AUTH_JWKS_URL"))?,
            None => Url::parse(&format!("https://{auth0_domain}/.well-known/jwks.json"))
                .map_err(|_| ConfigError::Invalid("AUTH0_DOMAIN"))?,
        };

        let jwks_cache_ttl = Duration::from_secs(parse_or(&var, "JWKS_CACHE_TTL_SECONDS", 600)?);
        let jwks_fetch_timeout = match parse_or(&var, "JWKS_FETCH_TIMEOUT_SECONDS", 10)? {
            0 => return Err(ConfigError::Invalid("JWKS_FETCH_TIMEOUT_SECONDS")),
            secs => Duration::from_secs(secs),
        };
        // Opt-in clock skew; with 0 any `exp` in the past is rejected.
        let access_token_leeway_seconds = parse_or(&var, "ACCESS_TOKEN_LEEWAY_SECONDS", 0)?;

        let seed_drinks = matches!(
            var("SEED_DRINKS").as_deref().map(str::trim),
            Some("1" | "true" | "TRUE" | "yes")
        );

        Ok(Self {
            addr,
            app_env,
            cors_allowed_origins,
            auth0_domain,
            auth_audience,
            auth_issuer,
            auth_algorithms,
            jwks_url,
            jwks_cache_ttl,
            jwks_fetch_timeout,
            access_token_leeway_seconds,
            seed_drinks,
        })
    }

    pub fn verifier_settings(&self) -> VerifierSettings {
        VerifierSettings {
            audience: self.auth_audience.clone(),
            issuer: self.auth_issuer.clone(),
            algorithms: self.auth_algorithms.clone(),
            leeway_seconds: self.access_token_leeway_seconds,
        }
    }
}

fn normalize_domain(domain: &str) -> String {
    let domain = domain.trim();
    let domain = domain.strip_prefix("https://").unwrap_or(domain);
    domain.trim_end_matches('/').to_string()
}

fn parse_or<F>(var: &F, key: &'static str, default: u64) -> Result<u64, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match var(key) {
        Some(s) => s.trim().parse().map_err(|_| ConfigError::Invalid(key)),
        None => Ok(default),
    }
}

/// Comma-separated list; RSA-family algorithms only.
fn parse_algorithms(value: &str) -> Result<Vec<Algorithm>, ConfigError> {
    let invalid = ConfigError::Invalid("AUTH_ALGORITHMS");

    let mut algorithms = Vec::new();
    for name in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let algorithm = Algorithm::from_str(name).map_err(|_| invalid.clone())?;
        if !matches!(
            algorithm,
            Algorithm::RS256
                | Algorithm::RS384
                | Algorithm::RS512
                | Algorithm::PS256
                | Algorithm::PS384
                | Algorithm::PS512
        ) {
            return Err(invalid);
        }
        if !algorithms.contains(&algorithm) {
            algorithms.push(algorithm);
        }
    }

    if algorithms.is_empty() {
        return Err(invalid);
    }

    Ok(algorithms)
}
