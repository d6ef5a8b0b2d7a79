use std::{net::SocketAddr, time::Duration};

use anyhow::Context;
use axum::http::HeaderValue;
use rand::{rngs::OsRng, RngCore};

use crate::auth::{decode_secret_key, AuthConfig};

const DEFAULT_TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    /// `*` mirrors any origin; otherwise an explicit allow list.
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub auth: AuthConfig,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("LP_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid LP_LISTEN_ADDR")?;
        let db_path = std::env::var("LP_DB_PATH").unwrap_or_else(|_| "./db/lifeplan.db".into());
        let cors_allow = parse_origins(
            &std::env::var("LP_CORS_ALLOW_ORIGINS").unwrap_or_else(|_| "*".into()),
        )?;
        let timeout_ms: u64 = std::env::var("LP_REQUEST_TIMEOUT_MS")
            .unwrap_or_else(|_| "30000".into())
            .parse()
            .unwrap_or(30000);

        let jwt_secret = match std::env::var("LP_JWT_SECRET") {
            Ok(raw) => decode_secret_key(&raw).context("Invalid LP_JWT_SECRET")?,
            Err(_) => {
                tracing::warn!(
                    "LP_JWT_SECRET is not set; using a random key, tokens will not survive a restart"
                );
                random_secret()
            }
        };
        let ttl_secs: u64 = match std::env::var("LP_TOKEN_TTL_SECS") {
            Ok(raw) => raw.trim().parse().context("Invalid LP_TOKEN_TTL_SECS")?,
            Err(_) => DEFAULT_TOKEN_TTL_SECS,
        };

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            auth: AuthConfig {
                jwt_secret,
                access_token_ttl: Duration::from_secs(ttl_secs),
            },
        })
    }

    /// Defaults for an in-process server backed by `db_path`.
    pub fn for_db_path(db_path: impl Into<String>) -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            db_path: db_path.into(),
            cors_allow: vec!["*".to_string()],
            request_timeout: Duration::from_millis(30000),
            auth: AuthConfig {
                jwt_secret: random_secret(),
                access_token_ttl: Duration::from_secs(DEFAULT_TOKEN_TTL_SECS),
            },
        }
    }
}

fn random_secret() -> Vec<u8> {
    let mut secret = vec![0u8; 32];
    OsRng.fill_bytes(&mut secret);
    secret
}

fn parse_origins(raw: &str) -> anyhow::Result<Vec<String>> {
    let origins: Vec<String> = raw
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    for origin in origins.iter().filter(|o| o.as_str() != "*") {
        HeaderValue::from_str(origin)
            .with_context(|| format!("Invalid origin in LP_CORS_ALLOW_ORIGINS: {origin}"))?;
    }
    Ok(origins)
}
