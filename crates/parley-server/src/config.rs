use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Placeholder JWT secrets that should never reach production.
pub const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
];

pub struct Config {
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub jwt_secret: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = get("PARLEY_DB_PATH").unwrap_or_else(|| "parley.db".into()).into();
        let host = get("PARLEY_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port = get("PARLEY_PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .context("PARLEY_PORT must be a port number")?;
        let jwt_secret = get("PARLEY_JWT_SECRET").unwrap_or_else(|| "dev-secret-change-me".into());

        Ok(Self {
            db_path,
            host,
            port,
            jwt_secret,
        })
    }

    pub fn uses_placeholder_secret(&self) -> bool {
        self.jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&self.jwt_secret.as_str())
    }

    pub fn addr(&self) -> Result<SocketAddr> {
        Ok(format!("{}:{}", self.host, self.port).parse()?)
    }
}
