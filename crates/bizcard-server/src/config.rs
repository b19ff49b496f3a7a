use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};

/// Placeholder JWT secrets that MUST NOT be used.
const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
];

#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub db_path: PathBuf,
    pub addr: SocketAddr,
    /// `None` means any origin.
    pub cors_origin: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let jwt_secret = var("BIZCARD_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!(
                "BIZCARD_JWT_SECRET is unset or still a placeholder. \
                 It must match the secret the identity provider signs tokens with."
            );
        }

        let db_path = var("BIZCARD_DB_PATH").unwrap_or_else(|| "bizcard.db".into());
        let host = var("BIZCARD_HOST").unwrap_or_else(|| "0.0.0.0".into());
        let port: u16 = var("BIZCARD_PORT")
            .unwrap_or_else(|| "3000".into())
            .parse()
            .context("BIZCARD_PORT must be a port number")?;
        let addr: SocketAddr = format!("{}:{}", host, port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", host, port))?;

        let cors_origin = var("BIZCARD_CORS_ORIGIN").filter(|o| !o.trim().is_empty());

        Ok(Self {
            jwt_secret,
            db_path: db_path.into(),
            addr,
            cors_origin,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let config = load(&[("BIZCARD_JWT_SECRET", "s3cret")]).unwrap();
        assert_eq!(config.db_path, PathBuf::from("bizcard.db"));
        assert_eq!(config.addr, "0.0.0.0:3000".parse().unwrap());
        assert_eq!(config.cors_origin, None);
    }

    #[test]
    fn placeholder_secret_is_refused() {
        assert!(load(&[]).is_err());
        assert!(load(&[("BIZCARD_JWT_SECRET", "dev-secret-change-me")]).is_err());
    }

    #[test]
    fn overrides_are_read() {
        let config = load(&[
            ("BIZCARD_JWT_SECRET", "s3cret"),
            ("BIZCARD_DB_PATH", "/var/lib/bizcard/cards.db"),
            ("BIZCARD_HOST", "127.0.0.1"),
            ("BIZCARD_PORT", "8080"),
            ("BIZCARD_CORS_ORIGIN", "https://cards.example.com"),
        ])
        .unwrap();
        assert_eq!(config.addr, "127.0.0.1:8080".parse().unwrap());
        assert_eq!(config.cors_origin.as_deref(), Some("https://cards.example.com"));

        assert!(load(&[("BIZCARD_JWT_SECRET", "s3cret"), ("BIZCARD_PORT", "http")]).is_err());
    }
}
