use std::{env, fmt::Display, net::SocketAddr, str::FromStr, time::Duration};

use axum::http::uri::Authority;
use tracing::info;

const DEFAULT_ALLOWED_HOSTS: &str = "localhost,127.0.0.1,[::1]";

/// Runtime configuration, read from the environment (and `.env` via dotenvy)
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: SocketAddr,
    /// Absolute base for QR menu URLs; falls back to the request's Host header
    pub public_base_url: Option<String>,
    /// Host names accepted for that fallback. `.example.com` also matches
    /// subdomains and `*` matches anything.
    pub allowed_hosts: Vec<String>,
    pub session_idle: Duration,
    pub session_cookie_secure: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("invalid {key} value: {message}")]
    Invalid { key: &'static str, message: String },
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let public_base_url = env::var("PUBLIC_BASE_URL")
            .ok()
            .map(|url| url.trim().trim_end_matches('/').to_string())
            .filter(|url| !url.is_empty());

        Ok(Self {
            database_url,
            bind_addr: try_load("BIND_ADDR", "0.0.0.0:3000")?,
            public_base_url,
            allowed_hosts: parse_hosts(&env::var("ALLOWED_HOSTS").unwrap_or_else(|_| {
                info!("ALLOWED_HOSTS not set, using default: {DEFAULT_ALLOWED_HOSTS}");
                DEFAULT_ALLOWED_HOSTS.to_string()
            })),
            session_idle: Duration::from_secs(try_load("SESSION_IDLE_SECS", "86400")?),
            session_cookie_secure: try_load("SESSION_COOKIE_SECURE", "false")?,
        })
    }

    /// Configuration for tests and tooling that never bind a socket
    pub fn for_database(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            public_base_url: None,
            allowed_hosts: parse_hosts(DEFAULT_ALLOWED_HOSTS),
            session_idle: Duration::from_secs(86400),
            session_cookie_secure: false,
        }
    }

    /// Normalized `host[:port]` from a request's Host header, if the host is
    /// allowed
    pub fn trusted_host(&self, host_header: &str) -> Option<String> {
        let authority = host_header.trim().parse::<Authority>().ok()?;
        if authority.as_str().contains('@') {
            return None;
        }
        let host = authority.host().to_ascii_lowercase();

        let allowed = self.allowed_hosts.iter().any(|pattern| {
            if pattern == "*" {
                true
            } else if let Some(domain) = pattern.strip_prefix('.') {
                host == domain || host.ends_with(pattern.as_str())
            } else {
                host == *pattern
            }
        });
        if !allowed {
            return None;
        }

        Some(match authority.port_u16() {
            Some(port) => format!("{host}:{port}"),
            None => host,
        })
    }
}

fn parse_hosts(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|host| host.trim().to_ascii_lowercase())
        .filter(|host| !host.is_empty())
        .collect()
}

fn try_load<T: FromStr>(key: &'static str, default: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let raw = env::var(key).unwrap_or_else(|_| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    parse_value(key, &raw)
}

fn parse_value<T: FromStr>(key: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        message: e.to_string(),
    })
}
