//! Server settings loaded from environment variables.

use std::env;
use std::time::Duration;

use thiserror::Error;

use crate::keys::DEFAULT_LEGACY_PREFIXES;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerSettings {
    pub port: u16,
    pub tls_enabled: bool,
    pub tls_cert_path: String,
    pub tls_key_path: String,
    pub chain_http_url: String,
    pub chain_request_timeout: Duration,
    pub domain_suffix: String,
    pub legacy_key_prefixes: Vec<String>,
    /// `None` keeps pending secrets until they are used.
    pub secret_ttl: Option<Duration>,
    pub enable_timing_logs: bool,
}

impl ServerSettings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_vars(|name| env::var(name).ok())
    }

    /// Build settings from an arbitrary variable source.
    pub fn from_vars<F>(var: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let ttl_secs: u64 = parse_var(&var, "SECRET_TTL_SECS", 0)?;

        Ok(ServerSettings {
            port: parse_var(&var, "PORT", 8080)?,
            tls_enabled: var("TLS_CERT_PATH").is_some(),
            tls_cert_path: var("TLS_CERT_PATH").unwrap_or_else(|| "./fullchain.pem".to_string()),
            tls_key_path: var("TLS_KEY_PATH").unwrap_or_else(|| "./privkey.pem".to_string()),
            chain_http_url: var("CHAIN_HTTP_URL")
                .unwrap_or_else(|| "http://127.0.0.1:8888".to_string()),
            chain_request_timeout: Duration::from_secs(parse_var(
                &var,
                "CHAIN_REQUEST_TIMEOUT_SECS",
                10,
            )?),
            domain_suffix: var("AUTH_DOMAIN_SUFFIX").unwrap_or_else(|| "commun".to_string()),
            legacy_key_prefixes: var("LEGACY_KEY_PREFIXES")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|p| !p.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or_else(|| DEFAULT_LEGACY_PREFIXES.iter().map(|p| p.to_string()).collect()),
            secret_ttl: (ttl_secs > 0).then(|| Duration::from_secs(ttl_secs)),
            enable_timing_logs: var("ENABLE_TIMING_LOGS")
                .unwrap_or_else(|| "false".to_string())
                .parse()
                .unwrap_or(false),
        })
    }
}

fn parse_var<F, T>(var: &F, name: &'static str, default: T) -> Result<T, SettingsError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match var(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| SettingsError::InvalidValue { name, value }),
        None => Ok(default),
    }
}
