//! Configuration module
//!
//! The client reads a single externally supplied value, the gateway base URL.
//! Everything else is a constant (see [`crate::constants`]).

use std::env;
use std::time::Duration;

use anyhow::Context;

use crate::constants::{
    GATEWAY_URL_ENV, GATEWAY_URL_ENV_FALLBACK, HTTP_TIMEOUT, RESULT_REFRESH_INTERVAL,
};

/// Client configuration shared by the upload and result pages.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub gateway_url: String,
    pub refresh_interval: Duration,
    pub http_timeout: Duration,
}

impl ClientConfig {
    pub fn new(gateway_url: impl Into<String>) -> Self {
        let gateway_url: String = gateway_url.into();
        Self {
            gateway_url: gateway_url.trim_end_matches('/').to_string(),
            refresh_interval: RESULT_REFRESH_INTERVAL,
            http_timeout: HTTP_TIMEOUT,
        }
    }

    /// Load from the environment (and `.env`): VIDINSIGHT_API_GATEWAY_URL, or API_GATEWAY_URL.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();
        Self::from_process_env()
    }

    /// Like [`ClientConfig::from_env`], for callers that already loaded `.env`.
    pub fn from_process_env() -> Result<Self, anyhow::Error> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self, anyhow::Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let gateway_url = lookup(GATEWAY_URL_ENV)
            .or_else(|| lookup(GATEWAY_URL_ENV_FALLBACK))
            .filter(|url| !url.trim().is_empty())
            .with_context(|| {
                format!(
                    "Missing gateway URL. Set {} or {}",
                    GATEWAY_URL_ENV, GATEWAY_URL_ENV_FALLBACK
                )
            })?;

        let config = Self::new(gateway_url.trim());
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if !self.gateway_url.starts_with("http://") && !self.gateway_url.starts_with("https://")
        {
            return Err(anyhow::anyhow!(
                "Gateway URL must start with http:// or https://, got '{}'",
                self.gateway_url
            ));
        }

        if self.refresh_interval.is_zero() {
            return Err(anyhow::anyhow!("Refresh interval must be greater than zero"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn reads_primary_variable() {
        let config =
            ClientConfig::from_lookup(lookup(&[(GATEWAY_URL_ENV, "https://api.example.com/prod/")]))
                .unwrap();
        assert_eq!(config.gateway_url, "https://api.example.com/prod");
        assert_eq!(config.refresh_interval, Duration::from_secs(10));
    }

    #[test]
    fn falls_back_to_secondary_variable() {
        let config = ClientConfig::from_lookup(lookup(&[(
            GATEWAY_URL_ENV_FALLBACK,
            "http://localhost:4000",
        )]))
        .unwrap();
        assert_eq!(config.gateway_url, "http://localhost:4000");
    }

    #[test]
    fn missing_url_is_an_error() {
        let err = ClientConfig::from_lookup(lookup(&[])).unwrap_err();
        assert!(err.to_string().contains(GATEWAY_URL_ENV));
    }

    #[test]
    fn reads_gateway_url_from_process_env() {
        // Only test in this crate that touches the process environment.
        env::set_var(GATEWAY_URL_ENV, "https://gw.example.com/stage/");
        let config = ClientConfig::from_process_env().unwrap();
        env::remove_var(GATEWAY_URL_ENV);
        assert_eq!(config.gateway_url, "https://gw.example.com/stage");
    }

    #[test]
    fn rejects_non_http_url() {
        assert!(ClientConfig::from_lookup(lookup(&[(GATEWAY_URL_ENV, "ftp://x")])).is_err());
    }
}
