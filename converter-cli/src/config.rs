//! Configuration loading from environment.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;

use converter_client::{ClientConfig, DEFAULT_BASE_URL};
use converter_core::OrchestratorConfig;

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub api_url: String,
    pub request_timeout: Duration,
    pub debounce: Duration,
    pub refresh_interval: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let api_url = lookup("CONVERTER_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let debounce_ms: u64 = parse_var(&lookup, "CONVERTER_DEBOUNCE_MS", 500)?;
        let refresh_secs: u64 = parse_var(&lookup, "CONVERTER_REFRESH_SECS", 10)?;
        let timeout_secs: u64 = parse_var(&lookup, "CONVERTER_REQUEST_TIMEOUT_SECS", 15)?;

        if refresh_secs == 0 {
            anyhow::bail!("CONVERTER_REFRESH_SECS must be greater than zero");
        }
        if timeout_secs == 0 {
            anyhow::bail!("CONVERTER_REQUEST_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Self {
            api_url,
            request_timeout: Duration::from_secs(timeout_secs),
            debounce: Duration::from_millis(debounce_ms),
            refresh_interval: Duration::from_secs(refresh_secs),
        })
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::new(&self.api_url).with_timeout(self.request_timeout)
    }

    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            debounce: self.debounce,
            refresh_interval: self.refresh_interval,
            ..OrchestratorConfig::default()
        }
    }
}

fn parse_var<T>(lookup: impl Fn(&str) -> Option<String>, key: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", key, raw)),
    }
}
