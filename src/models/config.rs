//! Runtime configuration for DomaVault
//!
//! Values come from the environment with defaults from `utils::constants`.

use std::time::Duration;
use tracing::info;

use crate::models::errors::{AppError, AppResult};
use crate::utils::constants::{
    DEFAULT_BATCH_CONCURRENCY, DEFAULT_DOMA_ENDPOINT, DEFAULT_DOMA_TIMEOUT_SECS,
    DEFAULT_ETH_USD_PRICE, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_RATE_LIMIT_MAX_REQUESTS,
    DEFAULT_RATE_LIMIT_WINDOW_MS,
};

/// Doma registry connection settings
#[derive(Debug, Clone)]
pub struct DomaConfig {
    /// GraphQL endpoint URL
    pub endpoint: String,
    /// Server-side API key, used when the client supplies none
    pub api_key: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl Default for DomaConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_DOMA_ENDPOINT.to_string(),
            api_key: None,
            timeout: Duration::from_secs(DEFAULT_DOMA_TIMEOUT_SECS),
        }
    }
}

/// Fixed-window rate limit settings
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Requests per window
    pub requests_per_window: u32,
    /// Window duration
    pub window_duration: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_window: DEFAULT_RATE_LIMIT_MAX_REQUESTS,
            window_duration: Duration::from_millis(DEFAULT_RATE_LIMIT_WINDOW_MS),
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub doma: DomaConfig,
    pub rate_limit: RateLimitConfig,
    /// ETH/USD price used to value collateral with sale history
    pub eth_usd_price: f64,
    /// Analyses run at once by batch and compare
    pub batch_concurrency: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            doma: DomaConfig::default(),
            rate_limit: RateLimitConfig::default(),
            eth_usd_price: DEFAULT_ETH_USD_PRICE,
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
        }
    }
}

impl AppConfig {
    /// Load configuration from process environment
    pub fn from_env() -> AppResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Empty values are treated as unset. Numeric values that fail to parse
    /// are rejected rather than silently defaulted.
    pub fn from_lookup<F>(lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        // Hosting platforms set PORT, DOMAVAULT_PORT is for local dev
        let port = match get("PORT").or_else(|| get("DOMAVAULT_PORT")) {
            Some(raw) => parse_value("PORT", &raw)?,
            None => defaults.port,
        };

        let api_key = get("DOMA_API_KEY");
        if api_key.is_some() {
            info!("🔑 DOMA_API_KEY configured (key hidden)");
        }

        let timeout_secs: u64 = match get("DOMA_TIMEOUT_SECS") {
            Some(raw) => parse_value("DOMA_TIMEOUT_SECS", &raw)?,
            None => DEFAULT_DOMA_TIMEOUT_SECS,
        };

        let eth_usd_price: f64 = match get("ETH_USD_PRICE") {
            Some(raw) => {
                let price: f64 = parse_value("ETH_USD_PRICE", &raw)?;
                if !price.is_finite() || price <= 0.0 {
                    return Err(AppError::invalid_config("ETH_USD_PRICE", &raw));
                }
                price
            }
            None => defaults.eth_usd_price,
        };

        let window_ms: u64 = match get("RATE_LIMIT_WINDOW_MS") {
            Some(raw) => parse_value("RATE_LIMIT_WINDOW_MS", &raw)?,
            None => DEFAULT_RATE_LIMIT_WINDOW_MS,
        };

        let max_requests: u32 = match get("RATE_LIMIT_MAX_REQUESTS") {
            Some(raw) => parse_value("RATE_LIMIT_MAX_REQUESTS", &raw)?,
            None => DEFAULT_RATE_LIMIT_MAX_REQUESTS,
        };

        let batch_concurrency: usize = match get("BATCH_CONCURRENCY") {
            Some(raw) => parse_value("BATCH_CONCURRENCY", &raw)?,
            None => DEFAULT_BATCH_CONCURRENCY,
        };

        Ok(Self {
            host: get("DOMAVAULT_HOST").unwrap_or(defaults.host),
            port,
            doma: DomaConfig {
                endpoint: get("DOMA_API_ENDPOINT").unwrap_or(defaults.doma.endpoint),
                api_key,
                timeout: Duration::from_secs(timeout_secs),
            },
            rate_limit: RateLimitConfig {
                requests_per_window: max_requests,
                window_duration: Duration::from_millis(window_ms),
            },
            eth_usd_price,
            batch_concurrency: batch_concurrency.max(1),
        })
    }

    /// `host:port` string for binding
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, raw: &str) -> AppResult<T> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::invalid_config(key, raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::errors::ErrorCode;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_env_empty() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.doma.endpoint, DEFAULT_DOMA_ENDPOINT);
        assert!(config.doma.api_key.is_none());
        assert_eq!(config.rate_limit.requests_per_window, 30);
        assert_eq!(config.rate_limit.window_duration, Duration::from_secs(60));
        assert_eq!(config.eth_usd_price, 2800.0);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("DOMAVAULT_PORT", "8088"),
            ("DOMA_API_ENDPOINT", "http://localhost:9999/graphql"),
            ("DOMA_API_KEY", "secret"),
            ("ETH_USD_PRICE", "3100.5"),
            ("RATE_LIMIT_MAX_REQUESTS", "5"),
            ("RATE_LIMIT_WINDOW_MS", "1000"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8088);
        assert_eq!(config.doma.endpoint, "http://localhost:9999/graphql");
        assert_eq!(config.doma.api_key.as_deref(), Some("secret"));
        assert_eq!(config.eth_usd_price, 3100.5);
        assert_eq!(config.rate_limit.requests_per_window, 5);
        assert_eq!(config.rate_limit.window_duration, Duration::from_secs(1));
    }

    #[test]
    fn test_port_prefers_platform_variable() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("PORT", "4000"), ("DOMAVAULT_PORT", "5000")]))
                .unwrap();
        assert_eq!(config.port, 4000);
    }

    #[test]
    fn test_invalid_numbers_rejected() {
        let err = AppConfig::from_lookup(lookup_from(&[("RATE_LIMIT_MAX_REQUESTS", "lots")]))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigInvalidValue);

        let err = AppConfig::from_lookup(lookup_from(&[("ETH_USD_PRICE", "-1")])).unwrap_err();
        assert_eq!(err.code, ErrorCode::ConfigInvalidValue);
    }

    #[test]
    fn test_blank_key_is_unset() {
        let config = AppConfig::from_lookup(lookup_from(&[("DOMA_API_KEY", "  ")])).unwrap();
        assert!(config.doma.api_key.is_none());
    }
}
