use {
    crate::fee::DEFAULT_SURCHARGE_BPS,
    std::{collections::HashMap, env, time::Duration},
};

/// Client configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    /// Backend base URL, no trailing slash required
    pub api_base: String,
    pub http_timeout: Duration,
    /// GET retries after the first attempt
    pub retry_max: u32,
    pub retry_initial: Duration,
    pub retry_max_delay: Duration,
    /// Surcharge applied to new invoices and payrolls
    pub surcharge_bps: u32,
    /// Capacity of the platform event channel, at least 1
    pub event_buffer: usize,
    /// Log filter handed to [`crate::init_logging`]
    pub rust_log: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `PAYMINT_API_BASE` (default: http://localhost:5000)
    /// - `PAYMINT_HTTP_TIMEOUT_SECS` (default: 10)
    /// - `PAYMINT_RETRY_MAX` (default: 3)
    /// - `PAYMINT_RETRY_INITIAL_MS` (default: 250)
    /// - `PAYMINT_RETRY_MAX_MS` (default: 4000)
    /// - `PAYMINT_SURCHARGE_BPS` (default: 250)
    /// - `PAYMINT_EVENT_BUFFER` (default: 256, zero falls back to the default)
    /// - `RUST_LOG` (default: info)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] but reads from a map
    pub fn from_map(vars: &HashMap<String, String>) -> Self {
        Self::from_lookup(|key| vars.get(key).cloned())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse_u64 = |key: &str, default: u64| -> u64 {
            lookup(key)
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(default)
        };

        let api_base = lookup("PAYMINT_API_BASE")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "http://localhost:5000".to_string());

        Self {
            api_base,
            http_timeout: Duration::from_secs(parse_u64("PAYMINT_HTTP_TIMEOUT_SECS", 10)),
            retry_max: parse_u64("PAYMINT_RETRY_MAX", 3) as u32,
            retry_initial: Duration::from_millis(parse_u64("PAYMINT_RETRY_INITIAL_MS", 250)),
            retry_max_delay: Duration::from_millis(parse_u64("PAYMINT_RETRY_MAX_MS", 4_000)),
            surcharge_bps: parse_u64("PAYMINT_SURCHARGE_BPS", DEFAULT_SURCHARGE_BPS as u64) as u32,
            // a bounded channel needs room for at least one event
            event_buffer: Some(parse_u64("PAYMINT_EVENT_BUFFER", 256))
                .filter(|n| *n > 0)
                .unwrap_or(256) as usize,
            rust_log: lookup("RUST_LOG").filter(|s| !s.trim().is_empty()),
        }
    }
}
