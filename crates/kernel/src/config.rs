//! Configuration loaded from environment variables.

use std::env;

use anyhow::{Result, anyhow};

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Tracing filter used when `RUST_LOG` is unset (default: "info").
    pub log_filter: String,

    /// Pretty-print JSON output (default: true).
    pub pretty_json: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_filter: "info".to_string(),
            pretty_json: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();

        let log_filter = lookup("NOVARCH_LOG")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(defaults.log_filter);

        let pretty_json = match lookup("NOVARCH_PRETTY_JSON") {
            Some(v) => parse_bool(&v)
                .ok_or_else(|| anyhow!("NOVARCH_PRETTY_JSON must be a boolean, got {v:?}"))?,
            None => defaults.pretty_json,
        };

        Ok(Self {
            log_filter,
            pretty_json,
        })
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
