//! Runtime configuration.
//!
//! Loaded from environment variables with defaults for everything.

use std::env;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CHANNEL_BUFFER: usize = 64;
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SystemConfig {
    /// Mailbox size of every actor (`SLOT_SALES_CHANNEL_BUFFER`, at least 1)
    pub channel_buffer: usize,
    /// Tracing filter directives (`RUST_LOG`)
    pub log_filter: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            channel_buffer: DEFAULT_CHANNEL_BUFFER,
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl SystemConfig {
    /// Load configuration from environment variables. Missing or unparsable
    /// values fall back to their defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            channel_buffer: lookup("SLOT_SALES_CHANNEL_BUFFER")
                .and_then(|s| s.trim().parse().ok())
                .filter(|size: &usize| *size >= 1)
                .unwrap_or(DEFAULT_CHANNEL_BUFFER),
            log_filter: lookup("RUST_LOG")
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        }
    }

    #[must_use]
    pub fn with_channel_buffer(mut self, channel_buffer: usize) -> Self {
        self.channel_buffer = channel_buffer.max(1);
        self
    }
}
