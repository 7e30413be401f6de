use std::time::Duration;

use anyhow::{Context, Result};
use api::AlreadyCheckedInSignal;
use chrono::FixedOffset;

const DEFAULT_DISPLAY_OFFSET: &str = "+07:00";
const DEFAULT_SETTLE_MS: u64 = 1500;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub api_base_url: String,
    pub already_checked_in: AlreadyCheckedInSignal,
    pub settle_delay: Duration,
    pub display_offset: FixedOffset,
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let already_checked_in = match lookup("ALREADY_CHECKED_IN_SIGNAL") {
            Some(raw) => raw
                .parse::<AlreadyCheckedInSignal>()
                .map_err(anyhow::Error::msg)
                .context("Invalid ALREADY_CHECKED_IN_SIGNAL")?,
            None => AlreadyCheckedInSignal::default(),
        };

        let settle_ms = match lookup("SCAN_SETTLE_MS") {
            Some(raw) => raw.parse::<u64>().context("SCAN_SETTLE_MS must be a number")?,
            None => DEFAULT_SETTLE_MS,
        };

        let timeout_secs = match lookup("REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().context("REQUEST_TIMEOUT_SECS must be a number")?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        Ok(Self {
            host: lookup("HOST").context("Cannot load HOST env variable")?,
            port: lookup("PORT")
                .context("Cannot load PORT env variable")?
                .parse::<u16>()
                .context("PORT must be a number")?,
            api_base_url: lookup("API_BASE_URL").context("Cannot load API_BASE_URL env variable")?,
            already_checked_in,
            settle_delay: Duration::from_millis(settle_ms),
            display_offset: lookup("DISPLAY_UTC_OFFSET")
                .unwrap_or_else(|| DEFAULT_DISPLAY_OFFSET.to_string())
                .parse::<FixedOffset>()
                .context("DISPLAY_UTC_OFFSET must look like +07:00")?,
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
