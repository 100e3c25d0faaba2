//! Typed configuration from environment variables.
//!
//! Loads once at startup and fails fast on malformed values. Every setting
//! is optional; command-line flags override what is read here.

use std::path::PathBuf;
use std::time::Duration;

use crate::engine::Deadline;
use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// `FLEET_TRUCK_TIMEOUT_MS`
    pub truck_timeout: Option<Duration>,
    /// `FLEET_BATCH_TIMEOUT_MS`
    pub batch_timeout: Option<Duration>,
    /// `FLEET_MANIFEST`
    pub manifest: Option<PathBuf>,
    pub otel_endpoint: Option<String>,
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// In local dev, call `dotenvy::dotenv().ok()` before this.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            truck_timeout: millis_var("FLEET_TRUCK_TIMEOUT_MS")?,
            batch_timeout: millis_var("FLEET_BATCH_TIMEOUT_MS")?,
            manifest: std::env::var("FLEET_MANIFEST").ok().map(PathBuf::from),
            otel_endpoint: std::env::var("OTEL_ENDPOINT").ok(),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    pub fn deadline(&self) -> Deadline {
        Deadline {
            per_truck: self.truck_timeout,
            batch: self.batch_timeout,
        }
    }
}

fn millis_var(name: &str) -> Result<Option<Duration>> {
    let Ok(raw) = std::env::var(name) else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(Error::Config(format!("{name} must be greater than zero"))),
        Ok(ms) => Ok(Some(Duration::from_millis(ms))),
        Err(e) => Err(Error::Config(format!("{name}={raw:?} is not a millisecond count: {e}"))),
    }
}
