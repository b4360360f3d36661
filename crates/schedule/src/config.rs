//! # Scheduling Configuration Module
//!
//! Loads configuration for the scheduling service from environment variables,
//! with defaults where appropriate.
//!
//! ## Environment Variables
//!
//! - `NEXUS_TIMEZONE`: IANA zone used when a request carries none (default: "UTC")
//! - `NEXUS_MAX_RANGE_DAYS`: longest recurring range accepted, in days (default: 366)
//! - `LOG_LEVEL`: Logging level (default: "info")

use std::env;

use chrono_tz::Tz;
use eyre::{eyre, Result, WrapErr};
use nexus_core::materializer::{GenerationLimits, DEFAULT_MAX_RANGE_DAYS};
use tracing::Level;

/// Configuration for the scheduling service
///
/// # Example
///
/// ```
/// use eyre::Result;
/// use nexus_schedule::config::SchedulingConfig;
///
/// fn example() -> Result<()> {
///     let config = SchedulingConfig::from_env()?;
///     println!("Interpreting wall-clock times in {}", config.timezone);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulingConfig {
    /// Timezone for requests that do not name one
    pub timezone: Tz,

    /// Upper bound on the inclusive length of a recurring range
    pub max_range_days: u32,

    /// Log level for the application
    pub log_level: Level,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            max_range_days: DEFAULT_MAX_RANGE_DAYS,
            log_level: Level::INFO,
        }
    }
}

impl SchedulingConfig {
    /// Loads a `.env` file if one exists, then reads the environment.
    pub fn load() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_env()
    }

    /// Creates a new SchedulingConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - `NEXUS_TIMEZONE` is not a known IANA zone name
    /// - `NEXUS_MAX_RANGE_DAYS` is not a positive integer
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        // Timezone settings
        let timezone = match lookup("NEXUS_TIMEZONE") {
            Some(raw) => raw
                .trim()
                .parse::<Tz>()
                .map_err(|e| eyre!("Invalid NEXUS_TIMEZONE value '{}': {}", raw, e))?,
            None => Tz::UTC,
        };

        // Generation bounds
        let max_range_days = lookup("NEXUS_MAX_RANGE_DAYS")
            .unwrap_or_else(|| DEFAULT_MAX_RANGE_DAYS.to_string())
            .trim()
            .parse::<u32>()
            .wrap_err("Invalid NEXUS_MAX_RANGE_DAYS value")?;
        if max_range_days == 0 {
            return Err(eyre!("NEXUS_MAX_RANGE_DAYS must be at least 1"));
        }

        // Logging settings
        let log_level = match lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()).as_str() {
            "trace" => Level::TRACE,
            "debug" => Level::DEBUG,
            "info" => Level::INFO,
            "warn" => Level::WARN,
            "error" => Level::ERROR,
            _ => Level::INFO,
        };

        Ok(Self {
            timezone,
            max_range_days,
            log_level,
        })
    }

    pub fn generation_limits(&self) -> GenerationLimits {
        GenerationLimits {
            max_range_days: self.max_range_days,
            default_timezone: self.timezone,
        }
    }
}
