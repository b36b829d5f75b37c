/*
 *  Copyright 2025 Telepost Contributors
 *
 *  Licensed under the Apache License, Version 2.0 (the "License");
 *  you may not use this file except in compliance with the License.
 *  You may obtain a copy of the License at
 *
 *      http://www.apache.org/licenses/LICENSE-2.0
 *
 *  Unless required by applicable law or agreed to in writing, software
 *  distributed under the License is distributed on an "AS IS" BASIS,
 *  WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 *  See the License for the specific language governing permissions and
 *  limitations under the License.
 */

//! Runtime configuration from the environment.
//!
//! Reads a `.env` file when one exists, then the process environment. Every
//! knob has a default; only a malformed value is an error.

use std::time::Duration;

use chrono_tz::Tz;
use thiserror::Error;

use crate::retry::RetryPolicy;
use crate::scheduler::SchedulerConfig;

const DEFAULT_DATABASE_PATH: &str = "telepost.db";
const DEFAULT_POOL_SIZE: usize = 5;
const DEFAULT_POLL_INTERVAL_SECS: u64 = 60;
const DEFAULT_TIMEZONE: &str = "Europe/Moscow";

/// A configuration variable that was present but unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Everything needed to assemble the service.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path of the SQLite database file.
    pub database_path: String,
    /// Connection pool size.
    pub pool_size: usize,
    /// Scheduler poll interval.
    pub poll_interval: Duration,
    /// The fixed operating timezone.
    pub timezone: Tz,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_path: DEFAULT_DATABASE_PATH.to_string(),
            pool_size: DEFAULT_POOL_SIZE,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            timezone: chrono_tz::Europe::Moscow,
        }
    }
}

impl AppConfig {
    /// Load configuration from `.env` (if present) and the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(path) = std::env::var("TELEPOST_DATABASE_PATH") {
            config.database_path = path;
        }
        if let Ok(raw) = std::env::var("TELEPOST_POOL_SIZE") {
            config.pool_size = raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "TELEPOST_POOL_SIZE",
                value: raw,
            })?;
        }
        if let Ok(raw) = std::env::var("TELEPOST_POLL_INTERVAL_SECS") {
            let secs: u64 = raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "TELEPOST_POLL_INTERVAL_SECS",
                value: raw,
            })?;
            config.poll_interval = Duration::from_secs(secs);
        }
        if let Ok(raw) = std::env::var("TELEPOST_TIMEZONE") {
            config.timezone = raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "TELEPOST_TIMEZONE",
                value: raw,
            })?;
        }

        Ok(config)
    }

    /// The scheduler's slice of this configuration.
    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            poll_interval: self.poll_interval,
            timezone: self.timezone,
            retry: RetryPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_fixed_operating_timezone() {
        let config = AppConfig::default();
        assert_eq!(config.timezone.name(), DEFAULT_TIMEZONE);
        assert_eq!(config.poll_interval, Duration::from_secs(60));
    }
}
