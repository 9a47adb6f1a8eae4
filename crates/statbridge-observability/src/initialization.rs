// Copyright (C) 2026  statbridge contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.
//! Logging initialization.
//!
//! Builds a `tracing-subscriber` registry with an environment filter and
//! the configured output layer, then installs it as the global default.

use crate::config::{LogConfig, LogError, LogFormat};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

/// Initialize tracing with the given format and optional level filter.
///
/// Logs are written to stderr. If `level` is `None` the `RUST_LOG`
/// environment variable is consulted, defaulting to `info`.
pub fn init_tracing(format: LogFormat, level: Option<&str>) -> Result<(), LogError> {
    let mut config = LogConfig::new().with_format(format);
    if let Some(level) = level {
        config = config.with_level(level);
    }
    init_tracing_with_config(config)
}

/// Initialize tracing from a full [`LogConfig`].
pub fn init_tracing_with_config(config: LogConfig) -> Result<(), LogError> {
    let env_filter = build_env_filter(&config)?;
    let registry = Registry::default().with(env_filter);

    match config.format {
        LogFormat::Pretty => {
            registry
                .with(fmt::layer().with_writer(std::io::stderr).pretty())
                .init();
        }
        LogFormat::Compact => {
            registry
                .with(fmt::layer().with_writer(std::io::stderr).compact())
                .init();
        }
        LogFormat::Json => {
            registry
                .with(fmt::layer().with_writer(std::io::stderr).json())
                .init();
        }
    }

    Ok(())
}

fn build_env_filter(config: &LogConfig) -> Result<EnvFilter, LogError> {
    let level = config.effective_level();
    EnvFilter::try_new(&level)
        .map_err(|e| LogError::InvalidFilter(format!("{}: {}", level, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Installing the global subscriber is a once-per-process operation, so
    // only the filter construction is tested here.

    #[test]
    fn test_env_filter_parsing() {
        assert!(build_env_filter(&LogConfig::new().with_level("debug")).is_ok());
        assert!(build_env_filter(&LogConfig::new().with_level("statbridge=trace")).is_ok());
    }

    #[test]
    fn test_env_filter_rejects_garbage() {
        let result = build_env_filter(&LogConfig::new().with_level("no=such=level"));
        assert!(result.is_err());
    }
}
