// SDB - Simulator Debugger
// Copyright (C) 2024 Zhuo Zhang and Wuqi Zhang
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Logging configuration for SDB components
//!
//! Provides centralized logging setup with:
//! - Structured console output on stderr, so command results on stdout stay clean
//! - Optional file logging to a temporary directory
//! - Environment variable support (RUST_LOG)
//! - A quiet default level so the debugger console is not flooded

use eyre::Result;
use std::{env, fs, path::PathBuf, sync::Once};
use tracing::Level;
use tracing_appender::{non_blocking, rolling};
use tracing_subscriber::{
    fmt::{self, format::FmtSpan, time::LocalTime},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer,
};

/// Default directive when `RUST_LOG` is not set.
const DEFAULT_DIRECTIVE: &str = "warn";

/// Initialize logging for an SDB component
///
/// This function sets up:
/// - A console layer on stderr with timestamps and targets
/// - File logging to `$TMP/sdb-logs/<component>` with daily rotation (optional)
/// - Environment variable support for log levels (RUST_LOG)
///
/// # Arguments
/// * `component_name` - Name of the component (e.g., "sdb")
/// * `enable_file_logging` - Whether to also write a log file
///
/// # Examples
/// ```rust,ignore
/// use sdb_common::logging;
///
/// fn main() -> eyre::Result<()> {
///     logging::init_logging("sdb", false)?;
///     tracing::info!("Application started");
///     Ok(())
/// }
/// ```
pub fn init_logging(component_name: &str, enable_file_logging: bool) -> Result<()> {
    let env_filter = default_env_filter(DEFAULT_DIRECTIVE)?;

    let console_layer = fmt::layer()
        .with_target(true)
        .with_timer(LocalTime::rfc_3339())
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .compact();

    if enable_file_logging {
        let log_dir = create_log_directory(component_name)?;

        let file_appender = rolling::daily(&log_dir, format!("{component_name}.log"));
        let (non_blocking_appender, guard) = non_blocking(file_appender);

        // The guard flushes on drop; the process owns the file layer until exit.
        std::mem::forget(guard);

        let file_layer = fmt::layer()
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(FmtSpan::CLOSE)
            .with_timer(LocalTime::rfc_3339())
            .with_ansi(false)
            .with_writer(non_blocking_appender);

        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .with(file_layer.with_filter(filter_for_file()))
            .try_init()
            .map_err(|e| eyre::eyre!("Failed to initialize tracing subscriber: {e}"))?;

        tracing::debug!(
            component = component_name,
            log_dir = %log_dir.display(),
            "Logging initialized with console and file output"
        );
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(console_layer)
            .try_init()
            .map_err(|e| eyre::eyre!("Failed to initialize tracing subscriber: {e}"))?;

        tracing::debug!(component = component_name, "Logging initialized with console output only");
    }

    log_environment_info(component_name);

    Ok(())
}

fn default_env_filter(default_directive: &str) -> Result<EnvFilter> {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))
        .map_err(|e| eyre::eyre!("Failed to create environment filter: {e}"))
}

/// Create log directory in system temp folder
fn create_log_directory(component_name: &str) -> Result<PathBuf> {
    let log_dir = env::temp_dir().join("sdb-logs").join(component_name);
    fs::create_dir_all(&log_dir)?;
    Ok(log_dir)
}

/// Filter for file output - evaluator tracing is only useful on disk
fn filter_for_file() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
}

fn log_environment_info(component_name: &str) {
    let rust_log = env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_DIRECTIVE.to_string());
    let args: Vec<String> = env::args().collect();

    tracing::debug!(
        component = component_name,
        rust_log = %rust_log,
        args = ?args,
        "Environment information"
    );
}

/// Initialize simple logging (console only, no fancy formatting)
///
/// # Arguments
/// * `level` - The default log level to use
pub fn init_simple_logging(level: Level) -> Result<()> {
    let env_filter = default_env_filter(level.as_str())?;

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_test_writer()
        .compact()
        .try_init()
        .map_err(|e| eyre::eyre!("Failed to initialize simple logging: {e}"))?;

    Ok(())
}

// Global test logging initialization - ensures logging is only set up once across all tests
static TEST_LOGGING_INIT: Once = Once::new();

/// Safe logging initialization for tests - can be called multiple times without crashing
///
/// Console-only, INFO by default, respects RUST_LOG. Idempotent.
///
/// # Usage
/// ```rust,ignore
/// use sdb_common::logging;
///
/// #[test]
/// fn my_test() {
///     logging::ensure_test_logging(None);
///     tracing::info!("This will work safely in any test!");
/// }
/// ```
pub fn ensure_test_logging(default_level: Option<Level>) {
    TEST_LOGGING_INIT.call_once(|| {
        let default_level = default_level.unwrap_or(Level::INFO);
        // A subscriber may already be installed by another harness; that is fine.
        let _ = init_simple_logging(default_level);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::{debug, error, info, warn};

    #[test]
    fn test_logging_functions_work() {
        ensure_test_logging(None);

        info!("Test info message");
        warn!("Test warning message");
        debug!("Test debug message");
        error!("Test error message");
    }

    #[test]
    fn test_log_directory_creation() {
        let log_dir = create_log_directory("test-component").unwrap();
        assert!(log_dir.exists());
        assert!(log_dir.to_string_lossy().contains("sdb-logs"));
        assert!(log_dir.to_string_lossy().contains("test-component"));
    }

    #[test]
    fn test_default_env_filter() {
        let filter = default_env_filter("warn").unwrap();
        assert!(!filter.to_string().is_empty());
        assert!(!filter_for_file().to_string().is_empty());
    }

    #[test]
    fn test_repeated_initialization_does_not_panic() {
        ensure_test_logging(None);

        // A subscriber is already installed, so both attempts must fail gracefully.
        assert!(init_logging("test-sdb-1", false).is_err());
        assert!(init_simple_logging(Level::DEBUG).is_err());

        info!("Logging still works after repeated initialization");
    }
}
