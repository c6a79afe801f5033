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

//! Configuration management for SDB
//!
//! The configuration lives in `~/.sdb.toml` unless a path is given explicitly.
//! Every field has a default, so a partial file only overrides what it names.

use eyre::{Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SdbConfig {
    /// Expression evaluation settings
    pub expr: ExprConfig,
    /// Watchpoint pool settings
    pub watchpoint: WatchpointConfig,
    /// Instruction trace settings
    pub trace: TraceConfig,
}

/// Expression evaluation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExprConfig {
    /// Maximum number of tokens a single expression may produce
    pub max_tokens: usize,
    /// Fail on unresolvable register names instead of reading them as zero
    pub strict_registers: bool,
}

/// Watchpoint pool configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchpointConfig {
    /// Number of watchpoint slots
    pub capacity: usize,
}

/// Instruction trace configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraceConfig {
    /// Number of entries kept in the instruction ring buffer
    pub iringbuf_size: usize,
}

impl Default for ExprConfig {
    fn default() -> Self {
        Self { max_tokens: 32, strict_registers: false }
    }
}

impl Default for WatchpointConfig {
    fn default() -> Self {
        Self { capacity: 32 }
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self { iringbuf_size: 16 }
    }
}

impl SdbConfig {
    /// Get the default configuration file path
    pub fn config_path() -> Result<PathBuf> {
        let home =
            dirs::home_dir().ok_or_else(|| eyre::eyre!("Unable to determine home directory"))?;
        Ok(home.join(".sdb.toml"))
    }

    /// Load configuration from the default path, or defaults if the file does not exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            debug!("Config file not found at {:?}, using defaults", config_path);
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read config file: {path:?}"))?;

        let config: Self =
            toml::from_str(&content).wrap_err("Failed to parse config file as TOML")?;
        config.validate()?;

        debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).wrap_err("Failed to serialize config to TOML")?;

        fs::write(path, content)
            .wrap_err_with(|| format!("Failed to write config file: {path:?}"))?;

        debug!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Reject sizes that would make the engine unusable
    pub fn validate(&self) -> Result<()> {
        if self.expr.max_tokens == 0 {
            eyre::bail!("expr.max_tokens must be at least 1");
        }
        if self.watchpoint.capacity == 0 {
            eyre::bail!("watchpoint.capacity must be at least 1");
        }
        if self.trace.iringbuf_size == 0 {
            eyre::bail!("trace.iringbuf_size must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let config = SdbConfig::default();
        assert_eq!(config.expr.max_tokens, 32);
        assert!(!config.expr.strict_registers);
        assert_eq!(config.watchpoint.capacity, 32);
        assert_eq!(config.trace.iringbuf_size, 16);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: SdbConfig = toml::from_str("[watchpoint]\ncapacity = 4\n").unwrap();
        assert_eq!(config.watchpoint.capacity, 4);
        assert_eq!(config.expr, ExprConfig::default());
        assert_eq!(config.trace, TraceConfig::default());
    }

    #[test]
    fn test_validate_rejects_zero_sizes() {
        let mut config = SdbConfig::default();
        config.trace.iringbuf_size = 0;
        assert!(config.validate().is_err());
    }
}
