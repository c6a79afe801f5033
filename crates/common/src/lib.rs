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

//! SDB Common - Shared functionality for SDB components
//!
//! This crate provides shared utilities used by both the `sdb` binary
//! and the engine crate, including logging setup and configuration.

/// Serializable records shared across SDB crates, such as watchpoint listings and trace entries
pub mod types;

/// Configuration file loading and defaults for the evaluator, watchpoint pool and trace buffer
pub mod config;
/// Expression text helpers
pub mod expression;
/// Logging setup and utilities for consistent logging across SDB components
pub mod logging;

pub use config::*;
pub use expression::*;
pub use logging::*;
