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

//! Handler traits through which the evaluator reads machine state.
//!
//! The evaluator never owns the simulated machine. It queries registers and
//! memory through these traits, so any simulator can plug in by implementing
//! them for its CPU state.
//!
//! # Handler Types
//!
//! - [`RegisterHandler`] - Resolves register values by name
//! - [`MemoryHandler`] - Reads words from the simulated address space
//! - [`Machine`] - Anything implementing both, blanket-implemented
//!
//! [`SimulatedMachine`] is a self-contained RV32 register file with sparse
//! memory, used by the CLI and by tests.

mod simulated;
pub use simulated::{MemoryRead, SimulatedMachine, REGISTER_NAMES};

/// Handler trait for register value resolution.
pub trait RegisterHandler {
    /// Get the value of a register by name.
    ///
    /// # Arguments
    /// * `name` - The register name without the leading `$` (e.g. `sp`, `$0`)
    ///
    /// # Returns
    /// The register value, or `None` if the machine has no such register
    fn register_value(&self, name: &str) -> Option<u64>;
}

/// Handler trait for memory reads.
pub trait MemoryHandler {
    /// Read `width` bytes starting at `address`, zero-extended.
    ///
    /// # Returns
    /// The value read, or `None` if the range is not readable
    fn read_memory(&self, address: u64, width: usize) -> Option<u64>;
}

/// Full view of machine state consumed by the evaluator.
pub trait Machine: RegisterHandler + MemoryHandler {}

impl<T: RegisterHandler + MemoryHandler + ?Sized> Machine for T {}

impl<T: RegisterHandler + ?Sized> RegisterHandler for &T {
    fn register_value(&self, name: &str) -> Option<u64> {
        (**self).register_value(name)
    }
}

impl<T: MemoryHandler + ?Sized> MemoryHandler for &T {
    fn read_memory(&self, address: u64, width: usize) -> Option<u64> {
        (**self).read_memory(address, width)
    }
}
