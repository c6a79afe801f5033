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

use std::{collections::BTreeMap, sync::Mutex};

use eyre::{bail, Result};
use tracing::trace;

use super::{MemoryHandler, RegisterHandler};

/// Register writes keep the low 32 bits, matching the RV32 word size.
const REGISTER_MASK: u64 = u32::MAX as u64;

/// RV32 general-purpose register names in encoding order.
pub const REGISTER_NAMES: [&str; 32] = [
    "$0", "ra", "sp", "gp", "tp", "t0", "t1", "t2", "s0", "s1", "a0", "a1", "a2", "a3", "a4",
    "a5", "a6", "a7", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9", "s10", "s11", "t3", "t4",
    "t5", "t6",
];

/// One memory read observed by a [`SimulatedMachine`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemoryRead {
    /// Address of the read
    pub address: u64,
    /// Width of the read in bytes
    pub width: usize,
}

/// Minimal machine model: a register file plus sparse little-endian memory.
///
/// Only bytes written through [`SimulatedMachine::write_memory`] are mapped;
/// reads touching any other byte fail. Every read attempt is logged so
/// callers can check which operands were evaluated.
#[derive(Debug, Default)]
pub struct SimulatedMachine {
    registers: [u64; 32],
    pc: u64,
    memory: BTreeMap<u64, u8>,
    reads: Mutex<Vec<MemoryRead>>,
}

impl Clone for SimulatedMachine {
    fn clone(&self) -> Self {
        Self {
            registers: self.registers,
            pc: self.pc,
            memory: self.memory.clone(),
            reads: Mutex::new(self.memory_reads()),
        }
    }
}

impl SimulatedMachine {
    /// Create a machine with all registers zero and no mapped memory
    pub fn new() -> Self {
        Self::default()
    }

    fn register_index(name: &str) -> Option<usize> {
        match name {
            "zero" => Some(0),
            "fp" => Some(8),
            _ => REGISTER_NAMES.iter().position(|r| *r == name),
        }
    }

    /// Set a register by name, truncated to 32 bits; writes to `$0` are discarded
    pub fn set_register(&mut self, name: &str, value: u64) -> Result<()> {
        let value = value & REGISTER_MASK;
        if name == "pc" {
            self.pc = value;
            return Ok(());
        }
        match Self::register_index(name) {
            Some(0) => Ok(()),
            Some(index) => {
                self.registers[index] = value;
                Ok(())
            }
            None => bail!("Unknown register: {name}"),
        }
    }

    /// Builder-style variant of [`Self::set_register`]
    pub fn with_register(mut self, name: &str, value: u64) -> Result<Self> {
        self.set_register(name, value)?;
        Ok(self)
    }

    /// Program counter
    pub fn pc(&self) -> u64 {
        self.pc
    }

    /// Write the low `width` bytes of `value` at `address`, little-endian
    pub fn write_memory(&mut self, address: u64, width: usize, value: u64) -> Result<()> {
        if !(1..=8).contains(&width) {
            bail!("Unsupported access width: {width}");
        }
        trace!("writing at 0x{address:08x} len={width}, data=0x{value:x}");
        for offset in 0..width {
            let byte = (value >> (8 * offset)) as u8;
            self.memory.insert(address.wrapping_add(offset as u64), byte);
        }
        Ok(())
    }

    /// Builder-style variant of [`Self::write_memory`]
    pub fn with_memory(mut self, address: u64, width: usize, value: u64) -> Result<Self> {
        self.write_memory(address, width, value)?;
        Ok(self)
    }

    /// All memory reads issued so far, oldest first
    pub fn memory_reads(&self) -> Vec<MemoryRead> {
        if let Ok(reads) = self.reads.lock() {
            reads.clone()
        } else {
            vec![]
        }
    }

    /// Forget the read log
    pub fn clear_memory_reads(&self) {
        if let Ok(mut reads) = self.reads.lock() {
            reads.clear();
        }
    }
}

impl RegisterHandler for SimulatedMachine {
    fn register_value(&self, name: &str) -> Option<u64> {
        if name == "pc" {
            return Some(self.pc);
        }
        Self::register_index(name).map(|index| self.registers[index])
    }
}

impl MemoryHandler for SimulatedMachine {
    fn read_memory(&self, address: u64, width: usize) -> Option<u64> {
        trace!("reading at 0x{address:08x} len={width}");
        if let Ok(mut reads) = self.reads.lock() {
            reads.push(MemoryRead { address, width });
        }

        if !(1..=8).contains(&width) {
            return None;
        }
        (0..width).rev().try_fold(0u64, |acc, offset| {
            let byte = self.memory.get(&address.wrapping_add(offset as u64))?;
            Some((acc << 8) | u64::from(*byte))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_register_is_hardwired() {
        let mut machine = SimulatedMachine::new();
        machine.set_register("$0", 5).unwrap();
        machine.set_register("zero", 5).unwrap();
        assert_eq!(machine.register_value("$0"), Some(0));
    }

    #[test]
    fn test_register_aliases() {
        let machine = SimulatedMachine::new().with_register("fp", 7).unwrap();
        assert_eq!(machine.register_value("s0"), Some(7));
        assert!(machine.register_value("x5").is_none());
        assert!(SimulatedMachine::new().with_register("x5", 1).is_err());
    }

    #[test]
    fn test_little_endian_memory() {
        let machine = SimulatedMachine::new().with_memory(0x100, 4, 0x1234_5678).unwrap();
        assert_eq!(machine.read_memory(0x100, 4), Some(0x1234_5678));
        assert_eq!(machine.read_memory(0x100, 1), Some(0x78));
        assert_eq!(machine.read_memory(0x102, 2), Some(0x1234));
        assert_eq!(machine.read_memory(0x102, 4), None);
    }

    #[test]
    fn test_reads_are_logged() {
        let machine = SimulatedMachine::new();
        assert_eq!(machine.read_memory(0x40, 4), None);
        assert_eq!(machine.memory_reads(), vec![MemoryRead { address: 0x40, width: 4 }]);
        machine.clear_memory_reads();
        assert!(machine.memory_reads().is_empty());
    }

    #[test]
    fn test_registers_are_32_bits_wide() {
        let mut machine = SimulatedMachine::new().with_register("sp", 0x1_0000_0004).unwrap();
        assert_eq!(machine.register_value("sp"), Some(0x4));

        machine.set_register("pc", 0xffff_ffff_8000_0000).unwrap();
        assert_eq!(machine.pc(), 0x8000_0000);
    }
}
