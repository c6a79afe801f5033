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

//! Machine setup helpers shared by the subcommands.

use eyre::{eyre, Result};
use sdb_common::parse_word;
use sdb_engine::eval::{handlers::SimulatedMachine, DEREF_WIDTH};

/// Parse `NAME=VALUE`, accepting an optional leading `$` on the name
pub fn parse_register_assignment(arg: &str) -> Result<(String, u64), String> {
    let (name, value) =
        arg.split_once('=').ok_or_else(|| format!("expected NAME=VALUE, got `{arg}`"))?;
    let name = name.trim().trim_start_matches('$');
    if name.is_empty() {
        return Err(format!("missing register name in `{arg}`"));
    }
    let value = parse_word(value.trim()).ok_or_else(|| format!("invalid value in `{arg}`"))?;
    Ok((name.to_string(), value))
}

/// Parse `ADDR=VALUE`
pub fn parse_memory_assignment(arg: &str) -> Result<(u64, u64), String> {
    let (address, value) =
        arg.split_once('=').ok_or_else(|| format!("expected ADDR=VALUE, got `{arg}`"))?;
    let address =
        parse_word(address.trim()).ok_or_else(|| format!("invalid address in `{arg}`"))?;
    let value = parse_word(value.trim()).ok_or_else(|| format!("invalid value in `{arg}`"))?;
    Ok((address, value))
}

/// Build the initial machine from `--reg` and `--mem` arguments
pub fn build_machine(registers: &[(String, u64)], memory: &[(u64, u64)]) -> Result<SimulatedMachine> {
    let mut machine = SimulatedMachine::new();
    for (name, value) in registers {
        machine.set_register(name, *value)?;
    }
    for (address, value) in memory {
        write_word(&mut machine, *address, *value)?;
    }
    Ok(machine)
}

/// Write a word of the width `*` reads
pub fn write_word(machine: &mut SimulatedMachine, address: u64, value: u64) -> Result<()> {
    machine
        .write_memory(address, DEREF_WIDTH, value)
        .map_err(|e| eyre!("Failed to write memory at 0x{address:08x}: {e}"))
}
