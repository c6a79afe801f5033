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

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// One retired instruction recorded in the instruction ring buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraceEntry {
    /// Address the instruction was fetched from.
    pub address: u64,
    /// Raw instruction encoding.
    pub instruction: u32,
}

impl TraceEntry {
    /// Creates a new trace entry.
    pub fn new(address: u64, instruction: u32) -> Self {
        Self { address, instruction }
    }
}

impl Display for TraceEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{:08x}: 0x{:08x}", self.address, self.instruction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_to_eight_digits() {
        let entry = TraceEntry::new(0x8000_0000, 0x13);
        assert_eq!(entry.to_string(), "0x80000000: 0x00000013");
    }
}
