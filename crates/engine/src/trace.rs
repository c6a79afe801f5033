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

//! Ring buffer of recently retired instructions.

use sdb_common::types::TraceEntry;
use tracing::warn;

/// Fixed-size circular log of retired instructions.
///
/// `current` points at the most recently written slot and is `None` until the
/// first instruction is recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstructionTrace {
    entries: Vec<TraceEntry>,
    current: Option<usize>,
    recorded: usize,
}

impl InstructionTrace {
    /// Create a trace holding the last `size` instructions.
    ///
    /// A zero size is raised to one slot.
    pub fn new(size: usize) -> Self {
        let size = if size == 0 {
            warn!("instruction trace size 0 is invalid, using 1");
            1
        } else {
            size
        };
        Self { entries: vec![TraceEntry::default(); size], current: None, recorded: 0 }
    }

    /// Number of slots.
    pub fn size(&self) -> usize {
        self.entries.len()
    }

    /// Index of the most recent entry.
    pub fn current(&self) -> Option<usize> {
        self.current
    }

    /// Record a retired instruction, overwriting the oldest slot once full.
    pub fn record(&mut self, address: u64, instruction: u32) {
        let next = self.current.map_or(0, |c| (c + 1) % self.entries.len());
        self.entries[next] = TraceEntry::new(address, instruction);
        self.current = Some(next);
        self.recorded += 1;
    }

    /// Reset every slot and the cursor.
    pub fn clear(&mut self) {
        self.entries.iter_mut().for_each(|e| *e = TraceEntry::default());
        self.current = None;
        self.recorded = 0;
    }

    /// Raw slots in storage order.
    pub fn entries(&self) -> &[TraceEntry] {
        &self.entries
    }

    /// Recorded instructions, oldest first.
    pub fn recent(&self) -> Vec<TraceEntry> {
        let Some(current) = self.current else {
            return Vec::new();
        };
        let size = self.entries.len();
        let count = self.recorded.min(size);
        (0..count).map(|back| self.entries[(current + size - back) % size]).rev().collect()
    }

    /// Render every slot, marking the most recent one with `=>`.
    pub fn display(&self) -> String {
        let mut out = String::from("Recently executed instructions:");
        for (i, entry) in self.entries.iter().enumerate() {
            let prefix = if Some(i) == self.current { "=> " } else { "   " };
            out.push('\n');
            out.push_str(prefix);
            out.push_str(&entry.to_string());
        }
        out
    }
}

impl Default for InstructionTrace {
    fn default() -> Self {
        Self::new(sdb_common::TraceConfig::default().iringbuf_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_trace() {
        let trace = InstructionTrace::new(4);
        assert_eq!(trace.current(), None);
        assert!(trace.recent().is_empty());
        assert!(!trace.display().contains("=>"));
    }

    #[test]
    fn test_wrap_around() {
        let mut trace = InstructionTrace::new(3);
        for i in 0..5u64 {
            trace.record(0x8000_0000 + 4 * i, i as u32);
        }
        // Slots now hold instructions 3, 4, 2; the cursor is on 4.
        assert_eq!(trace.current(), Some(1));
        assert_eq!(
            trace.recent().iter().map(|e| e.instruction).collect::<Vec<_>>(),
            vec![2, 3, 4]
        );
    }

    #[test]
    fn test_partial_fill_recent() {
        let mut trace = InstructionTrace::new(4);
        trace.record(0x10, 0xaa);
        trace.record(0x14, 0xbb);
        assert_eq!(
            trace.recent(),
            vec![TraceEntry::new(0x10, 0xaa), TraceEntry::new(0x14, 0xbb)]
        );
    }

    #[test]
    fn test_display_marks_current() {
        let mut trace = InstructionTrace::new(2);
        trace.record(0x8000_0000, 0x0000_0413);
        let display = trace.display();
        let lines: Vec<&str> = display.lines().collect();
        assert_eq!(lines[0], "Recently executed instructions:");
        assert_eq!(lines[1], "=> 0x80000000: 0x00000413");
        assert_eq!(lines[2], "   0x00000000: 0x00000000");
    }

    #[test]
    fn test_clear() {
        let mut trace = InstructionTrace::new(2);
        trace.record(0x4, 0x1);
        trace.clear();
        assert_eq!(trace.current(), None);
        assert!(trace.recent().is_empty());
    }

    #[test]
    fn test_zero_size_holds_one_entry() {
        let mut trace = InstructionTrace::new(0);
        assert_eq!(trace.size(), 1);
        trace.record(0x4, 0x1);
        trace.record(0x8, 0x2);
        assert_eq!(trace.recent(), vec![TraceEntry::new(0x8, 0x2)]);
    }
}
