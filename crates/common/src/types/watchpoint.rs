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

/// Snapshot of one active watchpoint, as shown by the watchpoint listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchpointInfo {
    /// Slot number of the watchpoint; stable for its whole lifetime.
    pub id: u32,
    /// Normalized expression text.
    pub expression: String,
    /// Value observed before the most recent change.
    pub old_value: i64,
    /// Most recently observed value.
    pub current_value: i64,
}

impl Display for WatchpointInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:>10}\t{:>10}\t{:>10}", self.id, self.expression, self.current_value)
    }
}

/// A watchpoint whose expression changed value during a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchpointHit {
    /// Slot number of the triggered watchpoint.
    pub id: u32,
    /// Normalized expression text.
    pub expression: String,
    /// Value before the change.
    pub old_value: i64,
    /// Value after the change.
    pub new_value: i64,
}

impl Display for WatchpointHit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Watchpoint {} triggered (expr is {}): before: {}, after: {}",
            self.id, self.expression, self.old_value, self.new_value
        )
    }
}

/// Render the header line used above a watchpoint listing.
pub fn watchpoint_table_header() -> String {
    format!("{:>10}\t{:>10}\t{:>10}", "NO", "Expr", "Current Value")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_info_row_alignment() {
        let info =
            WatchpointInfo { id: 3, expression: "$sp".to_string(), old_value: 0, current_value: 16 };
        assert_eq!(info.to_string(), "         3\t       $sp\t        16");
        assert_eq!(watchpoint_table_header(), "        NO\t      Expr\tCurrent Value");
    }

    #[test]
    fn test_hit_display() {
        let hit = WatchpointHit {
            id: 0,
            expression: "$a0 == 1".to_string(),
            old_value: 0,
            new_value: 1,
        };
        assert_eq!(hit.to_string(), "Watchpoint 0 triggered (expr is $a0 == 1): before: 0, after: 1");
    }

    #[test]
    fn test_hit_json_round_trip() {
        let hit =
            WatchpointHit { id: 7, expression: "*$sp".to_string(), old_value: -1, new_value: 4 };
        let json = serde_json::to_string(&hit).unwrap();
        assert!(json.contains("\"new_value\":4"));
        let back: WatchpointHit = serde_json::from_str(&json).unwrap();
        assert_eq!(back, hit);
    }
}
