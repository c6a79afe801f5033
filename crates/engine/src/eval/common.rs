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

/// Result type of every evaluation.
pub type Value = i64;

/// Width in bytes of a memory dereference.
pub const DEREF_WIDTH: usize = 4;

/// Operator precedence levels, tightest-binding first.
///
/// The evaluator splits a range at the operator of the loosest level present,
/// so the ordering of the variants is significant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Precedence {
    /// Unary `+`, `-` and `*` (right-associative)
    Unary = 0,
    /// `*` and `/`
    Multiplicative = 1,
    /// Binary `+` and `-`
    Additive = 2,
    /// `==` and `!=`
    Equality = 3,
    /// `&&` and `||`
    Logical = 4,
}

impl Precedence {
    /// Number of precedence levels.
    pub const COUNT: usize = 5;

    /// Whether operators of this level group right-to-left.
    pub fn is_right_associative(self) -> bool {
        self == Self::Unary
    }

    /// Index of the level in a per-level table.
    pub fn index(self) -> usize {
        self as usize
    }
}
