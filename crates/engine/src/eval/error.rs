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

use thiserror::Error;

/// Errors produced while tokenizing or evaluating an expression.
///
/// Everything except [`ExprError::Internal`] is caused by the input text or by
/// the machine state and is reported back to the console.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    /// No rule matches at some position of the input
    #[error("no match at position {position}: `{remaining}`")]
    NoMatch {
        /// Byte offset where scanning stopped
        position: usize,
        /// Unconsumed remainder of the input
        remaining: String,
    },

    /// The expression produced more tokens than the buffer holds
    #[error("expression has more than {capacity} tokens")]
    TooManyTokens {
        /// Token buffer capacity
        capacity: usize,
    },

    /// Nothing to evaluate
    #[error("empty expression")]
    EmptyExpression,

    /// Parentheses do not pair up
    #[error("unbalanced parentheses")]
    UnbalancedParentheses,

    /// Tokens do not form an expression, e.g. a dangling operator
    #[error("invalid expression: {0}")]
    InvalidExpression(String),

    /// A literal does not fit in a 64-bit word
    #[error("invalid literal `{text}`")]
    InvalidLiteral {
        /// Literal text
        text: String,
    },

    /// The machine does not know a register (only in strict mode)
    #[error("unknown register `{name}`")]
    UnknownRegister {
        /// Register name without the `$` sigil
        name: String,
    },

    /// The machine refused a memory read
    #[error("cannot read {width} bytes at 0x{address:x}")]
    MemoryAccess {
        /// Address of the read
        address: u64,
        /// Width of the read in bytes
        width: usize,
    },

    /// Right operand of `/` evaluated to zero
    #[error("division by zero")]
    DivisionByZero,

    /// The evaluator reached a state well-formed token streams cannot produce
    #[error("internal evaluator error: {0}")]
    Internal(String),
}

impl ExprError {
    /// Whether this is an evaluator bug rather than a problem with the input.
    pub fn is_internal(&self) -> bool {
        matches!(self, Self::Internal(_))
    }
}
