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

//! Expression evaluation for the simulator console.
//!
//! Expressions are small integer formulas over literals, registers and memory,
//! evaluated against live machine state. The pipeline is:
//!
//! 1. [`tokenize`] - split the text with the ordered rule table in [`rules`]
//! 2. [`disambiguate`] - mark `+`, `-`, `*` that start an operand as unary
//! 3. [`ExpressionEvaluator`] - recursively split the token range at its
//!    dominant operator and compute an `i64`
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use sdb_engine::eval::{handlers::SimulatedMachine, ExpressionEvaluator};
//!
//! let machine = SimulatedMachine::new().with_register("sp", 0x8000_0000)?;
//! let evaluator = ExpressionEvaluator::default();
//!
//! assert_eq!(evaluator.eval("$sp + 4", &machine)?, 0x8000_0004);
//! assert_eq!(evaluator.eval("(2 + 3) * 4 == 20", &machine)?, 1);
//! ```
//!
//! # Supported Expressions
//!
//! - **Literals**: `42`, `0x2A`
//! - **Registers**: `$0`, `$ra`, `$sp`, `$gp`, `$tp`, `$t0`-`$t6`, `$s0`-`$s11`, `$a0`-`$a7`, `$pc`
//! - **Unary**: `+x`, `-x`, `*addr` (reads a 4-byte word)
//! - **Arithmetic**: `+`, `-`, `*`, `/` (wrapping, truncating division)
//! - **Comparison**: `==`, `!=`
//! - **Logical**: `&&`, `||` (both operands always evaluated)

mod common;
pub use common::*;

mod error;
pub use error::ExprError;

mod evaluator;
pub use evaluator::ExpressionEvaluator;

pub mod handlers;
pub mod rules;

mod token;
pub use token::{Token, TokenBuffer, TokenKind, TOKEN_TEXT_CAPACITY};

mod tokenizer;
pub use tokenizer::{disambiguate, tokenize};
