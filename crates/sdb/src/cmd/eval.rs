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

use eyre::Result;
use sdb_engine::{eval::handlers::SimulatedMachine, Engine};

/// Evaluate `expression` and print the result in decimal and hex
pub fn evaluate_expression(
    engine: &Engine,
    machine: &SimulatedMachine,
    expression: &str,
) -> Result<()> {
    tracing::debug!("Evaluating expression: {}", expression);

    let value = engine.evaluate_expression(expression, machine)?;
    println!("{value} (0x{:x})", value as u64);
    Ok(())
}
