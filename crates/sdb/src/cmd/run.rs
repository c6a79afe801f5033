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

//! Script-driven watchpoint sessions.
//!
//! A script names the expressions to watch and a list of steps, each one
//! standing for a retired instruction and its effects on the machine:
//!
//! ```toml
//! watch = ["$a0", "*0x80000100"]
//!
//! [[step]]
//! pc = 0x80000000
//! inst = 0x00500513
//! regs = { a0 = 5 }
//!
//! [[step]]
//! inst = 0x00a02023
//! mem = { "0x80000100" = 5 }
//! ```
//!
//! Each step is recorded in the instruction trace, its effects are applied,
//! and then every watchpoint is re-evaluated. The session stops at the first
//! step that triggers a watchpoint.

use std::{collections::BTreeMap, fs, path::Path};

use eyre::{eyre, Result, WrapErr};
use sdb_common::{
    parse_word,
    types::{TraceEntry, WatchpointHit, WatchpointInfo},
};
use sdb_engine::{eval::handlers::SimulatedMachine, Engine, StepAction};
use serde::{Deserialize, Serialize};

use crate::utils::write_word;

/// Width of one instruction; the pc advances by this much unless a step sets it
const INSTRUCTION_WIDTH: u64 = 4;

/// A watchpoint session script
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Script {
    /// Expressions to watch, created in order before the first step
    pub watch: Vec<String>,
    /// Retired instructions
    pub step: Vec<Step>,
}

/// One retired instruction and its effects
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Step {
    /// Address of the instruction (default: the current pc)
    pub pc: Option<u64>,
    /// Instruction word, recorded in the trace
    pub inst: u32,
    /// Register writes
    pub regs: BTreeMap<String, u64>,
    /// Memory word writes, keyed by address
    pub mem: BTreeMap<String, u64>,
}

impl Script {
    /// Read and parse a script file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read script {}", path.display()))?;
        toml::from_str(&content)
            .wrap_err_with(|| format!("Failed to parse script {}", path.display()))
    }
}

/// Outcome of a session
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Number of steps executed, including the one that stopped the session
    pub steps_executed: usize,
    /// pc of the stopping step, if any
    pub stopped_at: Option<u64>,
    /// Watchpoints that triggered on the stopping step
    pub hits: Vec<WatchpointHit>,
    /// Watchpoints at the end of the session
    pub watchpoints: Vec<WatchpointInfo>,
    /// Recently executed instructions, oldest first
    pub trace: Vec<TraceEntry>,
}

/// Run `script` and print a text or JSON report
pub fn run_script(
    engine: &mut Engine,
    machine: &mut SimulatedMachine,
    script: &Path,
    json: bool,
) -> Result<()> {
    let script = Script::load(script)?;
    let report = execute(engine, machine, &script)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    for hit in &report.hits {
        println!("{hit}");
    }
    match report.stopped_at {
        Some(pc) => println!("Stopped after step {} at pc 0x{pc:08x}", report.steps_executed),
        None => println!("Finished {} steps without a watchpoint trigger", report.steps_executed),
    }
    println!("{}", engine.list_watchpoints());
    println!("{}", engine.display_instructions());
    Ok(())
}

/// Create the script's watchpoints and replay its steps until one triggers
pub fn execute(
    engine: &mut Engine,
    machine: &mut SimulatedMachine,
    script: &Script,
) -> Result<RunReport> {
    for expression in &script.watch {
        let id = engine
            .create_watchpoint(expression, machine)
            .wrap_err_with(|| format!("Failed to watch `{expression}`"))?;
        tracing::debug!(id, expression = %expression, "watchpoint set");
    }

    let mut steps_executed = 0;
    let mut stopped_at = None;
    let mut hits = Vec::new();

    for (index, step) in script.step.iter().enumerate() {
        let pc = step.pc.unwrap_or_else(|| machine.pc());
        engine.record_instruction(pc, step.inst);
        apply_step(machine, pc, step).wrap_err_with(|| format!("Step {index} failed"))?;
        steps_executed += 1;

        if let StepAction::Stop(triggered) = engine.check_watchpoints(machine) {
            stopped_at = Some(pc);
            hits = triggered;
            break;
        }
    }

    Ok(RunReport {
        steps_executed,
        stopped_at,
        hits,
        watchpoints: engine.watchpoint_infos(),
        trace: engine.recent_instructions(),
    })
}

fn apply_step(machine: &mut SimulatedMachine, pc: u64, step: &Step) -> Result<()> {
    machine.set_register("pc", pc.wrapping_add(INSTRUCTION_WIDTH))?;
    for (name, value) in &step.regs {
        machine.set_register(name.trim_start_matches('$'), *value)?;
    }
    for (address, value) in &step.mem {
        let address =
            parse_word(address).ok_or_else(|| eyre!("Invalid memory address `{address}`"))?;
        write_word(machine, address, *value)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use sdb_engine::EngineConfig;

    fn script(text: &str) -> Script {
        toml::from_str(text).unwrap()
    }

    #[test]
    fn test_stops_at_first_trigger() {
        let script = script(
            r#"
            watch = ["$a0"]

            [[step]]
            pc = 0x80000000
            inst = 0x00000013

            [[step]]
            inst = 0x00500513
            regs = { a0 = 5 }

            [[step]]
            inst = 0x00600513
            regs = { a0 = 6 }
            "#,
        );
        let mut engine = Engine::default();
        let mut machine = SimulatedMachine::new();

        let report = execute(&mut engine, &mut machine, &script).unwrap();
        assert_eq!(report.steps_executed, 2);
        assert_eq!(report.stopped_at, Some(0x8000_0004));
        assert_eq!(report.hits.len(), 1);
        assert_eq!((report.hits[0].old_value, report.hits[0].new_value), (0, 5));
        assert_eq!(report.trace.len(), 2);
        assert_eq!(report.trace[1], TraceEntry::new(0x8000_0004, 0x0050_0513));
    }

    #[test]
    fn test_memory_watch_and_completion() {
        let script = script(
            r#"
            watch = ["*0x100 == 7"]

            [[step]]
            pc = 0x0
            inst = 0x1
            mem = { "0x104" = 7 }
            "#,
        );
        let mut engine = Engine::new(EngineConfig::default());
        let mut machine = SimulatedMachine::new().with_memory(0x100, 4, 0).unwrap();

        let report = execute(&mut engine, &mut machine, &script).unwrap();
        assert_eq!(report.steps_executed, 1);
        assert_eq!(report.stopped_at, None);
        assert!(report.hits.is_empty());
        assert_eq!(report.watchpoints[0].current_value, 0);
    }

    #[test]
    fn test_invalid_watch_expression() {
        let script = script(r#"watch = ["1 +"]"#);
        let mut engine = Engine::default();
        let mut machine = SimulatedMachine::new();

        let err = execute(&mut engine, &mut machine, &script).unwrap_err();
        assert!(err.to_string().contains("Failed to watch `1 +`"));
    }

    #[test]
    fn test_unknown_script_key() {
        assert!(toml::from_str::<Script>("wach = []").is_err());
    }
}
