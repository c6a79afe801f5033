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

//! Console-facing debugger engine.
//!
//! [`Engine`] bundles the expression evaluator, the watchpoint pool and the
//! instruction trace behind the operations a simulator console needs:
//!
//! - [`Engine::evaluate_expression`] for `p EXPR`-style commands
//! - [`Engine::create_watchpoint`], [`Engine::delete_watchpoint`] and
//!   [`Engine::list_watchpoints`] for watchpoint management
//! - [`Engine::check_watchpoints`], to be called after every retired
//!   instruction; a [`StepAction::Stop`] asks the simulation loop to halt
//!
//! The engine never owns machine state. Each operation that evaluates takes
//! the machine as an argument.

use sdb_common::{
    types::{TraceEntry, WatchpointHit, WatchpointInfo},
    ExprConfig, SdbConfig,
};
use tracing::{debug, info};

use crate::{
    eval::{handlers::Machine, ExprError, ExpressionEvaluator, Value},
    trace::InstructionTrace,
    watchpoint::{WatchpointError, WatchpointPool},
};

/// Configuration for the SDB engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Expression evaluation settings
    pub expr: ExprConfig,
    /// Number of watchpoint slots
    pub watchpoint_capacity: usize,
    /// Number of entries in the instruction ring buffer
    pub iringbuf_size: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::from(&SdbConfig::default())
    }
}

impl From<&SdbConfig> for EngineConfig {
    fn from(config: &SdbConfig) -> Self {
        Self {
            expr: config.expr.clone(),
            watchpoint_capacity: config.watchpoint.capacity,
            iringbuf_size: config.trace.iringbuf_size,
        }
    }
}

impl EngineConfig {
    /// Set the watchpoint pool capacity
    pub fn with_watchpoint_capacity(mut self, capacity: usize) -> Self {
        self.watchpoint_capacity = capacity;
        self
    }

    /// Fail on unknown registers instead of reading them as zero
    pub fn with_strict_registers(mut self, strict: bool) -> Self {
        self.expr.strict_registers = strict;
        self
    }
}

/// What the simulation loop should do after a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepAction {
    /// No watchpoint changed
    Continue,
    /// At least one watchpoint changed; halt and report
    Stop(Vec<WatchpointHit>),
}

impl StepAction {
    /// Whether the simulation should halt
    pub fn should_stop(&self) -> bool {
        matches!(self, Self::Stop(_))
    }
}

/// The debugger engine.
#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    evaluator: ExpressionEvaluator,
    watchpoints: WatchpointPool,
    trace: InstructionTrace,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    /// Create an engine with an empty watchpoint pool and instruction trace
    pub fn new(config: EngineConfig) -> Self {
        debug!(?config, "creating engine");
        Self {
            evaluator: ExpressionEvaluator::new(config.expr.clone()),
            watchpoints: WatchpointPool::new(config.watchpoint_capacity),
            trace: InstructionTrace::new(config.iringbuf_size),
            config,
        }
    }

    /// Engine configuration
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The expression evaluator
    pub fn evaluator(&self) -> &ExpressionEvaluator {
        &self.evaluator
    }

    /// The watchpoint pool
    pub fn watchpoints(&self) -> &WatchpointPool {
        &self.watchpoints
    }

    /// Evaluate an expression against the current machine state
    pub fn evaluate_expression<M: Machine + ?Sized>(
        &self,
        text: &str,
        machine: &M,
    ) -> Result<Value, ExprError> {
        self.evaluator.eval(text, machine)
    }

    /// Set a watchpoint on `text` and return its id
    pub fn create_watchpoint<M: Machine + ?Sized>(
        &mut self,
        text: &str,
        machine: &M,
    ) -> Result<u32, WatchpointError> {
        self.watchpoints.create(text, &self.evaluator, machine)
    }

    /// Delete watchpoint `id`
    pub fn delete_watchpoint(&mut self, id: u32) -> Result<(), WatchpointError> {
        self.watchpoints.delete(id).map(|_| ())
    }

    /// Watchpoint listing, most recently created first
    pub fn list_watchpoints(&self) -> String {
        self.watchpoints.display()
    }

    /// Structured watchpoint listing, most recently created first
    pub fn watchpoint_infos(&self) -> Vec<WatchpointInfo> {
        self.watchpoints.infos()
    }

    /// Re-evaluate all watchpoints after a retired instruction
    pub fn check_watchpoints<M: Machine + ?Sized>(&mut self, machine: &M) -> StepAction {
        if self.watchpoints.is_empty() {
            return StepAction::Continue;
        }

        let hits = self.watchpoints.scan(&self.evaluator, machine);
        if hits.is_empty() {
            return StepAction::Continue;
        }

        for hit in &hits {
            info!(id = hit.id, expression = %hit.expression, "{hit}");
        }
        StepAction::Stop(hits)
    }

    /// Record a retired instruction in the trace
    pub fn record_instruction(&mut self, address: u64, instruction: u32) {
        self.trace.record(address, instruction);
    }

    /// Recorded instructions, oldest first
    pub fn recent_instructions(&self) -> Vec<TraceEntry> {
        self.trace.recent()
    }

    /// Instruction trace listing with the latest entry marked
    pub fn display_instructions(&self) -> String {
        self.trace.display()
    }
}
