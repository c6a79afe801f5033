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

//! Fixed-capacity watchpoint pool.
//!
//! Watchpoints live in a slot arena whose size is fixed when the pool is
//! created. Free slots are kept on a stack and active ones in an ordered list
//! with the most recently created first; every slot is in exactly one of the
//! two. A watchpoint's id is its slot index.

use std::collections::VecDeque;

use sdb_common::{
    normalize_expression,
    types::{watchpoint_table_header, WatchpointHit, WatchpointInfo},
};
use thiserror::Error;
use tracing::{debug, warn};

use crate::eval::{handlers::Machine, ExprError, ExpressionEvaluator, Value};

/// Errors reported by watchpoint operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WatchpointError {
    /// Every slot is in use
    #[error("no free watchpoint: all {capacity} slots are in use")]
    PoolExhausted {
        /// Pool capacity
        capacity: usize,
    },

    /// No active watchpoint has this id
    #[error("watchpoint {id} does not exist")]
    NotFound {
        /// Requested id
        id: u32,
    },

    /// The expression could not be evaluated
    #[error(transparent)]
    Evaluation(#[from] ExprError),
}

/// An active watchpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Watchpoint {
    id: u32,
    expression: String,
    old_value: Value,
    current_value: Value,
}

impl Watchpoint {
    /// Slot index of the watchpoint
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Normalized expression text
    pub fn expression(&self) -> &str {
        &self.expression
    }

    /// Value before the most recent change
    pub fn old_value(&self) -> Value {
        self.old_value
    }

    /// Most recently observed value
    pub fn current_value(&self) -> Value {
        self.current_value
    }

    /// Serializable snapshot of this watchpoint
    pub fn info(&self) -> WatchpointInfo {
        WatchpointInfo {
            id: self.id,
            expression: self.expression.clone(),
            old_value: self.old_value,
            current_value: self.current_value,
        }
    }
}

/// Slot arena of watchpoints with O(1) allocation and release
#[derive(Debug, Clone)]
pub struct WatchpointPool {
    slots: Vec<Option<Watchpoint>>,
    /// Free slot ids; the next allocation pops from the end
    free: Vec<u32>,
    /// Active slot ids, most recently created first
    active: VecDeque<u32>,
}

impl WatchpointPool {
    /// Create a pool with `capacity` free slots
    pub fn new(capacity: usize) -> Self {
        let mut pool =
            Self { slots: Vec::new(), free: Vec::new(), active: VecDeque::with_capacity(capacity) };
        pool.slots.resize_with(capacity, || None);
        pool.init();
        pool
    }

    /// Release every watchpoint; slot 0 becomes the next to be allocated
    pub fn init(&mut self) {
        self.slots.iter_mut().for_each(|slot| *slot = None);
        self.free = (0..self.slots.len() as u32).rev().collect();
        self.active.clear();
    }

    /// Number of slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of active watchpoints
    pub fn len(&self) -> usize {
        self.active.len()
    }

    /// Whether no watchpoint is active
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Number of free slots
    pub fn free_slots(&self) -> usize {
        self.free.len()
    }

    /// Look up an active watchpoint
    pub fn get(&self, id: u32) -> Option<&Watchpoint> {
        self.slots.get(id as usize)?.as_ref()
    }

    /// Active watchpoints, most recently created first
    pub fn iter(&self) -> impl Iterator<Item = &Watchpoint> {
        self.active.iter().filter_map(|id| self.get(*id))
    }

    /// Create a watchpoint on `expression` and return its id.
    ///
    /// The expression is evaluated once to record its initial value. If that
    /// evaluation fails no slot is consumed.
    pub fn create<M: Machine + ?Sized>(
        &mut self,
        expression: &str,
        evaluator: &ExpressionEvaluator,
        machine: &M,
    ) -> Result<u32, WatchpointError> {
        if self.free.is_empty() {
            return Err(WatchpointError::PoolExhausted { capacity: self.capacity() });
        }

        let expression = normalize_expression(expression);
        let value = evaluator.eval(&expression, machine)?;

        let id = self.free.pop().ok_or(WatchpointError::PoolExhausted {
            capacity: self.slots.len(),
        })?;
        self.slots[id as usize] =
            Some(Watchpoint { id, expression, old_value: value, current_value: value });
        self.active.push_front(id);

        debug!(id, value, free = self.free.len(), "watchpoint created");
        Ok(id)
    }

    /// Delete the active watchpoint `id`, returning its last state
    pub fn delete(&mut self, id: u32) -> Result<Watchpoint, WatchpointError> {
        let position = self
            .active
            .iter()
            .position(|active| *active == id)
            .ok_or(WatchpointError::NotFound { id })?;
        self.active.remove(position);

        let watchpoint = self.slots[id as usize].take().ok_or(WatchpointError::NotFound { id })?;
        self.free.push(id);

        debug!(id, free = self.free.len(), "watchpoint deleted");
        Ok(watchpoint)
    }

    /// Re-evaluate every active watchpoint and report those whose value changed.
    ///
    /// A triggered watchpoint moves its current value to `old_value` and
    /// stores the new one. Watchpoints whose expression fails to evaluate are
    /// skipped and keep their values.
    pub fn scan<M: Machine + ?Sized>(
        &mut self,
        evaluator: &ExpressionEvaluator,
        machine: &M,
    ) -> Vec<WatchpointHit> {
        let mut hits = Vec::new();

        for id in &self.active {
            let Some(watchpoint) = self.slots[*id as usize].as_mut() else {
                continue;
            };

            let new_value = match evaluator.eval(&watchpoint.expression, machine) {
                Ok(value) => value,
                Err(e) => {
                    warn!(id, expression = %watchpoint.expression, "watchpoint re-evaluation failed: {e}");
                    continue;
                }
            };

            if new_value != watchpoint.current_value {
                watchpoint.old_value = watchpoint.current_value;
                watchpoint.current_value = new_value;
                hits.push(WatchpointHit {
                    id: *id,
                    expression: watchpoint.expression.clone(),
                    old_value: watchpoint.old_value,
                    new_value,
                });
            }
        }

        hits
    }

    /// Serializable snapshots of the active watchpoints, most recent first
    pub fn infos(&self) -> Vec<WatchpointInfo> {
        self.iter().map(Watchpoint::info).collect()
    }

    /// Human-readable listing: a header row, then one row per active watchpoint
    pub fn display(&self) -> String {
        let mut out = watchpoint_table_header();
        for info in self.infos() {
            out.push('\n');
            out.push_str(&info.to_string());
        }
        out
    }
}

impl Default for WatchpointPool {
    fn default() -> Self {
        Self::new(sdb_common::WatchpointConfig::default().capacity)
    }
}
