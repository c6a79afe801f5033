//! SDB Engine - expression evaluation, watchpoints and instruction tracing
//!
//! The engine is independent of any particular simulator: machine state is
//! reached through the [`eval::handlers::Machine`] traits.

pub mod core;
pub use core::*;

pub mod eval;
pub use eval::{ExprError, ExpressionEvaluator, Value};

pub mod trace;
pub use trace::*;

pub mod watchpoint;
pub use watchpoint::*;
