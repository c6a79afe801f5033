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

use sdb_engine::{
    eval::handlers::SimulatedMachine, Engine, EngineConfig, ExprError, ExpressionEvaluator,
    StepAction, WatchpointError, WatchpointPool,
};
use tracing::info;

#[test]
fn test_pool_exhaustion() {
    sdb_common::logging::ensure_test_logging(None);
    info!("Running test");

    let evaluator = ExpressionEvaluator::default();
    let machine = SimulatedMachine::new();
    let mut pool = WatchpointPool::new(32);

    for i in 0..32u32 {
        assert_eq!(pool.create(&i.to_string(), &evaluator, &machine), Ok(i));
    }
    assert_eq!(
        pool.create("1", &evaluator, &machine),
        Err(WatchpointError::PoolExhausted { capacity: 32 })
    );

    // The failed request must not disturb the existing watchpoints.
    assert_eq!(pool.len(), 32);
    assert_eq!(pool.free_slots(), 0);
    let ids: Vec<u32> = pool.iter().map(|wp| wp.id()).collect();
    assert_eq!(ids, (0..32).rev().collect::<Vec<_>>());
    assert_eq!(pool.get(31).unwrap().current_value(), 31);
}

#[test]
fn test_slot_reuse_after_delete() {
    sdb_common::logging::ensure_test_logging(None);
    info!("Running test");

    let evaluator = ExpressionEvaluator::default();
    let machine = SimulatedMachine::new();
    let mut pool = WatchpointPool::new(3);

    pool.create("1", &evaluator, &machine).unwrap();
    pool.create("2", &evaluator, &machine).unwrap();
    pool.create("3", &evaluator, &machine).unwrap();

    let deleted = pool.delete(1).unwrap();
    assert_eq!(deleted.expression(), "2");
    assert_eq!(pool.delete(1), Err(WatchpointError::NotFound { id: 1 }));
    assert_eq!(pool.len(), 2);

    assert_eq!(pool.create("4", &evaluator, &machine), Ok(1));
    assert_eq!(pool.iter().map(|wp| wp.id()).collect::<Vec<_>>(), vec![1, 2, 0]);
}

#[test]
fn test_scan_reports_only_changed() {
    sdb_common::logging::ensure_test_logging(None);
    info!("Running test");

    let evaluator = ExpressionEvaluator::default();
    let mut machine = SimulatedMachine::new()
        .with_register("a0", 1)
        .unwrap()
        .with_register("a1", 2)
        .unwrap();
    let mut pool = WatchpointPool::new(4);

    let a0 = pool.create("$a0", &evaluator, &machine).unwrap();
    let a1 = pool.create("$a1", &evaluator, &machine).unwrap();
    let sum = pool.create("$a0 + $a1", &evaluator, &machine).unwrap();

    assert!(pool.scan(&evaluator, &machine).is_empty());

    machine.set_register("a0", 10).unwrap();
    let hits = pool.scan(&evaluator, &machine);

    // Most recently created first.
    assert_eq!(hits.iter().map(|h| h.id).collect::<Vec<_>>(), vec![sum, a0]);
    assert_eq!((hits[0].old_value, hits[0].new_value), (3, 12));
    assert_eq!((hits[1].old_value, hits[1].new_value), (1, 10));

    let untouched = pool.get(a1).unwrap();
    assert_eq!((untouched.old_value(), untouched.current_value()), (2, 2));
    assert_eq!(pool.get(a0).unwrap().old_value(), 1);

    // Values were updated, so the same state triggers nothing.
    assert!(pool.scan(&evaluator, &machine).is_empty());
}

#[test]
fn test_scan_skips_failing_expression() {
    sdb_common::logging::ensure_test_logging(None);
    info!("Running test");

    let evaluator = ExpressionEvaluator::default();
    let mut machine = SimulatedMachine::new().with_register("a0", 1).unwrap();
    let mut pool = WatchpointPool::new(2);

    let divide = pool.create("10 / $a0", &evaluator, &machine).unwrap();
    machine.set_register("a0", 0).unwrap();

    assert!(pool.scan(&evaluator, &machine).is_empty());
    assert_eq!(pool.get(divide).unwrap().current_value(), 10);
}

#[test]
fn test_listing_matches_evaluation() {
    sdb_common::logging::ensure_test_logging(None);
    info!("Running test");

    let machine = SimulatedMachine::new().with_register("sp", 0x8000_1000).unwrap();
    let mut engine = Engine::default();

    let id = engine.create_watchpoint("$sp", &machine).unwrap();
    let expected = engine.evaluate_expression("$sp", &machine).unwrap();

    let listing = engine.list_watchpoints();
    let lines: Vec<&str> = listing.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].contains("NO"));
    assert_eq!(lines[1], format!("{:>10}\t{:>10}\t{:>10}", id, "$sp", expected));

    let infos = engine.watchpoint_infos();
    assert_eq!(infos[0].current_value, 0x8000_1000);
}

#[test]
fn test_engine_check_watchpoints() {
    sdb_common::logging::ensure_test_logging(None);
    info!("Running test");

    let mut machine = SimulatedMachine::new().with_memory(0x8000_0000, 4, 1).unwrap();
    let mut engine = Engine::new(EngineConfig::default().with_watchpoint_capacity(2));

    let id = engine.create_watchpoint("*0x80000000", &machine).unwrap();
    assert_eq!(engine.check_watchpoints(&machine), StepAction::Continue);

    machine.write_memory(0x8000_0000, 4, 2).unwrap();
    match engine.check_watchpoints(&machine) {
        StepAction::Stop(hits) => {
            assert_eq!(hits.len(), 1);
            assert_eq!(hits[0].id, id);
            assert_eq!(hits[0].old_value, 1);
            assert_eq!(hits[0].new_value, 2);
            assert_eq!(
                hits[0].to_string(),
                "Watchpoint 0 triggered (expr is *0x80000000): before: 1, after: 2"
            );
        }
        other => panic!("expected a stop, got {other:?}"),
    }

    engine.delete_watchpoint(id).unwrap();
    assert_eq!(engine.delete_watchpoint(id), Err(WatchpointError::NotFound { id }));
    machine.write_memory(0x8000_0000, 4, 3).unwrap();
    assert_eq!(engine.check_watchpoints(&machine), StepAction::Continue);
}

#[test]
fn test_engine_rejects_invalid_watch_expression() {
    sdb_common::logging::ensure_test_logging(None);
    info!("Running test");

    let machine = SimulatedMachine::new();
    let mut engine = Engine::default();

    assert_eq!(
        engine.create_watchpoint("1 / 0", &machine),
        Err(WatchpointError::Evaluation(ExprError::DivisionByZero))
    );
    assert!(engine.watchpoints().is_empty());
}

#[test]
fn test_engine_instruction_trace() {
    sdb_common::logging::ensure_test_logging(None);
    info!("Running test");

    let mut engine = Engine::new(EngineConfig { iringbuf_size: 2, ..EngineConfig::default() });
    engine.record_instruction(0x8000_0000, 0x0000_0413);
    engine.record_instruction(0x8000_0004, 0x0010_0073);
    engine.record_instruction(0x8000_0008, 0x0000_0013);

    let recent = engine.recent_instructions();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].address, 0x8000_0004);
    assert_eq!(recent[1].address, 0x8000_0008);
    assert!(engine.display_instructions().contains("=> 0x80000008: 0x00000013"));
}
