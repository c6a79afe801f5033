use sdb_common::SdbConfig;
use serial_test::serial;
use tracing::info;

#[test]
fn test_save_and_load_round_trip() {
    sdb_common::logging::ensure_test_logging(None);
    info!("Running test");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sdb.toml");

    let mut config = SdbConfig::default();
    config.expr.strict_registers = true;
    config.watchpoint.capacity = 8;
    config.save_to(&path).unwrap();

    let loaded = SdbConfig::load_from(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_load_rejects_invalid_toml() {
    sdb_common::logging::ensure_test_logging(None);
    info!("Running test");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[expr\nmax_tokens = ").unwrap();

    assert!(SdbConfig::load_from(&path).is_err());
}

#[test]
fn test_load_rejects_zero_capacity() {
    sdb_common::logging::ensure_test_logging(None);
    info!("Running test");
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("zero.toml");
    std::fs::write(&path, "[watchpoint]\ncapacity = 0\n").unwrap();

    let err = SdbConfig::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("watchpoint.capacity"));
}

#[test]
fn test_load_missing_file_fails() {
    sdb_common::logging::ensure_test_logging(None);
    info!("Running test");
    let dir = tempfile::tempdir().unwrap();
    assert!(SdbConfig::load_from(&dir.path().join("absent.toml")).is_err());
}

#[test]
#[serial]
fn test_load_from_home_without_file_uses_defaults() {
    sdb_common::logging::ensure_test_logging(None);
    info!("Running test");
    let home = tempfile::tempdir().unwrap();
    let previous = std::env::var_os("HOME");
    std::env::set_var("HOME", home.path());

    let config = SdbConfig::load();

    match previous {
        Some(value) => std::env::set_var("HOME", value),
        None => std::env::remove_var("HOME"),
    }
    assert_eq!(config.unwrap(), SdbConfig::default());
}
