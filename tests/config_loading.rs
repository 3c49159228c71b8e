use std::io::Write;
use std::time::Duration;

use tempfile::NamedTempFile;
use workerctl::config::load_and_validate;
use workerctl::errors::WorkerError;
use workerctl::{LaunchStrategy, Worker};
use workerctl_test_utils::builders::WorkerConfigBuilder;

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn full_worker_section_is_loaded() {
    let file = config_file(
        r#"
[worker]
name = "prefetch"
strategy = "dedicated"
stop_timeout_ms = 2500
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.name(), "prefetch");
    assert_eq!(cfg.strategy(), LaunchStrategy::Dedicated);
    assert_eq!(cfg.stop_timeout(), Duration::from_millis(2500));

    let worker: Worker<(), ()> = Worker::with_config(cfg);
    assert_eq!(worker.strategy(), LaunchStrategy::Dedicated);
    assert_eq!(worker.name(), "prefetch");
}

#[test]
fn missing_keys_fall_back_to_defaults() {
    let file = config_file("[worker]\nname = \"loader\"\n");

    let cfg = load_and_validate(file.path()).unwrap();
    assert_eq!(cfg.strategy(), LaunchStrategy::Pooled);
    assert_eq!(cfg.stop_timeout(), Duration::from_secs(10));
}

#[test]
fn zero_stop_timeout_returns_config_error() {
    let file = config_file("[worker]\nstop_timeout_ms = 0\n");

    match load_and_validate(file.path()) {
        Err(WorkerError::ConfigError(msg)) => assert!(msg.contains("stop_timeout_ms")),
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn unknown_strategy_returns_toml_error() {
    let file = config_file("[worker]\nstrategy = \"fibers\"\n");

    match load_and_validate(file.path()) {
        Err(WorkerError::TomlError(_)) => {}
        Err(e) => panic!("Expected TomlError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn missing_file_returns_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    assert!(matches!(
        load_and_validate(&path),
        Err(WorkerError::IoError(_))
    ));
}

#[test]
fn builder_saturates_huge_stop_timeout() {
    let config = WorkerConfigBuilder::new()
        .stop_timeout(Duration::MAX)
        .build();
    assert_eq!(config.stop_timeout(), Duration::from_millis(u64::MAX));
}
