//! Integration tests for logging functionality

use cardex::config::LoggingConfig;
use cardex::core::export::ExportSummary;
use cardex::domain::{BackendKind, ExportOutcome};
use cardex::logging::init_logging;
use tempfile::TempDir;
use uuid::Uuid;

#[test]
fn test_logging_config_default() {
    let config = LoggingConfig::default();
    assert!(!config.local_enabled);
    assert_eq!(config.local_path, "./logs");
    assert_eq!(config.local_rotation, "daily");
}

#[test]
fn test_invalid_level_is_rejected_before_install() {
    let result = init_logging("loud", &LoggingConfig::default());
    assert!(result.is_err());
}

// The subscriber is global, so only one test in this binary installs it
#[test]
fn test_file_logging_writes_json_lines() {
    let temp_dir = TempDir::new().unwrap();
    let log_path = temp_dir.path().join("logs");

    let config = LoggingConfig {
        local_enabled: true,
        local_path: log_path.to_string_lossy().into_owned(),
        local_rotation: "never".to_string(),
    };

    let guard = init_logging("info", &config).unwrap();
    assert!(log_path.exists());

    let mut summary = ExportSummary::new(Uuid::new_v4());
    summary.total_cards = 2;
    summary.set_outcome(ExportOutcome::Completed {
        files: 2,
        backend: BackendKind::Archive,
        fallback_cause: None,
    });
    summary.log_summary();

    drop(guard);

    let contents = std::fs::read_to_string(log_path.join("cardex.log")).unwrap();
    let line = contents
        .lines()
        .find(|line| line.contains("Export summary"))
        .expect("summary line missing");
    let json: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(json["fields"]["files_written"], 2);
    assert_eq!(json["level"], "INFO");
}
