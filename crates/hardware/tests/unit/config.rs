//! # Configuration Tests
//!
//! Tests for configuration defaults, JSON deserialization and validation.

use std::io::Write;

use leon3_core::Simulator;
use leon3_core::common::error::SimError;
use leon3_core::config::*;
use pretty_assertions::assert_eq;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert!(!config.general.trace_instructions);
    assert_eq!(config.general.start_pc, 0x4000_0000);
    assert_eq!(config.general.max_instructions, None);
    assert_eq!(config.general.execution_model, ExecutionModel::Functional);
    assert!(!config.general.stop_on_ta);
    assert_eq!(config.cpu.num_windows, 8);
    assert_eq!(config.cpu.processor_id, 0);
    assert!(!config.cpu.tsim_compat);
    assert_eq!(config.cpu.tbr_base, 0);
    assert_eq!(config.memory.ram_base, 0x4000_0000);
    assert_eq!(config.memory.ram_size, 16 * 1024 * 1024);
    assert_eq!(config.debug.gdb_port, None);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_from_json_keeps_defaults_for_missing_fields() {
    let json = r#"{
        "general": { "stop_on_ta": true, "max_instructions": 1000 },
        "cpu": { "num_windows": 16, "tsim_compat": true },
        "debug": { "gdb_port": 1234 }
    }"#;
    let config = Config::from_json(json).unwrap();
    assert!(config.general.stop_on_ta);
    assert_eq!(config.general.max_instructions, Some(1000));
    assert_eq!(config.cpu.num_windows, 16);
    assert!(config.cpu.tsim_compat);
    assert_eq!(config.debug.gdb_port, Some(1234));
    assert_eq!(config.memory.ram_base, 0x4000_0000);
    assert_eq!(config.general.execution_model, ExecutionModel::Functional);
}

#[test]
fn test_execution_model_aliases() {
    for name in ["Timed", "Lt", "LT"] {
        let json = format!(r#"{{ "general": {{ "execution_model": "{name}" }} }}"#);
        let config = Config::from_json(&json).unwrap();
        assert_eq!(config.general.execution_model, ExecutionModel::Timed, "{name}");
    }
}

#[test]
fn test_config_rejects_malformed_json() {
    assert!(matches!(
        Config::from_json("{ not json"),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_config_rejects_bad_window_count() {
    let err = Config::from_json(r#"{ "cpu": { "num_windows": 1 } }"#).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::Invalid {
            field: "cpu.num_windows",
            ..
        }
    ));
    assert!(Config::from_json(r#"{ "cpu": { "num_windows": 33 } }"#).is_err());
    assert!(Config::from_json(r#"{ "cpu": { "num_windows": 32 } }"#).is_ok());
}

#[test]
fn test_config_rejects_misaligned_tbr() {
    let mut config = Config::default();
    config.cpu.tbr_base = 0x4000_0100;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid {
            field: "cpu.tbr_base",
            ..
        })
    ));
}

#[test]
fn test_config_rejects_bad_processor_id() {
    let mut config = Config::default();
    config.cpu.processor_id = 0x10;
    assert!(config.validate().is_err());
}

#[test]
fn test_config_rejects_bad_ram_region() {
    let mut config = Config::default();
    config.memory.ram_size = 0;
    assert!(config.validate().is_err());
    config.memory.ram_size = 12;
    assert!(config.validate().is_err());
    config.memory.ram_base = 0xFFFF_0000;
    config.memory.ram_size = 0x2_0000;
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Invalid {
            field: "memory.ram_size",
            ..
        })
    ));
}

#[test]
fn test_config_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "general": {{ "execution_model": "Timed" }}, "memory": {{ "ram_size": 65536 }} }}"#
    )
    .unwrap();
    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.general.execution_model, ExecutionModel::Timed);
    assert_eq!(config.memory.ram_size, 65536);
}

#[test]
fn test_config_from_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
}

#[test]
fn test_config_serialization_round_trips() {
    let mut config = Config::default();
    config.general.execution_model = ExecutionModel::Timed;
    config.cpu.processor_id = 3;
    let json = serde_json::to_string(&config).unwrap();
    let back = Config::from_json(&json).unwrap();
    assert_eq!(back.general.execution_model, ExecutionModel::Timed);
    assert_eq!(back.cpu.processor_id, 3);
}

#[test]
fn test_simulator_rejects_invalid_config() {
    let mut config = Config::default();
    config.cpu.num_windows = 0;
    let err = Simulator::new(&config).unwrap_err();
    assert!(matches!(err, SimError::Config(ConfigError::Invalid { .. })));
}
