//! Configuration file resolution tests
//!
//! Tests that touch XDG_CONFIG_HOME are marked #[serial] so they never run
//! alongside each other.

use owr_common::config::{ConfigOverrides, MonitorConfig};
use owr_common::Error;
use serial_test::serial;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn test_explicit_file_partial_keys_fall_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
ollama_model = "mistral"
indoor_device_model = "Acurite-609TXC"
recommendation_interval_minutes = 5

[feed]
command = "/opt/rtl_433/bin/rtl_433"
"#,
    )
    .unwrap();

    let overrides = ConfigOverrides {
        config_path: Some(path),
        ..ConfigOverrides::default()
    };
    let config = MonitorConfig::load(&overrides).unwrap();

    assert_eq!(config.llm.model, "mistral");
    assert_eq!(config.llm.server_url, "http://localhost:11434");
    assert_eq!(config.indoor_device_model, "Acurite-609TXC");
    assert_eq!(config.outdoor_device_model, "LaCrosse-TX141W");
    assert_eq!(config.recommendation_interval, Duration::from_secs(300));
    assert_eq!(config.feed.command, PathBuf::from("/opt/rtl_433/bin/rtl_433"));
    // Unspecified args keep the decoder defaults
    assert!(config.feed.args.contains(&"json".to_string()));
}

#[test]
fn test_explicit_missing_file_is_error() {
    let overrides = ConfigOverrides {
        config_path: Some(PathBuf::from("/nonexistent/owr/config.toml")),
        ..ConfigOverrides::default()
    };

    let result = MonitorConfig::load(&overrides);
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_unparseable_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "recommendation_interval_minutes = \"soon\"").unwrap();

    let overrides = ConfigOverrides {
        config_path: Some(path),
        ..ConfigOverrides::default()
    };

    let result = MonitorConfig::load(&overrides);
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
#[serial]
fn test_user_config_dir_is_discovered() {
    let dir = tempfile::tempdir().unwrap();
    let owr_dir = dir.path().join("owr");
    fs::create_dir_all(&owr_dir).unwrap();
    fs::write(owr_dir.join("config.toml"), "port = 9123\n").unwrap();

    let previous = env::var_os("XDG_CONFIG_HOME");
    env::set_var("XDG_CONFIG_HOME", dir.path());

    let result = MonitorConfig::load(&ConfigOverrides::default());

    match previous {
        Some(value) => env::set_var("XDG_CONFIG_HOME", value),
        None => env::remove_var("XDG_CONFIG_HOME"),
    }

    assert_eq!(result.unwrap().port, 9123);
}

#[test]
#[serial]
fn test_cli_port_beats_discovered_file() {
    let dir = tempfile::tempdir().unwrap();
    let owr_dir = dir.path().join("owr");
    fs::create_dir_all(&owr_dir).unwrap();
    fs::write(owr_dir.join("config.toml"), "port = 9123\n").unwrap();

    let previous = env::var_os("XDG_CONFIG_HOME");
    env::set_var("XDG_CONFIG_HOME", dir.path());

    let overrides = ConfigOverrides {
        port: Some(7001),
        ..ConfigOverrides::default()
    };
    let result = MonitorConfig::load(&overrides);

    match previous {
        Some(value) => env::set_var("XDG_CONFIG_HOME", value),
        None => env::remove_var("XDG_CONFIG_HOME"),
    }

    assert_eq!(result.unwrap().port, 7001);
}
