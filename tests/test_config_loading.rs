//! Configuration loading and validation tests
//!
//! Tests focus on BEHAVIOR of configuration loading, validation, and error handling.
//! `server.port` is not asserted because `PORT` may be set in the environment.

use dietplan::config::{ConfigError, DietConfig};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    writeln!(temp_file, "{content}").unwrap();
    temp_file
}

#[test]
fn test_config_loads_successfully_from_valid_toml() {
    let temp_file = write_config(
        r#"
[server]
host = "127.0.0.1"
port = 8081

[storage]
path = "data/dietplan.json"

[planner]
max_options_per_meal = 4
days_per_week = 5
seed = 42
"#,
    );

    let config = DietConfig::load_from_file(temp_file.path()).unwrap();

    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(
        config.storage.path,
        Some(PathBuf::from("data/dietplan.json"))
    );
    assert_eq!(config.planner.max_options_per_meal, 4);
    assert_eq!(config.planner.days_per_week, 5);
    assert_eq!(config.planner.seed, Some(42));
}

#[test]
fn test_config_applies_defaults_for_missing_sections() {
    let temp_file = write_config("");

    let config = DietConfig::load_from_file(temp_file.path()).unwrap();

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.storage.path, None);
    assert_eq!(config.planner.max_options_per_meal, 6);
    assert_eq!(config.planner.days_per_week, 7);
    assert_eq!(config.planner.seed, None);
}

#[test]
fn test_config_applies_defaults_within_partial_section() {
    let temp_file = write_config(
        r#"
[planner]
seed = 1
"#,
    );

    let config = DietConfig::load_from_file(temp_file.path()).unwrap();

    assert_eq!(config.planner.seed, Some(1));
    assert_eq!(config.planner.max_options_per_meal, 6);
}

#[test]
fn test_config_fails_with_invalid_toml_syntax() {
    let temp_file = write_config("[server\nhost = ");

    let result = DietConfig::load_from_file(temp_file.path());

    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_config_fails_with_wrong_value_type() {
    let temp_file = write_config(
        r#"
[planner]
days_per_week = "seven"
"#,
    );

    assert!(DietConfig::load_from_file(temp_file.path()).is_err());
}

#[test]
fn test_config_fails_when_file_missing() {
    let result = DietConfig::load_from_file(std::path::Path::new("/nonexistent/dietplan.toml"));

    assert!(matches!(result, Err(ConfigError::FileRead(_))));
}

#[test]
fn test_config_rejects_invalid_host() {
    let temp_file = write_config(
        r#"
[server]
host = "not an address"
"#,
    );

    let result = DietConfig::load_from_file(temp_file.path());

    assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
}

#[test]
fn test_config_rejects_out_of_range_planner_settings() {
    for planner in [
        "max_options_per_meal = 0",
        "days_per_week = 0",
        "days_per_week = 8",
    ] {
        let temp_file = write_config(&format!("[planner]\n{planner}\n"));
        let result = DietConfig::load_from_file(temp_file.path());
        assert!(
            matches!(result, Err(ConfigError::InvalidConfig(_))),
            "expected rejection for {planner}"
        );
    }
}

#[test]
fn test_config_round_trips_through_toml() {
    let config = DietConfig::default();
    let rendered = toml::to_string_pretty(&config).unwrap();
    let temp_file = write_config(&rendered);

    let loaded = DietConfig::load_from_file(temp_file.path()).unwrap();

    assert_eq!(loaded.planner, config.planner);
    assert_eq!(loaded.storage, config.storage);
    assert_eq!(loaded.server.host, config.server.host);
}

#[test]
fn test_bind_address_uses_host_and_port() {
    let config = DietConfig::default();
    let addr = config.bind_address().unwrap();

    assert!(addr.ip().is_unspecified());
    assert_eq!(addr.port(), config.server.port);
}
