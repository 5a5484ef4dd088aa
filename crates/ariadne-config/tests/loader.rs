//! File-backed loader tests.

use std::io::Write;

use ariadne_config::{ConfigError, ConfigLoader, LogFormat};
use tempfile::{Builder, NamedTempFile};

fn config_file(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn loads_toml_file() {
    let file = config_file(
        ".toml",
        r#"
            [server]
            http_addr = "127.0.0.1:3000"
            shutdown_timeout_secs = 10

            [routing]
            strict = true

            [telemetry.logging]
            level = "debug"
            format = "pretty"
        "#,
    );

    let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();

    assert_eq!(config.server.http_addr, "127.0.0.1:3000");
    assert_eq!(config.server.shutdown_timeout_secs, 10);
    assert!(config.routing.strict);
    assert_eq!(config.telemetry.logging.level, "debug");
    assert_eq!(config.telemetry.logging.format, LogFormat::Pretty);
    assert!(!config.telemetry.metrics.enabled);
}

#[test]
fn loads_json_file() {
    let file = config_file(
        ".json",
        r#"{"telemetry": {"metrics": {"enabled": true, "addr": "127.0.0.1:9100"}}}"#,
    );

    let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();

    assert!(config.telemetry.metrics.enabled);
    assert_eq!(config.telemetry.metrics.addr, "127.0.0.1:9100");
    assert_eq!(config.server.http_addr, "0.0.0.0:8080");
}

#[test]
fn rejects_unknown_field_in_file() {
    let file = config_file(".toml", "[server]\nport = 8080\n");

    let err = ConfigLoader::new().with_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::TomlError(_)));
}

#[test]
fn rejects_unsupported_extension() {
    let file = config_file(".yaml", "server: {}\n");

    let err = ConfigLoader::new().with_file(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::UnsupportedFormat { .. }));
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let err = ConfigLoader::new().with_file(&path).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound { .. }));
}

#[test]
fn missing_optional_file_keeps_current_layer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");

    let config = ConfigLoader::new()
        .with_development()
        .with_optional_file(&path)
        .unwrap()
        .load()
        .unwrap();

    assert_eq!(config.telemetry.logging.level, "debug");
}

#[test]
fn invalid_values_fail_on_load() {
    let file = config_file(".toml", "[server]\nhttp_addr = \"not-an-address\"\n");

    let loader = ConfigLoader::new().with_file(file.path()).unwrap();
    let err = loader.load().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { .. }));
}

#[test]
fn telemetry_section_converts_for_init() {
    let file = config_file(
        ".toml",
        r#"
            [telemetry.logging]
            level = "ariadne_server=debug,warn"
            include_location = true
        "#,
    );

    let config = ConfigLoader::new().with_file(file.path()).unwrap().load().unwrap();
    let telemetry = config.telemetry.to_telemetry_config();

    assert_eq!(telemetry.logging.level, "ariadne_server=debug,warn");
    assert!(telemetry.logging.json_format);
    assert!(telemetry.logging.file_line_info);
    assert!(!telemetry.metrics.enabled);
}
