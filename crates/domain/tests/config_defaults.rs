use std::io::Write;

use tb_domain::config::{Config, ConfigSeverity};

#[test]
fn default_namespace_and_poll_period() {
    let config = Config::default();
    assert_eq!(config.bridge.namespace, "telebridge");
    assert_eq!(config.bridge.poll_interval_ms, 1_000);
    assert_eq!(config.bridge.mock_command_delay_ms, 500);
}

#[test]
fn default_config_validates_clean() {
    assert!(Config::default().validate().is_empty());
}

#[test]
fn partial_toml_keeps_defaults() {
    let toml_str = r#"
[backend]
base_url = "http://10.1.1.1:8082/api"
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.backend.base_url.as_deref(), Some("http://10.1.1.1:8082/api"));
    assert_eq!(config.backend.local_url, "http://localhost:8082/api");
    assert_eq!(config.bridge.namespace, "telebridge");
}

#[test]
fn bridge_section_parses() {
    let toml_str = r#"
[bridge]
namespace = "lunar"
poll_interval_ms = 250
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    assert_eq!(config.bridge.namespace, "lunar");
    assert_eq!(config.bridge.poll_interval_ms, 250);
    assert_eq!(config.bridge.mock_command_delay_ms, 500);
}

#[test]
fn validate_flags_bad_values() {
    let toml_str = r#"
[backend]
base_url = "ftp://nope"
timeout_ms = 0

[bridge]
namespace = "a:b"
poll_interval_ms = 0
"#;
    let config: Config = toml::from_str(toml_str).unwrap();
    let issues = config.validate();
    let fields: Vec<&str> = issues.iter().map(|i| i.field.as_str()).collect();
    assert!(fields.contains(&"backend.base_url"));
    assert!(fields.contains(&"bridge.namespace"));
    assert!(fields.contains(&"bridge.poll_interval_ms"));
    let timeout = issues
        .iter()
        .find(|i| i.field == "backend.timeout_ms")
        .unwrap();
    assert_eq!(timeout.severity, ConfigSeverity::Warning);
}

#[test]
fn load_reads_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[bridge]\nnamespace = \"from-file\"").unwrap();
    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.bridge.namespace, "from-file");
}

#[test]
fn load_or_default_tolerates_missing_and_invalid_files() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    assert_eq!(Config::load_or_default(&missing).bridge.namespace, "telebridge");

    let bad = dir.path().join("bad.toml");
    std::fs::write(&bad, "this is = = not toml").unwrap();
    assert_eq!(Config::load_or_default(&bad).bridge.namespace, "telebridge");
}
