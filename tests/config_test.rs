//! Tests for configuration loading.

use crosswire::PeerConfig;
use std::io::Write;
use std::time::Duration;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(contents.as_bytes()).expect("Failed to write config");
    file
}

#[test]
fn test_load_full_config() {
    let file = write_config(
        r#"
name = "alice"
host = "192.168.1.20"
port = 5000
max_attempts = 3
connect_timeout_secs = 4
read_timeout_secs = 30
"#,
    );

    let config = PeerConfig::from_file(file.path()).expect("Config should parse");
    let settings = config.join_settings().expect("Settings should validate");

    assert_eq!(settings.name().as_ref().map(|n| n.as_str()), Some("alice"));
    assert_eq!(
        settings.endpoint().as_ref().map(|e| e.to_string()),
        Some("192.168.1.20:5000".to_string())
    );
    assert_eq!(*settings.policy().max_attempts(), Some(3));
    assert_eq!(*settings.read_timeout(), Some(Duration::from_secs(30)));
    assert_eq!(
        config.connect_timeout().expect("Timeout should validate"),
        Some(Duration::from_secs(4))
    );
}

#[test]
fn test_empty_file_is_all_defaults() {
    let file = write_config("");
    let config = PeerConfig::from_file(file.path()).expect("Empty config should parse");
    assert_eq!(config, PeerConfig::default());
}

#[test]
fn test_missing_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let config = PeerConfig::load(dir.path().join("absent.toml")).expect("Missing file is fine");
    assert_eq!(config, PeerConfig::default());
}

#[test]
fn test_unknown_key_is_rejected() {
    let file = write_config("colour = \"blue\"\n");
    let err = PeerConfig::from_file(file.path()).expect_err("Unknown key should fail");
    assert!(err.message.starts_with("Failed to parse config"));
}

#[test]
fn test_wrong_type_is_rejected() {
    let file = write_config("port = \"five thousand\"\n");
    assert!(PeerConfig::from_file(file.path()).is_err());
}

#[test]
fn test_host_settings_carry_timeout() {
    let file = write_config("name = \"bob\"\nread_timeout_secs = 5\n");
    let config = PeerConfig::from_file(file.path()).expect("Config should parse");
    let settings = config.host_settings().expect("Settings should validate");
    assert_eq!(settings.name().as_ref().map(|n| n.as_str()), Some("bob"));
    assert_eq!(*settings.read_timeout(), Some(Duration::from_secs(5)));
}

#[test]
fn test_zero_read_timeout_is_rejected() {
    let file = write_config("read_timeout_secs = 0\n");
    let config = PeerConfig::from_file(file.path()).expect("Config should parse");

    let err = config.join_settings().expect_err("Zero read timeout should fail");
    assert!(err.message.contains("read_timeout_secs"));
    assert!(config.host_settings().is_err());
}

#[test]
fn test_zero_connect_timeout_is_rejected() {
    let file = write_config("host = \"127.0.0.1\"\nport = 5000\nconnect_timeout_secs = 0\n");
    let config = PeerConfig::from_file(file.path()).expect("Config should parse");

    let err = config.join_settings().expect_err("Zero connect timeout should fail");
    assert!(err.message.contains("connect_timeout_secs"));
    assert!(config.connect_timeout().is_err());
}

#[test]
fn test_zero_timeout_from_flags_overrides_valid_file() {
    let file = write_config("read_timeout_secs = 10\n");
    let overrides = PeerConfig::new(None, None, None, None, None, Some(0));
    let config = PeerConfig::from_file(file.path())
        .expect("Config should parse")
        .merge(overrides);

    assert!(config.join_settings().is_err());
}
