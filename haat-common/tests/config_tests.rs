//! Tests for configuration loading, atomic writes and key resolution
//!
//! Tests that touch HAAT_GEMINI_API_KEY or HAAT_CONFIG are marked #[serial]
//! so they never race on the process environment.

use haat_common::config::{
    is_valid_key, load_or_default, load_toml_config, resolve_config_path,
    resolve_oracle_api_key, write_toml_config, TomlConfig, CONFIG_PATH_ENV, DEFAULT_PORT,
    ORACLE_API_KEY_ENV,
};
use haat_common::Error;
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_defaults() {
    let config = TomlConfig::default();
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.bind_addr, "127.0.0.1");
    assert_eq!(config.max_query_len, 500);
    assert_eq!(config.logging.level, "info");
    assert!(config.oracle.enabled);
    assert_eq!(config.oracle.model, "gemini-pro");
    assert!(config.oracle.api_key.is_none());
}

#[test]
fn test_partial_file_fills_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("haat-assist.toml");
    std::fs::write(&path, "port = 6100\n\n[oracle]\nenabled = false\n").unwrap();

    let config = load_toml_config(&path).unwrap();
    assert_eq!(config.port, 6100);
    assert!(!config.oracle.enabled);
    assert_eq!(config.oracle.timeout_secs, 15);
    assert_eq!(config.max_query_len, 500);
}

#[test]
fn test_missing_file_yields_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("absent.toml");

    let config = load_or_default(Some(&path)).unwrap();
    assert_eq!(config, TomlConfig::default());
    assert_eq!(load_or_default(None).unwrap(), TomlConfig::default());
}

#[test]
fn test_malformed_file_is_an_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("broken.toml");
    std::fs::write(&path, "port = \"not a number\"").unwrap();

    let err = load_or_default(Some(&path)).unwrap_err();
    assert!(matches!(err, Error::ConfigParse { .. }), "{:?}", err);
    assert!(err.to_string().contains("broken.toml"));
    assert!(!err.is_invalid_input());
}

#[test]
fn test_unwritable_parent_is_config_io_error() {
    let temp_dir = TempDir::new().unwrap();
    let blocker = temp_dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();

    let err = write_toml_config(&TomlConfig::default(), &blocker.join("haat-assist.toml"))
        .unwrap_err();
    match err {
        Error::ConfigIo { action, path, .. } => {
            assert_eq!(action, "Create");
            assert_eq!(path, blocker);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_write_then_load() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("haat-assist.toml");

    let mut config = TomlConfig::default();
    config.port = 7001;
    config.oracle.api_key = Some("secret-key".to_string());

    write_toml_config(&config, &path).unwrap();

    assert!(path.exists());
    assert!(!temp_dir
        .path()
        .join("nested")
        .join("haat-assist.toml.tmp")
        .exists());
    assert_eq!(load_toml_config(&path).unwrap(), config);
}

#[cfg(unix)]
#[test]
fn test_written_file_is_owner_only() {
    use std::os::unix::fs::PermissionsExt;

    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("haat-assist.toml");
    write_toml_config(&TomlConfig::default(), &path).unwrap();

    let mode = std::fs::metadata(&path).unwrap().permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn test_is_valid_key() {
    assert!(is_valid_key("abc"));
    assert!(!is_valid_key(""));
    assert!(!is_valid_key("   \t"));
}

#[test]
#[serial]
fn test_config_path_cli_beats_env() {
    env::set_var(CONFIG_PATH_ENV, "/tmp/from-env.toml");

    let cli = PathBuf::from("/tmp/from-cli.toml");
    assert_eq!(resolve_config_path(Some(&cli)), Some(cli.clone()));
    assert_eq!(
        resolve_config_path(None),
        Some(PathBuf::from("/tmp/from-env.toml"))
    );

    env::remove_var(CONFIG_PATH_ENV);
}

#[test]
#[serial]
fn test_api_key_env_beats_toml() {
    env::set_var(ORACLE_API_KEY_ENV, "env-key");

    let mut config = TomlConfig::default();
    config.oracle.api_key = Some("toml-key".to_string());
    assert_eq!(resolve_oracle_api_key(&config).as_deref(), Some("env-key"));

    env::remove_var(ORACLE_API_KEY_ENV);
}

#[test]
#[serial]
fn test_api_key_falls_back_to_toml() {
    env::remove_var(ORACLE_API_KEY_ENV);

    let mut config = TomlConfig::default();
    config.oracle.api_key = Some("toml-key".to_string());
    assert_eq!(resolve_oracle_api_key(&config).as_deref(), Some("toml-key"));
}

#[test]
#[serial]
fn test_blank_keys_are_ignored() {
    env::set_var(ORACLE_API_KEY_ENV, "   ");

    let mut config = TomlConfig::default();
    config.oracle.api_key = Some(String::new());
    assert_eq!(resolve_oracle_api_key(&config), None);

    env::remove_var(ORACLE_API_KEY_ENV);
}
