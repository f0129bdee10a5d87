//! Integration tests for the configuration stack: defaults, TOML file,
//! environment overrides and CLI flags.

use clap::Parser;
use dupescan::cli::{Cli, Commands, OutputFormat, WindowMode};
use dupescan::config::{Config, ConfigError};
use dupescan::duplicates::ReportMode;
use dupescan::scanner::{HashAlgorithm, WindowPolicy};
use std::fs;
use std::sync::Mutex;
use tempfile::tempdir;

static ENV_MUTEX: Mutex<()> = Mutex::new(());

/// Clear all DUPESCAN_* environment variables to avoid interference.
fn clear_env() {
    for (key, _) in std::env::vars() {
        if key.starts_with("DUPESCAN_") {
            std::env::remove_var(key);
        }
    }
}

#[test]
fn test_config_load_from_toml() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
algorithm = "sha256"
window = "proportional"
window_percent = 25
report = "unique"
output = "json"
"#,
    )
    .unwrap();

    let config = Config::load_from_path(&path).unwrap();

    assert_eq!(config.algorithm, HashAlgorithm::Sha256);
    assert_eq!(config.window, WindowMode::Proportional);
    assert_eq!(config.window_policy(), WindowPolicy::Proportional(25));
    assert_eq!(config.report, ReportMode::Unique);
    assert_eq!(config.output, OutputFormat::Json);
    // untouched keys keep their defaults
    assert_eq!(config.window_size, 4096);
}

#[test]
fn test_config_env_overrides_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "algorithm = \"sha1\"\nwindow_size = 1024\n").unwrap();

    std::env::set_var("DUPESCAN_WINDOW_SIZE", "8192");
    let config = Config::load_from_path(&path);
    clear_env();

    let config = config.unwrap();
    assert_eq!(config.algorithm, HashAlgorithm::Sha1);
    assert_eq!(config.window_size, 8192);
}

#[test]
fn test_config_cli_overrides_everything() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "algorithm = \"sha1\"\nwindow = \"suffix\"\n").unwrap();

    let cli = Cli::try_parse_from(["dupescan", "scan", "/tmp", "--algorithm", "md5"]).unwrap();
    let Commands::Scan(args) = cli.command else {
        panic!("expected scan");
    };

    let config = Config::load_from_path(&path)
        .unwrap()
        .with_hashing_overrides(&args.hashing);

    assert_eq!(config.algorithm, HashAlgorithm::Md5);
    assert_eq!(config.window, WindowMode::Suffix);
    assert_eq!(config.window_policy(), WindowPolicy::Suffix(4096));
}

#[test]
fn test_config_missing_explicit_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();

    let err = Config::load_from_path(&dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(_)));
}

#[test]
fn test_config_malformed_file() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "algorithm = [not toml").unwrap();

    let err = Config::load_from_path(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Load(_)));
}

#[test]
fn test_config_unknown_algorithm() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "algorithm = \"crc32\"\n").unwrap();

    assert!(matches!(
        Config::load_from_path(&path),
        Err(ConfigError::Load(_))
    ));
}

#[test]
fn test_config_zero_window_rejected() {
    let _lock = ENV_MUTEX.lock().unwrap();
    clear_env();
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "window_size = 0\n").unwrap();

    assert!(matches!(
        Config::load_from_path(&path),
        Err(ConfigError::InvalidValue { .. })
    ));
}
