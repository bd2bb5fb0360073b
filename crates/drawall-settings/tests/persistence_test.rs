use drawall_core::{Anchor, ErrorCode};
use drawall_settings::{load_config, save_config, PlotterConfig, SettingsError};
use std::fs;
use tempfile::TempDir;

fn sample() -> PlotterConfig {
    PlotterConfig {
        span: 1400.0,
        scale_x: 0.8,
        right_direction: false,
        init_position: Anchor::UpperRight,
        ..PlotterConfig::default()
    }
}

#[test]
fn test_json_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("drawall.json");
    save_config(&sample(), &path).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    assert!(text.contains("\"sheetPositionX\""));
    assert!(text.contains("\"UPPER_RIGHT\""));

    let report = load_config(&path).unwrap();
    assert_eq!(report.config, sample());
    assert!(report.warnings.is_empty());
}

#[test]
fn test_toml_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("drawall.toml");
    save_config(&sample(), &path).unwrap();
    assert_eq!(load_config(&path).unwrap().config, sample());
}

#[test]
fn test_catalog_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("CONFIG.TXT");
    save_config(&sample(), &path).unwrap();
    assert!(fs::read_to_string(&path).unwrap().starts_with("span 1400\n"));
    assert_eq!(load_config(&path).unwrap().config, sample());
}

#[test]
fn test_partial_json_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("partial.json");
    fs::write(&path, r#"{ "span": 1100, "defaultSpeed": 30 }"#).unwrap();
    let config = load_config(&path).unwrap().config;
    assert_eq!(config.span, 1100.0);
    assert_eq!(config.default_speed, 30.0);
    assert_eq!(config.steps, PlotterConfig::default().steps);
}

#[test]
fn test_invalid_config_is_not_saved() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    let config = PlotterConfig {
        span: 100.0,
        ..PlotterConfig::default()
    };
    let err = save_config(&config, &path).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::TooShortSpan));
    assert!(!path.exists());
}

#[test]
fn test_short_span_rejected_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("short.toml");
    fs::write(&path, "span = 500.0\n").unwrap();
    let err = load_config(&path).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::TooShortSpan));
}

#[test]
fn test_malformed_json() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(&path, "{ span: ").unwrap();
    assert!(matches!(load_config(&path), Err(SettingsError::JsonError(_))));
}

#[test]
fn test_file_errors_carry_codes() {
    let dir = TempDir::new().unwrap();
    let err = load_config(dir.path()).unwrap_err();
    assert_eq!(err.code(), Some(ErrorCode::FileNotReadable));

    let path = dir.path().join("missing").join("drawall.json");
    let err = save_config(&sample(), &path).unwrap_err();
    assert!(matches!(err, SettingsError::SaveError(_)));
    assert_eq!(err.code(), None);
}
