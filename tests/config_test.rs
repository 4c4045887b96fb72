//! Integration tests for Settings loading from a local `.mediassist.toml`.
//!
//! A global config or MEDIASSIST_* variables on the host may change any
//! field, so assertions compare against a load without a local file and only
//! pin down what the local file sets.

use std::fs;
use std::path::PathBuf;

use chrono::{FixedOffset, TimeZone};
use tempfile::TempDir;

use mediassist::config::{local_config_path, ScopeSetting, Settings};
use mediassist::domain::SummaryScope;

#[test]
fn given_no_local_config_when_load_then_same_as_without_local_dir() {
    let dir = TempDir::new().unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");

    assert_eq!(settings, Settings::load(None).expect("load settings"));
}

#[test]
fn given_local_config_when_load_then_overrides_only_given_fields() {
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        r#"
records_file = "/var/lib/clinic/records.txt"

[clock]
utc_offset_hours = 0
zone_label = "UTC"
"#,
    )
    .unwrap();

    let settings = Settings::load(Some(dir.path())).expect("load settings");
    let baseline = Settings::load(Some(TempDir::new().unwrap().path())).unwrap();

    assert_eq!(
        settings.records_file,
        PathBuf::from("/var/lib/clinic/records.txt")
    );
    assert_eq!(settings.clock.zone_label, "UTC");
    assert_eq!(settings.clock.offset().unwrap(), FixedOffset::east_opt(0).unwrap());
    assert_eq!(settings.traversal, baseline.traversal);
    assert_eq!(settings.summary, baseline.summary);
}

#[test]
fn given_week_scope_when_load_then_summary_scope_is_current_week() {
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "[summary]\nscope = \"week\"\n",
    )
    .unwrap();

    let settings = Settings::load(Some(dir.path())).unwrap();
    let now = FixedOffset::east_opt(5 * 3600)
        .unwrap()
        .with_ymd_and_hms(2026, 10, 17, 9, 0, 0)
        .unwrap();

    assert_eq!(settings.summary.scope, ScopeSetting::Week);
    assert_eq!(
        settings.summary_scope(&now),
        SummaryScope::IsoWeek {
            year: 2026,
            week: 42
        }
    );
}

#[test]
fn given_zero_max_steps_when_load_then_config_error() {
    let dir = TempDir::new().unwrap();
    fs::write(
        local_config_path(dir.path()),
        "[traversal]\nmax_steps = 0\n",
    )
    .unwrap();

    let err = Settings::load(Some(dir.path())).unwrap_err();

    assert!(err.to_string().contains("max_steps"));
}

#[test]
fn given_malformed_toml_when_load_then_error_names_file() {
    let dir = TempDir::new().unwrap();
    fs::write(local_config_path(dir.path()), "records_file = [").unwrap();

    let err = Settings::load(Some(dir.path())).unwrap_err();

    assert!(err.to_string().contains(".mediassist.toml"));
}
