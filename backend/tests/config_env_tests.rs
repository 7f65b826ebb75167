//! Tests for configuration loading from files and the process environment.

mod support;

use std::io::Write;

use power_dash::config::{DashboardConfig, CONFIG_PATH_ENV};
use power_dash::db::SourceKind;
use power_dash::models::Role;
use power_dash::services::{FillPolicy, MissingValuePolicy};

const CLEARED: [(&str, Option<&str>); 6] = [
    (CONFIG_PATH_ENV, None),
    ("SOURCE_KIND", None),
    ("DATABASE_URL", None),
    ("PG_DATABASE_URL", None),
    ("HOST", None),
    ("PORT", None),
];

fn with_env<R>(extra: &[(&str, Option<&str>)], f: impl FnOnce() -> R) -> R {
    let mut changes = CLEARED.to_vec();
    changes.extend_from_slice(extra);
    support::with_scoped_env(&changes, f)
}

#[test]
fn test_empty_file_loads_defaults() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let path = file.path().to_str().unwrap().to_string();
    with_env(&[(CONFIG_PATH_ENV, Some(path.as_str()))], || {
        let config = DashboardConfig::load().unwrap();
        assert_eq!(config.source_kind().unwrap(), SourceKind::Synthetic);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.default_role, Role::Viewer);
    });
}

#[test]
fn test_load_from_file_with_env_overrides() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
[source]
kind = "synthetic"

[aggregation]
missing_values = "treat_as_zero"
fill_missing = "zero"
spread_threshold = 15.0

[server]
port = 9000
default_role = "analyst"
"#
    )
    .unwrap();
    let path = file.path().to_str().unwrap().to_string();

    with_env(
        &[(CONFIG_PATH_ENV, Some(path.as_str())), ("PORT", Some("9100"))],
        || {
            let config = DashboardConfig::load().unwrap();
            assert_eq!(config.aggregation.missing_values, MissingValuePolicy::TreatAsZero);
            assert_eq!(config.aggregation.fill_missing, FillPolicy::Zero);
            assert_eq!(config.aggregation.spread_threshold, 15.0);
            assert_eq!(config.server.port, 9100);
            assert_eq!(config.server.default_role, Role::Analyst);
        },
    );
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    with_env(&[(CONFIG_PATH_ENV, Some(missing.to_str().unwrap()))], || {
        assert!(DashboardConfig::load().is_err());
    });
}

#[test]
fn test_database_url_selects_live_source() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let path = file.path().to_str().unwrap().to_string();
    with_env(
        &[
            (CONFIG_PATH_ENV, Some(path.as_str())),
            ("DATABASE_URL", Some("postgres://localhost/power")),
        ],
        || {
            let config = DashboardConfig::load().unwrap();
            assert_eq!(config.source_kind().unwrap(), SourceKind::Live);
            assert_eq!(config.postgres.database_url, "postgres://localhost/power");
        },
    );
}

#[test]
fn test_invalid_port_is_reported() {
    let file = tempfile::NamedTempFile::new().unwrap();
    let path = file.path().to_str().unwrap().to_string();
    with_env(
        &[
            (CONFIG_PATH_ENV, Some(path.as_str())),
            ("PORT", Some("eighty")),
        ],
        || {
            assert!(DashboardConfig::load().is_err());
        },
    );
}

#[test]
fn test_example_file_matches_defaults() {
    let config = DashboardConfig::parse(include_str!("../dashboard.example.toml")).unwrap();
    config.validate().unwrap();
    assert_eq!(config, DashboardConfig::default());
}
