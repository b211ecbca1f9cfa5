// tests/logging.rs

use tabledump::cli::LogLevel;
use tabledump::logging::build_filter;
use tracing_subscriber::filter::LevelFilter;

#[test]
fn cli_level_wins_over_environment() {
    let filter = build_filter(Some(LogLevel::Warn), Some("trace")).unwrap();

    assert_eq!(filter.max_level_hint(), Some(LevelFilter::WARN));
}

#[test]
fn environment_accepts_per_module_directives() {
    let filter = build_filter(None, Some("info,tabledump::exec=debug")).unwrap();

    assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
}

#[test]
fn blank_or_missing_environment_defaults_to_info() {
    for env in [None, Some(""), Some("   ")] {
        let filter = build_filter(None, env).unwrap();
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::INFO));
    }
}

#[test]
fn malformed_directives_are_rejected() {
    let err = build_filter(None, Some("tabledump::exec=loud")).unwrap_err();

    assert!(err.to_string().contains("TABLEDUMP_LOG"));
}
