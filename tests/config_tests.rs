//! Configuration loading from files and the environment

use member_query_core::config::QueryCoreConfig;
use member_query_core::{CountStrategy, QueryError};
use std::io::Write;

fn write_config(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .expect("create temp config");
    file.write_all(contents.as_bytes()).expect("write temp config");
    file
}

#[test]
fn test_environment_overrides_file() {
    let file = write_config(
        r#"
[search]
default_page_size = 10
max_page_size = 100
count_strategy = "complex"
"#,
    );

    std::env::set_var("QUERY_CORE__SEARCH__MAX_PAGE_SIZE", "250");
    let loaded = QueryCoreConfig::load_from(file.path());
    std::env::remove_var("QUERY_CORE__SEARCH__MAX_PAGE_SIZE");

    let config = loaded.unwrap();
    assert_eq!(config.search.max_page_size, 250);
    assert_eq!(config.search.default_page_size, 10);
    assert_eq!(config.search.count_strategy, CountStrategy::Complex);
}

#[test]
fn test_invalid_file_values_are_configuration_errors() {
    let file = write_config(
        r#"
[search]
default_page_size = 500
max_page_size = 50
"#,
    );

    let err = QueryCoreConfig::load_from(file.path()).unwrap_err();
    assert!(matches!(err, QueryError::Configuration(_)));
    assert!(err.to_string().contains("default_page_size"));
}

#[test]
fn test_unknown_count_strategy_is_rejected() {
    let file = write_config(
        r#"
[search]
count_strategy = "exhaustive"
"#,
    );

    let err = QueryCoreConfig::load_from(file.path()).unwrap_err();
    assert!(matches!(err, QueryError::Configuration(_)));
}

#[test]
fn test_sample_config_loads() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("config/query_core.toml");
    let config = QueryCoreConfig::load_from(&path).unwrap();
    assert_eq!(config.database.max_connections, 10);
    assert_eq!(config.search.default_page_size, 20);
}
