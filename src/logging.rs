//! # Structured Logging Module
//!
//! Environment-aware structured logging to the console, as human-readable lines or as JSON
//! (`QUERY_CORE_LOG_FORMAT=json`). `RUST_LOG` overrides the environment's default level.

use chrono::Utc;
use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging with environment-specific configuration
pub fn init_structured_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let environment = get_environment();
        let log_level = get_log_level(&environment);
        let json = use_json_format();

        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level));

        let layer = if json {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(false)
                .json()
                .with_filter(filter)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(true)
                .with_filter(filter)
                .boxed()
        };

        // Another subscriber (an embedding application, a test harness) may already be set
        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            tracing::debug!(
                "Global tracing subscriber already initialized - continuing with existing subscriber"
            );
        }

        tracing::info!(
            environment = %environment,
            log_level = %log_level,
            json = json,
            "Structured logging initialized"
        );
    });
}

/// Get current environment from environment variables
fn get_environment() -> String {
    std::env::var("QUERY_CORE_ENV")
        .or_else(|_| std::env::var("APP_ENV"))
        .unwrap_or_else(|_| "development".to_string())
}

/// Get log level based on environment
fn get_log_level(environment: &str) -> String {
    match environment {
        "test" => "debug".to_string(),
        "development" => "debug".to_string(),
        "production" => "info".to_string(),
        _ => "debug".to_string(),
    }
}

fn use_json_format() -> bool {
    std::env::var("QUERY_CORE_LOG_FORMAT")
        .map(|format| format.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Log structured data for search operations
pub fn log_search_operation(
    operation: &str,
    filters: usize,
    page: Option<i64>,
    size: Option<i64>,
    returned: usize,
    total: Option<i64>,
    duration_ms: Option<u64>,
) {
    tracing::info!(
        operation = %operation,
        filters = filters,
        page = page,
        size = size,
        returned = returned,
        total = total,
        duration_ms = duration_ms,
        timestamp = %Utc::now().to_rfc3339(),
        "SEARCH_OPERATION"
    );
}

/// Log structured data for bulk update/delete operations
pub fn log_bulk_operation(
    operation: &str,
    table: &str,
    filters: usize,
    rows_affected: u64,
    duration_ms: Option<u64>,
) {
    tracing::info!(
        operation = %operation,
        table = %table,
        filters = filters,
        rows_affected = rows_affected,
        duration_ms = duration_ms,
        timestamp = %Utc::now().to_rfc3339(),
        "BULK_OPERATION"
    );
}

/// Log error with full context
pub fn log_error(component: &str, operation: &str, error: &str, context: Option<&str>) {
    tracing::error!(
        component = %component,
        operation = %operation,
        error = %error,
        context = context,
        timestamp = %Utc::now().to_rfc3339(),
        "ERROR"
    );
}
