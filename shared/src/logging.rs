//! Shared logging utilities for consistent tracing across the relay

use chrono::{DateTime, Utc};
use tracing::{error, info};

/// Crates whose events pass the filter at the requested level
const WORKSPACE_TARGETS: [&str; 2] = ["experiment_server", "shared"];

/// Build the filter directive string for a base level such as `"debug"`
pub fn filter_directives(log_level: Option<&str>) -> String {
    let base_level = log_level.unwrap_or("info");

    let mut directives: Vec<String> = WORKSPACE_TARGETS
        .iter()
        .map(|target| format!("{target}={base_level}"))
        .collect();
    directives.push("tower_http=debug".to_string());
    directives.push(format!("axum={base_level}"));
    directives.push("hyper=warn".to_string());

    directives.join(",")
}

/// Initialize the stdout tracing subscriber
pub fn init_tracing(log_level: Option<&str>) {
    use tracing_subscriber::{EnvFilter, fmt};

    let directives = filter_directives(log_level);
    println!("📊 Log level: {directives}");

    fmt()
        .with_env_filter(EnvFilter::new(&directives))
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Macro for connection-aware info logging
#[macro_export]
macro_rules! conn_info {
    ($connection_id:expr, $($arg:tt)*) => {
        tracing::info!(
            connection = %$connection_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for connection-aware warning logging
#[macro_export]
macro_rules! conn_warn {
    ($connection_id:expr, $($arg:tt)*) => {
        tracing::warn!(
            connection = %$connection_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for connection-aware error logging
#[macro_export]
macro_rules! conn_error {
    ($connection_id:expr, $($arg:tt)*) => {
        tracing::error!(
            connection = %$connection_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for connection-aware debug logging
#[macro_export]
macro_rules! conn_debug {
    ($connection_id:expr, $($arg:tt)*) => {
        tracing::debug!(
            connection = %$connection_id,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

pub fn log_startup(details: &str) {
    info!(timestamp = format_timestamp(), "🚀 Starting {}", details);
}

pub fn log_shutdown(reason: &str) {
    info!(timestamp = format_timestamp(), "🛑 Shutting down: {}", reason);
}

pub fn log_error(context: &str, error: &dyn std::fmt::Display) {
    error!(
        timestamp = format_timestamp(),
        error = %error,
        "❌ {} failed: {}",
        context,
        error
    );
}

pub fn log_success(message: &str) {
    info!(timestamp = format_timestamp(), "✅ {}", message);
}
