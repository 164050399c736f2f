//! Tracing setup shared by every front end of the SDK.
//!
//! Logs go to stderr so command output on stdout stays machine-readable.
//! The level applies to the BlogPilot crates; HTTP internals stay at `warn`
//! unless `RUST_LOG` says otherwise.
use std::sync::OnceLock;
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

const SDK_TARGETS: [&str; 4] = [
    "blogpilot_core",
    "blogpilot_query",
    "blogpilot_client",
    "blogpilot",
];

static LOG_RELOAD_HANDLE: OnceLock<reload::Handle<EnvFilter, tracing_subscriber::Registry>> =
    OnceLock::new();

/// Filter directives for `level`, e.g. `warn,blogpilot_query=debug,...`.
pub fn filter_directives(level: &str) -> String {
    let level = level.trim().to_ascii_lowercase();
    let mut directives = vec!["warn".to_string()];
    directives.extend(SDK_TARGETS.iter().map(|target| format!("{target}={level}")));
    directives.join(",")
}

fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::try_new(filter_directives(level)).unwrap_or_else(|_| EnvFilter::new("warn"))
}

pub fn init_tracing() {
    init_tracing_with_level("warn");
}

pub fn init_tracing_with_level(level: &str) {
    // RUST_LOG wins over the configured level.
    let base_filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|_| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| filter_for(level));

    let (reload_layer, handle) = reload::Layer::new(base_filter);
    let _ = LOG_RELOAD_HANDLE.set(handle);

    let _ = tracing_subscriber::registry()
        .with(reload_layer)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}

/// Change the level at runtime. Returns false before initialisation.
pub fn apply_logging_level(level: &str) -> bool {
    match LOG_RELOAD_HANDLE.get() {
        Some(handle) => handle.modify(|f| *f = filter_for(level)).is_ok(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directives_scope_sdk_crates() {
        let directives = filter_directives(" DEBUG ");
        assert!(directives.starts_with("warn,"));
        assert!(directives.contains("blogpilot_query=debug"));
        assert!(directives.contains(",blogpilot=debug"));
        assert!(!directives.contains("reqwest"));
    }

    #[test]
    fn test_level_change_needs_initialised_subscriber() {
        assert!(!apply_logging_level("debug"));
    }
}
