//! Tracing setup for hosts embedding the provider.
//!
//! `RUST_LOG` takes precedence over the level passed in. Once a subscriber is
//! installed its filter can be swapped with [`apply_logging_level`].

use std::sync::OnceLock;

use tracing_subscriber::{EnvFilter, Registry, fmt, prelude::*, reload};

static LOG_RELOAD_HANDLE: OnceLock<reload::Handle<EnvFilter, Registry>> = OnceLock::new();

/// HTTP internals stay at `warn` unless `RUST_LOG` says otherwise.
fn filter_for(level: &str) -> EnvFilter {
    EnvFilter::new(format!("{level},hyper=warn,hyper_util=warn,reqwest=warn"))
}

/// Installs the global subscriber, writing to stderr so stdout stays clean
/// for records and schemas. Returns `false` if one was already installed.
pub fn init_tracing_with_level(level: &str) -> bool {
    let base_filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|_| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| filter_for(level));

    let (reload_layer, handle) = reload::Layer::new(base_filter);
    if LOG_RELOAD_HANDLE.set(handle).is_err() {
        return false;
    }

    tracing_subscriber::registry()
        .with(reload_layer)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init()
        .is_ok()
}

/// Replaces the active filter. Returns `false` when tracing was never initialised.
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
    fn test_filter_quiets_http_internals() {
        let rendered = filter_for("debug").to_string();
        assert!(rendered.contains("debug"));
        assert!(rendered.contains("reqwest=warn"));
    }

    #[test]
    fn test_level_can_change_after_init() {
        init_tracing_with_level("warn");
        assert!(!init_tracing_with_level("info"));
        assert!(apply_logging_level("debug"));
    }
}
