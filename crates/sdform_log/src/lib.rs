//! `sdform_log` v1:
//! Process-wide tracing subscriber setup for the `sdform` binaries.

use tracing_subscriber::EnvFilter;

/// Directive used when `RUST_LOG` is unset or invalid.
pub const C_LOG_FILTER_DEFAULT: &str = "info";

/// Install the `fmt` subscriber filtered by `RUST_LOG` (default `info`).
///
/// Returns `false` when a global subscriber was already installed.
pub fn init_logging() -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(derive_env_filter())
        .with_target(false)
        .try_init()
        .is_ok()
}

fn derive_env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| C_LOG_FILTER_DEFAULT.into())
}
