#![forbid(unsafe_code)]

//! Logging targets and subscriber installation.
//!
//! Library code only emits `tracing` events; installing a subscriber is the
//! host's decision. With the `tracing-json` feature enabled,
//! [`init_json_logging`] installs a JSON formatter filtered by `RUST_LOG`
//! (falling back to the given directive).

/// Target for config loading events.
pub const TARGET_CONFIG: &str = "dtoggle.config";
/// Target for gesture state machine events.
pub const TARGET_GESTURE: &str = "dtoggle.gesture";
/// Target for optimistic state reconciliation events.
pub const TARGET_RECONCILE: &str = "dtoggle.reconcile";
/// Target for window listener bookkeeping.
pub const TARGET_LISTENERS: &str = "dtoggle.listeners";
/// Target for host queue events.
pub const TARGET_HOST: &str = "dtoggle.host";

pub use tracing::{debug, debug_span, error, info, trace, warn};

/// Install a global JSON subscriber.
///
/// `default_directive` is used when `RUST_LOG` is unset or invalid, e.g.
/// `"dtoggle=debug"`. Returns an error if a global subscriber is already set.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging(
    default_directive: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync + 'static>> {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directive))?;
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
}
