//! Tracing initialisation for processes embedding the collusion core.
//!
//! Call [`init_tracing`] once at program start, or [`init_tracing_from_env`]
//! to pick the output format from `COLLUSION_LOG_FORMAT` (`json` or
//! anything else for human-readable lines). Later calls are ignored: the
//! global subscriber can only be set once per process.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "COLLUSION_LOG_FORMAT";

/// Initialise the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over `level` when set. Returns `true` if
/// this call installed the subscriber.
pub fn init_tracing(json: bool, level: Level) -> bool {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry
            .with(fmt::layer().with_target(false).json())
            .try_init()
            .is_ok()
    } else {
        registry
            .with(fmt::layer().with_target(false))
            .try_init()
            .is_ok()
    }
}

/// Whether `COLLUSION_LOG_FORMAT` requests JSON output.
pub fn json_requested() -> bool {
    std::env::var(LOG_FORMAT_ENV)
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// [`init_tracing`] with the format taken from the environment.
pub fn init_tracing_from_env(level: Level) -> bool {
    init_tracing(json_requested(), level)
}
