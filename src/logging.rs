//! Logging and tracing setup for Roster Core.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Directives used when `RUST_LOG` is unset. sqlx logs every statement at
/// `info`, which would drown the per-request trace lines.
const DEFAULT_DIRECTIVES: &str = "roster_core=info,tower_http=info,sqlx=warn";

fn env_filter(default_directives: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives))
}

/// Install the JSON subscriber used by the server.
///
/// Event fields are flattened into the top-level object so request logs
/// (`employee_id`, `team_id`, `removed`, ...) can be queried directly.
pub fn init() {
    tracing_subscriber::registry()
        .with(env_filter(DEFAULT_DIRECTIVES))
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .flatten_event(true)
                .with_current_span(false)
                .with_target(true)
                .with_file(true)
                .with_line_number(true),
        )
        .init();
}

/// Human-readable output captured by the test harness.
#[cfg(test)]
pub fn init_test() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_env_filter(env_filter("roster_core=debug,sqlx=warn"))
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directives_parse() {
        assert!(EnvFilter::try_new(DEFAULT_DIRECTIVES).is_ok());
        assert!(DEFAULT_DIRECTIVES.contains("sqlx=warn"));
    }
}
