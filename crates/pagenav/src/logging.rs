//! Log output for scenario runs.
//!
//! Every interaction emits a `debug` event carrying the node and control,
//! every wait poll a `trace` event. Filter with the `PAGENAV_LOG`
//! environment variable, e.g. `PAGENAV_LOG=pagenav=debug`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "PAGENAV_LOG";

/// Filter used when `PAGENAV_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "pagenav=info";

/// Install a test-friendly fmt subscriber.
///
/// Output goes through the test writer so `cargo test` captures it per
/// test. Safe to call from every test; only the first call installs.
pub fn init_test_logging() {
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .with_target(false)
        .try_init();
}
