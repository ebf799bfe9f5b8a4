//! Tracing setup for binaries embedding `sales-dashboard`.
//!
//! The library only emits `tracing` events. Hosts either call
//! [`init_default_tracing`] (with the `telemetry` feature) or install their
//! own subscriber.

/// Filter used when `RUST_LOG` is unset: this crate's fetch, cache and
/// render events at `info`, everything else (reqwest, hyper) at `warn`.
pub const DEFAULT_FILTER: &str = "warn,sales_dashboard=info";

/// Installs an `fmt` subscriber filtered by `RUST_LOG`, falling back to
/// [`DEFAULT_FILTER`], when the `telemetry` feature is enabled.
///
/// Returns `false` when the feature is disabled or a global subscriber was
/// already installed.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        use tracing_subscriber::EnvFilter;

        let filter = match EnvFilter::try_from_default_env() {
            Ok(filter) => filter,
            Err(_) => EnvFilter::new(DEFAULT_FILTER),
        };
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok()
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
