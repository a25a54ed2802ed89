//! Tracing setup for hosts embedding `chart-series`.
//!
//! The pipeline only emits `tracing` events: data replacement and store
//! truncation at `debug`, per-frame work (upserts, renderer rebuilds,
//! auto-scale passes) at `trace`. Hosts either install their own subscriber
//! or call one of the helpers below with the `telemetry` feature enabled.

/// Environment variable read by [`init_default_tracing`].
pub const LOG_ENV_VAR: &str = "CHART_SERIES_LOG";

/// Filter used when [`LOG_ENV_VAR`] is unset or unparsable.
pub const DEFAULT_DIRECTIVES: &str = "chart_series=info";

/// Installs a compact `fmt` subscriber filtered by [`LOG_ENV_VAR`].
///
/// Returns `false` when the `telemetry` feature is disabled or the host
/// already set a global subscriber.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_DIRECTIVES));
        install(filter)
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}

/// Same as [`init_default_tracing`] with explicit filter directives, for
/// example `"chart_series=trace"`.
#[must_use]
pub fn init_tracing_with_directives(directives: &str) -> bool {
    #[cfg(feature = "telemetry")]
    {
        match tracing_subscriber::EnvFilter::try_new(directives) {
            Ok(filter) => install(filter),
            Err(_) => false,
        }
    }

    #[cfg(not(feature = "telemetry"))]
    {
        let _ = directives;
        false
    }
}

#[cfg(feature = "telemetry")]
fn install(filter: tracing_subscriber::EnvFilter) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .compact()
        .try_init()
        .is_ok()
}
