//! Telemetry helpers for applications embedding `plot-rs`.
//!
//! The layout pass logs through `tracing`. Hosts either call
//! `init_default_tracing` or install their own subscriber and filters.

/// Filter used when `RUST_LOG` is unset: layout-pass events from this crate only.
#[cfg(feature = "telemetry")]
const DEFAULT_FILTER: &str = "plot_rs=info";

/// Initializes a default `tracing` subscriber when the `telemetry` feature is enabled.
///
/// Returns `true` when initialization succeeds.
/// Returns `false` when the feature is disabled or a global subscriber was
/// already set by the host application.
#[must_use]
pub fn init_default_tracing() -> bool {
    #[cfg(feature = "telemetry")]
    {
        let builder = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_FILTER)),
            )
            .with_target(true)
            .compact();

        return builder.try_init().is_ok();
    }

    #[cfg(not(feature = "telemetry"))]
    {
        false
    }
}
