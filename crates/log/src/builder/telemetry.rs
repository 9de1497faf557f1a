//! Sentry client setup and the `log` crate compatibility bridge.

/// Wraps `$subscriber` with the Sentry tracing layer when the `sentry`
/// feature is enabled; otherwise a no-op passthrough.
macro_rules! attach_sentry {
    ($subscriber:expr) => {{
        #[cfg(feature = "sentry")]
        {
            use tracing_subscriber::layer::SubscriberExt as _;
            $subscriber.with(sentry_tracing::layer())
        }
        #[cfg(not(feature = "sentry"))]
        {
            $subscriber
        }
    }};
}

/// Initializes the Sentry client (from `SENTRY_DSN`) and bridges the `log`
/// crate's records into `tracing`, for whichever of those features are on.
pub(super) fn init_telemetry(_inner: &mut super::Inner) {
    #[cfg(feature = "sentry")]
    {
        if let Ok(dsn) = std::env::var("SENTRY_DSN") {
            if !dsn.is_empty() {
                let guard = sentry::init((
                    dsn,
                    sentry::ClientOptions {
                        release: sentry::release_name!(),
                        ..Default::default()
                    },
                ));
                _inner.sentry_guard = Some(guard);
            }
        }
    }

    #[cfg(feature = "log-compat")]
    {
        let _ = tracing_log::LogTracer::init();
    }
}
