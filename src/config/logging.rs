use tracing_subscriber::{ layer::SubscriberExt, util::SubscriberInitExt };

/// Initializes the application's logging and tracing infrastructure.
///
/// Builds a layered subscriber: a registry coordinating an `EnvFilter` layer
/// (verbosity controlled via `RUST_LOG`, e.g. `RUST_LOG=volunteer_hub=debug`)
/// and a formatting layer writing to stdout.
///
/// If `RUST_LOG` is unset the filter falls back to `info` for application
/// code and `warn` for diesel, which keeps SQL query noise out of the logs
/// while preserving visibility into application logic.
///
/// Call exactly once, at the start of main(). The installed subscriber is
/// global and thread-safe.
pub fn init_logging() {
    tracing_subscriber
        ::registry()
        .with(
            tracing_subscriber::EnvFilter
                ::try_from_default_env()
                .unwrap_or_else(|_| "info,diesel=warn".into())
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
