//! Logging initialisation for the `lifewall` binary.
//!
//! The library logs through the `log` facade; the subscriber installed here
//! picks those records up through its `tracing-log` bridge. Output goes to
//! stderr, filtered by `RUST_LOG` (default `info`, or `debug` with
//! `--verbose`).

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init();
}
