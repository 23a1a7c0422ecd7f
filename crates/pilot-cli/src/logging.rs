//! Diagnostic tracing for the `pilot` binary.
//!
//! Reads `RUST_LOG`; defaults to `warn`. Output goes to stderr in compact
//! form so it never mixes with the board or JSON written to stdout.
//!
//! ```bash
//! RUST_LOG=pilot_session=debug pilot run level.pilot
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
