//! Logging setup for the command-line tool.
//!
//! Diagnostics go to stderr; stdout is reserved for the generated document.

use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable holding an `EnvFilter` directive, e.g. `wsdlgen=debug`.
pub const LOG_ENV: &str = "WSDLGEN_LOG";

/// Install the global subscriber. `WSDLGEN_LOG` wins over `default_level`.
pub fn init(default_level: &str) {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}
