//! UCI front end shared by the engine binaries.
//!
//! UCI engines communicate via stdin/stdout, so all logging goes to stderr.

pub mod config;
pub mod uci;

use std::io;

use tracing_subscriber::EnvFilter;

pub use uci::{Flow, UciError, UciSession};

/// Installs the stderr subscriber. The filter comes from `RUST_LOG`, `warn` if unset.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
