//! UCI front end for the alpha-beta engine.
//!
//! Set `RUST_LOG=debug` to see per-iteration search progress.

use std::env;
use std::io::{self, BufWriter};

use alphabeta_engine::AlphaBetaEngine;
use anyhow::{Context, Result};
use tracing::info;
use uci_engine::{config, init_logging, UciSession};

fn main() -> Result<()> {
    init_logging();

    let args: Vec<String> = env::args().skip(1).collect();
    let config = config::load(&args)?;
    info!(search = ?config.search, "starting");

    let engine = AlphaBetaEngine::with_config(config.search);
    let stdin = io::stdin();
    let stdout = BufWriter::new(io::stdout().lock());

    let mut session = UciSession::new(engine, stdout);
    session
        .run(stdin.lock())
        .context("UCI session aborted")?;
    Ok(())
}
