//! UCI front end for the random-move engine.

use std::io::{self, BufWriter};

use anyhow::{Context, Result};
use random_engine::RandomEngine;
use tracing::info;
use uci_engine::{init_logging, UciSession};

fn main() -> Result<()> {
    init_logging();
    info!("starting");

    let stdin = io::stdin();
    let stdout = BufWriter::new(io::stdout().lock());

    let mut session = UciSession::new(RandomEngine::new(), stdout);
    session
        .run(stdin.lock())
        .context("UCI session aborted")?;
    Ok(())
}
