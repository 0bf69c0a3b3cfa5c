#![forbid(unsafe_code)]

//! Headless walkthrough of cmdstack histories.
//!
//! Two scenarios print their state after every history operation, along
//! with a history panel re-rendered from stack notifications:
//!
//! - `counter`: per-command undo over a shared counter
//! - `canvas`: redo-from-start over a character canvas, where squares have no
//!   inverse and undo means "wipe and replay"
//!
//! Set `RUST_LOG=cmdstack=debug` to see the stack's own events.

pub mod canvas;
pub mod cli;
pub mod counter;
pub mod error;
pub mod render;

use clap::Parser;
use tracing_subscriber::EnvFilter;

pub use error::{DemoError, Result};

/// Install a stderr `fmt` subscriber filtered by `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn run_from_env() -> Result<()> {
    init_tracing();
    let cli = cli::Cli::parse();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    cli::run(&cli, &mut out)
}
