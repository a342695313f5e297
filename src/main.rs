// log_terminal - main.rs
// CLI entry point: relay server, client emitter and config inspection

use clap::Parser;
use log_terminal::cli::{dispatch, Cli};
use std::process::exit;
use tracing_subscriber::EnvFilter;

fn main() {
    // Diagnostics only; user-facing log lines go through the logger's console.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let cli = Cli::parse();

    if let Err(e) = dispatch(cli) {
        eprintln!("❌ {e:#}");
        exit(1);
    }
}
