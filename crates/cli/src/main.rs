// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![deny(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

use clap::Parser;
use tracing_subscriber::EnvFilter;
use witrs::Cli;

/// Environment variable holding the log filter, e.g. `WIT_LOG=wit_core=debug`.
const LOG_ENV: &str = "WIT_LOG";

fn setup_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    // stdout is reserved for command output.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    setup_logging();
    let cli = Cli::parse();
    if let Err(e) = witrs::run(cli) {
        tracing::debug!(kind = %e.kind(), "command failed");
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
