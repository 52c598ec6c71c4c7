// Copyright 2026 Nettrap Contributors
// SPDX-License-Identifier: Apache-2.0

#![allow(dead_code, unused_imports)]

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

mod browser;
mod capture;
mod cli;
mod download;

#[derive(Parser)]
#[command(
    name = "nettrap",
    about = "Record network response URLs from a browsing session and download them content-addressed",
    version,
    after_help = "Run 'nettrap <command> --help' for details on each command."
)]
struct Cli {
    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Capture network response URLs from an automated browser session
    Capture {
        /// URL to navigate to first. If not specified, a blank page is shown.
        #[arg(long, default_value = "about:blank")]
        url: String,
        /// Autonav script driving the page while capturing (e.g. "scroll")
        #[arg(long)]
        autonav: Option<String>,
        /// Comma-separated filter names applied to captured responses
        #[arg(long, default_value = "")]
        filters: String,
        /// Directory for the timestamped URL snapshot
        #[arg(long, default_value = "data")]
        output_dir: PathBuf,
    },
    /// Download every URL in a snapshot file, content-addressed by body hash
    Download {
        /// Path to a JSON array of URL strings (typically a capture snapshot)
        file_path: PathBuf,
        /// Directory for downloaded files
        #[arg(long, default_value = "data/images")]
        output_dir: PathBuf,
        /// Delay between requests, in milliseconds
        #[arg(long, default_value = "300")]
        delay_ms: u64,
    },
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "nettrap=debug" } else { "nettrap=info" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Capture {
            url,
            autonav,
            filters,
            output_dir,
        } => cli::capture_cmd::run(&url, autonav.as_deref(), &filters, &output_dir).await,
        Commands::Download {
            file_path,
            output_dir,
            delay_ms,
        } => cli::download_cmd::run(&file_path, &output_dir, delay_ms).await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "nettrap", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    result
}
