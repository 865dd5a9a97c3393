// SPDX-FileCopyrightText: 2026 Aida Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aida - a local, offline-capable conversational assistant.
//!
//! This is the binary entry point for the Aida assistant.

mod shell;

use clap::{Parser, Subcommand};

/// Aida - a local, offline-capable conversational assistant.
#[derive(Parser, Debug)]
#[command(name = "aida", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Launch an interactive assistant session (the default).
    Shell,
    /// Print the resolved configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match aida_config::load_and_validate() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("aida: invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    init_tracing(&config.agent.log_level);

    match cli.command {
        Some(Commands::Config) => match toml::to_string_pretty(&config) {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => {
                eprintln!("aida: failed to render configuration: {e}");
                std::process::exit(1);
            }
        },
        Some(Commands::Shell) | None => {
            if let Err(e) = shell::run_shell(config).await {
                eprintln!("aida: {e}");
                std::process::exit(1);
            }
        }
    }
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("aida={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
