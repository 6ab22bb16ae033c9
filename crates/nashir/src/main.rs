// SPDX-FileCopyrightText: 2026 Nashir Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Nashir - an Arabic-first news publishing platform.
//!
//! This is the binary entry point for the Nashir daemon.

use clap::{Parser, Subcommand};

mod serve;

/// Nashir - an Arabic-first news publishing platform.
#[derive(Parser, Debug)]
#[command(name = "nashir", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the publishing daemon: gateway, scheduler, and cache sweeper.
    Serve,
    /// Print the resolved configuration as TOML.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match nashir_config::load_config() {
        Ok(config) => config,
        Err(error) => {
            eprintln!("nashir: failed to load configuration: {error}");
            std::process::exit(1);
        }
    };
    if let Err(error) = nashir_config::validate(&config) {
        eprintln!("nashir: invalid configuration: {error}");
        std::process::exit(1);
    }

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(error) = serve::run(config).await {
                eprintln!("nashir: {error}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => match toml::to_string_pretty(&config) {
            Ok(rendered) => println!("{rendered}"),
            Err(error) => {
                eprintln!("nashir: failed to render configuration: {error}");
                std::process::exit(1);
            }
        },
        None => {
            println!("nashir: use --help for available commands");
        }
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn default_config_passes_validation() {
        let config = nashir_config::NashirConfig::default();
        nashir_config::validate(&config).expect("default config should be valid");
    }
}
