// SPDX-FileCopyrightText: 2026 Loadcast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Loadcast - relays load notices from a control channel to group chats.
//!
//! This is the binary entry point for the Loadcast relay.

use clap::{Parser, Subcommand};

mod console;
mod serve;

/// Loadcast - relays load notices from a control channel to group chats.
#[derive(Parser, Debug)]
#[command(name = "loadcast", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the relay against the console transport.
    Serve,
    /// Print the resolved configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let config = match loadcast_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            loadcast_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) | None => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("error: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => match toml::to_string_pretty(&config) {
            Ok(rendered) => print!("{rendered}"),
            Err(e) => {
                eprintln!("error: failed to render configuration: {e}");
                std::process::exit(1);
            }
        },
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn binary_loads_config_defaults() {
        // Verify the default config is valid without any config file.
        let config = loadcast_config::load_and_validate_str("")
            .expect("default config should be valid");
        assert_eq!(config.relay.fetch_limit, 10_000);
    }

    #[test]
    fn resolved_config_renders_as_toml() {
        let config = loadcast_config::load_and_validate_str("").unwrap();
        let rendered = toml::to_string_pretty(&config).unwrap();
        assert!(rendered.contains("fetch_limit"));
    }
}
