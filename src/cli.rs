//! Command-line interface for xo_lobby.

use clap::{Parser, Subcommand};

/// xo_lobby - chat-scoped tic-tac-toe sessions behind a JSON API
#[derive(Parser, Debug)]
#[command(name = "xo_lobby")]
#[command(about = "Tic-tac-toe session manager for chat bots", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the HTTP request server
    Serve {
        /// Path to a TOML config file
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Host to bind to (overrides config and XO_HOST)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (overrides config and XO_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Play a scripted game in memory and log each snapshot
    Demo,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_serve_overrides() {
        let cli = Cli::parse_from(["xo_lobby", "serve", "--port", "8080", "--host", "0.0.0.0"]);
        match cli.command {
            Command::Serve { config, host, port } => {
                assert_eq!(config, None);
                assert_eq!(host.as_deref(), Some("0.0.0.0"));
                assert_eq!(port, Some(8080));
            }
            Command::Demo => panic!("expected serve"),
        }
    }

    #[test]
    fn test_parse_demo() {
        let cli = Cli::parse_from(["xo_lobby", "demo"]);
        assert!(matches!(cli.command, Command::Demo));
    }
}
