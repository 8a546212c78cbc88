//! CLI module for VoFo.

pub mod commands;
mod output;
pub mod preflight;

pub use output::Output;

use clap::{Parser, Subcommand};

/// VoFo - music search bot
///
/// Runs a Telegram bot and a small web front end that find songs and deliver
/// their audio.
#[derive(Parser, Debug)]
#[command(name = "vofo")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP service in the background and the chat bot in the foreground (default)
    Run {
        /// Host to bind the HTTP service to
        #[arg(long, env = "VOFO_HOST")]
        host: Option<String>,

        /// Port for the HTTP service
        #[arg(short, long, env = "VOFO_PORT")]
        port: Option<u16>,
    },

    /// Run only the chat bot
    Bot,

    /// Run only the HTTP service
    Serve {
        /// Host to bind to
        #[arg(long, env = "VOFO_HOST")]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long, env = "VOFO_PORT")]
        port: Option<u16>,
    },

    /// Search from the terminal and print the candidates
    Search {
        /// Search query
        query: String,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Check system requirements and configuration
    Doctor,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Run {
            host: None,
            port: None,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration (token redacted)
    Show,

    /// Write a default configuration file if none exists
    Init,

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_run() {
        let cli = Cli::try_parse_from(["vofo"]).unwrap();
        assert!(cli.command.is_none());
        assert!(matches!(
            cli.command.unwrap_or_default(),
            Commands::Run { host: None, port: None }
        ));
    }

    #[test]
    fn test_serve_flags() {
        let cli = Cli::try_parse_from(["vofo", "-vv", "serve", "--host", "127.0.0.1", "-p", "9000"]).unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Some(Commands::Serve { host, port }) => {
                assert_eq!(host.as_deref(), Some("127.0.0.1"));
                assert_eq!(port, Some(9000));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_search_args() {
        let cli = Cli::try_parse_from(["vofo", "search", "imagine", "--limit", "3"]).unwrap();
        match cli.command {
            Some(Commands::Search { query, limit }) => {
                assert_eq!(query, "imagine");
                assert_eq!(limit, Some(3));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
