//! CLI command definitions and dispatch for the `chatty` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod status;

use clap::{Parser, Subcommand};

/// Store and read back per-user chat history.
#[derive(Parser)]
#[command(name = "chatty", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Port to listen on (defaults to `server.port` from config.toml).
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to `server.host` from config.toml).
        #[arg(long)]
        host: Option<String>,
    },

    /// Save a chat message for a user.
    Save {
        /// Owner of the chat history.
        user_id: String,

        /// Message text.
        message: String,
    },

    /// Print a user's chat history.
    History {
        /// Owner of the chat history.
        user_id: String,
    },

    /// Show database location and message counts.
    Status,
}

impl Cli {
    /// Log filter implied by the verbosity flags, if any.
    ///
    /// One-shot commands stay at `warn` so logs do not drown their output;
    /// the server falls through to `RUST_LOG` / config.toml.
    pub fn log_filter_override(&self) -> Option<&'static str> {
        match self.verbose {
            0 if self.quiet => Some("error"),
            0 if matches!(self.command, Commands::Serve { .. }) => None,
            0 => Some("warn"),
            1 => Some("info,chatty=debug"),
            _ => Some("trace"),
        }
    }
}
