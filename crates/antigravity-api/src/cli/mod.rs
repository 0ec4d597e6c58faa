//! CLI command definitions for the `agbot` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod chat;
pub mod persona;
pub mod status;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use antigravity_observe::tracing_setup::LogFormat;

/// Persona-driven chat bot core.
#[derive(Parser)]
#[command(name = "agbot", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Configuration file (defaults to $ANTIGRAVITY_CONFIG or ./antigravity.toml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log line format: text or json.
    #[arg(long, global = true, default_value = "text", value_parser = parse_log_format)]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

fn parse_log_format(s: &str) -> Result<LogFormat, String> {
    s.parse()
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session on the terminal.
    Chat {
        /// User id the conversation is recorded under.
        #[arg(long, short, default_value = "local")]
        user: String,
    },

    /// Send a single message and print the reply.
    Ask {
        /// User id the conversation is recorded under.
        #[arg(long, short, default_value = "local")]
        user: String,

        /// Message text.
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// List available personas.
    #[command(alias = "profiles")]
    Personas,

    /// Show the active persona, or switch to another one (admin only).
    #[command(alias = "profile")]
    Persona {
        /// User id requesting the switch.
        #[arg(long, short, default_value = "local")]
        user: String,

        /// Persona id to activate.
        id: Option<String>,
    },

    /// Show credential, persona and model status.
    #[command(alias = "ping")]
    Status,

    /// Start the HTTP server (health check plus chat API).
    Serve {
        /// Port to listen on (overrides config).
        #[arg(long, short)]
        port: Option<u16>,

        /// Host address to bind to (overrides config).
        #[arg(long)]
        host: Option<String>,
    },
}
