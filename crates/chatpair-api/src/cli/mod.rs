//! CLI command definitions and dispatch for the `chatpair` binary.
//!
//! Uses clap derive macros for argument parsing. Every command except `serve`
//! and `completions` works directly against the local database.

pub mod message;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use chatpair_types::message::MessageId;

/// Chat with a canned-reply bot, from the terminal or over HTTP.
#[derive(Parser)]
#[command(name = "chatpair", version, about, long_about = None)]
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

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true, env = "CHATPAIR_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the REST API server.
    Serve {
        /// Address to bind (overrides config.toml).
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config.toml).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List the conversation in chronological order.
    #[command(alias = "ls")]
    List,

    /// Send a user message and print the bot's reply.
    Send {
        /// Message text.
        content: String,

        /// Message this one answers.
        #[arg(long)]
        parent: Option<MessageId>,
    },

    /// Edit a user message. Its reply is regenerated.
    Edit {
        /// Message ID.
        id: MessageId,

        /// New message text.
        content: String,
    },

    /// Delete a user message together with its reply.
    #[command(alias = "rm")]
    Delete {
        /// Message ID.
        id: MessageId,

        /// Skip the confirmation prompt.
        #[arg(short, long)]
        force: bool,
    },

    /// Regenerate a message from its parent's content.
    Regenerate {
        /// Message ID.
        id: MessageId,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
