//! Command-line surface: a thin `clap` front end over [`cv_infrastructure::AppContext`].

use clap::{Parser, Subcommand};

/// Repository indexer and AI coding assistant core.
#[derive(Debug, Parser)]
#[command(name = "cv", version, about)]
pub struct Cli {
    /// Path to `.cv/config.json`. Defaults to `<codebase_root>/.cv/config.json`
    /// resolved from the current directory.
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Synchronizes the graph and vector stores with the codebase.
    Sync {
        /// Re-index every file, ignoring recorded sync state.
        #[arg(long)]
        full: bool,
        /// Drop all graph state before a full sync.
        #[arg(long)]
        clear: bool,
    },
    /// Prints the last recorded sync summary.
    Status,
    /// Session management.
    Session {
        #[command(subcommand)]
        command: SessionCommand,
    },
    /// Runs one assistant turn against an existing session and prints the
    /// response. Requires a chat provider to be configured.
    Chat {
        /// Session id to continue.
        session: String,
        /// The user's message for this turn.
        message: String,
    },
}

#[derive(Debug, Subcommand)]
pub enum SessionCommand {
    /// Creates a new session.
    New {
        /// Git branch to record against the session, if any.
        #[arg(long)]
        branch: Option<String>,
        /// Context token budget for this session.
        #[arg(long, default_value_t = 8_000)]
        token_limit: usize,
    },
    /// Lists known sessions, most recently updated first.
    List,
    /// Approves and applies a session's pending edits.
    Apply {
        /// Session id to apply edits for.
        session: String,
        /// Apply every pending edit regardless of approval state.
        #[arg(long)]
        auto_approve: bool,
    },
    /// Reverts the most recently applied edit in a session.
    Undo {
        /// Session id to undo an edit in.
        session: String,
    },
}
