//! `cv`: the CLI entry point wiring [`cv_infrastructure::AppContext`] to a
//! handful of subcommands exercising the core (sync, session, chat).

mod cli;

use clap::Parser;
use cv_domain::error::{Error, Result};
use cv_domain::ports::services::{IndexingServiceInterface, SessionServiceInterface};
use cv_domain::value_objects::SessionId;
use cv_infrastructure::{AppContext, CvConfig, CvLayout};
use tracing::{error, info};

use cli::{Cli, Command, SessionCommand};

fn parse_session_id(raw: &str) -> Result<SessionId> {
    uuid::Uuid::parse_str(raw)
        .map(SessionId::from_uuid)
        .map_err(|e| Error::invalid_argument(format!("invalid session id {raw}: {e}")))
}

#[tokio::main]
async fn main() -> Result<()> {
    cv_infrastructure::logging::init_logging(cv_infrastructure::logging::LogFormat::Pretty);

    let cli = Cli::parse();
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| CvLayout::new(".").config_file().display().to_string());
    let config = CvConfig::load(&config_path)?;
    let context = AppContext::bootstrap(config).await?;

    if let Err(e) = run(&context, cli.command).await {
        error!(error = %e, "command failed");
        return Err(e);
    }
    Ok(())
}

async fn run(context: &AppContext, command: Command) -> Result<()> {
    match command {
        Command::Sync { full, clear } => run_sync(context, full, clear).await,
        Command::Status => run_status(context).await,
        Command::Session { command } => run_session(context, command).await,
        Command::Chat { session, message } => run_chat(context, &session, message).await,
    }
}

async fn run_sync(context: &AppContext, full: bool, clear: bool) -> Result<()> {
    let report = if full {
        context.sync_engine.full_sync(clear).await?
    } else {
        context.sync_engine.incremental_sync().await?
    };
    info!(
        files = report.state.file_count,
        symbols = report.state.symbol_count,
        vectors = report.state.vector_count,
        errors = report.errors.len(),
        "sync complete"
    );
    for error in &report.errors {
        error!(path = %error.path, reason = %error.reason, "file failed to index");
    }
    println!("{}", serde_json::to_string_pretty(&report.state)?);
    Ok(())
}

async fn run_status(context: &AppContext) -> Result<()> {
    match context.sync_engine.current_state().await? {
        Some(record) => println!("{}", serde_json::to_string_pretty(&record)?),
        None => println!("no sync has run yet"),
    }
    Ok(())
}

async fn run_session(context: &AppContext, command: SessionCommand) -> Result<()> {
    match command {
        SessionCommand::New { branch, token_limit } => {
            let session = context.session_service.create_session(branch, None, token_limit).await?;
            println!("{}", session.id);
        }
        SessionCommand::List => {
            let sessions = context.session_service.list_sessions().await?;
            for session in sessions {
                println!("{}\t{}\t{} messages", session.id, session.updated_at, session.messages.len());
            }
        }
        SessionCommand::Apply { session, auto_approve } => {
            let Some(orchestrator) = &context.orchestrator else {
                return Err(Error::config_missing("chat"));
            };
            let id = parse_session_id(&session)?;
            let mut session = context.session_service.resume_session(id).await?;
            let results = orchestrator.apply_edits(&mut session, auto_approve).await?;
            println!("{}", serde_json::to_string_pretty(&results)?);
        }
        SessionCommand::Undo { session } => {
            let Some(orchestrator) = &context.orchestrator else {
                return Err(Error::config_missing("chat"));
            };
            let id = parse_session_id(&session)?;
            let mut session = context.session_service.resume_session(id).await?;
            match orchestrator.undo_last_edit(&mut session).await? {
                Some(edit) => println!("reverted edit {} on {}", edit.id, edit.file),
                None => println!("nothing to undo"),
            }
        }
    }
    Ok(())
}

async fn run_chat(context: &AppContext, session: &str, message: String) -> Result<()> {
    let Some(orchestrator) = &context.orchestrator else {
        return Err(Error::config_missing("chat"));
    };
    let id = parse_session_id(session)?;
    let mut session = context.session_service.resume_session(id).await?;
    let token_limit = session.active_context.token_limit;
    let cancellation = tokio_util::sync::CancellationToken::new();

    let outcome = orchestrator
        .run_turn(&mut session, message, token_limit, cancellation, |fragment| {
            print!("{fragment}");
        })
        .await?;

    println!();
    if !outcome.edits.is_empty() {
        println!("--- {} proposed edit(s), pending approval ---", outcome.edits.len());
        for edit in &outcome.edits {
            println!("  {} ({:?})", edit.file, edit.edit_type);
        }
    }
    Ok(())
}
