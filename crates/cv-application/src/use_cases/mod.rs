//! Parsing and chunking live in `cv-language-support` since they have no
//! business-rule surface of their own, and the graph/vector writers are
//! folded into the sync engine below them. What's left is the use-case
//! layer proper: sync engine, context engine, edit parser, file
//! operations, session service and the assistant orchestrator.

pub mod context_engine;
pub mod edit_parser;
pub mod file_operations;
pub mod orchestrator;
pub mod session_service;
pub mod sync_engine;

pub use context_engine::ContextEngineImpl;
pub use edit_parser::EditParserImpl;
pub use file_operations::FileOperationsImpl;
pub use orchestrator::{AssistantOrchestrator, TurnOutcome};
pub use session_service::SessionServiceImpl;
pub use sync_engine::SyncEngineImpl;
