//! # Application layer
//!
//! The use cases that implement the core's business rules over the ports
//! `cv-domain` declares: Sync Engine, Context Engine, Edit Parser, File
//! Operations, Session Service, and the Assistant Orchestrator that drives
//! one turn through all of them. Depends only on `cv-domain` (for ports and
//! types) and `cv-language-support` (a concrete, non-pluggable collaborator,
//! not an external one). Concrete adapters for the pluggable ports
//! (graph/vector/chat/embedding/git/filesystem) live one layer out, in
//! `cv-providers`, and get wired in at the composition root.

pub mod use_cases;
