//! Internal service contracts implemented by `cv-application`'s use-cases.
//!
//! These let the orchestrator and the `cv` binary depend on traits
//! rather than concrete use-case types.

pub mod context_service;
pub mod edit_service;
pub mod indexing_service;
pub mod session_service;

pub use context_service::ContextServiceInterface;
pub use edit_service::{EditParserInterface, FileOperationsInterface};
pub use indexing_service::IndexingServiceInterface;
pub use session_service::SessionServiceInterface;
