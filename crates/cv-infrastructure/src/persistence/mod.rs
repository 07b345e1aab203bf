//! JSON-file adapters for `cv-domain`'s persistence ports.

pub mod json_session_repository;
pub mod json_sync_state_repository;

pub use json_session_repository::JsonSessionRepository;
pub use json_sync_state_repository::JsonSyncStateRepository;
