//! Immutable value objects carried by [`crate::entities`].

pub mod chunk;
pub mod context;
pub mod edit;
pub mod ids;
pub mod sync_state;

pub use chunk::Chunk;
pub use context::{ContextOptions, ContextSnapshot, FileContext, Relationship, SymbolContext};
pub use edit::{Edit, EditResult, EditStatus, EditType, SearchReplaceBlock};
pub use ids::{EditId, MessageId, SessionId};
pub use sync_state::SyncState;
