//! Entities with an identity independent of any single retrieval.

pub mod edge;
pub mod file;
pub mod session;
pub mod symbol;
pub mod sync_state_record;

pub use edge::{Edge, EdgeType};
pub use file::File;
pub use session::{ActiveContext, CodeMessage, CodeSession, MessageRole};
pub use symbol::{Import, Symbol, SymbolKind, Visibility};
pub use sync_state_record::SyncStateRecord;
