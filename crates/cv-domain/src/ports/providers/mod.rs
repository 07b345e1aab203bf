//! External collaborator contracts: graph/vector/embedding/chat/git/fs.
//!
//! Every collaborator here is, per the domain model, a *nullable*
//! capability: infrastructure wires an `Option<Arc<dyn Provider>>` and
//! every caller guards on its presence instead of propagating a connection
//! error up through unrelated code paths (see `StoreUnavailable` in
//! [`crate::error`]).

pub mod chat;
pub mod embedding;
pub mod filesystem;
pub mod git;
pub mod graph_store;
pub mod session_repository;
pub mod sync_state_repository;
pub mod vector_store;

pub use chat::{ChatMessage, ChatProvider, ChatRole, StreamToken};
pub use embedding::EmbeddingProvider;
pub use filesystem::FileSystemProvider;
pub use git::{ChangedFiles, GitProvider, Rename};
pub use graph_store::{CallRecord, GraphNode, GraphQuery, GraphStoreProvider};
pub use session_repository::SessionRepository;
pub use sync_state_repository::SyncStateRepository;
pub use vector_store::{VectorPoint, VectorSearchHit, VectorStoreProvider};
