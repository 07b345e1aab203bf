//! Sync Engine defaults.

/// Default vector embedding batch size.
pub const DEFAULT_EMBED_BATCH_SIZE: usize = 32;
/// Default named vector collection for code chunks.
pub const COLLECTION_CODE_CHUNKS: &str = "code_chunks";
/// Default named vector collection for docstrings.
pub const COLLECTION_DOCSTRINGS: &str = "docstrings";
/// Default named vector collection for PRD chunks (owned by an unrelated,
/// out-of-scope feature; named here only so this core never collides with it).
pub const COLLECTION_PRD_CHUNKS: &str = "prd_chunks";
/// Default embedding dimensionality.
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 1536;
/// Default embedding-pool worker count.
pub const DEFAULT_EMBED_WORKERS: usize = 4;
/// Default chunk text length floor for paragraph-split chunking.
pub const CHUNK_TEXT_MIN_CHARS: usize = 400;
/// Default chunk text length ceiling for paragraph-split chunking.
pub const CHUNK_TEXT_MAX_CHARS: usize = 1500;
/// Minimum complexity value ever recorded for a symbol.
pub const MIN_COMPLEXITY: u32 = 1;

/// Default deadline for an embedding batch call.
pub const EMBED_BATCH_TIMEOUT_SECS: u64 = 30;
/// Default deadline for a non-streaming chat call.
pub const CHAT_TIMEOUT_SECS: u64 = 60;
/// Default inter-token deadline for a streaming chat call.
pub const CHAT_STREAM_INTER_TOKEN_TIMEOUT_SECS: u64 = 60;
/// Default deadline for a graph query.
pub const GRAPH_QUERY_TIMEOUT_SECS: u64 = 5;
/// Default deadline for a vector query.
pub const VECTOR_QUERY_TIMEOUT_SECS: u64 = 5;

/// Default backup retention window, in days.
pub const DEFAULT_BACKUP_RETENTION_DAYS: u64 = 7;
/// Number of most-recent messages included as turn history.
pub const HISTORY_MESSAGE_COUNT: usize = 10;
