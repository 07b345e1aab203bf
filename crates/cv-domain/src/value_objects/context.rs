//! Context Engine inputs and outputs.

use serde::{Deserialize, Serialize};

use super::chunk::Chunk;
use crate::constants::context as defaults;
use crate::entities::SymbolKind;

/// Caller-supplied knobs for a single context-retrieval call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextOptions {
    /// Natural-language query driving the vector and keyword phases.
    pub query: String,
    /// Files the caller explicitly wants included, taken verbatim.
    #[serde(default)]
    pub explicit_files: Vec<String>,
    /// Token budget the assembled snapshot must not exceed.
    pub token_limit: usize,
    /// Maximum number of chunks returned across all phases.
    #[serde(default = "default_max_chunks")]
    pub max_chunks: usize,
    /// Maximum graph-expansion hop count from a seed symbol.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    /// Minimum vector similarity score a hit must clear to be included.
    #[serde(default = "default_min_score")]
    pub min_score: f32,
}

fn default_max_chunks() -> usize {
    defaults::DEFAULT_MAX_CHUNKS
}

fn default_max_depth() -> usize {
    defaults::DEFAULT_MAX_DEPTH
}

fn default_min_score() -> f32 {
    defaults::DEFAULT_MIN_SCORE
}

impl ContextOptions {
    /// Builds options for `query` with everything else at its documented default.
    pub fn new(query: impl Into<String>, token_limit: usize) -> Self {
        Self {
            query: query.into(),
            explicit_files: Vec::new(),
            token_limit,
            max_chunks: default_max_chunks(),
            max_depth: default_max_depth(),
            min_score: default_min_score(),
        }
    }
}

/// A symbol surfaced by the graph-expansion phase, with its relation to a seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolContext {
    /// Qualified name of the symbol.
    pub qualified_name: String,
    /// File the symbol is defined in.
    pub file: String,
    /// Declared kind (function, method, class, ...).
    pub kind: SymbolKind,
    /// 1-indexed line the symbol's declaration starts on.
    pub start_line: u32,
    /// One-line signature, if extracted.
    pub signature: Option<String>,
    /// Hop distance from the seed symbol that produced this expansion.
    pub depth: usize,
}

/// A relationship edge rendered into the assembled snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Relationship {
    /// Edge type, e.g. `CV_CALLS`.
    pub edge_type: String,
    /// Qualified name of the edge's source endpoint.
    pub from: String,
    /// Qualified name of the edge's target endpoint.
    pub to: String,
}

/// All retrieved material attributed to a single file, with its combined score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileContext {
    /// File path, relative to the codebase root.
    pub file: String,
    /// Chunks drawn from this file, in the order they should be rendered.
    pub chunks: Vec<Chunk>,
    /// Symbols reached via graph expansion that live in this file.
    pub symbols: Vec<SymbolContext>,
    /// `0.7*relevance + 0.3*centrality` combined score used for localization.
    pub combined_score: f64,
}

/// The fully assembled, budget-enforced context handed to the Edit Engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextSnapshot {
    /// Per-file retrieved material, ordered by descending combined score.
    pub files: Vec<FileContext>,
    /// Relationships connecting the retrieved symbols.
    pub relationships: Vec<Relationship>,
    /// Estimated token cost of the snapshot as assembled (`chars/4`).
    pub estimated_tokens: usize,
    /// `true` if one or more candidates were dropped to respect `token_limit`.
    pub truncated: bool,
}

impl ContextSnapshot {
    /// An empty snapshot, used as the accumulator for incremental assembly.
    pub fn empty() -> Self {
        Self {
            files: Vec::new(),
            relationships: Vec::new(),
            estimated_tokens: 0,
            truncated: false,
        }
    }
}
