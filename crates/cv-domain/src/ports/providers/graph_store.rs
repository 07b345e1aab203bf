//! Graph store contract: a Cypher-like labeled property graph.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;

use crate::entities::{Edge, File, Symbol};
use crate::error::Result;

/// A single node returned from a raw [`GraphStoreProvider::query`] call.
#[derive(Debug, Clone)]
pub struct GraphNode {
 /// Node label, e.g. `CvFile`, `CvSymbol`.
 pub label: String,
 /// Node properties as returned by the store.
 pub properties: HashMap<String, Value>,
}

/// One unresolved call site, as extracted by the Parser Registry.
///
/// Resolution into a `CALLS` `Edge` (by unqualified name, following the
/// tie-break order) is the graph writer's job, not the parser's: the parser
/// only knows the textual callee name.
#[derive(Debug, Clone)]
pub struct CallRecord {
 /// Qualified name of the symbol the call site was found in.
 pub caller_qualified_name: String,
 /// Unqualified callee name as it appears in source.
 pub callee_name: String,
 /// Whether the call site is nested inside an `if`/`switch`/ternary.
 pub is_conditional: bool,
}

/// A parameterized, read-only Cypher-like query.
#[derive(Debug, Clone)]
pub struct GraphQuery {
 /// Query text, with `$name` placeholders.
 pub cypher: String,
 /// Parameter bindings for the placeholders.
 pub params: HashMap<String, Value>,
}

impl GraphQuery {
 /// Builds a query with no parameters.
 pub fn new(cypher: impl Into<String>) -> Self {
 Self {
 cypher: cypher.into(),
 params: HashMap::new(),
 }
 }

 /// Binds a parameter, consuming and returning `self` for chaining.
 pub fn bind(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
 self.params.insert(name.into(), value.into());
 self
 }
}

/// MERGE/UPSERT primitives over a labeled property graph.
///
/// Per-database isolation (a `database` name selects a logical graph) is an
/// infrastructure concern of the concrete adapter, not part of this
/// contract: callers pass already-namespaced keys (see
/// [`crate::constants::graph`]).
#[async_trait]
pub trait GraphStoreProvider: Send + Sync {
 /// Idempotently upserts a `File` node keyed by `path`.
 async fn upsert_file(&self, file: &File) -> Result<()>;

 /// Deletes the `File` node at `path`, and every `Symbol` it owns along
 /// with the `DEFINES`/`CALLS` edges originating from those symbols.
 async fn delete_file(&self, path: &str) -> Result<()>;

 /// Idempotently upserts all `Symbol` nodes belonging to `file`.
 async fn upsert_symbols(&self, file: &str, symbols: &[Symbol]) -> Result<()>;

 /// Resolves `calls` into `CALLS` edges and writes them for `file`.
 ///
 /// Resolution walks the tie-break order of: prefer a same-file
 /// symbol matching `callee_name`, then any in-repo symbol with that
 /// unqualified name, else drop the call site (never written as a
 /// dangling edge).
 async fn upsert_call_edges(&self, file: &str, calls: &[CallRecord]) -> Result<()>;

 /// Idempotently upserts arbitrary typed edges (`IMPORTS`, `IMPLEMENTS`, `EXTENDS`).
 async fn upsert_edges(&self, edges: &[Edge]) -> Result<()>;

 /// Deletes every node/edge this core previously wrote for `path`, ahead
 /// of a re-parse during incremental sync.
 async fn clear_by_file(&self, path: &str) -> Result<()>;

 /// Deletes every node/edge this core owns, for a full rebuild.
 async fn clear_all(&self) -> Result<()>;

 /// Finds symbols whose `name` or `qualified_name` contains `keyword`
 /// (case-insensitive), up to `limit`.
 async fn find_symbols_by_keyword(&self, keyword: &str, limit: usize) -> Result<Vec<Symbol>>;

 /// Finds file paths containing `keyword` (case-insensitive), up to `limit`.
 async fn find_files_by_keyword(&self, keyword: &str, limit: usize) -> Result<Vec<String>>;

 /// Fetches up to `limit` symbols that call `qualified_name` (callers).
 async fn callers_of(&self, qualified_name: &str, limit: usize) -> Result<Vec<Symbol>>;

 /// Fetches up to `limit` symbols called by `qualified_name` (callees).
 async fn callees_of(&self, qualified_name: &str, limit: usize) -> Result<Vec<Symbol>>;

 /// In/out degree across `CALLS` edges for `qualified_name`, used to
 /// derive centrality during localization.
 async fn call_degree(&self, qualified_name: &str) -> Result<(usize, usize)>;

 /// Runs an arbitrary parameterized read query, for callers that need
 /// more than the typed operations above expose.
 async fn query(&self, query: GraphQuery) -> Result<Vec<GraphNode>>;

 /// Total edge count currently held by the store, for `SyncState.edgeCount`.
 async fn edge_count(&self) -> Result<usize>;

 /// Total `Symbol` node count currently held by the store, for
 /// `SyncState.symbolCount`.
 async fn symbol_count(&self) -> Result<usize>;
}
