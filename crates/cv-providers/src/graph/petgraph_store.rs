//! In-memory `GraphStoreProvider` built on `petgraph` plus `dashmap` indexes.
//!
//! A single process-local graph: nodes are keyed by `File.path` or
//! `Symbol.qualified_name`, edges by [`EdgeType`]. `dashmap` indexes let
//! concurrent file syncs look up/insert nodes without taking a writer lock
//! over the whole graph; the `petgraph` graph itself is guarded by a
//! `RwLock` since `petgraph::Graph` has no internal synchronization.

use std::sync::RwLock;

use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use petgraph::stable_graph::{NodeIndex, StableDiGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use cv_domain::entities::{Edge, EdgeType, File, Symbol};
use cv_domain::error::{Error, Result};
use cv_domain::ports::{CallRecord, GraphNode, GraphQuery, GraphStoreProvider};

#[derive(Debug, Clone)]
enum NodePayload {
 File(File),
 Symbol(Symbol),
}

impl NodePayload {
 fn key(&self) -> &str {
 match self {
 Self::File(f) => &f.path,
 Self::Symbol(s) => &s.qualified_name,
 }
 }

}

/// An in-process, single-database graph store.
///
/// Per-database isolation (multiple logical graphs in one process) is left
/// to the caller: construct one [`PetgraphStore`] per database.
pub struct PetgraphStore {
 graph: RwLock<StableDiGraph<NodePayload, EdgeType>>,
 index: DashMap<String, NodeIndex>,
 /// Tracks which node keys a given file owns, for `delete_file`/`clear_by_file`.
 owned_by_file: DashMap<String, DashSet<String>>,
}

impl Default for PetgraphStore {
 fn default() -> Self {
 Self::new()
 }
}

impl PetgraphStore {
 /// Builds an empty graph.
 pub fn new() -> Self {
 Self {
 graph: RwLock::new(StableDiGraph::new()),
 index: DashMap::new(),
 owned_by_file: DashMap::new(),
 }
 }

 fn upsert_node(&self, payload: NodePayload) -> NodeIndex {
 let key = payload.key().to_string();
 if let Some(existing) = self.index.get(&key) {
 let idx = *existing;
 let mut graph = self.graph.write().expect("graph lock poisoned");
 if let Some(slot) = graph.node_weight_mut(idx) {
 *slot = payload;
 }
 idx
 } else {
 let mut graph = self.graph.write().expect("graph lock poisoned");
 let idx = graph.add_node(payload);
 self.index.insert(key, idx);
 idx
 }
 }

 fn node_index(&self, key: &str) -> Option<NodeIndex> {
 self.index.get(key).map(|r| *r)
 }

 fn own(&self, file: &str, key: &str) {
 self.owned_by_file
.entry(file.to_string())
.or_default()
.insert(key.to_string());
 }

 fn upsert_edge(&self, edge_type: EdgeType, from: &str, to: &str) -> Result<()> {
 let from_idx = self
.node_index(from)
.ok_or_else(|| Error::not_found(format!("graph node {from}")))?;
 let to_idx = self
.node_index(to)
.ok_or_else(|| Error::not_found(format!("graph node {to}")))?;

 let mut graph = self.graph.write().expect("graph lock poisoned");
 if !graph
.edges_connecting(from_idx, to_idx)
.any(|e| *e.weight() == edge_type)
 {
 graph.add_edge(from_idx, to_idx, edge_type);
 }
 Ok(())
 }

 /// Resolves `callee_name` against same-file symbols first, then any
 /// symbol in the graph, per the tie-break order.
 fn resolve_callee(&self, file: &str, callee_name: &str) -> Option<String> {
 let graph = self.graph.read().expect("graph lock poisoned");
 let candidates: Vec<&str> = graph
.node_weights()
.filter_map(|payload| match payload {
 NodePayload::Symbol(s) if s.name == callee_name => Some(s.qualified_name.as_str()),
 _ => None,
 })
.collect();

 candidates
.iter()
.find(|qn| qn.starts_with(&format!("{file}:")))
.or_else(|| candidates.first())
.map(|qn| qn.to_string())
 }
}

#[async_trait]
impl GraphStoreProvider for PetgraphStore {
 async fn upsert_file(&self, file: &File) -> Result<()> {
 self.upsert_node(NodePayload::File(file.clone()));
 Ok(())
 }

 async fn delete_file(&self, path: &str) -> Result<()> {
 self.clear_by_file(path).await?;
 if let Some((_, idx)) = self.index.remove(path) {
 let mut graph = self.graph.write().expect("graph lock poisoned");
 graph.remove_node(idx);
 }
 self.owned_by_file.remove(path);
 Ok(())
 }

 async fn upsert_symbols(&self, file: &str, symbols: &[Symbol]) -> Result<()> {
 for symbol in symbols {
 self.upsert_node(NodePayload::Symbol(symbol.clone()));
 self.own(file, &symbol.qualified_name);
 self.upsert_edge(EdgeType::Defines, file, &symbol.qualified_name)?;
 }
 Ok(())
 }

 async fn upsert_call_edges(&self, file: &str, calls: &[CallRecord]) -> Result<()> {
 for call in calls {
 let Some(callee) = self.resolve_callee(file, &call.callee_name) else {
 continue;
 };
 self.upsert_edge(EdgeType::Calls, &call.caller_qualified_name, &callee)?;
 }
 Ok(())
 }

 async fn upsert_edges(&self, edges: &[Edge]) -> Result<()> {
 for edge in edges {
 self.upsert_edge(edge.edge_type, &edge.from, &edge.to)?;
 }
 Ok(())
 }

 async fn clear_by_file(&self, path: &str) -> Result<()> {
 let Some((_, owned)) = self.owned_by_file.remove(path) else {
 return Ok(());
 };
 let mut graph = self.graph.write().expect("graph lock poisoned");
 for key in owned.iter() {
 if let Some((_, idx)) = self.index.remove(key.as_str()) {
 graph.remove_node(idx);
 }
 }
 Ok(())
 }

 async fn clear_all(&self) -> Result<()> {
 let mut graph = self.graph.write().expect("graph lock poisoned");
 graph.clear();
 self.index.clear();
 self.owned_by_file.clear();
 Ok(())
 }

 async fn find_symbols_by_keyword(&self, keyword: &str, limit: usize) -> Result<Vec<Symbol>> {
 let keyword = keyword.to_lowercase();
 let graph = self.graph.read().expect("graph lock poisoned");
 Ok(graph
.node_weights()
.filter_map(|p| match p {
 NodePayload::Symbol(s)
 if s.name.to_lowercase().contains(&keyword)
 || s.qualified_name.to_lowercase().contains(&keyword) =>
 {
 Some(s.clone())
 }
 _ => None,
 })
.take(limit)
.collect())
 }

 async fn find_files_by_keyword(&self, keyword: &str, limit: usize) -> Result<Vec<String>> {
 let keyword = keyword.to_lowercase();
 let graph = self.graph.read().expect("graph lock poisoned");
 Ok(graph
.node_weights()
.filter_map(|p| match p {
 NodePayload::File(f) if f.path.to_lowercase().contains(&keyword) => {
 Some(f.path.clone())
 }
 _ => None,
 })
.take(limit)
.collect())
 }

 async fn callers_of(&self, qualified_name: &str, limit: usize) -> Result<Vec<Symbol>> {
 let Some(idx) = self.node_index(qualified_name) else {
 return Ok(Vec::new());
 };
 let graph = self.graph.read().expect("graph lock poisoned");
 Ok(graph
.edges_directed(idx, Direction::Incoming)
.filter(|e| *e.weight() == EdgeType::Calls)
.filter_map(|e| match graph.node_weight(e.source()) {
 Some(NodePayload::Symbol(s)) => Some(s.clone()),
 _ => None,
 })
.take(limit)
.collect())
 }

 async fn callees_of(&self, qualified_name: &str, limit: usize) -> Result<Vec<Symbol>> {
 let Some(idx) = self.node_index(qualified_name) else {
 return Ok(Vec::new());
 };
 let graph = self.graph.read().expect("graph lock poisoned");
 Ok(graph
.edges_directed(idx, Direction::Outgoing)
.filter(|e| *e.weight() == EdgeType::Calls)
.filter_map(|e| match graph.node_weight(e.target()) {
 Some(NodePayload::Symbol(s)) => Some(s.clone()),
 _ => None,
 })
.take(limit)
.collect())
 }

 async fn call_degree(&self, qualified_name: &str) -> Result<(usize, usize)> {
 let Some(idx) = self.node_index(qualified_name) else {
 return Ok((0, 0));
 };
 let graph = self.graph.read().expect("graph lock poisoned");
 let in_degree = graph
.edges_directed(idx, Direction::Incoming)
.filter(|e| *e.weight() == EdgeType::Calls)
.count();
 let out_degree = graph
.edges_directed(idx, Direction::Outgoing)
.filter(|e| *e.weight() == EdgeType::Calls)
.count();
 Ok((in_degree, out_degree))
 }

 async fn query(&self, query: GraphQuery) -> Result<Vec<GraphNode>> {
 // This in-memory adapter has no Cypher engine: it only supports the
 // typed operations above. A raw query always returns empty rather
 // than erroring, since callers treat an empty graph store result
 // the same as "store has nothing for this" (nullable-collaborator
 // degrade).
 tracing::debug!(cypher = %query.cypher, "petgraph store ignoring raw query");
 Ok(Vec::new())
 }

 async fn edge_count(&self) -> Result<usize> {
 let graph = self.graph.read().expect("graph lock poisoned");
 Ok(graph.edge_count())
 }

 async fn symbol_count(&self) -> Result<usize> {
 let graph = self.graph.read().expect("graph lock poisoned");
 Ok(graph
.node_weights()
.filter(|p| matches!(p, NodePayload::Symbol(_)))
.count())
 }
}

#[cfg(test)]
mod tests {
 use super::*;
 use chrono::Utc;
 use cv_domain::entities::{Call, SymbolKind, Visibility};

 fn symbol(qualified_name: &str, name: &str, file: &str) -> Symbol {
 Symbol {
 qualified_name: qualified_name.to_string(),
 name: name.to_string(),
 kind: SymbolKind::Function,
 file: file.to_string(),
 start_line: 1,
 end_line: 2,
 signature: None,
 docstring: None,
 visibility: Visibility::Public,
 is_async: false,
 complexity: 1,
 calls: vec![Call {
 name: "helper".to_string(),
 is_conditional: false,
 }],
 }
 }

 #[tokio::test]
 async fn same_file_callee_wins_tie_break() {
 let store = PetgraphStore::new();
 store
.upsert_file(&File::new("a.rs", "rust", "h1", Utc::now()))
.await
.unwrap();
 store
.upsert_file(&File::new("b.rs", "rust", "h2", Utc::now()))
.await
.unwrap();
 store
.upsert_symbols(
 "a.rs",
 &[symbol("a.rs:main", "main", "a.rs"), symbol("a.rs:helper", "helper", "a.rs")],
 )
.await
.unwrap();
 store
.upsert_symbols("b.rs", &[symbol("b.rs:helper", "helper", "b.rs")])
.await
.unwrap();

 store
.upsert_call_edges(
 "a.rs",
 &[CallRecord {
 caller_qualified_name: "a.rs:main".to_string(),
 callee_name: "helper".to_string(),
 is_conditional: false,
 }],
 )
.await
.unwrap();

 let callees = store.callees_of("a.rs:main", 10).await.unwrap();
 assert_eq!(callees.len(), 1);
 assert_eq!(callees[0].qualified_name, "a.rs:helper");
 }

 #[tokio::test]
 async fn unresolvable_callee_is_dropped_not_dangling() {
 let store = PetgraphStore::new();
 store
.upsert_file(&File::new("a.rs", "rust", "h1", Utc::now()))
.await
.unwrap();
 store
.upsert_symbols("a.rs", &[symbol("a.rs:main", "main", "a.rs")])
.await
.unwrap();

 store
.upsert_call_edges(
 "a.rs",
 &[CallRecord {
 caller_qualified_name: "a.rs:main".to_string(),
 callee_name: "nonexistent".to_string(),
 is_conditional: false,
 }],
 )
.await
.unwrap();

 assert!(store.callees_of("a.rs:main", 10).await.unwrap().is_empty());
 }

 #[tokio::test]
 async fn delete_file_removes_owned_symbols() {
 let store = PetgraphStore::new();
 store
.upsert_file(&File::new("a.rs", "rust", "h1", Utc::now()))
.await
.unwrap();
 store
.upsert_symbols("a.rs", &[symbol("a.rs:main", "main", "a.rs")])
.await
.unwrap();

 store.delete_file("a.rs").await.unwrap();

 assert!(store.find_symbols_by_keyword("main", 10).await.unwrap().is_empty());
 assert!(store.find_files_by_keyword("a.rs", 10).await.unwrap().is_empty());
 }

 #[tokio::test]
 async fn deleting_a_file_leaves_other_files_call_edges_intact() {
 let store = PetgraphStore::new();
 store
.upsert_file(&File::new("a.rs", "rust", "h1", Utc::now()))
.await
.unwrap();
 store
.upsert_file(&File::new("b.rs", "rust", "h2", Utc::now()))
.await
.unwrap();
 store
.upsert_file(&File::new("c.rs", "rust", "h3", Utc::now()))
.await
.unwrap();
 store
.upsert_symbols("a.rs", &[symbol("a.rs:main", "main", "a.rs")])
.await
.unwrap();
 store
.upsert_symbols("b.rs", &[symbol("b.rs:helper", "helper", "b.rs")])
.await
.unwrap();
 store
.upsert_symbols("c.rs", &[symbol("c.rs:other", "other", "c.rs")])
.await
.unwrap();
 store
.upsert_call_edges(
 "a.rs",
 &[CallRecord {
 caller_qualified_name: "a.rs:main".to_string(),
 callee_name: "helper".to_string(),
 is_conditional: false,
 }],
 )
.await
.unwrap();

 // Deleting the last-inserted-order node exercises the swap-remove bug: a
 // plain `petgraph::Graph` would move `c.rs`'s symbol into the freed slot
 // and leave `self.index["c.rs:other"]` stale.
 store.delete_file("b.rs").await.unwrap();

 let callees = store.callees_of("a.rs:main", 10).await.unwrap();
 assert!(callees.is_empty(), "edge into deleted symbol must not dangle");

 let remaining = store.find_symbols_by_keyword("other", 10).await.unwrap();
 assert_eq!(remaining.len(), 1);
 assert_eq!(remaining[0].qualified_name, "c.rs:other");

 let (in_degree, out_degree) = store.call_degree("c.rs:other").await.unwrap();
 assert_eq!((in_degree, out_degree), (0, 0));
 }
}
