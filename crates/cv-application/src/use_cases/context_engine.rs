//! Context Engine: assembles a token-budgeted [`ContextSnapshot`] from
//! explicit files, vector search, graph keyword search and graph expansion,
//! localizing down to `token_limit` when the raw assembly overruns it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use cv_domain::constants::context as defaults;
use cv_domain::constants::sync::COLLECTION_CODE_CHUNKS;
use cv_domain::entities::ActiveContext;
use cv_domain::error::Result;
use cv_domain::ports::services::ContextServiceInterface;
use cv_domain::ports::{EmbeddingProvider, FileSystemProvider, GraphStoreProvider, VectorStoreProvider};
use cv_domain::value_objects::{Chunk, ContextOptions, ContextSnapshot, FileContext, Relationship, SymbolContext};
use cv_language_support::LanguageDetector;

/// Builds [`ContextSnapshot`]s per the six phases, degrading gracefully
/// when the graph and/or vector collaborators are absent.
pub struct ContextEngineImpl {
 graph: Option<Arc<dyn GraphStoreProvider>>,
 vector: Option<Arc<dyn VectorStoreProvider>>,
 embedding: Option<Arc<dyn EmbeddingProvider>>,
 fs: Arc<dyn FileSystemProvider>,
 detector: LanguageDetector,
}

/// Accumulates a `FileContext` under construction, keyed by file path.
struct FileAccumulator {
 chunks: Vec<Chunk>,
 symbols: Vec<SymbolContext>,
 relevance: f64,
}

impl ContextEngineImpl {
 /// Builds an engine. `graph`, `vector` and `embedding` are nullable
 /// capabilities: absent collaborators cause their phase to be skipped,
 /// never an error.
 pub fn new(
 graph: Option<Arc<dyn GraphStoreProvider>>,
 vector: Option<Arc<dyn VectorStoreProvider>>,
 embedding: Option<Arc<dyn EmbeddingProvider>>,
 fs: Arc<dyn FileSystemProvider>,
 ) -> Self {
 Self {
 graph,
 vector,
 embedding,
 fs,
 detector: LanguageDetector::new(),
 }
 }

 fn estimate_tokens(chars: usize) -> usize {
 chars.div_ceil(defaults::CHARS_PER_TOKEN)
 }

 fn language_of(&self, path: &str) -> String {
 self.detector
.detect_opt(std::path::Path::new(path))
.map(|l| l.name().to_string())
.unwrap_or_default()
 }

 fn extract_keywords(query: &str) -> Vec<String> {
 let stopwords: std::collections::HashSet<&str> = defaults::STOPWORDS.iter().copied().collect();
 let mut seen = std::collections::HashSet::new();
 let mut keywords = Vec::new();
 for word in query.split(|c: char| !c.is_alphanumeric()) {
 let word = word.to_lowercase();
 if word.is_empty() || stopwords.contains(word.as_str()) {
 continue;
 }
 if seen.insert(word.clone()) {
 keywords.push(word);
 }
 if keywords.len() >= defaults::TOP_KEYWORDS {
 break;
 }
 }
 keywords
 }

 async fn phase_explicit_files(&self, accumulators: &mut HashMap<String, FileAccumulator>, active_context: &ActiveContext) {
 for path in &active_context.explicit_files {
 let Ok(bytes) = self.fs.read(path).await else {
 continue;
 };
 let text = String::from_utf8_lossy(&bytes).into_owned();
 let line_count = text.lines().count().max(1) as u32;
 let chunk = Chunk::new(path.clone(), None, 1, line_count, text, self.language_of(path), None);
 accumulators.insert(
 path.clone(),
 FileAccumulator {
 chunks: vec![chunk],
 symbols: Vec::new(),
 relevance: 1.0,
 },
 );
 }
 }

 async fn phase_vector_search(
 &self,
 accumulators: &mut HashMap<String, FileAccumulator>,
 options: &ContextOptions,
 ) -> usize {
 let (Some(vector), Some(embedding)) = (&self.vector, &self.embedding) else {
 return 0;
 };
 let Ok(mut vectors) = embedding.embed(std::slice::from_ref(&options.query)).await else {
 return 0;
 };
 let Some(query_vector) = vectors.pop() else {
 return 0;
 };
 let Ok(hits) = vector
.search(COLLECTION_CODE_CHUNKS, &query_vector, options.max_chunks, None)
.await
 else {
 return 0;
 };

 let mut accepted = 0;
 for hit in hits {
 if hit.score < options.min_score {
 continue;
 }
 let Some(path) = hit.payload.get("path").and_then(|v| v.as_str()) else {
 continue;
 };
 let start_line = hit.payload.get("startLine").and_then(|v| v.as_u64()).unwrap_or(1) as u32;
 let end_line = hit.payload.get("endLine").and_then(|v| v.as_u64()).unwrap_or(u64::from(start_line)) as u32;
 let text = hit.payload.get("text").and_then(|v| v.as_str()).unwrap_or_default();
 let language = hit.payload.get("language").and_then(|v| v.as_str()).unwrap_or_default();
 let docstring = hit.payload.get("docstring").and_then(|v| v.as_str()).map(str::to_string);
 let symbol_name = hit.payload.get("symbolName").and_then(|v| v.as_str()).map(str::to_string);

 let chunk = Chunk::new(
 path.to_string(),
 symbol_name,
 start_line,
 end_line,
 text.to_string(),
 language.to_string(),
 docstring,
 );
 let entry = accumulators.entry(path.to_string()).or_insert_with(|| FileAccumulator {
 chunks: Vec::new(),
 symbols: Vec::new(),
 relevance: f64::from(hit.score),
 });
 entry.relevance = entry.relevance.max(f64::from(hit.score));
 entry.chunks.push(chunk);
 accepted += 1;
 }
 accepted
 }

 async fn phase_graph_keyword_search(
 &self,
 accumulators: &mut HashMap<String, FileAccumulator>,
 options: &ContextOptions,
 vector_hit_count: usize,
 ) -> Vec<SymbolContext> {
 let Some(graph) = &self.graph else {
 return Vec::new();
 };
 let keywords = Self::extract_keywords(&options.query);
 if keywords.is_empty() {
 return Vec::new();
 }

 let max_graph_results = if vector_hit_count >= defaults::VECTOR_HIT_THRESHOLD_FOR_LOW_GRAPH_BUDGET {
 defaults::GRAPH_RESULTS_LOW_BUDGET
 } else {
 defaults::GRAPH_RESULTS_HIGH_BUDGET
 };
 let per_keyword_limit = max_graph_results.div_ceil(keywords.len());

 let mut symbol_contexts = Vec::new();
 let mut seen_names = std::collections::HashSet::new();

 for keyword in &keywords {
 let Ok(symbols) = graph.find_symbols_by_keyword(keyword, per_keyword_limit).await else {
 continue;
 };
 for symbol in symbols {
 if !seen_names.insert(symbol.qualified_name.clone()) {
 continue;
 }
 let Ok(bytes) = self.fs.read(&symbol.file).await else {
 continue;
 };
 let text = String::from_utf8_lossy(&bytes).into_owned();
 let lines: Vec<&str> = text.lines().collect();
 let start = (symbol.start_line.saturating_sub(1)) as usize;
 let end = (symbol.end_line as usize).min(lines.len());
 let chunk_text = if start < end { lines[start..end].join("\n") } else { String::new() };

 let chunk = Chunk::new(
 symbol.file.clone(),
 Some(symbol.name.clone()),
 symbol.start_line,
 symbol.end_line,
 chunk_text,
 self.language_of(&symbol.file),
 symbol.docstring.clone(),
 );
 let entry = accumulators
.entry(symbol.file.clone())
.or_insert_with(|| FileAccumulator {
 chunks: Vec::new(),
 symbols: Vec::new(),
 relevance: 0.6,
 });
 entry.chunks.push(chunk);

 let symbol_context = SymbolContext {
 qualified_name: symbol.qualified_name.clone(),
 file: symbol.file.clone(),
 kind: symbol.kind,
 start_line: symbol.start_line,
 signature: symbol.signature.clone(),
 depth: 0,
 };
 entry.symbols.push(symbol_context.clone());
 symbol_contexts.push(symbol_context);
 }

 if let Ok(files) = graph.find_files_by_keyword(keyword, defaults::FILES_PER_KEYWORD_LIMIT).await {
 for path in files {
 if let Ok(bytes) = self.fs.read(&path).await {
 let text = String::from_utf8_lossy(&bytes).into_owned();
 let line_count = text.lines().count().max(1) as u32;
 let chunk = Chunk::new(path.clone(), None, 1, line_count, text, self.language_of(&path), None);
 let entry = accumulators.entry(path.clone()).or_insert_with(|| FileAccumulator {
 chunks: Vec::new(),
 symbols: Vec::new(),
 relevance: 0.4,
 });
 if entry.chunks.is_empty() {
 entry.chunks.push(chunk);
 }
 }
 }
 }
 }

 symbol_contexts
 }

 async fn phase_graph_expansion(
 &self,
 accumulators: &mut HashMap<String, FileAccumulator>,
 relationships: &mut Vec<Relationship>,
 seeds: &[SymbolContext],
 current_tokens: usize,
 token_limit: usize,
 ) {
 let Some(graph) = &self.graph else {
 return;
 };
 let expansion_budget = (token_limit as f64 * defaults::EXPANSION_BUDGET_FRACTION) as usize;

 for seed in seeds.iter().take(defaults::EXPANSION_CANDIDATES) {
 if let Ok(callees) = graph.callees_of(&seed.qualified_name, defaults::EXPANSION_FANOUT).await {
 for callee in &callees {
 relationships.push(Relationship {
 edge_type: cv_domain::constants::graph::CALLS.to_string(),
 from: seed.qualified_name.clone(),
 to: callee.qualified_name.clone(),
 });
 }
 }

 if current_tokens >= expansion_budget {
 continue;
 }
 if let Ok(callers) = graph.callers_of(&seed.qualified_name, defaults::EXPANSION_FANOUT).await {
 for caller in callers {
 relationships.push(Relationship {
 edge_type: cv_domain::constants::graph::CALLS.to_string(),
 from: caller.qualified_name.clone(),
 to: seed.qualified_name.clone(),
 });
 let entry = accumulators.entry(caller.file.clone()).or_insert_with(|| FileAccumulator {
 chunks: Vec::new(),
 symbols: Vec::new(),
 relevance: 0.3,
 });
 entry.symbols.push(SymbolContext {
 qualified_name: caller.qualified_name.clone(),
 file: caller.file.clone(),
 kind: caller.kind,
 start_line: caller.start_line,
 signature: caller.signature.clone(),
 depth: 1,
 });
 }
 }
 }
 }

 async fn centrality(&self, qualified_name: &str) -> f64 {
 let Some(graph) = &self.graph else {
 return 0.0;
 };
 let Ok((in_degree, out_degree)) = graph.call_degree(qualified_name).await else {
 return 0.0;
 };
 let degree = (in_degree + out_degree) as f64;
 (degree.ln_1p() / defaults::CENTRALITY_LOG_SCALE).min(1.0)
 }

 async fn localize(
 &self,
 accumulators: HashMap<String, FileAccumulator>,
 relationships: Vec<Relationship>,
 explicit_files: &[String],
 token_limit: usize,
 ) -> (Vec<FileContext>, Vec<Relationship>, usize, bool) {
 let explicit: std::collections::HashSet<&String> = explicit_files.iter().collect();
 let mut kept: Vec<(String, FileAccumulator, f64)> = Vec::new();
 let mut total_tokens = 0usize;

 for (path, accumulator) in accumulators {
 if explicit.contains(&path) {
 let file_tokens = Self::estimate_tokens(accumulator.chunks.iter().map(|c| c.text.len()).sum());
 total_tokens += file_tokens;
 kept.push((path, accumulator, f64::MAX));
 continue;
 }

 let mut max_centrality = 0.0f64;
 for symbol in &accumulator.symbols {
 let c = self.centrality(&symbol.qualified_name).await;
 max_centrality = max_centrality.max(c);
 }
 let combined_score = defaults::COMBINED_SCORE_RELEVANCE_WEIGHT * accumulator.relevance
 + defaults::COMBINED_SCORE_CENTRALITY_WEIGHT * max_centrality;
 kept.push((path, accumulator, combined_score));
 }

 kept.sort_by(|a, b| b.2.partial_cmp(&a.2).unwrap_or(std::cmp::Ordering::Equal));

 let budget = (token_limit as f64 * defaults::LOCALIZATION_BUDGET_FRACTION) as usize;
 let mut truncated = false;
 let mut files = Vec::new();
 let mut included_names: std::collections::HashSet<String> = std::collections::HashSet::new();

 for (path, accumulator, score) in kept {
 let is_explicit = score == f64::MAX;
 let file_tokens = Self::estimate_tokens(accumulator.chunks.iter().map(|c| c.text.len()).sum());

 if !is_explicit && total_tokens + file_tokens > budget {
 truncated = true;
 continue;
 }
 if !is_explicit {
 total_tokens += file_tokens;
 }

 for symbol in &accumulator.symbols {
 included_names.insert(symbol.qualified_name.clone());
 }
 files.push(FileContext {
 file: path,
 chunks: accumulator.chunks,
 symbols: accumulator.symbols,
 combined_score: if is_explicit { 1.0 } else { score },
 });
 }

 files.sort_by(|a, b| b.combined_score.partial_cmp(&a.combined_score).unwrap_or(std::cmp::Ordering::Equal));

 let kept_relationships: Vec<Relationship> = relationships
.into_iter()
.filter(|r| included_names.contains(&r.from) && included_names.contains(&r.to))
.collect();
 total_tokens += kept_relationships.len() * defaults::RELATIONSHIP_TOKEN_CHARS / defaults::CHARS_PER_TOKEN;

 (files, kept_relationships, total_tokens, truncated)
 }
}

#[async_trait]
impl ContextServiceInterface for ContextEngineImpl {
 async fn build_context(&self, active_context: &ActiveContext, options: &ContextOptions) -> Result<ContextSnapshot> {
 let mut accumulators: HashMap<String, FileAccumulator> = HashMap::new();
 let mut relationships: Vec<Relationship> = Vec::new();

 self.phase_explicit_files(&mut accumulators, active_context).await;
 let vector_hit_count = self.phase_vector_search(&mut accumulators, options).await;

 let any_source_available = self.graph.is_some() || self.vector.is_some() || !active_context.explicit_files.is_empty();
 if !any_source_available {
 return Ok(ContextSnapshot::empty());
 }

 let seeds = self
.phase_graph_keyword_search(&mut accumulators, options, vector_hit_count)
.await;

 let raw_tokens: usize = accumulators
.values()
.map(|a| Self::estimate_tokens(a.chunks.iter().map(|c| c.text.len()).sum()))
.sum();

 self.phase_graph_expansion(&mut accumulators, &mut relationships, &seeds, raw_tokens, options.token_limit)
.await;

 if accumulators.is_empty() {
 return Ok(ContextSnapshot::empty());
 }

 let (files, relationships, estimated_tokens, mut truncated) = self
.localize(accumulators, relationships, &active_context.explicit_files, options.token_limit)
.await;

 if estimated_tokens > options.token_limit {
 truncated = true;
 }

 Ok(ContextSnapshot {
 files,
 relationships,
 estimated_tokens,
 truncated,
 })
 }

 fn format_for_prompt(&self, snapshot: &ContextSnapshot) -> String {
 if snapshot.files.is_empty() && snapshot.relationships.is_empty() {
 return "## No relevant code found\n\nNo files or symbols matched this query. Ask the user for more detail before proposing an edit.\n".to_string();
 }

 let mut out = String::new();
 out.push_str("## Context Summary\n\n");
 out.push_str(&format!(
 "{} file(s), {} relationship(s), ~{} tokens{}\n\n",
 snapshot.files.len(),
 snapshot.relationships.len(),
 snapshot.estimated_tokens,
 if snapshot.truncated { " (truncated to fit budget)" } else { "" }
 ));

 out.push_str("## Files in Context\n\n");
 for file in &snapshot.files {
 for chunk in &file.chunks {
 out.push_str(&format!("```{} {}\n", chunk.language, file.file));
 out.push_str(&chunk.text);
 out.push_str("\n```\n\n");
 }
 }

 out.push_str("## Relevant Code\n\n");
 for file in &snapshot.files {
 for symbol in &file.symbols {
 out.push_str(&format!(
 "### {} ({}) — {}:{}\n",
 symbol.qualified_name, symbol.kind, symbol.file, symbol.start_line
 ));
 if let Some(signature) = &symbol.signature {
 out.push_str(&format!("`{signature}`\n"));
 }
 out.push('\n');
 }
 }

 out.push_str("## Code Relationships\n\n");
 for relationship in &snapshot.relationships {
 out.push_str(&format!("{} --[{}]--> {}\n", relationship.from, relationship.edge_type, relationship.to));
 }

 out
 }
}

#[cfg(test)]
mod tests {
 use super::*;
 use cv_providers::fs::WalkingFileSystem;

 fn engine(dir: &std::path::Path) -> ContextEngineImpl {
 ContextEngineImpl::new(None, None, None, Arc::new(WalkingFileSystem::new(dir)))
 }

 #[tokio::test]
 async fn explicit_files_are_always_included() {
 let dir = tempfile::tempdir().unwrap();
 let fs = WalkingFileSystem::new(dir.path());
 fs.write("src/a.rs", b"fn a() {}").await.unwrap();

 let engine = engine(dir.path());
 let mut active_context = ActiveContext::new(10_000);
 active_context.pin_file("src/a.rs");
 let options = ContextOptions::new("find a", 10_000);

 let snapshot = engine.build_context(&active_context, &options).await.unwrap();
 assert_eq!(snapshot.files.len(), 1);
 assert_eq!(snapshot.files[0].file, "src/a.rs");
 assert!(!snapshot.truncated);
 }

 #[tokio::test]
 async fn empty_active_context_with_no_collaborators_returns_empty_snapshot() {
 let dir = tempfile::tempdir().unwrap();
 let engine = engine(dir.path());
 let active_context = ActiveContext::new(10_000);
 let options = ContextOptions::new("anything", 10_000);

 let snapshot = engine.build_context(&active_context, &options).await.unwrap();
 assert!(snapshot.files.is_empty());
 assert!(!snapshot.truncated);
 }

 #[test]
 fn format_for_prompt_renders_distinct_stanza_when_empty() {
 let dir = tempfile::tempdir().unwrap();
 let engine = engine(dir.path());
 let rendered = engine.format_for_prompt(&ContextSnapshot::empty());
 assert!(rendered.contains("No relevant code"));
 }

 #[test]
 fn extract_keywords_strips_stopwords_and_dedupes() {
 let keywords = ContextEngineImpl::extract_keywords("please find the login handler for the user");
 assert!(!keywords.contains(&"please".to_string()));
 assert!(!keywords.contains(&"the".to_string()));
 assert!(keywords.len() <= defaults::TOP_KEYWORDS);
 }

 #[test]
 fn format_for_prompt_renders_kind_and_start_line_in_relevant_code_header() {
 use cv_domain::entities::SymbolKind;

 let dir = tempfile::tempdir().unwrap();
 let engine = engine(dir.path());
 let snapshot = ContextSnapshot {
 files: vec![FileContext {
 file: "src/a.rs".to_string(),
 chunks: Vec::new(),
 symbols: vec![SymbolContext {
 qualified_name: "src/a.rs:foo".to_string(),
 file: "src/a.rs".to_string(),
 kind: SymbolKind::Function,
 start_line: 12,
 signature: Some("fn foo()".to_string()),
 depth: 0,
 }],
 combined_score: 1.0,
 }],
 relationships: Vec::new(),
 estimated_tokens: 10,
 truncated: false,
 };

 let rendered = engine.format_for_prompt(&snapshot);
 assert!(rendered.contains("### src/a.rs:foo (function) — src/a.rs:12\n"));
 }
}
