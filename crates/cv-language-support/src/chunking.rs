//! The Chunker: turns a parsed file into embedding-sized [`Chunk`]s.

use cv_domain::value_objects::Chunk;

use crate::language::LanguageId;
use crate::parser::ParsedFile;

/// Target size range (in characters) for paragraph-split chunks of files
/// with no extractable symbols.
const PARAGRAPH_MIN_CHARS: usize = 400;
const PARAGRAPH_MAX_CHARS: usize = 1500;

/// Splits a parsed file's source text into [`Chunk`]s.
#[derive(Debug, Default, Clone, Copy)]
pub struct Chunker;

impl Chunker {
 /// Builds a chunker. Stateless; all inputs are passed to [`Self::chunk`].
 pub fn new() -> Self {
 Self
 }

 /// Chunks `text` (the full content of `path`, already parsed into
 /// `parsed`). One Chunk per Symbol when symbols were extracted;
 /// otherwise falls back to paragraph splitting.
 pub fn chunk(&self, path: &str, text: &str, parsed: &ParsedFile) -> Vec<Chunk> {
 if parsed.symbols.is_empty() {
 return self.chunk_paragraphs(path, text, parsed.language);
 }

 let lines: Vec<&str> = text.lines().collect();
 parsed
.symbols
.iter()
.map(|symbol| {
 let chunk_text = slice_lines(&lines, symbol.start_line, symbol.end_line);
 Chunk::new(
 path,
 Some(symbol.name.clone()),
 symbol.start_line,
 symbol.end_line,
 chunk_text,
 parsed.language.name(),
 symbol.docstring.clone(),
 )
 })
.collect()
 }

 /// Falls back to blank-line-paragraph splitting for files with no
 /// extractable symbols (Markdown, config, plain text).
 fn chunk_paragraphs(&self, path: &str, text: &str, language: LanguageId) -> Vec<Chunk> {
 let paragraphs = split_paragraphs(text);
 let mut chunks = Vec::new();
 let mut current = String::new();
 let mut current_start = 1u32;
 let mut line_no = 1u32;

 for paragraph in paragraphs {
 let paragraph_lines = paragraph.lines().count().max(1) as u32;
 if !current.is_empty() && current.len() + paragraph.len() > PARAGRAPH_MAX_CHARS {
 chunks.push(finish_paragraph_chunk(path, &current, current_start, line_no - 1, language));
 current.clear();
 current_start = line_no;
 }
 if current.is_empty() {
 current_start = line_no;
 }
 if !current.is_empty() {
 current.push_str("\n\n");
 }
 current.push_str(&paragraph);
 line_no += paragraph_lines + 1;

 if current.len() >= PARAGRAPH_MIN_CHARS {
 chunks.push(finish_paragraph_chunk(path, &current, current_start, line_no - 2, language));
 current.clear();
 }
 }

 if !current.is_empty() {
 chunks.push(finish_paragraph_chunk(path, &current, current_start, line_no.saturating_sub(2), language));
 }

 chunks
 }
}

fn finish_paragraph_chunk(path: &str, text: &str, start_line: u32, end_line: u32, language: LanguageId) -> Chunk {
 Chunk::new(
 path,
 None,
 start_line,
 end_line.max(start_line),
 text.to_string(),
 language.name(),
 None,
 )
}

/// Splits `text` on blank-line boundaries, never splitting inside a line.
fn split_paragraphs(text: &str) -> Vec<String> {
 let mut paragraphs = Vec::new();
 let mut current = Vec::new();

 for line in text.lines() {
 if line.trim().is_empty() {
 if !current.is_empty() {
 paragraphs.push(current.join("\n"));
 current.clear();
 }
 } else {
 current.push(line);
 }
 }
 if !current.is_empty() {
 paragraphs.push(current.join("\n"));
 }
 paragraphs
}

/// 1-indexed, inclusive line slice of `lines`.
fn slice_lines(lines: &[&str], start_line: u32, end_line: u32) -> String {
 let start = (start_line.saturating_sub(1)) as usize;
 let end = (end_line as usize).min(lines.len());
 if start >= lines.len() || start >= end {
 return String::new();
 }
 lines[start..end].join("\n")
}

#[cfg(test)]
mod tests {
 use super::*;
 use crate::parser::ParserRegistry;
 use std::path::PathBuf;

 #[test]
 fn one_chunk_per_symbol_scenario_a() {
 let registry = ParserRegistry::new();
 let text = "/** abs */\nexport function foo(x: number): number { if (x>0) return x; return -x; }";
 let parsed = registry.parse(&PathBuf::from("src/a.ts"), text.as_bytes()).unwrap();

 let chunks = Chunker::new().chunk("src/a.ts", text, &parsed);
 assert_eq!(chunks.len(), 1);
 assert_eq!(chunks[0].symbol_name.as_deref(), Some("foo"));
 }

 #[test]
 fn same_content_reproduces_same_chunk_id() {
 let registry = ParserRegistry::new();
 let text = "fn helper() -> i32 { 1 }";
 let parsed = registry.parse(&PathBuf::from("src/lib.rs"), text.as_bytes()).unwrap();

 let a = Chunker::new().chunk("src/lib.rs", text, &parsed);
 let b = Chunker::new().chunk("src/lib.rs", text, &parsed);
 assert_eq!(a[0].id, b[0].id);
 }

 #[test]
 fn paragraph_split_never_breaks_a_line() {
 let text = "first paragraph line one\nfirst paragraph line two\n\nsecond paragraph\n";
 let paragraphs = split_paragraphs(text);
 assert_eq!(paragraphs.len(), 2);
 assert!(paragraphs[0].contains("first paragraph line one"));
 assert!(paragraphs[0].contains("first paragraph line two"));
 }

 #[test]
 fn file_with_no_symbols_falls_back_to_paragraphs() {
 let registry = ParserRegistry::new();
 let text = "fn helper() -> i32 { 1 }";
 let mut parsed = registry.parse(&PathBuf::from("src/lib.rs"), text.as_bytes()).unwrap();
 parsed.symbols.clear();

 let readme = "# Title\n\nSome long paragraph text that goes on for a while to exercise the \
 fallback chunking path when no symbols were extracted from the source file at all, \
 padded out well past the minimum paragraph chunk size so the split logic actually runs.";
 let chunks = Chunker::new().chunk("README.md", readme, &parsed);
 assert!(!chunks.is_empty());
 for chunk in &chunks {
 assert!(chunk.symbol_name.is_none());
 }
 }
}
