//! Edit Parser: turns an assistant's fenced-block response into typed
//! [`Edit`]s, and renders them back as unified-diff-style hunks for display.

use regex::Regex;

use cv_domain::ports::services::EditParserInterface;
use cv_domain::value_objects::{Edit, EditType, MessageId, SearchReplaceBlock};

const SEARCH_MARKER: &str = "<<<<<<< SEARCH";
const DIVIDER_MARKER: &str = "=======";
const REPLACE_MARKER: &str = ">>>>>>> REPLACE";
const DELETE_MARKER: &str = "<<<<<<< DELETE";
const DELETE_END_MARKER: &str = ">>>>>>> DELETE";

/// Parses LLM responses into [`Edit`]s and renders diff previews of them.
///
/// Grounded on the fenced-block scanning the rendered prompt format implies
/// (formatting contract uses the same fence convention in reverse):
/// this reads the fences an assistant is asked to emit back out again.
pub struct EditParserImpl {
 fence_re: Regex,
}

impl EditParserImpl {
 /// Builds a parser. The fence regex is compiled once and reused across
 /// calls.
 #[must_use]
 pub fn new() -> Self {
 Self {
 // ```<label>\n<body>```, label is a path or an `old -> new` rename.
 fence_re: Regex::new(r"(?s)```([^\n`]*)\n(.*?)```").expect("static regex"),
 }
 }

 fn parse_rename_label(label: &str) -> Option<(String, String)> {
 let label = label.trim();
 for sep in [" -> ", " → "] {
 if let Some((old, new)) = label.split_once(sep) {
 let old = old.trim();
 let new = new.trim();
 if !old.is_empty() && !new.is_empty() {
 return Some((old.to_string(), new.to_string()));
 }
 }
 }
 None
 }

 fn is_path_like(label: &str) -> bool {
 let label = label.trim();
 if label.is_empty() {
 return false;
 }
 label.contains('/') || label.rsplit_once('.').is_some_and(|(_, ext)| !ext.is_empty() && ext.chars().all(char::is_alphanumeric))
 }

 fn parse_search_replace_blocks(body: &str) -> Option<Vec<SearchReplaceBlock>> {
 if !body.contains(SEARCH_MARKER) {
 return None;
 }
 let mut blocks = Vec::new();
 let mut rest = body;
 while let Some(search_start) = rest.find(SEARCH_MARKER) {
 let after_search = &rest[search_start + SEARCH_MARKER.len()..];
 let divider_pos = after_search.find(DIVIDER_MARKER)?;
 let search_text = after_search[..divider_pos].trim_matches('\n').to_string();

 let after_divider = &after_search[divider_pos + DIVIDER_MARKER.len()..];
 let replace_end = after_divider.find(REPLACE_MARKER)?;
 let replace_text = after_divider[..replace_end].trim_matches('\n').to_string();

 blocks.push(SearchReplaceBlock {
 search: search_text,
 replace: replace_text,
 });
 rest = &after_divider[replace_end + REPLACE_MARKER.len()..];
 }
 if blocks.is_empty() {
 None
 } else {
 Some(blocks)
 }
 }

 fn is_delete_marker(body: &str) -> bool {
 let trimmed = body.trim();
 trimmed == format!("{DELETE_MARKER}\n{DELETE_END_MARKER}") || trimmed == format!("{DELETE_MARKER}\r\n{DELETE_END_MARKER}")
 }
}

impl Default for EditParserImpl {
 fn default() -> Self {
 Self::new()
 }
}

impl EditParserInterface for EditParserImpl {
 fn parse_response(&self, response: &str, _source_message: MessageId) -> Vec<Edit> {
 let mut edits = Vec::new();
 for caps in self.fence_re.captures_iter(response) {
 let label = &caps[1];
 let body = &caps[2];

 if !Self::is_path_like(label) && Self::parse_rename_label(label).is_none() {
 continue;
 }

 if let Some((old, new)) = Self::parse_rename_label(label) {
 edits.push(Edit::new(old, EditType::Rename { to: new, content: None }));
 continue;
 }

 let file = label.trim().to_string();

 if Self::is_delete_marker(body) {
 edits.push(Edit::new(file, EditType::Delete));
 continue;
 }

 if let Some(blocks) = Self::parse_search_replace_blocks(body) {
 edits.push(Edit::new(file, EditType::Modify { blocks }));
 continue;
 }

 edits.push(Edit::new(
 file,
 EditType::Create {
 content: body.trim_end_matches('\n').to_string(),
 },
 ));
 }
 edits
 }

 fn render_diff(&self, edit: &Edit, current_content: Option<&str>) -> String {
 match &edit.edit_type {
 EditType::Create { content } => {
 let mut out = format!("--- /dev/null\n+++ {}\n", edit.file);
 for line in content.lines() {
 out.push_str("+");
 out.push_str(line);
 out.push('\n');
 }
 out
 }
 EditType::Delete => {
 let mut out = format!("--- {}\n+++ /dev/null\n", edit.file);
 if let Some(content) = current_content {
 for line in content.lines() {
 out.push('-');
 out.push_str(line);
 out.push('\n');
 }
 }
 out
 }
 EditType::Modify { blocks } => {
 let mut out = format!("--- {file}\n+++ {file}\n", file = edit.file);
 for block in blocks {
 let start_line = current_content
.and_then(|c| c.find(block.search.as_str()))
.map(|byte_offset| current_content.unwrap()[..byte_offset].matches('\n').count() + 1)
.unwrap_or(1);
 out.push_str(&format!("@@ -{start_line} @@\n"));
 for line in block.search.lines() {
 out.push('-');
 out.push_str(line);
 out.push('\n');
 }
 for line in block.replace.lines() {
 out.push('+');
 out.push_str(line);
 out.push('\n');
 }
 }
 out
 }
 EditType::Rename { to, content } => {
 let mut out = format!("--- {}\n+++ {}\n", edit.file, to);
 if let Some(content) = content {
 for line in content.lines() {
 out.push('+');
 out.push_str(line);
 out.push('\n');
 }
 }
 out
 }
 }
 }
}

#[cfg(test)]
mod tests {
 use super::*;

 fn msg() -> MessageId {
 MessageId::new()
 }

 #[test]
 fn parses_create_from_plain_fenced_block() {
 let parser = EditParserImpl::new();
 let response = "Here:\n```src/new.rs\nfn main() {}\n```\n";
 let edits = parser.parse_response(response, msg());
 assert_eq!(edits.len(), 1);
 assert_eq!(edits[0].file, "src/new.rs");
 assert!(matches!(&edits[0].edit_type, EditType::Create { content } if content == "fn main() {}"));
 }

 #[test]
 fn parses_modify_with_search_replace_markers() {
 let parser = EditParserImpl::new();
 let response = "```src/a.rs\n<<<<<<< SEARCH\nfn foo() {}\n=======\nfn foo() { 1 }\n>>>>>>> REPLACE\n```";
 let edits = parser.parse_response(response, msg());
 assert_eq!(edits.len(), 1);
 match &edits[0].edit_type {
 EditType::Modify { blocks } => {
 assert_eq!(blocks.len(), 1);
 assert_eq!(blocks[0].search, "fn foo() {}");
 assert_eq!(blocks[0].replace, "fn foo() { 1 }");
 }
 other => panic!("expected modify, got {other:?}"),
 }
 }

 #[test]
 fn parses_multiple_search_replace_blocks_in_order() {
 let parser = EditParserImpl::new();
 let response = concat!(
 "```src/a.rs\n",
 "<<<<<<< SEARCH\na\n=======\nb\n>>>>>>> REPLACE\n",
 "<<<<<<< SEARCH\nc\n=======\nd\n>>>>>>> REPLACE\n",
 "```"
 );
 let edits = parser.parse_response(response, msg());
 match &edits[0].edit_type {
 EditType::Modify { blocks } => assert_eq!(blocks.len(), 2),
 other => panic!("expected modify, got {other:?}"),
 }
 }

 #[test]
 fn parses_delete_marker() {
 let parser = EditParserImpl::new();
 let response = "```src/old.rs\n<<<<<<< DELETE\n>>>>>>> DELETE\n```";
 let edits = parser.parse_response(response, msg());
 assert_eq!(edits.len(), 1);
 assert!(matches!(edits[0].edit_type, EditType::Delete));
 }

 #[test]
 fn parses_rename_from_arrow_label() {
 let parser = EditParserImpl::new();
 let response = "```src/old.rs -> src/new.rs\n```";
 let edits = parser.parse_response(response, msg());
 assert_eq!(edits.len(), 1);
 assert_eq!(edits[0].file, "src/old.rs");
 assert!(matches!(&edits[0].edit_type, EditType::Rename { to,.. } if to == "src/new.rs"));
 }

 #[test]
 fn ignores_fenced_blocks_without_a_path_like_label() {
 let parser = EditParserImpl::new();
 let response = "```\nsome unrelated shell output\n```";
 let edits = parser.parse_response(response, msg());
 assert!(edits.is_empty());
 }

 #[test]
 fn every_parsed_edit_starts_pending() {
 let parser = EditParserImpl::new();
 let response = "```src/a.rs\nfn a() {}\n```";
 let edits = parser.parse_response(response, msg());
 assert!(edits.iter().all(|e| e.status == cv_domain::value_objects::EditStatus::Pending));
 }
}
