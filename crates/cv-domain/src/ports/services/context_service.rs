//! Context Engine contract.

use async_trait::async_trait;

use crate::entities::ActiveContext;
use crate::error::Result;
use crate::value_objects::{ContextOptions, ContextSnapshot};

/// Builds token-budgeted [`ContextSnapshot`]s from a query and active context.
#[async_trait]
pub trait ContextServiceInterface: Send + Sync {
 /// Runs all retrieval phases and, if needed, localization, returning a
 /// snapshot whose `estimated_tokens` never exceeds `options.token_limit`.
 ///
 /// Never fails unless every retrieval source failed; in that case
 /// returns `Ok(ContextSnapshot::empty())`, not an error.
 async fn build_context(
 &self,
 active_context: &ActiveContext,
 options: &ContextOptions,
 ) -> Result<ContextSnapshot>;

 /// Renders `snapshot` into the fenced-section prompt format described
 /// in its formatting contract.
 fn format_for_prompt(&self, snapshot: &ContextSnapshot) -> String;
}
