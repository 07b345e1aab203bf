//! Git adapters.

pub mod git2_provider;

pub use git2_provider::{working_tree_dirty, Git2Provider};
