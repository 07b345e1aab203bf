//! # Providers layer
//!
//! Concrete adapters implementing `cv-domain`'s provider ports: an in-process
//! graph store, an embedded vector index, HTTP chat/embedding clients, and
//! local git/filesystem facilities. Nothing above this crate should depend on
//! `petgraph`, `edgevec`, `reqwest` or `git2` directly — only on the traits in
//! `cv_domain::ports`.

pub mod chat;
pub mod embedding;
pub mod fs;
pub mod git;
pub mod graph;
pub mod vector;
