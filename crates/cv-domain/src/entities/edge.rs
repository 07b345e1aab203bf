//! Graph-only typed relations between entities.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::constants::graph;

/// The typed relation an [`Edge`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum EdgeType {
    /// File DEFINES Symbol.
    Defines,
    /// Symbol CALLS Symbol.
    Calls,
    /// File IMPORTS File, or an opaque external target.
    Imports,
    /// Symbol IMPLEMENTS Symbol.
    Implements,
    /// Symbol EXTENDS Symbol.
    Extends,
}

impl EdgeType {
    /// The namespaced edge type name written to the graph store.
    pub fn as_store_str(self) -> &'static str {
        match self {
            Self::Defines => graph::DEFINES,
            Self::Calls => graph::CALLS,
            Self::Imports => graph::IMPORTS,
            Self::Implements => graph::IMPLEMENTS,
            Self::Extends => graph::EXTENDS,
        }
    }
}

/// A directed, typed edge between two graph nodes, identified by their keys.
///
/// `CALLS` edges are the one case the graph resolver may choose to omit
/// rather than write: an edge whose endpoints cannot both resolve to a
/// `Symbol` node is never constructed (see the graph-safety invariant).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Edge {
    /// Edge type.
    pub edge_type: EdgeType,
    /// Key of the source node (a `File.path` or `Symbol.qualified_name`).
    pub from: String,
    /// Key of the target node (a `File.path` or `Symbol.qualified_name`).
    pub to: String,
}

impl Edge {
    /// Builds a new edge.
    pub fn new(edge_type: EdgeType, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            edge_type,
            from: from.into(),
            to: to.into(),
        }
    }
}
