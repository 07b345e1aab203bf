//! Vector store adapters.

pub mod edgevec_store;

pub use edgevec_store::EdgevecStore;
