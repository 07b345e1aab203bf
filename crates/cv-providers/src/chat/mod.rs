//! Chat completion provider adapters.

pub mod http;

pub use http::{HttpChatConfig, HttpChatProvider};
