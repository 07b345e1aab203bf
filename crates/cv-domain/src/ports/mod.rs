//! Port traits: the seams between the domain and everything outside it.

pub mod providers;
pub mod services;

pub use providers::*;
pub use services::*;
