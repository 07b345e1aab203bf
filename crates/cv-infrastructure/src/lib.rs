//! # Infrastructure layer
//!
//! The composition root: `.cv/config.json` loading (`config`), structured
//! logging setup (`logging`), JSON-file adapters for the session and
//! sync-state persistence ports (`persistence`), and the wiring that turns
//! a loaded config into a ready-to-use [`di::AppContext`] (`di`).

pub mod config;
pub mod di;
pub mod logging;
pub mod persistence;

pub use config::{CvConfig, CvLayout};
pub use di::AppContext;
