//! Composition root: wires concrete providers from `cv-providers` and
//! `cv-infrastructure::persistence` behind `cv-domain`'s ports. Construction-
//! time wiring only — nothing in this core needs a runtime-swappable
//! provider registry.

pub mod bootstrap;

pub use bootstrap::AppContext;
