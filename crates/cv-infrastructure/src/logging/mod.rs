//! Structured logging: an `EnvFilter` driven by `RUST_LOG` (default
//! `info`), with an optional JSON formatter for production deployments.

use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Log output shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
 /// Human-readable, for local development.
 #[default]
 Pretty,
 /// One JSON object per line, for log aggregation.
 Json,
}

/// Installs the global `tracing` subscriber. Call once, at process start.
///
/// Honors `RUST_LOG` if set; otherwise defaults to `info` for this crate's
/// workspace and `warn` for dependencies.
pub fn init_logging(format: LogFormat) {
 let filter = EnvFilter::try_from_default_env()
.unwrap_or_else(|_| EnvFilter::new("info,cv_domain=info,cv_application=info,cv_providers=info"));

 let registry = tracing_subscriber::registry().with(filter);
 match format {
 LogFormat::Pretty => {
 let _ = registry.with(fmt::layer().with_target(true)).try_init();
 }
 LogFormat::Json => {
 let _ = registry.with(fmt::layer().json().with_target(true)).try_init();
 }
 }
}
