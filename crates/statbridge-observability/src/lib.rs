//! statbridge observability module
//!
//! Structured logging for the exporter, built on `tracing`.
//!
//! # Example
//!
//! ```ignore
//! use statbridge_observability::{init_tracing, LogFormat};
//!
//! fn main() {
//!     init_tracing(LogFormat::Compact, Some("info")).expect("logging setup");
//!     tracing::info!("exporter starting");
//! }
//! ```

pub mod config;
pub mod initialization;

pub use config::{LogConfig, LogError, LogFormat};
pub use initialization::{init_tracing, init_tracing_with_config};

/// Tracing re-exports for convenience
pub use tracing::{debug, error, info, trace, warn};
