//! chainname-server: HTTP redirect service for ChainName names.
//!
//! A request to `alice.bch.is` resolves the name `alice.bch` on the chain
//! that serves `bch.is` and redirects to its content hash or `url` record;
//! `alice.bch.is/twitter` redirects to the profile in its `com.twitter`
//! record.

pub mod config;
pub mod handlers;
pub mod host;
pub mod pages;
pub mod server;
pub mod telemetry;

pub use config::{ConfigError, ServerConfig};
pub use handlers::{ApiError, AppState};
pub use host::SiteHost;
pub use server::{build_state, create_router, run, ServerError};
pub use telemetry::{init_tracing, LogConfig, TelemetryError};
