//! `leadpivot_web` v1:
//! Single-page upload form and JSON/XLSX endpoints over `leadpivot_core`.
//!
//! - `conf`    : server settings (clap + env)
//! - `logging` : tracing subscriber setup
//! - `routes`  : actix-web handlers

pub mod conf;
pub mod logging;
pub mod routes;

pub use conf::ServerConfig;
pub use logging::{LogFormat, init_default_logging, init_logging};
pub use routes::configure;
