//! HTTP boundary: one prediction endpoint over the load-once model state.

pub mod config;
mod error;
pub mod routes;
pub mod server;

pub use config::ServerConfig;
pub use error::ApiError;
pub use routes::{HEALTH_PATH, NEWS_CHECKER_PATH, router, router_with_body_limit};
pub use server::{AppState, run, serve};
