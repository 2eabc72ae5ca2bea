#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod board;
pub mod config;
pub mod engine;
pub mod error;
pub mod history;
pub mod middleware;
pub mod routes;
pub mod services;
pub mod state;
pub mod trace_ctx;

// Re-exports for public API
pub use engine::EngineClient;
pub use error::AppError;
pub use history::{HistoryRecorder, HistoryStore};
pub use middleware::cors::cors_middleware;
pub use middleware::request_trace::RequestTrace;
pub use middleware::structured_logger::StructuredLogger;
pub use state::AppState;
