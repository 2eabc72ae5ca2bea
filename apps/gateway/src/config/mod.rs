//! Environment-driven configuration.
//!
//! Environment variables must be set by the runtime environment
//! (container env files or a sourced .env for local development).

use std::env;

use crate::error::AppError;

/// Address the gateway binds to, from GATEWAY_HOST / GATEWAY_PORT.
pub fn bind_addr() -> Result<(String, u16), AppError> {
    let host = env::var("GATEWAY_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port = env::var("GATEWAY_PORT")
        .unwrap_or_else(|_| "4000".to_string())
        .parse::<u16>()
        .map_err(|_| AppError::config("GATEWAY_PORT must be a valid port number".to_string()))?;
    Ok((host, port))
}

/// Base URL of the rules/AI engine, from ENGINE_BASE_URL.
pub fn engine_base_url() -> String {
    env::var("ENGINE_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:5000".to_string())
}

/// Redis URL for the history store. `None` means history is disabled.
pub fn history_redis_url() -> Option<String> {
    env::var("REDIS_URL").ok().filter(|s| !s.trim().is_empty())
}
