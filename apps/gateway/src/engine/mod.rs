//! Rules/AI engine boundary: wire schemas and the HTTP client.

pub mod client;
pub mod dto;

pub use client::EngineClient;
