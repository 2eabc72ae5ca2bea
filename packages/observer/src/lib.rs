//! Playback-side session driver.
//!
//! The gateway owns the HTTP surface; this crate owns the pacing of a
//! single watched session: stepping, batching, full playouts and timed
//! auto-play, with an explicit state machine that keeps at most one
//! advance request in flight.

pub mod api;
pub mod controller;
pub mod scheduler;

pub use api::{ApiError, GatewayClient, SessionApi};
pub use controller::{apply, ControllerState, Event, Mode, TurnController};
pub use scheduler::AutoPlay;
