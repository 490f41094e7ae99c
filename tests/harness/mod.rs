//! Integration test harness
//!
//! `MockServer` stands in for the real game server: it accepts one websocket
//! connection, answers `Auth:*`/`Game:*` requests according to a configured
//! `ServerBehavior`, and records every inbound payload so tests can assert
//! on the exact order of what the probe sent.

mod server;

pub use server::{MockServer, ServerBehavior};
