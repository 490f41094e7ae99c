//! mudprobe - websocket smoke-test harness for MUD-style game servers
//!
//! Replaces a drawer full of near-duplicate manual test scripts with one
//! data-driven interpreter: connect to the server, run an ordered script of
//! JSON steps (send-and-check with a single fallback, fire-and-forget, or a
//! terminal drain loop), print everything the server says, and exit 1 on the
//! first unrecoverable scripted failure.

pub mod client;
pub mod config;
pub mod error;
pub mod runner;
pub mod scenario;
pub mod script;

pub use client::{TlsPolicy, WsClient};
pub use config::ProbeConfig;
pub use error::ProbeError;
pub use runner::Runner;
pub use scenario::Profile;
pub use script::{RunReport, Script, Step};
