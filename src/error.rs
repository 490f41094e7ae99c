//! Probe error taxonomy
//!
//! The only recognized *scripted* failure is a reply carrying the
//! `error_response` sentinel; everything else is an unexpected fault that
//! aborts the run.

use thiserror::Error;

/// Errors produced while running a probe script
#[derive(Debug, Error)]
pub enum ProbeError {
    /// A send-and-check step (or its fallback) got the failure sentinel
    #[error("server rejected '{request_type}' (and the fallback, if any)")]
    ScriptedFailure { request_type: String },

    #[error("websocket closed by server")]
    Closed,

    #[error("timed out waiting for a reply")]
    Timeout,

    #[error("malformed inbound frame: {0}")]
    Protocol(#[from] serde_json::Error),

    #[error("transport error: {0}")]
    Transport(#[from] tokio_tungstenite::tungstenite::Error),

    #[error("tls setup error: {0}")]
    Tls(#[from] native_tls::Error),
}

impl ProbeError {
    /// True for the one failure mode that gets the scripted exit(1) path
    pub fn is_scripted(&self) -> bool {
        matches!(self, ProbeError::ScriptedFailure { .. })
    }
}
