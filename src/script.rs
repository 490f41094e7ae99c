//! Script model: ordered step records interpreted by the runner
//!
//! A script is the data-driven replacement for a hand-written test script:
//! each step is a literal JSON payload plus just enough control flow (one
//! fallback branch, an optional terminal drain loop) to cover what the
//! manual scripts did.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Response `type` value the server uses to mark a failed action.
///
/// Every other `type` is treated as success or a push notification. The real
/// protocol may have further failure types, but this is the only one the
/// manual scripts ever checked for.
pub const FAILURE_SENTINEL: &str = "error_response";

/// True if a parsed reply carries the failure sentinel
pub fn is_failure(reply: &Value) -> bool {
    reply.get("type").and_then(Value::as_str) == Some(FAILURE_SENTINEL)
}

fn default_check() -> bool {
    true
}

/// One step of a probe script
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Step {
    /// Send a payload and block for exactly one reply.
    ///
    /// With `check` set (the default), a sentinel reply triggers the
    /// fallback payload, itself checked the same way with no second
    /// fallback. With `check` unset the reply is printed and the run moves
    /// on regardless, for probes whose rejection is the interesting output.
    SendExpect {
        payload: Value,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fallback: Option<Value>,
        #[serde(default = "default_check")]
        check: bool,
    },
    /// Send a payload without waiting for a reply (fire-and-forget)
    SendOnly { payload: Value },
    /// Terminal state: receive and print frames until the connection closes
    Drain,
}

impl Step {
    /// Checked send-and-expect with a fallback payload
    pub fn send_expect(payload: Value, fallback: Value) -> Self {
        Step::SendExpect {
            payload,
            fallback: Some(fallback),
            check: true,
        }
    }

    /// Checked send-and-expect with no fallback
    pub fn send_check(payload: Value) -> Self {
        Step::SendExpect {
            payload,
            fallback: None,
            check: true,
        }
    }

    /// Send-and-print: wait for one reply but accept anything
    pub fn send_print(payload: Value) -> Self {
        Step::SendExpect {
            payload,
            fallback: None,
            check: false,
        }
    }

    /// Fire-and-forget send
    pub fn send_only(payload: Value) -> Self {
        Step::SendOnly { payload }
    }
}

/// An ordered probe script
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Script {
    pub steps: Vec<Step>,
}

impl Script {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    /// Parse a script from its JSON file representation
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

/// One completed request/response pair, in wire order
#[derive(Debug, Clone, Serialize)]
pub struct Exchange {
    pub request: Value,
    /// None for fire-and-forget sends
    pub response: Option<Value>,
}

/// Everything a finished (or cleanly closed) run observed
#[derive(Debug, Default)]
pub struct RunReport {
    pub exchanges: Vec<Exchange>,
    /// Frames collected by the terminal drain loop
    pub drained: Vec<Value>,
}
