//! Script interpreter
//!
//! Executes each step in program order against one connection. All inbound
//! frames are printed raw to stdout for human inspection; tracing carries
//! only the diagnostics around them.

use std::time::Duration;

use serde_json::Value;
use tracing::{info, warn};

use crate::client::WsClient;
use crate::error::ProbeError;
use crate::script::{is_failure, Exchange, RunReport, Script, Step};

/// Runs a script over an already-connected client
pub struct Runner {
    client: WsClient,
    recv_timeout: Option<Duration>,
}

impl Runner {
    pub fn new(client: WsClient) -> Self {
        Self {
            client,
            recv_timeout: None,
        }
    }

    /// Bound each send-and-check wait; the manual scripts blocked forever
    pub fn with_recv_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.recv_timeout = timeout;
        self
    }

    /// Execute the whole script, stopping on the first unrecoverable failure.
    ///
    /// A clean server close during the terminal drain loop ends the run
    /// normally; anywhere else it is a fault.
    pub async fn run(mut self, script: &Script) -> Result<RunReport, ProbeError> {
        let mut report = RunReport::default();

        for step in &script.steps {
            match step {
                Step::SendExpect {
                    payload,
                    fallback,
                    check,
                } => {
                    self.send_expect(payload, fallback.as_ref(), *check, &mut report)
                        .await?;
                }
                Step::SendOnly { payload } => {
                    self.client.send_json(payload).await?;
                    report.exchanges.push(Exchange {
                        request: payload.clone(),
                        response: None,
                    });
                }
                Step::Drain => {
                    self.drain(&mut report).await?;
                }
            }
        }

        Ok(report)
    }

    /// Send one payload, wait for one reply, apply the single fallback branch
    async fn send_expect(
        &mut self,
        payload: &Value,
        fallback: Option<&Value>,
        check: bool,
        report: &mut RunReport,
    ) -> Result<(), ProbeError> {
        let reply = self.exchange(payload, report).await?;

        if !check || !is_failure(&reply) {
            return Ok(());
        }

        let request_type = type_of(payload);
        let Some(fallback) = fallback else {
            warn!(%request_type, "server rejected request, no fallback configured");
            return Err(ProbeError::ScriptedFailure { request_type });
        };

        info!(%request_type, "server rejected request, trying fallback");
        let reply = self.exchange(fallback, report).await?;
        if is_failure(&reply) {
            warn!(%request_type, "fallback rejected too, giving up");
            return Err(ProbeError::ScriptedFailure { request_type });
        }
        Ok(())
    }

    /// One send/receive pair, printed and recorded
    async fn exchange(
        &mut self,
        payload: &Value,
        report: &mut RunReport,
    ) -> Result<Value, ProbeError> {
        self.client.send_json(payload).await?;
        let (raw, reply) = self.client.recv_json_timeout(self.recv_timeout).await?;
        println!("{raw}");
        report.exchanges.push(Exchange {
            request: payload.clone(),
            response: Some(reply.clone()),
        });
        Ok(reply)
    }

    /// Terminal state: print pushed frames until the server goes away
    async fn drain(&mut self, report: &mut RunReport) -> Result<(), ProbeError> {
        info!("scripted steps done, draining pushed frames");
        loop {
            match self.client.recv_json().await {
                Ok((raw, frame)) => {
                    println!("{raw}");
                    report.drained.push(frame);
                }
                Err(ProbeError::Closed) => {
                    info!("connection closed, run complete");
                    return Ok(());
                }
                Err(e) => return Err(e),
            }
        }
    }
}

fn type_of(payload: &Value) -> String {
    payload
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or("<untyped>")
        .to_string()
}
