//! Websocket transport for the probe
//!
//! One connection, owned for the whole run, used strictly sequentially.
//! Supports `ws://` and `wss://`, the latter optionally with certificate
//! verification disabled for servers running self-signed certs.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio_tungstenite::{
    connect_async, connect_async_tls_with_config, tungstenite::Message, Connector,
};
use tracing::debug;

use crate::error::ProbeError;

/// How to treat the server certificate on `wss://` connections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsPolicy {
    /// Verify certificates normally
    #[default]
    Verify,
    /// Accept invalid certs and hostnames (self-signed test servers)
    NoVerify,
}

type WsStream = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// A connected probe client
pub struct WsClient {
    write: futures_util::stream::SplitSink<WsStream, Message>,
    read: futures_util::stream::SplitStream<WsStream>,
}

impl WsClient {
    /// Connect to a `ws://` or `wss://` URL
    pub async fn connect(url: &str, tls: TlsPolicy) -> Result<Self, ProbeError> {
        let (ws_stream, _) = match tls {
            TlsPolicy::Verify => connect_async(url).await?,
            TlsPolicy::NoVerify => {
                let connector = native_tls::TlsConnector::builder()
                    .danger_accept_invalid_certs(true)
                    .danger_accept_invalid_hostnames(true)
                    .build()?;
                connect_async_tls_with_config(
                    url,
                    None,
                    false,
                    Some(Connector::NativeTls(connector)),
                )
                .await?
            }
        };
        debug!(url, "websocket connected");
        let (write, read) = ws_stream.split();
        Ok(Self { write, read })
    }

    /// Send one JSON payload as a text frame
    pub async fn send_json(&mut self, payload: &Value) -> Result<(), ProbeError> {
        self.write
            .send(Message::Text(payload.to_string().into()))
            .await?;
        Ok(())
    }

    /// Receive the next text frame and its parsed JSON.
    ///
    /// Binary/ping/pong frames are skipped. A text frame that fails to parse
    /// is a hard fault; a close frame (or stream end) maps to `Closed`.
    pub async fn recv_json(&mut self) -> Result<(String, Value), ProbeError> {
        loop {
            match self.read.next().await {
                Some(Ok(Message::Text(text))) => {
                    let parsed: Value = serde_json::from_str(&text)?;
                    return Ok((text.to_string(), parsed));
                }
                Some(Ok(Message::Close(_))) | None => return Err(ProbeError::Closed),
                Some(Ok(_)) => continue,
                Some(Err(e)) => return Err(e.into()),
            }
        }
    }

    /// Receive with an optional timeout; `None` blocks indefinitely
    pub async fn recv_json_timeout(
        &mut self,
        timeout: Option<Duration>,
    ) -> Result<(String, Value), ProbeError> {
        match timeout {
            None => self.recv_json().await,
            Some(limit) => match tokio::time::timeout(limit, self.recv_json()).await {
                Ok(result) => result,
                Err(_) => Err(ProbeError::Timeout),
            },
        }
    }

    /// Close the connection
    pub async fn close(&mut self) -> Result<(), ProbeError> {
        self.write.close().await?;
        Ok(())
    }
}
