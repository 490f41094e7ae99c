//! MockServer - in-process stand-in for the game server
//!
//! Speaks just enough of the JSON protocol for probe scripts: register and
//! login with configurable rejection, character creation with reserved
//! names, and fire-and-forget actions that get no reply. Optionally pushes
//! frames on connect and closes, for drain-loop tests.

#![allow(dead_code)]

use std::collections::HashSet;

use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

/// Scripted behavior for one mock connection
#[derive(Debug, Clone, Default)]
pub struct ServerBehavior {
    /// Usernames whose registration fails with the sentinel
    pub existing_users: HashSet<String>,
    /// Reject every login with the sentinel
    pub reject_login: bool,
    /// Character names whose creation fails with the sentinel
    pub taken_names: HashSet<String>,
    /// Frames pushed right after the handshake
    pub push_on_connect: Vec<Value>,
    /// Close the connection server-side after the pushes
    pub close_after_push: bool,
    /// Reply to the first message with unparseable text
    pub garbage_reply: bool,
    /// Never reply to anything
    pub mute: bool,
}

impl ServerBehavior {
    pub fn with_existing_user(mut self, username: &str) -> Self {
        self.existing_users.insert(username.to_string());
        self
    }

    pub fn with_taken_name(mut self, name: &str) -> Self {
        self.taken_names.insert(name.to_string());
        self
    }
}

/// One-connection mock server on a random local port
pub struct MockServer {
    addr: std::net::SocketAddr,
    handle: JoinHandle<Vec<Value>>,
}

impl MockServer {
    /// Bind a random port and serve a single connection with the given behavior
    pub async fn spawn(behavior: ServerBehavior) -> Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move { serve_one(listener, behavior).await });

        Ok(Self { addr, handle })
    }

    /// Websocket URL for the probe to connect to
    pub fn url(&self) -> String {
        format!("ws://{}/", self.addr)
    }

    /// Wait for the connection to end and return every payload received,
    /// in wire order
    pub async fn finish(self) -> Vec<Value> {
        self.handle.await.expect("mock server task panicked")
    }
}

/// Accept one connection, run the behavior, collect inbound payloads
async fn serve_one(listener: TcpListener, behavior: ServerBehavior) -> Vec<Value> {
    let mut received = Vec::new();

    let Ok((stream, _)) = listener.accept().await else {
        return received;
    };
    let Ok(ws) = tokio_tungstenite::accept_async(stream).await else {
        return received;
    };
    let (mut write, mut read) = ws.split();

    for frame in &behavior.push_on_connect {
        if write
            .send(Message::Text(frame.to_string().into()))
            .await
            .is_err()
        {
            return received;
        }
    }
    if behavior.close_after_push {
        let _ = write.send(Message::Close(None)).await;
        return received;
    }

    let mut first = true;
    while let Some(Ok(msg)) = read.next().await {
        let text = match msg {
            Message::Text(text) => text,
            Message::Close(_) => break,
            _ => continue,
        };
        let Ok(payload) = serde_json::from_str::<Value>(&text) else {
            continue;
        };
        received.push(payload.clone());

        if behavior.mute {
            continue;
        }
        if behavior.garbage_reply && first {
            first = false;
            let _ = write
                .send(Message::Text("definitely not json".to_string().into()))
                .await;
            continue;
        }
        first = false;

        if let Some(reply) = reply_for(&behavior, &payload) {
            if write
                .send(Message::Text(reply.to_string().into()))
                .await
                .is_err()
            {
                break;
            }
        }
    }

    received
}

/// Protocol rules: auth and character actions get one reply each,
/// fire-and-forget actions get none
fn reply_for(behavior: &ServerBehavior, payload: &Value) -> Option<Value> {
    match payload.get("type").and_then(Value::as_str) {
        Some("Auth:register") => {
            let username = payload["username"].as_str().unwrap_or_default();
            if behavior.existing_users.contains(username) {
                Some(error_response("username_taken"))
            } else {
                Some(json!({"type": "Auth:register_response", "username": username}))
            }
        }
        Some("Auth:login") => {
            if behavior.reject_login {
                Some(error_response("invalid_credentials"))
            } else {
                let username = payload["username"].as_str().unwrap_or_default();
                Some(json!({"type": "Auth:login_response", "username": username}))
            }
        }
        Some("Game:create_character") => {
            let name = payload["name"].as_str().unwrap_or_default();
            if behavior.taken_names.contains(name) {
                Some(error_response("character_name_taken"))
            } else {
                Some(json!({"type": "Game:create_character_response", "name": name}))
            }
        }
        Some("Game:play_character") => {
            let name = payload["name"].as_str().unwrap_or_default();
            Some(json!({"type": "Game:character_select_response", "name": name}))
        }
        // Game:move, Chat:send, Moderator:motd, legacy bare register
        _ => None,
    }
}

fn error_response(code: &str) -> Value {
    json!({"type": "error_response", "error": code})
}
