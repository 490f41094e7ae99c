//! Connection target configuration
//!
//! Layered the usual way: built-in defaults, then an optional
//! `mudprobe.toml` next to the working directory, then `MUDPROBE_*`
//! environment variables. CLI flags override all of it in the binary.

use std::time::Duration;

use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::client::TlsPolicy;

/// Where and how to connect
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// `ws://host:port/` or `wss://host:port/`
    pub url: String,
    /// Skip TLS certificate verification on `wss://`
    pub insecure: bool,
    /// Bound each wait for a checked reply; unset blocks indefinitely
    pub recv_timeout_secs: Option<u64>,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            url: "ws://localhost:8080/".to_string(),
            insecure: false,
            recv_timeout_secs: None,
        }
    }
}

impl ProbeConfig {
    /// Load defaults, `mudprobe.toml`, and `MUDPROBE_*` env vars, in that order
    pub fn load() -> Result<Self, figment::Error> {
        Self::figment().extract()
    }

    fn figment() -> Figment {
        Figment::from(Serialized::defaults(ProbeConfig::default()))
            .merge(Toml::file("mudprobe.toml"))
            .merge(Env::prefixed("MUDPROBE_"))
    }

    pub fn tls_policy(&self) -> TlsPolicy {
        if self.insecure {
            TlsPolicy::NoVerify
        } else {
            TlsPolicy::Verify
        }
    }

    pub fn recv_timeout(&self) -> Option<Duration> {
        self.recv_timeout_secs.map(Duration::from_secs)
    }
}
