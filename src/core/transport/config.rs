//! Transport configuration types.

use serde::{Deserialize, Serialize};

/// Transport configuration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// Standard input/output transport.
    #[cfg(feature = "stdio")]
    Stdio,

    /// Server-sent events out, JSON-RPC over POST in.
    #[cfg(feature = "sse")]
    Sse(SseConfig),
}

/// SSE transport configuration.
#[cfg(feature = "sse")]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SseConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Path of the event stream endpoint.
    #[serde(default = "default_sse_path")]
    pub sse_path: String,

    /// Path clients post messages to.
    #[serde(default = "default_message_path")]
    pub message_path: String,

    /// Enable CORS for browser clients.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,

    /// Capacity of each session's inbound and outbound queues.
    #[serde(default = "default_session_buffer")]
    pub session_buffer: usize,
}

#[cfg(feature = "sse")]
fn default_host() -> String {
    "0.0.0.0".to_string()
}

#[cfg(feature = "sse")]
fn default_port() -> u16 {
    8000
}

#[cfg(feature = "sse")]
fn default_sse_path() -> String {
    "/sse".to_string()
}

#[cfg(feature = "sse")]
fn default_message_path() -> String {
    "/messages".to_string()
}

#[cfg(feature = "sse")]
fn default_cors() -> bool {
    true
}

#[cfg(feature = "sse")]
fn default_session_buffer() -> usize {
    64
}

impl Default for TransportConfig {
    fn default() -> Self {
        #[cfg(feature = "sse")]
        {
            return Self::Sse(SseConfig::default());
        }

        #[cfg(all(not(feature = "sse"), feature = "stdio"))]
        {
            return Self::Stdio;
        }

        #[cfg(not(any(feature = "stdio", feature = "sse")))]
        {
            compile_error!("At least one transport feature must be enabled: stdio or sse");
        }
    }
}

#[cfg(feature = "sse")]
impl Default for SseConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            sse_path: default_sse_path(),
            message_path: default_message_path(),
            enable_cors: default_cors(),
            session_buffer: default_session_buffer(),
        }
    }
}

#[cfg(feature = "sse")]
impl SseConfig {
    /// Load SSE settings from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: std::env::var("MCP_SSE_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            host: std::env::var("MCP_SSE_HOST").unwrap_or(defaults.host),
            sse_path: std::env::var("MCP_SSE_PATH").unwrap_or(defaults.sse_path),
            message_path: std::env::var("MCP_MESSAGE_PATH").unwrap_or(defaults.message_path),
            enable_cors: std::env::var("MCP_SSE_CORS")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(defaults.enable_cors),
            session_buffer: std::env::var("MCP_SESSION_BUFFER")
                .ok()
                .and_then(|b| b.parse().ok())
                .filter(|&b: &usize| b > 0)
                .unwrap_or(defaults.session_buffer),
        }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl TransportConfig {
    /// Create a STDIO transport config.
    #[cfg(feature = "stdio")]
    pub fn stdio() -> Self {
        Self::Stdio
    }

    /// Create an SSE transport config.
    #[cfg(feature = "sse")]
    pub fn sse(port: u16, host: impl Into<String>) -> Self {
        Self::Sse(SseConfig {
            port,
            host: host.into(),
            ..Default::default()
        })
    }

    /// Load transport config from environment variables.
    pub fn from_env() -> Self {
        let transport = std::env::var("MCP_TRANSPORT")
            .unwrap_or_default()
            .to_lowercase();

        match transport.as_str() {
            #[cfg(feature = "stdio")]
            "stdio" => Self::Stdio,
            #[cfg(feature = "sse")]
            _ => Self::Sse(SseConfig::from_env()),
            #[cfg(not(feature = "sse"))]
            _ => Self::default(),
        }
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => "STDIO (standard MCP mode)".to_string(),
            #[cfg(feature = "sse")]
            Self::Sse(cfg) => format!(
                "SSE on {} (stream {}, messages {})",
                cfg.address(),
                cfg.sse_path,
                cfg.message_path
            ),
        }
    }
}

#[cfg(all(test, feature = "sse"))]
mod tests {
    use super::*;

    #[test]
    fn test_sse_defaults() {
        let cfg = SseConfig::default();
        assert_eq!(cfg.address(), "0.0.0.0:8000");
        assert_eq!(cfg.sse_path, "/sse");
        assert_eq!(cfg.message_path, "/messages");
        assert!(cfg.session_buffer > 0);
    }

    #[test]
    fn test_default_transport_is_sse() {
        assert!(matches!(TransportConfig::default(), TransportConfig::Sse(_)));
    }

    #[test]
    fn test_description() {
        let cfg = TransportConfig::sse(9000, "127.0.0.1");
        assert_eq!(
            cfg.description(),
            "SSE on 127.0.0.1:9000 (stream /sse, messages /messages)"
        );
    }
}
