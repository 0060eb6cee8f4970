//! SSE session bookkeeping.
//!
//! Each open session owns one pump task. The pump drains the session's inbound
//! queue in receipt order, answers most requests inline and runs `tools/call`
//! requests on a `JoinSet` so slow tools do not block the session. Responses go
//! to the outbound queue that feeds the event stream.
//!
//! A session ends when the event stream is dropped or the inbound queue closes.
//! Either way the pump aborts its outstanding calls and unregisters itself.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tokio::sync::{RwLock, mpsc};
use tokio::task::JoinSet;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use super::jsonrpc::{
    JsonRpcRequest, JsonRpcResponse, SessionState, handle_tools_call, process_request,
};
use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// Identifier handed to the client in the `endpoint` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.simple())
    }
}

impl FromStr for SessionId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

type Sessions = Arc<RwLock<HashMap<SessionId, mpsc::Sender<JsonRpcRequest>>>>;

/// Open sessions keyed by id.
#[derive(Clone)]
pub struct SessionManager {
    server: McpServer,
    sessions: Sessions,
    buffer: usize,
}

impl SessionManager {
    /// Create a manager whose sessions queue up to `buffer` messages each way.
    pub fn new(server: McpServer, buffer: usize) -> Self {
        Self {
            server,
            sessions: Arc::new(RwLock::new(HashMap::new())),
            buffer: buffer.max(1),
        }
    }

    /// Open a session and start its pump.
    ///
    /// The returned receiver yields every response for the session. Dropping
    /// it closes the session.
    pub async fn open(&self) -> (SessionId, mpsc::Receiver<JsonRpcResponse>) {
        let id = SessionId::new();
        let (inbound_tx, inbound_rx) = mpsc::channel(self.buffer);
        let (outbound_tx, outbound_rx) = mpsc::channel(self.buffer);

        self.sessions.write().await.insert(id, inbound_tx);
        info!("Session {} opened", id);

        tokio::spawn(run_session(
            id,
            self.server.clone(),
            self.sessions.clone(),
            inbound_rx,
            outbound_tx,
        ));

        (id, outbound_rx)
    }

    /// Queue a message for a session.
    pub async fn deliver(&self, id: &SessionId, message: JsonRpcRequest) -> TransportResult<()> {
        let sender = self
            .sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| TransportError::session_not_found(id.to_string()))?;

        sender
            .send(message)
            .await
            .map_err(|_| TransportError::session_closed(id.to_string()))
    }

    /// Stop accepting messages for a session. Returns false if it was not open.
    ///
    /// Requests already queued are still answered.
    pub async fn close(&self, id: &SessionId) -> bool {
        self.sessions.write().await.remove(id).is_some()
    }

    /// Whether a session is currently registered.
    pub async fn contains(&self, id: &SessionId) -> bool {
        self.sessions.read().await.contains_key(id)
    }

    /// Number of open sessions.
    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[instrument(skip_all, fields(session = %id))]
async fn run_session(
    id: SessionId,
    server: McpServer,
    sessions: Sessions,
    mut inbound: mpsc::Receiver<JsonRpcRequest>,
    outbound: mpsc::Sender<JsonRpcResponse>,
) {
    let mut state = SessionState::default();
    let mut calls: JoinSet<JsonRpcResponse> = JoinSet::new();

    loop {
        tokio::select! {
            _ = outbound.closed() => {
                debug!("Event stream dropped");
                break;
            }
            message = inbound.recv() => {
                let Some(request) = message else {
                    debug!("Inbound queue closed");
                    break;
                };
                if request.is_tool_call() {
                    let server = server.clone();
                    calls.spawn(async move { handle_tools_call(&server, request).await });
                } else if let Some(response) = process_request(&server, &mut state, request).await {
                    if outbound.send(response).await.is_err() {
                        break;
                    }
                }
            }
            Some(joined) = calls.join_next(), if !calls.is_empty() => {
                match joined {
                    Ok(response) => {
                        if outbound.send(response).await.is_err() {
                            break;
                        }
                    }
                    Err(e) => error!("Tool task failed: {}", e),
                }
            }
        }
    }

    if !calls.is_empty() {
        warn!("Cancelling {} in-flight tool calls", calls.len());
    }
    calls.abort_all();
    sessions.write().await.remove(&id);
    info!("Session {} closed", id);
}
