//! SSE transport implementation.
//!
//! `GET /sse` opens a session and streams its responses as `message` events,
//! after an initial `endpoint` event naming the URL to post to.
//! `POST /messages?session_id=<id>` delivers one JSON-RPC message to that
//! session and returns `202 Accepted`; the reply arrives on the stream.

use std::convert::Infallible;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{
        IntoResponse, Response,
        sse::{Event, KeepAlive, Sse},
    },
    routing::{get, post},
};
use futures::{Stream, StreamExt, stream};
use serde::Deserialize;
use tokio_stream::wrappers::ReceiverStream;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, instrument, warn};

use super::jsonrpc::{JsonRpcRequest, JsonRpcResponse};
use super::session::{SessionId, SessionManager};
use super::{TransportError, TransportResult, config::SseConfig};
use crate::core::McpServer;

/// SSE transport handler.
pub struct SseTransport {
    config: SseConfig,
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    sessions: SessionManager,
    message_path: Arc<str>,
}

#[derive(Debug, Deserialize)]
struct MessageQuery {
    session_id: Option<String>,
}

impl SseTransport {
    /// Create a new SSE transport with the given config.
    pub fn new(config: SseConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        self.config.address()
    }

    /// Build the axum router over a session manager.
    pub fn router(&self, sessions: SessionManager) -> Router {
        let state = AppState {
            sessions,
            message_path: Arc::from(self.config.message_path.as_str()),
        };

        let app = Router::new()
            .route(&self.config.sse_path, get(handle_sse))
            .route(&self.config.message_path, post(handle_message))
            .route("/health", get(health_check))
            .with_state(state);

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            app.layer(cors)
        } else {
            app
        }
    }

    /// Run the SSE transport until the listener fails.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let sessions = SessionManager::new(server, self.config.session_buffer);
        let app = self.router(sessions);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        let cors_status = if self.config.enable_cors {
            "enabled"
        } else {
            "disabled"
        };
        info!("Ready - listening on {} (SSE, CORS {})", addr, cors_status);
        info!("  → Stream:   GET {}", self.config.sse_path);
        info!("  → Messages: POST {}?session_id=<id>", self.config.message_path);
        info!("  → Health:   GET /health");

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::http(e.to_string()))?;

        Ok(())
    }
}

/// Health check endpoint.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "sessions": state.sessions.session_count().await,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Open a session and stream its responses.
async fn handle_sse(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let (id, outbound) = state.sessions.open().await;
    let endpoint = format!("{}?session_id={}", state.message_path, id);

    let endpoint_event = stream::once(async move {
        Ok::<_, Infallible>(Event::default().event("endpoint").data(endpoint))
    });
    let messages =
        ReceiverStream::new(outbound).map(|response| Ok::<_, Infallible>(message_event(&response)));

    Sse::new(endpoint_event.chain(messages)).keep_alive(KeepAlive::default())
}

fn message_event(response: &JsonRpcResponse) -> Event {
    let data = serde_json::to_string(response).unwrap_or_else(|e| {
        warn!("Failed to encode response: {}", e);
        serde_json::to_string(&JsonRpcResponse::internal_error(
            response.id.clone(),
            e.to_string(),
        ))
        .unwrap_or_default()
    });
    Event::default().event("message").data(data)
}

/// Deliver one JSON-RPC message to a session.
#[instrument(skip_all, fields(method = %request.method))]
async fn handle_message(
    State(state): State<AppState>,
    Query(query): Query<MessageQuery>,
    Json(request): Json<JsonRpcRequest>,
) -> Response {
    let Some(raw_id) = query.session_id else {
        return (StatusCode::BAD_REQUEST, "session_id is required").into_response();
    };
    let Ok(id) = raw_id.parse::<SessionId>() else {
        return (StatusCode::BAD_REQUEST, "Invalid session ID").into_response();
    };

    match state.sessions.deliver(&id, request).await {
        Ok(()) => (StatusCode::ACCEPTED, "Accepted").into_response(),
        Err(e @ (TransportError::SessionNotFound(_) | TransportError::SessionClosed(_))) => {
            warn!("{}", e);
            (StatusCode::NOT_FOUND, e.to_string()).into_response()
        }
        Err(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response(),
    }
}
