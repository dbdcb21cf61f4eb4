//! MCP HTTP+SSE transport.
//!
//! GET  /sse                           - opens the event stream; first event is `endpoint`
//! POST /messages/?session_id=<id>     - JSON-RPC message in, 202 out; the response
//!                                       arrives as a `message` event on the stream

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse, Response,
    },
    routing::{get, post},
    Router,
};
use futures::stream::{self, Stream, StreamExt};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tower_http::trace::TraceLayer;

use super::{bind, health};
use crate::error::Result;
use crate::mcp::{JsonRpcResponse, McpServer};

pub const MESSAGES_PATH: &str = "/messages/";

type SessionMap = HashMap<String, mpsc::UnboundedSender<JsonRpcResponse>>;
type Sessions = Arc<Mutex<SessionMap>>;

#[derive(Clone)]
struct SseState {
    server: McpServer,
    sessions: Sessions,
}

fn lock(sessions: &Sessions) -> MutexGuard<'_, SessionMap> {
    sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

pub async fn serve(server: McpServer, host: &str, port: u16) -> Result<()> {
    let listener = bind(host, port).await?;
    tracing::info!("Serving MCP over SSE on http://{}/sse", listener.local_addr()?);

    axum::serve(listener, router(server)).await?;
    Ok(())
}

pub fn router(server: McpServer) -> Router {
    let state = SseState {
        server,
        sessions: Arc::new(Mutex::new(HashMap::new())),
    };

    Router::new()
        .route("/health", get(health))
        .route("/sse", get(sse_connect))
        .route("/messages", post(post_message))
        .route(MESSAGES_PATH, post(post_message))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Removes its session from the table when the event stream is dropped.
struct SessionGuard {
    id: String,
    sessions: Sessions,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        let mut sessions = lock(&self.sessions);
        sessions.remove(&self.id);
        tracing::info!("SSE session closed: {} (active: {})", self.id, sessions.len());
    }
}

async fn sse_connect(
    State(state): State<SseState>,
) -> Sse<impl Stream<Item = std::result::Result<Event, Infallible>>> {
    let session_id = uuid::Uuid::new_v4().simple().to_string();
    let (tx, rx) = mpsc::unbounded_channel();

    let active = {
        let mut sessions = lock(&state.sessions);
        sessions.insert(session_id.clone(), tx);
        sessions.len()
    };
    tracing::info!("SSE session opened: {} (active: {})", session_id, active);

    let endpoint = Event::default()
        .event("endpoint")
        .data(format!("{}?session_id={}", MESSAGES_PATH, session_id));

    let guard = SessionGuard {
        id: session_id,
        sessions: state.sessions.clone(),
    };

    let messages = UnboundedReceiverStream::new(rx).map(move |response| {
        // Ties the session's lifetime to the stream
        let _session = &guard;
        let event = match Event::default().event("message").json_data(&response) {
            Ok(event) => event,
            Err(e) => Event::default().event("error").data(e.to_string()),
        };
        Ok::<_, Infallible>(event)
    });

    let events = stream::once(async move { Ok::<_, Infallible>(endpoint) }).chain(messages);
    Sse::new(events).keep_alive(KeepAlive::default())
}

#[derive(Debug, Deserialize)]
struct MessageQuery {
    session_id: Option<String>,
}

async fn post_message(
    State(state): State<SseState>,
    Query(query): Query<MessageQuery>,
    body: Bytes,
) -> Response {
    let Some(session_id) = query.session_id else {
        return (StatusCode::BAD_REQUEST, "session_id is required").into_response();
    };

    let sender = lock(&state.sessions).get(&session_id).cloned();
    let Some(sender) = sender else {
        return (StatusCode::NOT_FOUND, "Could not find session").into_response();
    };

    let message: Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                format!("Could not parse message: {}", e),
            )
                .into_response()
        }
    };

    let server = state.server.clone();
    tokio::spawn(async move {
        if let Some(response) = server.handle_value(message).await {
            if sender.send(response).is_err() {
                tracing::debug!("SSE session {} closed before its response was sent", session_id);
            }
        }
    });

    (StatusCode::ACCEPTED, "Accepted").into_response()
}
