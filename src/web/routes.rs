use axum::{
    Json, Router,
    extract::State,
    response::Html,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use crate::conversation::Conversation;
use crate::orchestrator::Orchestrator;

const INDEX_HTML: &str = include_str!("index.html");

/// One row of the visible chat history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exchange {
    pub user: String,
    pub assistant: String,
}

/// Model-facing history plus what the page shows.
pub struct WebSession {
    pub conversation: Conversation,
    pub transcript: Vec<Exchange>,
}

impl WebSession {
    pub fn new(conversation: Conversation) -> Self {
        Self {
            conversation,
            transcript: Vec::new(),
        }
    }
}

/// Application state shared across routes
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub session: Arc<Mutex<WebSession>>,
    pub reply_delay: Duration,
}

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubmitResponse {
    /// New value for the input box
    pub message: String,
    pub history: Vec<Exchange>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub history: Vec<Exchange>,
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(serve_index))
        .route("/api/history", get(get_history))
        .route("/api/chat", post(submit))
        .route("/api/clear", post(clear))
        .with_state(state)
}

async fn serve_index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// GET /api/history
async fn get_history(State(state): State<AppState>) -> Json<HistoryResponse> {
    let session = state.session.lock().await;
    Json(HistoryResponse {
        history: session.transcript.clone(),
    })
}

/// POST /api/chat - run one turn
///
/// The session lock is held for the whole turn, so submissions from
/// several tabs are answered one at a time.
async fn submit(
    State(state): State<AppState>,
    Json(request): Json<SubmitRequest>,
) -> Json<SubmitResponse> {
    let mut session = state.session.lock().await;

    let reply = state
        .orchestrator
        .respond(&mut session.conversation, &request.message)
        .await;
    session.transcript.push(Exchange {
        user: request.message,
        assistant: reply,
    });

    tokio::time::sleep(state.reply_delay).await;

    Json(SubmitResponse {
        message: String::new(),
        history: session.transcript.clone(),
    })
}

/// POST /api/clear - empties the page; the model keeps its context
async fn clear(State(state): State<AppState>) -> Json<HistoryResponse> {
    let mut session = state.session.lock().await;
    session.transcript.clear();
    Json(HistoryResponse {
        history: Vec::new(),
    })
}
