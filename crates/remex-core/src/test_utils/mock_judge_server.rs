//! Scriptable in-process judge service for tests.
//!
//! Serves the Judge0 surface (`POST /submissions`, `GET /submissions/{token}`,
//! `GET /languages`) plus the problem-catalog endpoint from queued replies,
//! and records every request it sees so tests can assert on call counts and
//! wire payloads.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

use crate::core_types::Language;

/// One canned reply: a JSON body, or a bare HTTP error status.
#[derive(Debug, Clone)]
pub enum MockReply {
    Json(Value),
    Error(u16),
}

/// Everything the mock service should serve, in order.
#[derive(Debug, Default)]
pub struct MockJudgeScript {
    pub submit: Vec<MockReply>,
    pub status: Vec<MockReply>,
    pub languages: Vec<Language>,
    pub problems: HashMap<String, Value>,
}

#[derive(Clone)]
struct MockJudgeState {
    submit: Arc<Mutex<VecDeque<MockReply>>>,
    status: Arc<Mutex<VecDeque<MockReply>>>,
    languages: Arc<Vec<Language>>,
    problems: Arc<HashMap<String, Value>>,
    submit_requests: Arc<Mutex<Vec<Value>>>,
    status_requests: Arc<Mutex<Vec<String>>>,
}

fn pop_reply(queue: &Arc<Mutex<VecDeque<MockReply>>>) -> Response {
    match queue.lock().unwrap().pop_front() {
        Some(MockReply::Json(body)) => (StatusCode::OK, Json(body)).into_response(),
        Some(MockReply::Error(code)) => StatusCode::from_u16(code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response(),
        None => {
            log::error!("mock judge server ran out of scripted replies");
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}

async fn submit_handler(
    State(state): State<MockJudgeState>,
    Json(payload): Json<Value>,
) -> Response {
    log::debug!("mock judge received submission: {}", payload);
    state.submit_requests.lock().unwrap().push(payload);
    pop_reply(&state.submit)
}

async fn status_handler(
    State(state): State<MockJudgeState>,
    Path(token): Path<String>,
) -> Response {
    log::debug!("mock judge received status poll for {}", token);
    state.status_requests.lock().unwrap().push(token);
    pop_reply(&state.status)
}

async fn languages_handler(State(state): State<MockJudgeState>) -> Json<Vec<Language>> {
    Json(state.languages.as_ref().clone())
}

async fn problem_handler(
    State(state): State<MockJudgeState>,
    Path(id): Path<String>,
) -> Json<Value> {
    match state.problems.get(&id) {
        Some(problem) => Json(problem.clone()),
        None => Json(json!({ "error": format!("Problem {} not found", id) })),
    }
}

pub struct MockJudgeServer {
    addr: SocketAddr,
    shutdown_tx: tokio::sync::oneshot::Sender<()>,
    state: MockJudgeState,
}

impl MockJudgeServer {
    pub async fn start(script: MockJudgeScript) -> Self {
        let state = MockJudgeState {
            submit: Arc::new(Mutex::new(VecDeque::from(script.submit))),
            status: Arc::new(Mutex::new(VecDeque::from(script.status))),
            languages: Arc::new(script.languages),
            problems: Arc::new(script.problems),
            submit_requests: Arc::new(Mutex::new(Vec::new())),
            status_requests: Arc::new(Mutex::new(Vec::new())),
        };

        let app = Router::new()
            .route("/submissions", post(submit_handler))
            .route("/submissions/{token}", get(status_handler))
            .route("/languages", get(languages_handler))
            .route("/api/problems/{id}", get(problem_handler))
            .with_state(state.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap_or_else(|e| {
            panic!("failed to bind mock judge server to 127.0.0.1:0: {}", e);
        });
        let addr = listener.local_addr().unwrap();
        log::info!("mock judge server listening on {}", addr);

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap_or_else(|e| log::error!("mock judge server error: {}", e));
        });

        MockJudgeServer {
            addr,
            shutdown_tx,
            state,
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Submission payloads in arrival order.
    pub fn submit_requests(&self) -> Vec<Value> {
        self.state.submit_requests.lock().unwrap().clone()
    }

    /// Tokens polled for, in arrival order.
    pub fn status_calls(&self) -> Vec<String> {
        self.state.status_requests.lock().unwrap().clone()
    }

    pub async fn shutdown(self) {
        if self.shutdown_tx.send(()).is_err() {
            log::warn!("mock judge server shutdown signal already sent");
        }
    }
}
