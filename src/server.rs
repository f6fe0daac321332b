//! HTTP front end over the session manager.
//!
//! `POST /requests` takes a JSON [`Request`] and answers with the
//! [`Response`](crate::request::Response) or a tagged error. Bodies that
//! fail to decode are tagged `MalformedRequest`.
//! `GET /chats/{chat}/games/{game_id}` returns the current snapshot.

use crate::config::SweepConfig;
use crate::request::{Request, dispatch};
use crate::session::{ChatScope, GameId, SessionError, SessionManager};
use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::time::Instant;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

/// Builds the router. Every handler shares `manager`.
pub fn router(manager: SessionManager) -> Router {
    Router::new()
        .route("/requests", post(handle_request))
        .route("/chats/{chat}/games/{game_id}", get(get_game))
        .route("/health", get(health))
        .with_state(manager)
}

#[instrument(skip(manager, payload))]
async fn handle_request(
    State(manager): State<SessionManager>,
    payload: Result<Json<Request>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    let response = dispatch(&manager, request)?;
    Ok(Json(response).into_response())
}

#[instrument(skip(manager))]
async fn get_game(
    State(manager): State<SessionManager>,
    Path((chat, game_id)): Path<(i64, String)>,
) -> Response {
    match manager.game(ChatScope::new(chat), &GameId::from(game_id)) {
        Some(game) => Json(game).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"error": "GameNotFound", "message": "No such game"})),
        )
            .into_response(),
    }
}

async fn health(State(manager): State<SessionManager>) -> Response {
    let stats = manager.stats();
    debug!(?stats, "Health check");
    Json(json!({"status": "ok", "sessions": stats})).into_response()
}

/// A rejected request rendered as `{"error": kind, "message": text}`.
#[derive(Debug, derive_more::From)]
pub enum ApiError {
    /// The session manager refused the request.
    Session(SessionError),
    /// The body was not a valid [`Request`].
    Malformed(JsonRejection),
}

impl ApiError {
    /// Stable error tag: the [`SessionError`] kind or `"MalformedRequest"`.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Session(e) => e.kind(),
            ApiError::Malformed(_) => "MalformedRequest",
        }
    }

    /// Status code for the wrapped error.
    pub fn status(&self) -> StatusCode {
        let err = match self {
            ApiError::Session(err) => err,
            ApiError::Malformed(rejection) => return rejection.status(),
        };
        match err {
            SessionError::AlreadyInGame(_) => StatusCode::CONFLICT,
            SessionError::InvitationNotFound(_) | SessionError::GameNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            SessionError::NotAuthorized(_) | SessionError::NotAParticipant(_) => {
                StatusCode::FORBIDDEN
            }
            SessionError::SelfJoin(_)
            | SessionError::NotYourTurn { .. }
            | SessionError::InvalidCell { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            SessionError::GameIdExhausted { .. } => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let kind = self.kind();
        let message = match &self {
            ApiError::Session(e) => e.to_string(),
            ApiError::Malformed(rejection) => rejection.body_text(),
        };
        debug!(status = %status, kind, message = %message, "Request rejected");
        (status, Json(json!({"error": kind, "message": message}))).into_response()
    }
}

/// Runs [`SessionManager::sweep_idle`] every `sweep.interval()` until the
/// runtime shuts down.
pub fn spawn_sweeper(manager: SessionManager, sweep: SweepConfig) -> JoinHandle<()> {
    info!(
        max_idle_secs = sweep.max_idle_secs(),
        interval_secs = sweep.interval_secs(),
        "Starting idle sweeper"
    );
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(sweep.interval());
        loop {
            ticker.tick().await;
            let swept = manager.sweep_idle(Instant::now(), sweep.max_idle());
            if !swept.is_empty() {
                warn!(count = swept.len(), stats = ?manager.stats(), "Idle entries removed");
            }
        }
    })
}
