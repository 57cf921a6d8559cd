//! HTTP API endpoints.
//!
//! Thin translation from JSON requests to [`AppState`] commands. Clients poll
//! `/api/state` for updates; nothing is pushed.

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::protocol::*;
use crate::room::RoomError;
use crate::state::AppState;

/// Errors returned from API handlers
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Room(#[from] RoomError),

    #[error("Malformed request body: {0}")]
    MalformedBody(#[from] serde_json::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::Room(RoomError::RoomNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Room(RoomError::InvalidPhase { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Room(RoomError::CorruptRoom { .. })
            | ApiError::Room(RoomError::Persistence(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MalformedBody(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

type ApiResult<T> = Result<Json<T>, ApiError>;

/// Parse a JSON body, treating an empty body as `{}`
fn parse_body<T: DeserializeOwned + Default>(body: &Bytes) -> Result<T, ApiError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Ok(T::default());
    }
    Ok(serde_json::from_slice(body)?)
}

/// Build the API router with tracing and permissive CORS.
///
/// Any path outside the API is served from `static_dir`.
pub fn router(state: Arc<AppState>, static_dir: impl AsRef<Path>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/create", post(create_room))
        .route("/api/join", post(join_room))
        .route("/api/state", post(get_state))
        .route("/api/p1/answer", post(submit_answer))
        .route("/api/p2/guess", post(submit_guess))
        .route("/api/reset", post(reset_round))
        .fallback_service(ServeDir::new(static_dir))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness probe.
///
/// GET /health
pub async fn health() -> Json<HealthResponse> {
    let now = chrono::Utc::now();
    Json(HealthResponse {
        ok: true,
        time: now.timestamp_micros() as f64 / 1_000_000.0,
    })
}

/// Player One opens a room.
///
/// POST /api/create
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<CreatedResponse> {
    let req: CreateRequest = parse_body(&body)?;
    let room = state
        .create_room(req.owner_name.as_deref(), req.edition_name.as_deref())
        .await?;
    Ok(Json(CreatedResponse {
        code: room.code.clone(),
        room,
    }))
}

/// Player Two joins with a code.
///
/// POST /api/join
pub async fn join_room(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResult<RoomResponse> {
    let req: JoinRequest = parse_body(&body)?;
    let room = state
        .join_room(req.code.as_deref().unwrap_or_default(), req.name.as_deref())
        .await?;
    Ok(Json(RoomResponse { room }))
}

/// Poll the full room state.
///
/// POST /api/state
pub async fn get_state(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResult<RoomResponse> {
    let req: CodeRequest = parse_body(&body)?;
    let room = state
        .get_state(req.code.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(RoomResponse { room }))
}

/// Player One answers the current question.
///
/// POST /api/p1/answer
pub async fn submit_answer(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<RoomResponse> {
    let req: AnswerRequest = parse_body(&body)?;
    let room = state
        .submit_answer(req.code.as_deref().unwrap_or_default(), req.answer.as_deref())
        .await?;
    Ok(Json(RoomResponse { room }))
}

/// Player Two guesses the current answer.
///
/// POST /api/p2/guess
pub async fn submit_guess(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<RoomResponse> {
    let req: GuessRequest = parse_body(&body)?;
    let room = state
        .submit_guess(req.code.as_deref().unwrap_or_default(), req.guess.as_deref())
        .await?;
    Ok(Json(RoomResponse { room }))
}

/// Replay the guessing round with the same answers.
///
/// POST /api/reset
pub async fn reset_round(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<RoomResponse> {
    let req: CodeRequest = parse_body(&body)?;
    let room = state
        .reset_round(req.code.as_deref().unwrap_or_default())
        .await?;
    Ok(Json(RoomResponse { room }))
}
