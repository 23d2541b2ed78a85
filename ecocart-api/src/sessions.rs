use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;
use crate::error::AppError;
use crate::models::{ItemResponse, PersonaResponse};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub persona: PersonaResponse,
    pub inventory: Vec<ItemResponse>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/sessions", post(create_session))
        .route("/v1/sessions/{session_id}", delete(end_session))
}

/// POST /v1/sessions
/// Start a shopping session with its own inventory and pricing cache
pub async fn create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionResponse>), AppError> {
    let (session_id, session) = state.sessions.create().await?;
    let session = session.lock().await;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            session_id,
            created_at: session.created_at(),
            persona: PersonaResponse::from(session.persona()),
            inventory: session.inventory().iter().map(ItemResponse::from).collect(),
        }),
    ))
}

/// DELETE /v1/sessions/{session_id}
pub async fn end_session(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.end(&session_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
