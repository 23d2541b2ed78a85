use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use ecocart_catalog::PersonaType;
use crate::error::AppError;
use crate::models::{PersonaResponse, PricedItemResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SelectPersonaRequest {
    pub persona_type: String,
}

#[derive(Debug, Deserialize)]
pub struct PriceQuery {
    pub persona: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StorefrontResponse {
    pub persona: PersonaResponse,
    pub items: Vec<PricedItemResponse>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/v1/sessions/{session_id}/persona",
            get(current_persona).put(select_persona),
        )
        .route("/v1/sessions/{session_id}/storefront", get(storefront))
        .route("/v1/sessions/{session_id}/items/{item_id}/price", get(price_item))
}

/// GET /v1/sessions/{session_id}/persona
pub async fn current_persona(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<PersonaResponse>, AppError> {
    let session = state.sessions.get(&session_id).await?;
    let session = session.lock().await;
    Ok(Json(PersonaResponse::from(session.persona())))
}

/// PUT /v1/sessions/{session_id}/persona
/// Switch who is shopping; unknown persona names resolve to Strategic
pub async fn select_persona(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<SelectPersonaRequest>,
) -> Result<Json<PersonaResponse>, AppError> {
    let persona_type = PersonaType::parse_lenient(&req.persona_type);

    let session = state.sessions.get(&session_id).await?;
    let mut session = session.lock().await;
    Ok(Json(PersonaResponse::from(session.select_persona(persona_type))))
}

/// GET /v1/sessions/{session_id}/storefront
/// Price every item for the current persona
pub async fn storefront(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<StorefrontResponse>, AppError> {
    let session = state.sessions.get(&session_id).await?;
    let mut session = session.lock().await;

    let priced = session.storefront(&state.pricing).await?;

    Ok(Json(StorefrontResponse {
        persona: PersonaResponse::from(session.persona()),
        items: priced.iter().map(PricedItemResponse::from).collect(),
    }))
}

/// GET /v1/sessions/{session_id}/items/{item_id}/price?persona=
pub async fn price_item(
    State(state): State<AppState>,
    Path((session_id, item_id)): Path<(Uuid, u64)>,
    Query(query): Query<PriceQuery>,
) -> Result<Json<PricedItemResponse>, AppError> {
    let persona_type = query.persona.as_deref().map(PersonaType::parse_lenient);

    let session = state.sessions.get(&session_id).await?;
    let mut session = session.lock().await;
    let priced = session.price_item(item_id, persona_type, &state.pricing).await?;

    Ok(Json(PricedItemResponse::from(&priced)))
}
