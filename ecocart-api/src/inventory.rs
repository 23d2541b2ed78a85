use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use uuid::Uuid;
use ecocart_catalog::ItemDraft;
use crate::error::AppError;
use crate::models::ItemResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub name: String,
    pub category: Option<String>,
    pub base_price: f64,
    pub expiry_tier: String,
    pub condition_tier: String,
}

pub fn routes() -> Router<AppState> {
    Router::new().route(
        "/v1/sessions/{session_id}/inventory",
        get(list_inventory).post(add_or_replace_item),
    )
}

/// GET /v1/sessions/{session_id}/inventory
/// Items in the session, most recently added first
pub async fn list_inventory(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<Json<Vec<ItemResponse>>, AppError> {
    let session = state.sessions.get(&session_id).await?;
    let session = session.lock().await;

    Ok(Json(session.inventory().iter().map(ItemResponse::from).collect()))
}

/// POST /v1/sessions/{session_id}/inventory
/// Add an item, replacing any existing item with the same name
pub async fn add_or_replace_item(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
    Json(req): Json<AddItemRequest>,
) -> Result<(StatusCode, Json<ItemResponse>), AppError> {
    let draft = ItemDraft::parse(
        &req.name,
        req.category.as_deref().unwrap_or_default(),
        req.base_price,
        &req.expiry_tier,
        &req.condition_tier,
    )?;

    let session = state.sessions.get(&session_id).await?;
    let item = session.lock().await.add_or_replace_item(draft);

    Ok((StatusCode::CREATED, Json(ItemResponse::from(&item))))
}
