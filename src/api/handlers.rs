use super::error::ApiError;
use super::state::AppState;
use crate::attributes::RecordType;
use crate::db::{create_document, get_document, get_documents, Filter};
use crate::diagnostics::{self, DiagnosticsReport};
use crate::entities::{Player, PlayerRecord};
use crate::market::{self, MarketEvent, MarketSnapshot};
use crate::schema::ValidationErrors;
use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_LIST_LIMIT: usize = 50;

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// One published record schema
#[derive(Debug, Serialize, Deserialize)]
pub struct SchemaExpose {
    pub name: String,
    pub fields: Value,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatedResponse {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    DEFAULT_LIST_LIMIT
}

// ============================================================================
// API Handlers
// ============================================================================

/// GET / - Liveness message
pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Financial Literacy Game Backend Running".to_string(),
    })
}

/// GET /schema - Player schema for admin tooling
pub async fn schema(State(state): State<AppState>) -> Json<Vec<SchemaExpose>> {
    Json(vec![SchemaExpose {
        name: RecordType::Player.name().to_string(),
        fields: state.validator.describe(RecordType::Player),
    }])
}

/// POST /api/players - Validate and persist a player
pub async fn create_player(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<CreatedResponse>, ApiError> {
    let raw: Value = serde_json::from_slice(&body).map_err(|e| {
        ValidationErrors::single(RecordType::Player, "body", format!("invalid JSON: {}", e))
    })?;

    let player: Player = state.validator.validate(&raw)?;
    let id = create_document(state.store()?, RecordType::Player.collection(), &player)?;

    tracing::info!(%id, name = %player.name, "player created");
    Ok(Json(CreatedResponse { id }))
}

/// GET /api/players?limit=N - Stored players in insertion order
pub async fn list_players(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<PlayerRecord>>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let documents = get_documents(
        state.store()?,
        RecordType::Player.collection(),
        &Filter::new(),
        params.limit,
    )?;

    let players = documents
        .into_iter()
        .map(PlayerRecord::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(players))
}

/// GET /api/players/:id - One stored player
pub async fn get_player(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PlayerRecord>, ApiError> {
    let document = get_document(state.store()?, RecordType::Player.collection(), &id)?
        .ok_or_else(|| ApiError::NotFound(format!("player {} not found", id)))?;

    Ok(Json(PlayerRecord::try_from(document)?))
}

/// GET /api/markets/snapshot - Fixed market overview
pub async fn market_snapshot() -> Json<MarketSnapshot> {
    Json(market::snapshot())
}

/// POST /api/markets/tick - One random market event
pub async fn market_tick() -> Json<MarketEvent> {
    Json(market::next_event())
}

/// GET /test - Database diagnostics (never fails)
pub async fn test_database(State(state): State<AppState>) -> Json<DiagnosticsReport> {
    Json(diagnostics::inspect(state.store.as_deref(), &state.config))
}

/// Fallback for unknown routes
pub async fn not_found() -> ApiError {
    ApiError::NotFound("no such route".to_string())
}
