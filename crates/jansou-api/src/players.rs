//! Handlers for `/titles/{title_id}/players`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use jansou_core::{
  ledger::Ledger, roster::Player, session::SessionContext, store::LedgerStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name: String,
}

/// `GET /titles/{title_id}/players`
pub async fn list<S: LedgerStore>(
  State(ledger): State<Arc<Ledger<S>>>,
  Path(title_id): Path<Uuid>,
) -> Result<Json<Vec<Player>>, ApiError> {
  Ok(Json(ledger.players(&SessionContext::title(title_id)).await?))
}

/// `POST /titles/{title_id}/players` — body: `{"name":"..."}`
pub async fn create<S: LedgerStore>(
  State(ledger): State<Arc<Ledger<S>>>,
  Path(title_id): Path<Uuid>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let player = ledger
    .create_player(&SessionContext::title(title_id), &body.name)
    .await?;
  Ok((StatusCode::CREATED, Json(player)))
}

/// `DELETE /titles/{title_id}/players/{player_id}`
pub async fn deactivate<S: LedgerStore>(
  State(ledger): State<Arc<Ledger<S>>>,
  Path((title_id, player_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
  ledger
    .deactivate_player(&SessionContext::title(title_id), player_id)
    .await?;
  Ok(StatusCode::NO_CONTENT)
}
