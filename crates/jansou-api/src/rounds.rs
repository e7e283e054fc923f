//! Handlers for `/titles/{t}/games/{g}/rounds`.

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use jansou_core::{
  ledger::Ledger,
  round::{Round, SeatScore},
  session::SessionContext,
  store::LedgerStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

/// JSON body accepted by `POST .../rounds`: one raw score and wind per
/// occupied seat, in seat order.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub entries: Vec<SeatScore>,
}

/// `GET /titles/{t}/games/{g}/rounds` — active rounds, ascending.
pub async fn list<S: LedgerStore>(
  State(ledger): State<Arc<Ledger<S>>>,
  Path((title_id, game_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Vec<Round>>, ApiError> {
  Ok(Json(
    ledger.rounds(&SessionContext::game(title_id, game_id)).await?,
  ))
}

/// `POST /titles/{t}/games/{g}/rounds` — returns 201 + the settled round.
pub async fn create<S: LedgerStore>(
  State(ledger): State<Arc<Ledger<S>>>,
  Path((title_id, game_id)): Path<(Uuid, Uuid)>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let round = ledger
    .record_round(&SessionContext::game(title_id, game_id), &body.entries)
    .await?;
  Ok((StatusCode::CREATED, Json(round)))
}

/// `DELETE /titles/{t}/games/{g}/rounds/{sequence}` — idempotent.
pub async fn delete<S: LedgerStore>(
  State(ledger): State<Arc<Ledger<S>>>,
  Path((title_id, game_id, sequence)): Path<(Uuid, Uuid, u32)>,
) -> Result<StatusCode, ApiError> {
  ledger
    .delete_round(&SessionContext::game(title_id, game_id), sequence)
    .await?;
  Ok(StatusCode::NO_CONTENT)
}
