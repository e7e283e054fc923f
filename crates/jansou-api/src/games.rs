//! Handlers for `/titles/{title_id}/games`.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/titles/{t}/games` | Active games, newest first |
//! | `POST`   | `/titles/{t}/games` | Body: [`CreateBody`]; returns 201 |
//! | `GET`    | `/titles/{t}/games/{g}` | 404 if not found |
//! | `DELETE` | `/titles/{t}/games/{g}` | Soft delete; 204 |
//! | `GET`    | `/titles/{t}/games/{g}/sheet` | Rounds plus per-seat totals |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use jansou_core::{
  ledger::Ledger,
  roster::{Game, SeatChoice},
  session::SessionContext,
  store::LedgerStore,
  summary::{ScoreSheet, SeatTotal},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;

/// JSON body accepted by `POST /titles/{t}/games`.
#[derive(Debug, Deserialize)]
pub struct CreateBody {
  /// Defaults to the current local time when omitted or blank.
  #[serde(default)]
  pub name:  String,
  /// Up to four seats, in seat order.
  pub seats: Vec<SeatChoice>,
}

/// `GET /titles/{t}/games`
pub async fn list<S: LedgerStore>(
  State(ledger): State<Arc<Ledger<S>>>,
  Path(title_id): Path<Uuid>,
) -> Result<Json<Vec<Game>>, ApiError> {
  Ok(Json(ledger.games(&SessionContext::title(title_id)).await?))
}

/// `POST /titles/{t}/games`
pub async fn create<S: LedgerStore>(
  State(ledger): State<Arc<Ledger<S>>>,
  Path(title_id): Path<Uuid>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let game = ledger
    .create_game(&SessionContext::title(title_id), &body.name, &body.seats)
    .await?;
  Ok((StatusCode::CREATED, Json(game)))
}

/// `GET /titles/{t}/games/{g}`
pub async fn get_one<S: LedgerStore>(
  State(ledger): State<Arc<Ledger<S>>>,
  Path((title_id, game_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<Game>, ApiError> {
  Ok(Json(
    ledger.game(&SessionContext::game(title_id, game_id)).await?,
  ))
}

/// `DELETE /titles/{t}/games/{g}`
pub async fn deactivate<S: LedgerStore>(
  State(ledger): State<Arc<Ledger<S>>>,
  Path((title_id, game_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
  ledger
    .deactivate_game(&SessionContext::game(title_id, game_id))
    .await?;
  Ok(StatusCode::NO_CONTENT)
}

/// Response of the sheet endpoint: the score sheet plus its standings.
#[derive(Debug, Serialize)]
pub struct SheetResponse {
  #[serde(flatten)]
  pub sheet:     ScoreSheet,
  pub standings: Vec<SeatTotal>,
}

/// `GET /titles/{t}/games/{g}/sheet`
pub async fn sheet<S: LedgerStore>(
  State(ledger): State<Arc<Ledger<S>>>,
  Path((title_id, game_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<SheetResponse>, ApiError> {
  let sheet = ledger
    .score_sheet(&SessionContext::game(title_id, game_id))
    .await?;
  let standings = sheet.standings();
  Ok(Json(SheetResponse { sheet, standings }))
}
