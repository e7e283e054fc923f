//! Handlers for `/titles` and per-title summary endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/titles` | Active titles, newest first |
//! | `POST`   | `/titles` | Body: `{"name":"..."}`; returns 201 |
//! | `GET`    | `/titles/{title_id}` | 404 if not found |
//! | `DELETE` | `/titles/{title_id}` | Soft delete; 204 |
//! | `GET`    | `/titles/{title_id}/summary` | Per-player totals |
//! | `GET`    | `/titles/{title_id}/leaderboard` | Ranked view with awards |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use jansou_core::{
  ledger::Ledger,
  ranking::Leaderboard,
  roster::Title,
  session::SessionContext,
  store::LedgerStore,
  summary::PlayerSummary,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name: String,
}

/// `GET /titles`
pub async fn list<S: LedgerStore>(
  State(ledger): State<Arc<Ledger<S>>>,
) -> Result<Json<Vec<Title>>, ApiError> {
  Ok(Json(ledger.titles().await?))
}

/// `POST /titles`
pub async fn create<S: LedgerStore>(
  State(ledger): State<Arc<Ledger<S>>>,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError> {
  let title = ledger.create_title(&body.name).await?;
  Ok((StatusCode::CREATED, Json(title)))
}

/// `GET /titles/{title_id}`
pub async fn get_one<S: LedgerStore>(
  State(ledger): State<Arc<Ledger<S>>>,
  Path(title_id): Path<Uuid>,
) -> Result<Json<Title>, ApiError> {
  Ok(Json(ledger.title(&SessionContext::title(title_id)).await?))
}

/// `DELETE /titles/{title_id}`
pub async fn deactivate<S: LedgerStore>(
  State(ledger): State<Arc<Ledger<S>>>,
  Path(title_id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
  ledger
    .deactivate_title(&SessionContext::title(title_id))
    .await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /titles/{title_id}/summary`
pub async fn summary<S: LedgerStore>(
  State(ledger): State<Arc<Ledger<S>>>,
  Path(title_id): Path<Uuid>,
) -> Result<Json<Vec<PlayerSummary>>, ApiError> {
  Ok(Json(ledger.summary(&SessionContext::title(title_id)).await?))
}

/// `GET /titles/{title_id}/leaderboard`
pub async fn leaderboard<S: LedgerStore>(
  State(ledger): State<Arc<Ledger<S>>>,
  Path(title_id): Path<Uuid>,
) -> Result<Json<Leaderboard>, ApiError> {
  Ok(Json(
    ledger.leaderboard(&SessionContext::title(title_id)).await?,
  ))
}
