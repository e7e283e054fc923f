//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Ledger(#[from] jansou_core::Error),
}

impl ApiError {
  fn status(&self) -> StatusCode {
    use jansou_core::Error as E;
    match self {
      ApiError::Ledger(e) => match e {
        E::TitleNotFound(_) | E::GameNotFound(_) | E::PlayerNotFound(_) => {
          StatusCode::NOT_FOUND
        }
        E::InvalidSeatCount(_)
        | E::DuplicateWind(_)
        | E::AmbiguousTop
        | E::ScoreOutOfRange
        | E::UnbalancedTable { .. }
        | E::SeatMismatch { .. }
        | E::InsufficientPlayers
        | E::DuplicatePlayer(_)
        | E::EmptyName
        | E::NoGameSelected => StatusCode::UNPROCESSABLE_ENTITY,
        E::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
      },
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = self.status();
    if status.is_server_error() {
      tracing::error!(error = %self, "request failed");
    }
    (status, Json(json!({ "error": self.to_string() }))).into_response()
  }
}
