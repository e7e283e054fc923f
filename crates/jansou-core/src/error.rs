//! Error types for `jansou-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::round::Wind;

#[derive(Debug, Error)]
pub enum Error {
  // ── Round input ───────────────────────────────────────────────────────

  #[error("a round needs 3 or 4 seats, got {0}")]
  InvalidSeatCount(usize),

  #[error("wind {0} is assigned to more than one seat")]
  DuplicateWind(Wind),

  #[error("more than one seat holds the top score; settle the tie first")]
  AmbiguousTop,

  #[error("a score is too large to settle")]
  ScoreOutOfRange,

  #[error("table total is {actual}, expected {expected}")]
  UnbalancedTable { expected: i64, actual: i64 },

  #[error("game has {expected} occupied seats but {actual} scores were given")]
  SeatMismatch { expected: usize, actual: usize },

  // ── Game creation ─────────────────────────────────────────────────────

  #[error("a game needs at least 3 distinct players")]
  InsufficientPlayers,

  #[error("player {0} is seated more than once")]
  DuplicatePlayer(Uuid),

  #[error("name must not be blank")]
  EmptyName,

  // ── Lookups ───────────────────────────────────────────────────────────

  #[error("no game selected")]
  NoGameSelected,

  #[error("title not found: {0}")]
  TitleNotFound(Uuid),

  #[error("game not found: {0}")]
  GameNotFound(Uuid),

  #[error("player not found: {0}")]
  PlayerNotFound(Uuid),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
  /// Wrap a backend error without inspecting it.
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
