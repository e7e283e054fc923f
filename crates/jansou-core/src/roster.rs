//! Titles, players and games: the long-lived records a round hangs off.
//!
//! None of these are ever hard-deleted. Deactivation flips `active` and every
//! list operation filters on it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of seats at a table. Seat 4 may be empty for three-player games.
pub const SEATS: usize = 4;

/// A named league or series.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Title {
  pub title_id:   Uuid,
  pub name:       String,
  pub created_at: DateTime<Utc>,
  pub active:     bool,
}

/// A player registered under one title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
  pub player_id: Uuid,
  pub title_id:  Uuid,
  pub name:      String,
  pub active:    bool,
}

/// One sitting of three or four players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Game {
  pub game_id:    Uuid,
  pub title_id:   Uuid,
  pub name:       String,
  /// Player per seat; `None` marks an unused seat.
  pub seats:      [Option<Uuid>; SEATS],
  pub created_at: DateTime<Utc>,
  pub active:     bool,
}

impl Game {
  /// Indices of the occupied seats, in seat order.
  pub fn occupied_seats(&self) -> Vec<usize> {
    self
      .seats
      .iter()
      .enumerate()
      .filter_map(|(i, s)| s.map(|_| i))
      .collect()
  }

  pub fn player_count(&self) -> usize { self.seats.iter().flatten().count() }
}

/// How a seat is filled when a game is created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum SeatChoice {
  /// An already-registered player of the title.
  Existing(Uuid),
  /// Register a new player with this name as part of creating the game.
  New(String),
  /// Leave the seat empty.
  Empty,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn occupied_seats_skip_empty() {
    let a = Uuid::new_v4();
    let b = Uuid::new_v4();
    let c = Uuid::new_v4();
    let game = Game {
      game_id:    Uuid::new_v4(),
      title_id:   Uuid::new_v4(),
      name:       "friday".into(),
      seats:      [Some(a), None, Some(b), Some(c)],
      created_at: Utc::now(),
      active:     true,
    };
    assert_eq!(game.occupied_seats(), vec![0, 2, 3]);
    assert_eq!(game.player_count(), 3);
  }

  #[test]
  fn seat_choice_json_shape() {
    let json = serde_json::to_value(SeatChoice::New("Aoi".into())).unwrap();
    assert_eq!(json, serde_json::json!({ "kind": "new", "value": "Aoi" }));

    let empty: SeatChoice =
      serde_json::from_value(serde_json::json!({ "kind": "empty" })).unwrap();
    assert_eq!(empty, SeatChoice::Empty);
  }
}
