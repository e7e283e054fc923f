//! Rounds, each one settled hand inside a game.
//!
//! A round is written once and never edited. Removing one flips `active`; its
//! sequence number stays taken.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};
use uuid::Uuid;

use crate::roster::SEATS;

/// Seat wind for a round.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  Display,
  EnumIter,
  EnumString,
  IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Wind {
  East,
  South,
  West,
  North,
}

/// Raw end-of-hand score and wind for one occupied seat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatScore {
  pub score: i64,
  pub wind:  Wind,
}

impl SeatScore {
  pub fn new(score: i64, wind: Wind) -> Self { Self { score, wind } }
}

/// A persisted round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
  pub title_id:   Uuid,
  pub game_id:    Uuid,
  /// 1-based, strictly increasing per game, never reused.
  pub sequence:   u32,
  /// Settled delta per seat; `None` for unused seats.
  pub deltas:     [Option<i64>; SEATS],
  pub winds:      [Option<Wind>; SEATS],
  pub created_at: DateTime<Utc>,
  pub active:     bool,
}

impl Round {
  /// `(seat, delta)` for every seat that took part.
  pub fn seat_deltas(&self) -> impl Iterator<Item = (usize, i64)> + '_ {
    self
      .deltas
      .iter()
      .enumerate()
      .filter_map(|(seat, d)| d.map(|d| (seat, d)))
  }

  pub fn total(&self) -> i64 {
    self.deltas.iter().flatten().fold(0, |acc, &d| acc.saturating_add(d))
  }
}

/// Input to [`LedgerStore::append_round`](crate::store::LedgerStore::append_round).
/// `created_at` is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRound {
  pub title_id: Uuid,
  pub game_id:  Uuid,
  pub sequence: u32,
  pub deltas:   [Option<i64>; SEATS],
  pub winds:    [Option<Wind>; SEATS],
}

#[cfg(test)]
mod tests {
  use std::str::FromStr;

  use super::*;

  #[test]
  fn wind_string_forms() {
    assert_eq!(Wind::South.to_string(), "south");
    assert_eq!(Wind::from_str("north").unwrap(), Wind::North);
    assert!(Wind::from_str("centre").is_err());
    assert_eq!(serde_json::to_string(&Wind::West).unwrap(), "\"west\"");
  }

  #[test]
  fn seat_deltas_skip_unused_seats() {
    let round = Round {
      title_id:   Uuid::new_v4(),
      game_id:    Uuid::new_v4(),
      sequence:   1,
      deltas:     [Some(15000), Some(-5000), None, Some(-10000)],
      winds:      [Some(Wind::East), Some(Wind::South), None, Some(Wind::West)],
      created_at: Utc::now(),
      active:     true,
    };
    let seats: Vec<_> = round.seat_deltas().collect();
    assert_eq!(seats, vec![(0, 15000), (1, -5000), (3, -10000)]);
    assert_eq!(round.total(), 0);
  }
}
