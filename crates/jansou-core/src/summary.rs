//! Per-player totals across a title, recomputed from rounds on every read.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  roster::{Game, Player, SEATS},
  round::Round,
};

// ─── Title summary ───────────────────────────────────────────────────────────

/// Aggregated results of one player over every active round of a title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSummary {
  pub player_id:         Uuid,
  pub name:              String,
  /// Rounds in which this player held the highest delta (ties included).
  pub first_place_count: u32,
  /// Rounds in which this player held the lowest delta (ties included).
  pub last_place_count:  u32,
  pub cumulative_score:  i64,
  pub rounds_played:     u32,
}

impl PlayerSummary {
  fn empty(player: &Player) -> Self {
    Self {
      player_id:         player.player_id,
      name:              player.name.clone(),
      first_place_count: 0,
      last_place_count:  0,
      cumulative_score:  0,
      rounds_played:     0,
    }
  }
}

/// Fold `rounds` into one [`PlayerSummary`] per active player.
///
/// Inactive players, games and rounds are ignored, as are rounds whose game
/// is not in `games`. Every seat tied at a round's maximum counts as a first
/// place, every seat tied at its minimum as a last place.
///
/// The result is sorted by `cumulative_score`, highest first; players with
/// equal scores keep their order in `players`.
pub fn summarize(
  players: &[Player],
  games: &[Game],
  rounds: &[Round],
) -> Vec<PlayerSummary> {
  let mut rows: Vec<PlayerSummary> = players
    .iter()
    .filter(|p| p.active)
    .map(PlayerSummary::empty)
    .collect();

  let row_of: HashMap<Uuid, usize> = rows
    .iter()
    .enumerate()
    .map(|(i, row)| (row.player_id, i))
    .collect();

  let seats_of: HashMap<Uuid, &[Option<Uuid>; SEATS]> = games
    .iter()
    .filter(|g| g.active)
    .map(|g| (g.game_id, &g.seats))
    .collect();

  for round in rounds.iter().filter(|r| r.active) {
    let Some(seats) = seats_of.get(&round.game_id) else {
      continue;
    };
    let Some(max) = round.seat_deltas().map(|(_, d)| d).max() else {
      continue;
    };
    let min = round.seat_deltas().map(|(_, d)| d).min().unwrap_or(max);

    for (seat, delta) in round.seat_deltas() {
      let Some(&i) = seats[seat].and_then(|p| row_of.get(&p)) else {
        continue;
      };
      let row = &mut rows[i];
      if delta == max {
        row.first_place_count += 1;
      }
      if delta == min {
        row.last_place_count += 1;
      }
      row.cumulative_score = row.cumulative_score.saturating_add(delta);
      row.rounds_played += 1;
    }
  }

  rows.sort_by(|a, b| b.cumulative_score.cmp(&a.cumulative_score));
  rows
}

// ─── Game score sheet ────────────────────────────────────────────────────────

/// Running total of one occupied seat in a single game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatTotal {
  pub seat:      usize,
  pub player_id: Uuid,
  pub total:     i64,
}

/// A game's rounds together with the per-seat total row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreSheet {
  pub game:   Game,
  pub rounds: Vec<Round>,
  /// One entry per occupied seat, in seat order.
  pub totals: Vec<SeatTotal>,
}

impl ScoreSheet {
  /// Build the sheet from the game's active rounds.
  pub fn new(game: Game, rounds: Vec<Round>) -> Self {
    let rounds: Vec<Round> = rounds.into_iter().filter(|r| r.active).collect();
    let totals = game
      .seats
      .iter()
      .enumerate()
      .filter_map(|(seat, player)| {
        player.map(|player_id| SeatTotal {
          seat,
          player_id,
          total: rounds
            .iter()
            .filter_map(|r| r.deltas[seat])
            .fold(0, i64::saturating_add),
        })
      })
      .collect();
    Self { game, rounds, totals }
  }

  /// Seat totals ordered highest first; ties keep seat order.
  pub fn standings(&self) -> Vec<SeatTotal> {
    let mut out = self.totals.clone();
    out.sort_by(|a, b| b.total.cmp(&a.total));
    out
  }
}

#[cfg(test)]
mod tests {
  use chrono::Utc;

  use super::*;
  use crate::round::Wind;

  fn player(title_id: Uuid, name: &str) -> Player {
    Player {
      player_id: Uuid::new_v4(),
      title_id,
      name: name.into(),
      active: true,
    }
  }

  fn game(title_id: Uuid, seats: [Option<&Player>; SEATS]) -> Game {
    Game {
      game_id: Uuid::new_v4(),
      title_id,
      name: "g".into(),
      seats: seats.map(|p| p.map(|p| p.player_id)),
      created_at: Utc::now(),
      active: true,
    }
  }

  fn round(game: &Game, sequence: u32, deltas: [Option<i64>; SEATS]) -> Round {
    let winds = [Wind::East, Wind::South, Wind::West, Wind::North];
    Round {
      title_id: game.title_id,
      game_id: game.game_id,
      sequence,
      deltas,
      winds: std::array::from_fn(|i| deltas[i].map(|_| winds[i])),
      created_at: Utc::now(),
      active: true,
    }
  }

  fn by_name<'a>(rows: &'a [PlayerSummary], name: &str) -> &'a PlayerSummary {
    rows.iter().find(|r| r.name == name).unwrap()
  }

  #[test]
  fn wins_across_games_accumulate() {
    let t = Uuid::new_v4();
    let (a, b, c, d) =
      (player(t, "A"), player(t, "B"), player(t, "C"), player(t, "D"));
    let g1 = game(t, [Some(&a), Some(&b), Some(&c), Some(&d)]);
    let g2 = game(t, [Some(&b), Some(&a), Some(&c), None]);
    let rounds = vec![
      round(&g1, 1, [Some(20_000), Some(-5_000), Some(-5_000), Some(-10_000)]),
      round(&g2, 1, [Some(-10_000), Some(15_000), Some(-5_000), None]),
    ];

    let rows = summarize(&[a, b, c, d], &[g1, g2], &rounds);

    let a = by_name(&rows, "A");
    assert_eq!(a.first_place_count, 2);
    assert_eq!(a.last_place_count, 0);
    assert_eq!(a.cumulative_score, 35_000);
    assert_eq!(a.rounds_played, 2);

    let b = by_name(&rows, "B");
    assert_eq!(b.first_place_count, 0);
    assert_eq!(b.last_place_count, 1);
    assert_eq!(b.cumulative_score, -15_000);

    let d = by_name(&rows, "D");
    assert_eq!(d.last_place_count, 1);
    assert_eq!(d.rounds_played, 1);
  }

  #[test]
  fn tied_extremes_credit_every_seat() {
    let t = Uuid::new_v4();
    let (a, b, c, d) =
      (player(t, "A"), player(t, "B"), player(t, "C"), player(t, "D"));
    let g = game(t, [Some(&a), Some(&b), Some(&c), Some(&d)]);
    let rounds =
      vec![round(&g, 1, [Some(10_000), Some(10_000), Some(-10_000), Some(-10_000)])];

    let rows = summarize(&[a, b, c, d], &[g], &rounds);
    for name in ["A", "B"] {
      assert_eq!(by_name(&rows, name).first_place_count, 1);
      assert_eq!(by_name(&rows, name).last_place_count, 0);
    }
    for name in ["C", "D"] {
      assert_eq!(by_name(&rows, name).last_place_count, 1);
      assert_eq!(by_name(&rows, name).first_place_count, 0);
    }
  }

  #[test]
  fn inactive_records_are_ignored() {
    let t = Uuid::new_v4();
    let (a, b, c) = (player(t, "A"), player(t, "B"), player(t, "C"));
    let mut retired = player(t, "R");
    retired.active = false;

    let live = game(t, [Some(&a), Some(&b), Some(&c), None]);
    let mut closed = game(t, [Some(&a), Some(&b), Some(&c), None]);
    closed.active = false;

    let mut deleted = round(&live, 2, [Some(-10_000), Some(15_000), Some(-5_000), None]);
    deleted.active = false;
    let rounds = vec![
      round(&live, 1, [Some(15_000), Some(-5_000), Some(-10_000), None]),
      deleted,
      round(&closed, 1, [Some(-10_000), Some(-5_000), Some(15_000), None]),
    ];

    let rows = summarize(&[a, b, c, retired], &[live, closed], &rounds);
    assert_eq!(rows.len(), 3);
    assert_eq!(by_name(&rows, "A").cumulative_score, 15_000);
    assert_eq!(by_name(&rows, "C").first_place_count, 0);
  }

  #[test]
  fn sorted_by_score_with_stable_ties() {
    let t = Uuid::new_v4();
    let (a, b, c, d) =
      (player(t, "A"), player(t, "B"), player(t, "C"), player(t, "D"));
    let idle = player(t, "Idle");
    let g = game(t, [Some(&a), Some(&b), Some(&c), Some(&d)]);
    let rounds =
      vec![round(&g, 1, [Some(-5_000), Some(20_000), Some(-5_000), Some(-10_000)])];

    let rows = summarize(&[a, b, c, idle, d], &[g], &rounds);
    let names: Vec<_> = rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["B", "Idle", "A", "C", "D"]);
    assert_eq!(by_name(&rows, "Idle").rounds_played, 0);
  }

  #[test]
  fn score_sheet_totals_and_standings() {
    let t = Uuid::new_v4();
    let (a, b, c) = (player(t, "A"), player(t, "B"), player(t, "C"));
    let g = game(t, [Some(&a), None, Some(&b), Some(&c)]);
    let rounds = vec![
      round(&g, 1, [Some(15_000), None, Some(-5_000), Some(-10_000)]),
      round(&g, 2, [Some(-10_000), None, Some(-5_000), Some(15_000)]),
      round(&g, 3, [Some(-5_000), None, Some(-10_000), Some(15_000)]),
    ];

    let sheet = ScoreSheet::new(g, rounds);
    let totals: Vec<_> = sheet.totals.iter().map(|t| (t.seat, t.total)).collect();
    assert_eq!(totals, vec![(0, 0), (2, -20_000), (3, 20_000)]);

    let order: Vec<_> = sheet.standings().iter().map(|t| t.player_id).collect();
    assert_eq!(order, vec![c.player_id, a.player_id, b.player_id]);
  }
}
