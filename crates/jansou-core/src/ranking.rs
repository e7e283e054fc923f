//! Leaderboard positions and the four title awards.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::summary::PlayerSummary;

/// Which players appear on the leaderboard at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LeaderboardPolicy {
  /// Hide players who have not taken part in any active round.
  #[default]
  PlayedOnly,
  /// Hide every player whose cumulative score is exactly zero, including
  /// players who played and broke even.
  NonZeroTotal,
  /// Show every active player of the title.
  Everyone,
}

impl LeaderboardPolicy {
  pub fn includes(self, row: &PlayerSummary) -> bool {
    match self {
      Self::PlayedOnly => row.rounds_played > 0,
      Self::NonZeroTotal => row.cumulative_score != 0,
      Self::Everyone => true,
    }
  }
}

/// A leaderboard line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
  /// 1-based; distinct even when scores tie.
  pub position: usize,
  #[serde(flatten)]
  pub summary:  PlayerSummary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AwardHolder {
  pub player_id: Uuid,
  pub name:      String,
}

/// Everyone sharing the extreme value of one statistic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Award {
  pub value:   i64,
  pub holders: Vec<AwardHolder>,
}

/// The ranked view of a title summary. `None` awards mean an empty board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
  pub standings:   Vec<Standing>,
  /// Highest cumulative score.
  pub leaders:     Option<Award>,
  /// Lowest cumulative score.
  pub trailers:    Option<Award>,
  /// Most first places.
  pub most_firsts: Option<Award>,
  /// Most last places.
  pub most_lasts:  Option<Award>,
}

impl Leaderboard {
  /// Rank `summaries`, which must already be in leaderboard order (as
  /// returned by [`summarize`](crate::summary::summarize)).
  pub fn build(summaries: Vec<PlayerSummary>, policy: LeaderboardPolicy) -> Self {
    let rows: Vec<PlayerSummary> =
      summaries.into_iter().filter(|s| policy.includes(s)).collect();

    let leaders = award(&rows, |s| s.cumulative_score, Extreme::Max);
    let trailers = award(&rows, |s| s.cumulative_score, Extreme::Min);
    let most_firsts = award(&rows, |s| i64::from(s.first_place_count), Extreme::Max);
    let most_lasts = award(&rows, |s| i64::from(s.last_place_count), Extreme::Max);

    let standings = rows
      .into_iter()
      .enumerate()
      .map(|(i, summary)| Standing { position: i + 1, summary })
      .collect();

    Self { standings, leaders, trailers, most_firsts, most_lasts }
  }

  pub fn is_empty(&self) -> bool { self.standings.is_empty() }
}

#[derive(Clone, Copy)]
enum Extreme {
  Max,
  Min,
}

fn award(
  rows: &[PlayerSummary],
  stat: impl Fn(&PlayerSummary) -> i64,
  extreme: Extreme,
) -> Option<Award> {
  let values = rows.iter().map(&stat);
  let value = match extreme {
    Extreme::Max => values.max()?,
    Extreme::Min => values.min()?,
  };
  let holders = rows
    .iter()
    .filter(|&s| stat(s) == value)
    .map(|s| AwardHolder { player_id: s.player_id, name: s.name.clone() })
    .collect();
  Some(Award { value, holders })
}

#[cfg(test)]
mod tests {
  use super::*;

  fn row(name: &str, firsts: u32, lasts: u32, score: i64, played: u32) -> PlayerSummary {
    PlayerSummary {
      player_id:         Uuid::new_v4(),
      name:              name.into(),
      first_place_count: firsts,
      last_place_count:  lasts,
      cumulative_score:  score,
      rounds_played:     played,
    }
  }

  fn names(award: &Option<Award>) -> Vec<&str> {
    award
      .as_ref()
      .map(|a| a.holders.iter().map(|h| h.name.as_str()).collect())
      .unwrap_or_default()
  }

  #[test]
  fn awards_allow_ties_and_overlap() {
    let board = Leaderboard::build(
      vec![
        row("A", 3, 1, 40_000, 6),
        row("B", 3, 0, 40_000, 6),
        row("C", 0, 2, -30_000, 6),
        row("D", 0, 3, -50_000, 6),
      ],
      LeaderboardPolicy::PlayedOnly,
    );

    assert_eq!(names(&board.leaders), vec!["A", "B"]);
    assert_eq!(board.leaders.as_ref().unwrap().value, 40_000);
    assert_eq!(names(&board.trailers), vec!["D"]);
    assert_eq!(names(&board.most_firsts), vec!["A", "B"]);
    assert_eq!(board.most_firsts.as_ref().unwrap().value, 3);
    assert_eq!(names(&board.most_lasts), vec!["D"]);

    let positions: Vec<_> = board.standings.iter().map(|s| s.position).collect();
    assert_eq!(positions, vec![1, 2, 3, 4]);
  }

  #[test]
  fn policy_decides_who_is_listed() {
    let rows = vec![
      row("Winner", 1, 0, 20_000, 2),
      row("Even", 1, 1, 0, 2),
      row("Idle", 0, 0, 0, 0),
      row("Loser", 0, 1, -20_000, 2),
    ];

    let listed = |policy| {
      Leaderboard::build(rows.clone(), policy)
        .standings
        .into_iter()
        .map(|s| s.summary.name)
        .collect::<Vec<_>>()
    };

    assert_eq!(listed(LeaderboardPolicy::PlayedOnly), ["Winner", "Even", "Loser"]);
    assert_eq!(listed(LeaderboardPolicy::NonZeroTotal), ["Winner", "Loser"]);
    assert_eq!(
      listed(LeaderboardPolicy::Everyone),
      ["Winner", "Even", "Idle", "Loser"]
    );
  }

  #[test]
  fn single_player_is_both_leader_and_trailer() {
    let board = Leaderboard::build(
      vec![row("Solo", 1, 0, 5_000, 1)],
      LeaderboardPolicy::PlayedOnly,
    );
    assert_eq!(names(&board.leaders), vec!["Solo"]);
    assert_eq!(names(&board.trailers), vec!["Solo"]);
  }

  #[test]
  fn empty_board_has_no_awards() {
    let board = Leaderboard::build(
      vec![row("Idle", 0, 0, 0, 0)],
      LeaderboardPolicy::PlayedOnly,
    );
    assert!(board.is_empty());
    assert!(board.leaders.is_none());
    assert!(board.trailers.is_none());
    assert!(board.most_firsts.is_none());
    assert!(board.most_lasts.is_none());
  }
}
