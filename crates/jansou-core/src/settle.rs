//! Round validation and the oka settlement.
//!
//! Raw end-of-hand scores are turned into zero-sum deltas by subtracting a
//! fixed return point from every seat and handing the difference between the
//! return point and the starting stake, summed over all seats, to the single
//! top scorer.
//!
//! | Seats | Starting stake | Return point | Top bonus |
//! |-------|----------------|--------------|-----------|
//! | 4     | 25 000         | 30 000       | 20 000    |
//! | 3     | 35 000         | 40 000       | 15 000    |

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::{Error, Result, round::SeatScore};

// ─── Seat count ──────────────────────────────────────────────────────────────

/// Number of players at the table for one round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeatCount {
  Three,
  Four,
}

impl SeatCount {
  pub fn from_len(n: usize) -> Result<Self> {
    match n {
      3 => Ok(Self::Three),
      4 => Ok(Self::Four),
      other => Err(Error::InvalidSeatCount(other)),
    }
  }

  pub fn len(self) -> usize {
    match self {
      Self::Three => 3,
      Self::Four => 4,
    }
  }

  pub fn starting_points(self) -> i64 {
    match self {
      Self::Three => 35_000,
      Self::Four => 25_000,
    }
  }

  pub fn return_point(self) -> i64 {
    match self {
      Self::Three => 40_000,
      Self::Four => 30_000,
    }
  }

  pub fn top_bonus(self) -> i64 {
    match self {
      Self::Three => 15_000,
      Self::Four => 20_000,
    }
  }

  /// Raw total of a complete table: every seat's starting stake.
  pub fn table_total(self) -> i64 { self.starting_points() * self.len() as i64 }
}

// ─── Validation ──────────────────────────────────────────────────────────────

/// Check one round's raw input before it is settled.
///
/// Checks, in order: seat count is 3 or 4, no wind is used twice, the top
/// score is held by exactly one seat.
pub fn validate(seats: &[SeatScore]) -> Result<SeatCount> {
  let count = SeatCount::from_len(seats.len())?;

  let mut seen = HashSet::with_capacity(seats.len());
  for seat in seats {
    if !seen.insert(seat.wind) {
      return Err(Error::DuplicateWind(seat.wind));
    }
  }

  if let Some(top) = seats.iter().map(|s| s.score).max()
    && seats.iter().filter(|s| s.score == top).count() > 1
  {
    return Err(Error::AmbiguousTop);
  }

  Ok(count)
}

/// Reject tables whose raw scores do not add up to the starting stakes.
/// Only a balanced table settles to exactly zero.
pub fn check_table_total(seats: &[SeatScore], count: SeatCount) -> Result<()> {
  let actual = seats
    .iter()
    .try_fold(0i64, |acc, s| acc.checked_add(s.score))
    .ok_or(Error::ScoreOutOfRange)?;
  let expected = count.table_total();
  if actual != expected {
    return Err(Error::UnbalancedTable { expected, actual });
  }
  Ok(())
}

// ─── Normalisation ───────────────────────────────────────────────────────────

/// Convert raw scores into settlement deltas, one per input seat, same order.
///
/// Assumes [`validate`] has passed. Should two seats still share the top
/// score, the earlier seat receives the bonus. Fails with
/// [`Error::ScoreOutOfRange`] when a delta does not fit in an `i64`.
pub fn normalize(scores: &[i64], count: SeatCount) -> Result<Vec<i64>> {
  let top = scores
    .iter()
    .max()
    .and_then(|max| scores.iter().position(|s| s == max));

  scores
    .iter()
    .enumerate()
    .map(|(i, raw)| {
      let delta = raw.checked_sub(count.return_point());
      let delta = if Some(i) == top {
        delta.and_then(|d| d.checked_add(count.top_bonus()))
      } else {
        delta
      };
      delta.ok_or(Error::ScoreOutOfRange)
    })
    .collect()
}

/// [`validate`] then [`normalize`].
pub fn settle(seats: &[SeatScore]) -> Result<Vec<i64>> {
  let count = validate(seats)?;
  let scores: Vec<i64> = seats.iter().map(|s| s.score).collect();
  normalize(&scores, count)
}
