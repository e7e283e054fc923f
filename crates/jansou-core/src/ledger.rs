//! [`Ledger`], the service layer that validates input, settles rounds and
//! assembles summaries on top of any [`LedgerStore`].
//!
//! Every check runs before the first write, so a rejected request leaves the
//! store untouched.

use std::{
  collections::{HashMap, HashSet},
  sync::{Arc, Mutex, PoisonError},
};

use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
  Error, Result,
  ranking::{Leaderboard, LeaderboardPolicy},
  roster::{Game, Player, SEATS, SeatChoice, Title},
  round::{NewRound, Round, SeatScore},
  session::SessionContext,
  settle::{check_table_total, normalize, validate},
  store::LedgerStore,
  summary::{PlayerSummary, ScoreSheet, summarize},
};

// ─── Rules ───────────────────────────────────────────────────────────────────

/// House rules applied by the [`Ledger`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
  /// Reject rounds whose raw scores do not add up to the starting stakes.
  pub enforce_table_total: bool,
  pub leaderboard:         LeaderboardPolicy,
}

impl Default for Rules {
  fn default() -> Self {
    Self {
      enforce_table_total: true,
      leaderboard:         LeaderboardPolicy::default(),
    }
  }
}

// ─── Ledger ──────────────────────────────────────────────────────────────────

type GameLocks = Mutex<HashMap<Uuid, Arc<tokio::sync::Mutex<()>>>>;

/// Scorekeeping operations over a [`LedgerStore`].
///
/// Round creation within one game is serialised so two concurrent
/// submissions can never claim the same sequence number.
pub struct Ledger<S> {
  store:      Arc<S>,
  rules:      Rules,
  game_locks: GameLocks,
}

impl<S> Ledger<S> {
  pub fn new(store: Arc<S>, rules: Rules) -> Self {
    Self { store, rules, game_locks: Mutex::default() }
  }

  pub fn store(&self) -> &S { &self.store }

  pub fn rules(&self) -> Rules { self.rules }

  fn game_lock(&self, game_id: Uuid) -> Arc<tokio::sync::Mutex<()>> {
    let mut locks = self.game_locks.lock().unwrap_or_else(PoisonError::into_inner);
    locks.entry(game_id).or_default().clone()
  }

  /// Drop the lock of a game that no longer accepts rounds.
  fn release_game_lock(&self, game_id: Uuid) {
    let mut locks = self.game_locks.lock().unwrap_or_else(PoisonError::into_inner);
    locks.remove(&game_id);
  }
}

impl<S: LedgerStore> Ledger<S> {
  // ── Titles ────────────────────────────────────────────────────────────

  pub async fn titles(&self) -> Result<Vec<Title>> {
    self.store.list_titles().await.map_err(Error::store)
  }

  pub async fn create_title(&self, name: &str) -> Result<Title> {
    let name = required_name(name)?;
    let title = self.store.create_title(name).await.map_err(Error::store)?;
    info!(title_id = %title.title_id, name = %title.name, "title created");
    Ok(title)
  }

  pub async fn title(&self, ctx: &SessionContext) -> Result<Title> {
    self
      .store
      .get_title(ctx.title_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::TitleNotFound(ctx.title_id))
  }

  pub async fn deactivate_title(&self, ctx: &SessionContext) -> Result<()> {
    self.title(ctx).await?;
    self
      .store
      .deactivate_title(ctx.title_id)
      .await
      .map_err(Error::store)?;
    info!(title_id = %ctx.title_id, "title deactivated");
    Ok(())
  }

  // ── Players ───────────────────────────────────────────────────────────

  pub async fn players(&self, ctx: &SessionContext) -> Result<Vec<Player>> {
    self.title(ctx).await?;
    self
      .store
      .list_players(ctx.title_id)
      .await
      .map_err(Error::store)
  }

  pub async fn create_player(
    &self,
    ctx: &SessionContext,
    name: &str,
  ) -> Result<Player> {
    let name = required_name(name)?;
    self.title(ctx).await?;
    let player = self
      .store
      .create_player(ctx.title_id, name)
      .await
      .map_err(Error::store)?;
    info!(title_id = %ctx.title_id, player_id = %player.player_id, "player created");
    Ok(player)
  }

  pub async fn deactivate_player(
    &self,
    ctx: &SessionContext,
    player_id: Uuid,
  ) -> Result<()> {
    let players = self.players(ctx).await?;
    if !players.iter().any(|p| p.player_id == player_id) {
      return Err(Error::PlayerNotFound(player_id));
    }
    self
      .store
      .deactivate_player(ctx.title_id, player_id)
      .await
      .map_err(Error::store)
  }

  // ── Games ─────────────────────────────────────────────────────────────

  pub async fn games(&self, ctx: &SessionContext) -> Result<Vec<Game>> {
    self.title(ctx).await?;
    self.store.list_games(ctx.title_id).await.map_err(Error::store)
  }

  /// The game selected in `ctx`. Fails once its title is deactivated.
  pub async fn game(&self, ctx: &SessionContext) -> Result<Game> {
    let game_id = ctx.game_id()?;
    self.title(ctx).await?;
    self
      .store
      .get_game(ctx.title_id, game_id)
      .await
      .map_err(Error::store)?
      .ok_or(Error::GameNotFound(game_id))
  }

  /// Create a game, registering any [`SeatChoice::New`] players on the way.
  ///
  /// A blank `name` defaults to the local time as `YYYY-MM-DD HH:MM`.
  pub async fn create_game(
    &self,
    ctx: &SessionContext,
    name: &str,
    seats: &[SeatChoice],
  ) -> Result<Game> {
    if seats.len() > SEATS {
      return Err(Error::InvalidSeatCount(seats.len()));
    }

    let existing: Vec<Uuid> = seats
      .iter()
      .filter_map(|s| match s {
        SeatChoice::Existing(id) => Some(*id),
        _ => None,
      })
      .collect();
    let new_names: Vec<&str> = seats
      .iter()
      .filter_map(|s| match s {
        SeatChoice::New(name) => Some(name.as_str()),
        _ => None,
      })
      .collect();

    if new_names.iter().any(|n| n.trim().is_empty()) {
      return Err(Error::EmptyName);
    }
    let distinct: HashSet<Uuid> = existing.iter().copied().collect();
    if distinct.len() + new_names.len() < 3 {
      return Err(Error::InsufficientPlayers);
    }
    let mut seen = HashSet::new();
    if let Some(repeated) = existing.iter().find(|id| !seen.insert(**id)) {
      return Err(Error::DuplicatePlayer(*repeated));
    }

    let registered: HashSet<Uuid> =
      self.players(ctx).await?.into_iter().map(|p| p.player_id).collect();
    if let Some(unknown) = existing.iter().find(|id| !registered.contains(id)) {
      return Err(Error::PlayerNotFound(*unknown));
    }

    let name = match name.trim() {
      "" => Local::now().format("%Y-%m-%d %H:%M").to_string(),
      given => given.to_owned(),
    };

    let mut seat_ids = [None; SEATS];
    for (slot, choice) in seat_ids.iter_mut().zip(seats) {
      *slot = match choice {
        SeatChoice::Existing(id) => Some(*id),
        SeatChoice::New(new_name) => {
          let player = self
            .store
            .create_player(ctx.title_id, new_name.trim().to_owned())
            .await
            .map_err(Error::store)?;
          debug!(player_id = %player.player_id, "player registered at game creation");
          Some(player.player_id)
        }
        SeatChoice::Empty => None,
      };
    }

    let game = self
      .store
      .create_game(ctx.title_id, name, seat_ids)
      .await
      .map_err(Error::store)?;
    info!(
      title_id = %ctx.title_id,
      game_id = %game.game_id,
      players = game.player_count(),
      "game created"
    );
    Ok(game)
  }

  pub async fn deactivate_game(&self, ctx: &SessionContext) -> Result<()> {
    let game = self.game(ctx).await?;
    self
      .store
      .deactivate_game(ctx.title_id, game.game_id)
      .await
      .map_err(Error::store)?;
    self.release_game_lock(game.game_id);
    info!(game_id = %game.game_id, "game deactivated");
    Ok(())
  }

  // ── Rounds ────────────────────────────────────────────────────────────

  pub async fn rounds(&self, ctx: &SessionContext) -> Result<Vec<Round>> {
    let game = self.game(ctx).await?;
    self
      .store
      .list_rounds(ctx.title_id, game.game_id)
      .await
      .map_err(Error::store)
  }

  /// Settle and persist one round.
  ///
  /// `entries` holds one raw score and wind per occupied seat of the game, in
  /// seat order.
  pub async fn record_round(
    &self,
    ctx: &SessionContext,
    entries: &[SeatScore],
  ) -> Result<Round> {
    let game = self.game(ctx).await?;
    let occupied = game.occupied_seats();
    if entries.len() != occupied.len() {
      return Err(Error::SeatMismatch {
        expected: occupied.len(),
        actual:   entries.len(),
      });
    }

    let count = validate(entries)?;
    if self.rules.enforce_table_total {
      check_table_total(entries, count)?;
    }
    let scores: Vec<i64> = entries.iter().map(|e| e.score).collect();
    let settled = normalize(&scores, count)?;

    let mut deltas = [None; SEATS];
    let mut winds = [None; SEATS];
    for ((&seat, entry), delta) in occupied.iter().zip(entries).zip(settled) {
      deltas[seat] = Some(delta);
      winds[seat] = Some(entry.wind);
    }

    let lock = self.game_lock(game.game_id);
    let _guard = lock.lock().await;

    let sequence = self
      .store
      .max_sequence(ctx.title_id, game.game_id)
      .await
      .map_err(Error::store)?
      .map_or(1, |max| max + 1);

    let round = self
      .store
      .append_round(NewRound {
        title_id: ctx.title_id,
        game_id: game.game_id,
        sequence,
        deltas,
        winds,
      })
      .await
      .map_err(Error::store)?;

    info!(game_id = %game.game_id, sequence, "round recorded");
    Ok(round)
  }

  /// Soft-delete a round. Deleting it again changes nothing.
  pub async fn delete_round(
    &self,
    ctx: &SessionContext,
    sequence: u32,
  ) -> Result<()> {
    let game = self.game(ctx).await?;
    self
      .store
      .delete_round(ctx.title_id, game.game_id, sequence)
      .await
      .map_err(Error::store)?;
    info!(game_id = %game.game_id, sequence, "round deleted");
    Ok(())
  }

  pub async fn score_sheet(&self, ctx: &SessionContext) -> Result<ScoreSheet> {
    let game = self.game(ctx).await?;
    let rounds = self
      .store
      .list_rounds(ctx.title_id, game.game_id)
      .await
      .map_err(Error::store)?;
    Ok(ScoreSheet::new(game, rounds))
  }

  // ── Summaries ─────────────────────────────────────────────────────────

  /// Per-player totals over every active round of the title.
  pub async fn summary(&self, ctx: &SessionContext) -> Result<Vec<PlayerSummary>> {
    let players = self.players(ctx).await?;
    let games = self
      .store
      .list_games(ctx.title_id)
      .await
      .map_err(Error::store)?;

    let mut rounds = Vec::new();
    for game in &games {
      let game_rounds = self
        .store
        .list_rounds(ctx.title_id, game.game_id)
        .await
        .map_err(Error::store)?;
      rounds.extend(game_rounds);
    }

    debug!(
      title_id = %ctx.title_id,
      games = games.len(),
      rounds = rounds.len(),
      "summarising title"
    );
    Ok(summarize(&players, &games, &rounds))
  }

  pub async fn leaderboard(&self, ctx: &SessionContext) -> Result<Leaderboard> {
    let summary = self.summary(ctx).await?;
    Ok(Leaderboard::build(summary, self.rules.leaderboard))
  }
}

fn required_name(name: &str) -> Result<String> {
  match name.trim() {
    "" => Err(Error::EmptyName),
    trimmed => Ok(trimmed.to_owned()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn game_locks_are_shared_then_released() {
    let ledger = Ledger::new(Arc::new(()), Rules::default());
    let game_id = Uuid::new_v4();

    let first = ledger.game_lock(game_id);
    assert!(Arc::ptr_eq(&first, &ledger.game_lock(game_id)));
    assert_eq!(ledger.game_locks.lock().unwrap().len(), 1);

    ledger.release_game_lock(game_id);
    assert!(ledger.game_locks.lock().unwrap().is_empty());
    assert!(!Arc::ptr_eq(&first, &ledger.game_lock(game_id)));
  }
}
