//! The `LedgerStore` trait.
//!
//! Implemented by storage backends (e.g. `jansou-store-sqlite`). The
//! [`Ledger`](crate::ledger::Ledger) service and the HTTP layer depend on this
//! abstraction, never on a concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  roster::{Game, Player, SEATS, Title},
  round::{NewRound, Round},
};

/// Abstraction over a Jansou record store.
///
/// Nothing is ever hard-deleted: `deactivate_*` and [`delete_round`] flip a
/// tombstone flag, and every `list_*` / `get_*` method returns active records
/// only.
///
/// The store performs no domain validation; seat counts, distinct players and
/// round settlement are checked by the caller before any write.
///
/// [`delete_round`]: LedgerStore::delete_round
pub trait LedgerStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Titles ────────────────────────────────────────────────────────────

  /// Active titles, newest first.
  fn list_titles(
    &self,
  ) -> impl Future<Output = Result<Vec<Title>, Self::Error>> + Send + '_;

  fn create_title(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Title, Self::Error>> + Send + '_;

  fn get_title(
    &self,
    title_id: Uuid,
  ) -> impl Future<Output = Result<Option<Title>, Self::Error>> + Send + '_;

  fn deactivate_title(
    &self,
    title_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Players ───────────────────────────────────────────────────────────

  /// Active players of a title in registration order.
  fn list_players(
    &self,
    title_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Player>, Self::Error>> + Send + '_;

  fn create_player(
    &self,
    title_id: Uuid,
    name: String,
  ) -> impl Future<Output = Result<Player, Self::Error>> + Send + '_;

  fn deactivate_player(
    &self,
    title_id: Uuid,
    player_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Games ─────────────────────────────────────────────────────────────

  /// Active games of a title, newest first.
  fn list_games(
    &self,
    title_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Game>, Self::Error>> + Send + '_;

  fn get_game(
    &self,
    title_id: Uuid,
    game_id: Uuid,
  ) -> impl Future<Output = Result<Option<Game>, Self::Error>> + Send + '_;

  fn create_game(
    &self,
    title_id: Uuid,
    name: String,
    seats: [Option<Uuid>; SEATS],
  ) -> impl Future<Output = Result<Game, Self::Error>> + Send + '_;

  fn deactivate_game(
    &self,
    title_id: Uuid,
    game_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Rounds ────────────────────────────────────────────────────────────

  /// Active rounds of a game, ascending by sequence number.
  fn list_rounds(
    &self,
    title_id: Uuid,
    game_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Round>, Self::Error>> + Send + '_;

  /// Highest sequence number ever written for the game, deleted rounds
  /// included. `None` if the game has no rounds at all.
  fn max_sequence(
    &self,
    title_id: Uuid,
    game_id: Uuid,
  ) -> impl Future<Output = Result<Option<u32>, Self::Error>> + Send + '_;

  /// Persist a round. The `created_at` timestamp is set by the store.
  fn append_round(
    &self,
    round: NewRound,
  ) -> impl Future<Output = Result<Round, Self::Error>> + Send + '_;

  /// Soft-delete a round. Deleting an already-deleted or unknown round is a
  /// no-op.
  fn delete_round(
    &self,
    title_id: Uuid,
    game_id: Uuid,
    sequence: u32,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
