//! [`SqliteStore`], the SQLite implementation of [`LedgerStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use jansou_core::{
  roster::{Game, Player, SEATS, Title},
  round::{NewRound, Round},
  store::LedgerStore,
};

use crate::{
  Result,
  encode::{
    GAME_COLUMNS, PLAYER_COLUMNS, ROUND_COLUMNS, RawGame, RawPlayer, RawRound,
    RawTitle, TITLE_COLUMNS, decode_sequence, encode_dt, encode_uuid,
    encode_wind, now,
  },
  schema::SCHEMA,
};

type RowMapper<R> = fn(&rusqlite::Row<'_>) -> rusqlite::Result<R>;

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Jansou ledger backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted. All calls go
/// through one connection thread, so statements never interleave.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a `SELECT` and map every row.
  async fn fetch_all<R>(
    &self,
    sql: String,
    params: Vec<String>,
    map: RowMapper<R>,
  ) -> Result<Vec<R>>
  where
    R: Send + 'static,
  {
    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params_from_iter(params), map)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(rows)
  }

  /// Run a `SELECT` expected to match at most one row.
  async fn fetch_one<R>(
    &self,
    sql: String,
    params: Vec<String>,
    map: RowMapper<R>,
  ) -> Result<Option<R>>
  where
    R: Send + 'static,
  {
    let row = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(&sql, rusqlite::params_from_iter(params), map)
            .optional()?,
        )
      })
      .await?;
    Ok(row)
  }

  /// Run an `UPDATE`/`INSERT` with text parameters.
  async fn execute(&self, sql: &'static str, params: Vec<String>) -> Result<usize> {
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(sql, rusqlite::params_from_iter(params))?)
      })
      .await?;
    Ok(changed)
  }
}

// ─── LedgerStore impl ────────────────────────────────────────────────────────

impl LedgerStore for SqliteStore {
  type Error = crate::Error;

  // ── Titles ────────────────────────────────────────────────────────────────

  async fn list_titles(&self) -> Result<Vec<Title>> {
    let raws = self
      .fetch_all(
        format!(
          "SELECT {TITLE_COLUMNS} FROM titles
           WHERE active = 1
           ORDER BY created_at DESC, rowid DESC"
        ),
        vec![],
        RawTitle::from_row,
      )
      .await?;
    raws.into_iter().map(RawTitle::into_title).collect()
  }

  async fn create_title(&self, name: String) -> Result<Title> {
    let title = Title {
      title_id:   Uuid::new_v4(),
      name,
      created_at: now(),
      active:     true,
    };

    self
      .execute(
        "INSERT INTO titles (title_id, name, created_at, active)
         VALUES (?1, ?2, ?3, 1)",
        vec![
          encode_uuid(title.title_id),
          title.name.clone(),
          encode_dt(title.created_at),
        ],
      )
      .await?;

    Ok(title)
  }

  async fn get_title(&self, title_id: Uuid) -> Result<Option<Title>> {
    let raw = self
      .fetch_one(
        format!(
          "SELECT {TITLE_COLUMNS} FROM titles WHERE title_id = ?1 AND active = 1"
        ),
        vec![encode_uuid(title_id)],
        RawTitle::from_row,
      )
      .await?;
    raw.map(RawTitle::into_title).transpose()
  }

  async fn deactivate_title(&self, title_id: Uuid) -> Result<()> {
    self
      .execute(
        "UPDATE titles SET active = 0 WHERE title_id = ?1",
        vec![encode_uuid(title_id)],
      )
      .await?;
    Ok(())
  }

  // ── Players ───────────────────────────────────────────────────────────────

  async fn list_players(&self, title_id: Uuid) -> Result<Vec<Player>> {
    let raws = self
      .fetch_all(
        format!(
          "SELECT {PLAYER_COLUMNS} FROM players
           WHERE title_id = ?1 AND active = 1
           ORDER BY created_at ASC, rowid ASC"
        ),
        vec![encode_uuid(title_id)],
        RawPlayer::from_row,
      )
      .await?;
    raws.into_iter().map(RawPlayer::into_player).collect()
  }

  async fn create_player(&self, title_id: Uuid, name: String) -> Result<Player> {
    let player = Player {
      player_id: Uuid::new_v4(),
      title_id,
      name,
      active: true,
    };

    self
      .execute(
        "INSERT INTO players (player_id, title_id, name, created_at, active)
         VALUES (?1, ?2, ?3, ?4, 1)",
        vec![
          encode_uuid(player.player_id),
          encode_uuid(title_id),
          player.name.clone(),
          encode_dt(now()),
        ],
      )
      .await?;

    Ok(player)
  }

  async fn deactivate_player(&self, title_id: Uuid, player_id: Uuid) -> Result<()> {
    self
      .execute(
        "UPDATE players SET active = 0 WHERE title_id = ?1 AND player_id = ?2",
        vec![encode_uuid(title_id), encode_uuid(player_id)],
      )
      .await?;
    Ok(())
  }

  // ── Games ─────────────────────────────────────────────────────────────────

  async fn list_games(&self, title_id: Uuid) -> Result<Vec<Game>> {
    let raws = self
      .fetch_all(
        format!(
          "SELECT {GAME_COLUMNS} FROM games
           WHERE title_id = ?1 AND active = 1
           ORDER BY created_at DESC, rowid DESC"
        ),
        vec![encode_uuid(title_id)],
        RawGame::from_row,
      )
      .await?;
    raws.into_iter().map(RawGame::into_game).collect()
  }

  async fn get_game(&self, title_id: Uuid, game_id: Uuid) -> Result<Option<Game>> {
    let raw = self
      .fetch_one(
        format!(
          "SELECT {GAME_COLUMNS} FROM games
           WHERE title_id = ?1 AND game_id = ?2 AND active = 1"
        ),
        vec![encode_uuid(title_id), encode_uuid(game_id)],
        RawGame::from_row,
      )
      .await?;
    raw.map(RawGame::into_game).transpose()
  }

  async fn create_game(
    &self,
    title_id: Uuid,
    name: String,
    seats: [Option<Uuid>; SEATS],
  ) -> Result<Game> {
    let game = Game {
      game_id: Uuid::new_v4(),
      title_id,
      name,
      seats,
      created_at: now(),
      active: true,
    };

    let game_id_str  = encode_uuid(game.game_id);
    let title_id_str = encode_uuid(title_id);
    let name         = game.name.clone();
    let seat_strs    = seats.map(|s| s.map(encode_uuid));
    let at_str       = encode_dt(game.created_at);

    self
      .conn
      .call(move |conn| {
        let [s1, s2, s3, s4] = seat_strs;
        conn.execute(
          "INSERT INTO games (
             game_id, title_id, name,
             seat1_id, seat2_id, seat3_id, seat4_id,
             created_at, active
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1)",
          rusqlite::params![
            game_id_str,
            title_id_str,
            name,
            s1,
            s2,
            s3,
            s4,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(game)
  }

  async fn deactivate_game(&self, title_id: Uuid, game_id: Uuid) -> Result<()> {
    self
      .execute(
        "UPDATE games SET active = 0 WHERE title_id = ?1 AND game_id = ?2",
        vec![encode_uuid(title_id), encode_uuid(game_id)],
      )
      .await?;
    Ok(())
  }

  // ── Rounds ────────────────────────────────────────────────────────────────

  async fn list_rounds(&self, title_id: Uuid, game_id: Uuid) -> Result<Vec<Round>> {
    let raws = self
      .fetch_all(
        format!(
          "SELECT {ROUND_COLUMNS} FROM rounds
           WHERE title_id = ?1 AND game_id = ?2 AND active = 1
           ORDER BY sequence ASC"
        ),
        vec![encode_uuid(title_id), encode_uuid(game_id)],
        RawRound::from_row,
      )
      .await?;
    raws.into_iter().map(RawRound::into_round).collect()
  }

  async fn max_sequence(&self, title_id: Uuid, game_id: Uuid) -> Result<Option<u32>> {
    let title_id_str = encode_uuid(title_id);
    let game_id_str  = encode_uuid(game_id);

    let max: Option<i64> = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT MAX(sequence) FROM rounds WHERE title_id = ?1 AND game_id = ?2",
          rusqlite::params![title_id_str, game_id_str],
          |row| row.get(0),
        )?)
      })
      .await?;

    max.map(decode_sequence).transpose()
  }

  async fn append_round(&self, input: NewRound) -> Result<Round> {
    let round = Round {
      title_id:   input.title_id,
      game_id:    input.game_id,
      sequence:   input.sequence,
      deltas:     input.deltas,
      winds:      input.winds,
      created_at: now(),
      active:     true,
    };

    let title_id_str = encode_uuid(round.title_id);
    let game_id_str  = encode_uuid(round.game_id);
    let sequence     = i64::from(round.sequence);
    let [d1, d2, d3, d4] = round.deltas;
    let [w1, w2, w3, w4] = round.winds.map(|w| w.map(encode_wind));
    let at_str       = encode_dt(round.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO rounds (
             title_id, game_id, sequence,
             seat1_delta, seat2_delta, seat3_delta, seat4_delta,
             seat1_wind, seat2_wind, seat3_wind, seat4_wind,
             created_at, active
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, 1)",
          rusqlite::params![
            title_id_str,
            game_id_str,
            sequence,
            d1,
            d2,
            d3,
            d4,
            w1,
            w2,
            w3,
            w4,
            at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(round)
  }

  async fn delete_round(&self, title_id: Uuid, game_id: Uuid, sequence: u32) -> Result<()> {
    let title_id_str = encode_uuid(title_id);
    let game_id_str  = encode_uuid(game_id);
    let sequence     = i64::from(sequence);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "UPDATE rounds SET active = 0
           WHERE title_id = ?1 AND game_id = ?2 AND sequence = ?3",
          rusqlite::params![title_id_str, game_id_str, sequence],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
