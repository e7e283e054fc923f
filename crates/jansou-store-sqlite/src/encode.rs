//! Encoding and decoding helpers between domain types and the plain values
//! stored in SQLite columns.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings (microseconds, `Z`)
//! so that text order matches time order. UUIDs are stored as hyphenated
//! lowercase strings; winds as their lowercase names.

use std::str::FromStr as _;

use chrono::{DateTime, SecondsFormat, SubsecRound as _, Utc};
use jansou_core::{
  roster::{Game, Player, SEATS, Title},
  round::{Round, Wind},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

/// The current time at the precision stored on disk, so values handed back
/// to callers compare equal to what is read later.
pub fn now() -> DateTime<Utc> { Utc::now().trunc_subsecs(6) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_wind(w: Wind) -> &'static str { w.into() }

pub fn decode_wind(s: &str) -> Result<Wind> {
  Wind::from_str(s).map_err(|_| Error::UnknownWind(s.to_owned()))
}

fn decode_opt_uuid(s: Option<&str>) -> Result<Option<Uuid>> {
  s.map(decode_uuid).transpose()
}

// ─── Row types ───────────────────────────────────────────────────────────────

pub const TITLE_COLUMNS: &str = "title_id, name, created_at, active";

/// Raw values read directly from a `titles` row.
pub struct RawTitle {
  pub title_id:   String,
  pub name:       String,
  pub created_at: String,
  pub active:     bool,
}

impl RawTitle {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      title_id:   row.get(0)?,
      name:       row.get(1)?,
      created_at: row.get(2)?,
      active:     row.get(3)?,
    })
  }

  pub fn into_title(self) -> Result<Title> {
    Ok(Title {
      title_id:   decode_uuid(&self.title_id)?,
      name:       self.name,
      created_at: decode_dt(&self.created_at)?,
      active:     self.active,
    })
  }
}

pub const PLAYER_COLUMNS: &str = "player_id, title_id, name, active";

/// Raw values read directly from a `players` row.
pub struct RawPlayer {
  pub player_id: String,
  pub title_id:  String,
  pub name:      String,
  pub active:    bool,
}

impl RawPlayer {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      player_id: row.get(0)?,
      title_id:  row.get(1)?,
      name:      row.get(2)?,
      active:    row.get(3)?,
    })
  }

  pub fn into_player(self) -> Result<Player> {
    Ok(Player {
      player_id: decode_uuid(&self.player_id)?,
      title_id:  decode_uuid(&self.title_id)?,
      name:      self.name,
      active:    self.active,
    })
  }
}

pub const GAME_COLUMNS: &str = "game_id, title_id, name, \
  seat1_id, seat2_id, seat3_id, seat4_id, created_at, active";

/// Raw values read directly from a `games` row.
pub struct RawGame {
  pub game_id:    String,
  pub title_id:   String,
  pub name:       String,
  pub seats:      [Option<String>; SEATS],
  pub created_at: String,
  pub active:     bool,
}

impl RawGame {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      game_id:    row.get(0)?,
      title_id:   row.get(1)?,
      name:       row.get(2)?,
      seats:      [row.get(3)?, row.get(4)?, row.get(5)?, row.get(6)?],
      created_at: row.get(7)?,
      active:     row.get(8)?,
    })
  }

  pub fn into_game(self) -> Result<Game> {
    let [s1, s2, s3, s4] = self.seats;
    Ok(Game {
      game_id:    decode_uuid(&self.game_id)?,
      title_id:   decode_uuid(&self.title_id)?,
      name:       self.name,
      seats:      [
        decode_opt_uuid(s1.as_deref())?,
        decode_opt_uuid(s2.as_deref())?,
        decode_opt_uuid(s3.as_deref())?,
        decode_opt_uuid(s4.as_deref())?,
      ],
      created_at: decode_dt(&self.created_at)?,
      active:     self.active,
    })
  }
}

pub const ROUND_COLUMNS: &str = "title_id, game_id, sequence, \
  seat1_delta, seat2_delta, seat3_delta, seat4_delta, \
  seat1_wind, seat2_wind, seat3_wind, seat4_wind, created_at, active";

/// Raw values read directly from a `rounds` row.
pub struct RawRound {
  pub title_id:   String,
  pub game_id:    String,
  pub sequence:   i64,
  pub deltas:     [Option<i64>; SEATS],
  pub winds:      [Option<String>; SEATS],
  pub created_at: String,
  pub active:     bool,
}

impl RawRound {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      title_id:   row.get(0)?,
      game_id:    row.get(1)?,
      sequence:   row.get(2)?,
      deltas:     [row.get(3)?, row.get(4)?, row.get(5)?, row.get(6)?],
      winds:      [row.get(7)?, row.get(8)?, row.get(9)?, row.get(10)?],
      created_at: row.get(11)?,
      active:     row.get(12)?,
    })
  }

  pub fn into_round(self) -> Result<Round> {
    let mut winds = [None; SEATS];
    for (slot, raw) in winds.iter_mut().zip(&self.winds) {
      *slot = raw.as_deref().map(decode_wind).transpose()?;
    }
    Ok(Round {
      title_id: decode_uuid(&self.title_id)?,
      game_id: decode_uuid(&self.game_id)?,
      sequence: decode_sequence(self.sequence)?,
      deltas: self.deltas,
      winds,
      created_at: decode_dt(&self.created_at)?,
      active: self.active,
    })
  }
}

pub fn decode_sequence(n: i64) -> Result<u32> {
  u32::try_from(n).map_err(|_| Error::Sequence(n))
}
