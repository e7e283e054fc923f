//! SQL schema for the Jansou SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS titles (
    title_id    TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    active      INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS players (
    player_id   TEXT PRIMARY KEY,
    title_id    TEXT NOT NULL REFERENCES titles(title_id),
    name        TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    active      INTEGER NOT NULL DEFAULT 1
);

-- NULL seat = nobody sits there (three-player games).
CREATE TABLE IF NOT EXISTS games (
    game_id     TEXT PRIMARY KEY,
    title_id    TEXT NOT NULL REFERENCES titles(title_id),
    name        TEXT NOT NULL,
    seat1_id    TEXT REFERENCES players(player_id),
    seat2_id    TEXT REFERENCES players(player_id),
    seat3_id    TEXT REFERENCES players(player_id),
    seat4_id    TEXT REFERENCES players(player_id),
    created_at  TEXT NOT NULL,
    active      INTEGER NOT NULL DEFAULT 1
);

-- Rounds are never updated except to clear `active`.
-- Deleted rows keep their sequence number, so numbers are never reused.
CREATE TABLE IF NOT EXISTS rounds (
    title_id    TEXT NOT NULL REFERENCES titles(title_id),
    game_id     TEXT NOT NULL REFERENCES games(game_id),
    sequence    INTEGER NOT NULL,
    seat1_delta INTEGER,
    seat2_delta INTEGER,
    seat3_delta INTEGER,
    seat4_delta INTEGER,
    seat1_wind  TEXT,
    seat2_wind  TEXT,
    seat3_wind  TEXT,
    seat4_wind  TEXT,
    created_at  TEXT NOT NULL,
    active      INTEGER NOT NULL DEFAULT 1,
    PRIMARY KEY (game_id, sequence)
);

CREATE INDEX IF NOT EXISTS players_title_idx ON players(title_id);
CREATE INDEX IF NOT EXISTS games_title_idx   ON games(title_id);
CREATE INDEX IF NOT EXISTS rounds_title_idx  ON rounds(title_id);

PRAGMA user_version = 1;
";
