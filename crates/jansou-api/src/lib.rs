//! JSON REST API for Jansou.
//!
//! Exposes an axum [`Router`] backed by a [`Ledger`] over any
//! [`LedgerStore`]. TLS and authentication are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", jansou_api::api_router(ledger.clone()))
//! ```

pub mod error;
pub mod games;
pub mod players;
pub mod rounds;
pub mod titles;

use std::{path::PathBuf, sync::Arc};

use axum::{
  Router,
  routing::{delete, get},
};
use jansou_core::{
  ledger::{Ledger, Rules},
  store::LedgerStore,
};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `JANSOU_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:       String,
  #[serde(default = "default_port")]
  pub port:       u16,
  #[serde(default = "default_store_path")]
  pub store_path: PathBuf,
  #[serde(default)]
  pub rules:      Rules,
}

fn default_host() -> String { "127.0.0.1".into() }

fn default_port() -> u16 { 8080 }

fn default_store_path() -> PathBuf { PathBuf::from("jansou.db") }

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `ledger`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(ledger: Arc<Ledger<S>>) -> Router<()>
where
  S: LedgerStore + 'static,
{
  Router::new()
    // Titles
    .route("/titles", get(titles::list::<S>).post(titles::create::<S>))
    .route(
      "/titles/{title_id}",
      get(titles::get_one::<S>).delete(titles::deactivate::<S>),
    )
    .route("/titles/{title_id}/summary", get(titles::summary::<S>))
    .route("/titles/{title_id}/leaderboard", get(titles::leaderboard::<S>))
    // Players
    .route(
      "/titles/{title_id}/players",
      get(players::list::<S>).post(players::create::<S>),
    )
    .route(
      "/titles/{title_id}/players/{player_id}",
      delete(players::deactivate::<S>),
    )
    // Games
    .route(
      "/titles/{title_id}/games",
      get(games::list::<S>).post(games::create::<S>),
    )
    .route(
      "/titles/{title_id}/games/{game_id}",
      get(games::get_one::<S>).delete(games::deactivate::<S>),
    )
    .route("/titles/{title_id}/games/{game_id}/sheet", get(games::sheet::<S>))
    // Rounds
    .route(
      "/titles/{title_id}/games/{game_id}/rounds",
      get(rounds::list::<S>).post(rounds::create::<S>),
    )
    .route(
      "/titles/{title_id}/games/{game_id}/rounds/{sequence}",
      delete(rounds::delete::<S>),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(ledger)
}

#[cfg(test)]
mod tests;
