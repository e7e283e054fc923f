//! The explicit selection context every ledger operation runs in.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Which title, and optionally which game, an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
  pub title_id: Uuid,
  pub game_id:  Option<Uuid>,
}

impl SessionContext {
  pub fn title(title_id: Uuid) -> Self { Self { title_id, game_id: None } }

  pub fn game(title_id: Uuid, game_id: Uuid) -> Self {
    Self { title_id, game_id: Some(game_id) }
  }

  /// The selected game, or [`Error::NoGameSelected`].
  pub fn game_id(&self) -> Result<Uuid> {
    self.game_id.ok_or(Error::NoGameSelected)
  }

  /// Same title, different game.
  pub fn with_game(self, game_id: Uuid) -> Self {
    Self { game_id: Some(game_id), ..self }
  }
}
