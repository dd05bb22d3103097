//! Driving port for creating users and games.
//!
//! Every creation fans out score rows, so callers never talk to the identity
//! or catalog stores directly when writing.

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{Error, Game, User};

use super::Seeded;

/// Request to register a user.
///
/// Values arrive unvalidated; the service rejects malformed input with
/// `InvalidInput`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub username: String,
    /// Already-hashed credential; hashing happens upstream.
    pub credential_hash: String,
}

/// Request to add a game to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateGameRequest {
    pub name: String,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationCommand: Send + Sync {
    /// Register a player and seed a zero score for every existing game.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a malformed username or credential,
    /// `DuplicateUsername` when the name is taken.
    async fn register_player(&self, request: RegisterUserRequest) -> Result<Seeded<User>, Error>;

    /// Register an admin. Admins never own score rows.
    async fn register_admin(&self, request: RegisterUserRequest) -> Result<Seeded<User>, Error>;

    /// Add a game and seed a zero score for every existing player.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for a malformed name, `DuplicateGameName` when taken.
    async fn create_game(&self, request: CreateGameRequest) -> Result<Seeded<Game>, Error>;
}
