//! Port abstraction for entity creation with score fan-out.
//!
//! Creating a user or a game changes the set of (player, game) pairs, so both
//! writes live behind this one port. Implementations must:
//! - Serialise every seeding transaction against every other one.
//! - Insert the entity and all of its missing zero-point score rows in a
//!   single transaction.
//! - Roll back the entity insert if any score insert fails.
//! - Never seed rows for admin users.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{Game, GameName, NewUser, User};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by seeding repository adapters.
    pub enum SeedingRepositoryError {
        /// Repository connection could not be established or timed out.
        Connection { message: String } => "seeding repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "seeding repository query failed: {message}",
        /// Another user already holds the username.
        DuplicateUsername { username: String } => "username already taken: {username}",
        /// Another game already holds the name.
        DuplicateGameName { name: String } => "game name already taken: {name}",
    }
}

/// Freshly created entity together with the number of score rows seeded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Seeded<T> {
    #[serde(flatten)]
    pub entity: T,
    pub seeded_scores: usize,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SeedingRepository: Send + Sync {
    /// Insert a user and, for players, one zero-point score per game.
    async fn create_user_with_seeding(
        &self,
        user: NewUser,
    ) -> Result<Seeded<User>, SeedingRepositoryError>;

    /// Insert a game and one zero-point score per player.
    async fn create_game_with_seeding(
        &self,
        name: GameName,
    ) -> Result<Seeded<Game>, SeedingRepositoryError>;
}
