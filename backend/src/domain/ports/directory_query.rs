//! Driving port for user and game lookups.

use async_trait::async_trait;

use crate::domain::{Error, Game, GameId, GameName, User, UserId, Username};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DirectoryQuery: Send + Sync {
    async fn get_user_by_id(&self, id: &UserId) -> Result<User, Error>;

    async fn get_user_by_username(&self, username: &Username) -> Result<User, Error>;

    async fn get_game_by_id(&self, id: GameId) -> Result<Game, Error>;

    async fn get_game_by_name(&self, name: &GameName) -> Result<Game, Error>;

    /// Every game ordered by name, then id.
    async fn list_games(&self) -> Result<Vec<Game>, Error>;
}
