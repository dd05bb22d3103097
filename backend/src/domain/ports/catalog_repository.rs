//! Port abstraction for the game catalog.

use async_trait::async_trait;

use crate::domain::{Game, GameId, GameName};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by catalog repository adapters.
    pub enum CatalogRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "catalog repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "catalog repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Fetch a game by identifier.
    async fn find_by_id(&self, id: GameId) -> Result<Option<Game>, CatalogRepositoryError>;

    /// Fetch a game by exact, case-sensitive name.
    async fn find_by_name(&self, name: &GameName) -> Result<Option<Game>, CatalogRepositoryError>;

    /// List every game ordered by name, then id.
    async fn list(&self) -> Result<Vec<Game>, CatalogRepositoryError>;
}
