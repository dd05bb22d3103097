//! Driving port for reading the ledger.

use async_trait::async_trait;

use crate::domain::{Error, GameId, GameStatistics, Score, ScoreWithNames, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScoreLedgerQuery: Send + Sync {
    /// Current best for a player in a game.
    async fn get_score(&self, user_id: &UserId, game_id: GameId) -> Result<Score, Error>;

    /// Leaderboard for a game, highest points first.
    async fn list_scores_by_game(&self, game_id: GameId) -> Result<Vec<ScoreWithNames>, Error>;

    /// Every game score held by a player, highest points first.
    async fn list_scores_by_user(&self, user_id: &UserId) -> Result<Vec<ScoreWithNames>, Error>;

    /// Mean, median, and mode over a game's leaderboard.
    async fn game_statistics(&self, game_id: GameId) -> Result<GameStatistics, Error>;
}
