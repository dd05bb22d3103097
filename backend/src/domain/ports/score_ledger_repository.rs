//! Port abstraction for score rows.
//!
//! Adapters must run [`ScoreLedgerRepository::raise_points`] as a single
//! transaction that locks the row before comparing, so concurrent submissions
//! for the same pair serialise and a stale lower value never overwrites a
//! higher committed one.

use async_trait::async_trait;

use crate::domain::{GameId, Points, Score, ScoreWithNames, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by score ledger adapters.
    pub enum ScoreLedgerRepositoryError {
        /// Repository connection could not be established or timed out.
        Connection { message: String } => "score ledger connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "score ledger query failed: {message}",
    }
}

/// Outcome of a conditional points update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PointsUpdate {
    /// The row was raised; `previous` is the value it replaced.
    Raised { previous: Points, score: Score },
    /// The row already holds `current`, which is at least the submitted value.
    NotHigher { current: Points },
    /// No row exists for the pair.
    RowMissing,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScoreLedgerRepository: Send + Sync {
    /// Fetch the score row for a pair.
    async fn find(
        &self,
        user_id: &UserId,
        game_id: GameId,
    ) -> Result<Option<Score>, ScoreLedgerRepositoryError>;

    /// Raise the row to `points` if, and only if, it strictly improves it.
    async fn raise_points(
        &self,
        user_id: &UserId,
        game_id: GameId,
        points: Points,
    ) -> Result<PointsUpdate, ScoreLedgerRepositoryError>;

    /// Every score in a game, ordered by points descending, then user id.
    async fn list_by_game(
        &self,
        game_id: GameId,
    ) -> Result<Vec<ScoreWithNames>, ScoreLedgerRepositoryError>;

    /// Every score held by a user, ordered by points descending, then game id.
    async fn list_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ScoreWithNames>, ScoreLedgerRepositoryError>;
}
