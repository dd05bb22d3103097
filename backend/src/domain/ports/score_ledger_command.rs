//! Driving port for score submissions.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::{Actor, Error, Points, Score, SubmitScoreRequest};

/// Accepted submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AcceptedScore {
    /// Row state after the update.
    pub score: Score,
    /// Best points before the update.
    pub previous_points: Points,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ScoreLedgerCommand: Send + Sync {
    /// Raise a player's best score in a game.
    ///
    /// Checks, in order: the caller is an admin, the target is an
    /// existing player, the game exists, the row exists, and the submitted
    /// points strictly exceed the recorded best.
    ///
    /// # Errors
    ///
    /// `Forbidden`, `UserNotFound`, `GameNotFound`, `ScoreRowMissing`, or
    /// `ScoreNotAccepted` for the failed check; `StoreUnavailable` when the
    /// store times out.
    async fn submit_score(
        &self,
        actor: &Actor,
        request: SubmitScoreRequest,
    ) -> Result<AcceptedScore, Error>;
}
