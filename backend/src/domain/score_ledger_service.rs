//! Score ledger domain services.
//!
//! Implements the submission state machine and the ledger read side on top
//! of the identity, catalog, and score ledger ports.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::domain::ports::{
    AcceptedScore, CatalogRepository, CatalogRepositoryError, IdentityRepository,
    IdentityRepositoryError, PointsUpdate, ScoreLedgerCommand, ScoreLedgerQuery,
    ScoreLedgerRepository, ScoreLedgerRepositoryError,
};
use crate::domain::{
    Actor, Error, Game, GameId, GameStatistics, Score, ScoreWithNames, SubmitScoreRequest, User,
    UserId, authorize_submission, compute_points_statistics, require_player,
};

pub(crate) fn map_identity_error(error: IdentityRepositoryError) -> Error {
    match error {
        IdentityRepositoryError::Connection { message } => {
            Error::store_unavailable(format!("identity repository unavailable: {message}"))
        }
        IdentityRepositoryError::Query { message } => {
            Error::internal(format!("identity repository error: {message}"))
        }
    }
}

pub(crate) fn map_catalog_error(error: CatalogRepositoryError) -> Error {
    match error {
        CatalogRepositoryError::Connection { message } => {
            Error::store_unavailable(format!("catalog repository unavailable: {message}"))
        }
        CatalogRepositoryError::Query { message } => {
            Error::internal(format!("catalog repository error: {message}"))
        }
    }
}

fn map_ledger_error(error: ScoreLedgerRepositoryError) -> Error {
    match error {
        ScoreLedgerRepositoryError::Connection { message } => {
            Error::store_unavailable(format!("score ledger unavailable: {message}"))
        }
        ScoreLedgerRepositoryError::Query { message } => {
            Error::internal(format!("score ledger error: {message}"))
        }
    }
}

fn missing_row(user_id: &UserId, game_id: GameId) -> Error {
    error!(
        %user_id,
        %game_id,
        "score row missing for player/game pair; fan-out seeding invariant violated"
    );
    Error::score_row_missing(format!(
        "no score row for user {user_id} in game {game_id}"
    ))
}

/// Score ledger service implementing the command and query driving ports.
#[derive(Clone)]
pub struct ScoreLedgerService<I, C, L> {
    identity_repo: Arc<I>,
    catalog_repo: Arc<C>,
    ledger_repo: Arc<L>,
}

impl<I, C, L> ScoreLedgerService<I, C, L> {
    /// Create a new service with the given repositories.
    pub fn new(identity_repo: Arc<I>, catalog_repo: Arc<C>, ledger_repo: Arc<L>) -> Self {
        Self {
            identity_repo,
            catalog_repo,
            ledger_repo,
        }
    }
}

impl<I, C, L> ScoreLedgerService<I, C, L>
where
    I: IdentityRepository,
    C: CatalogRepository,
    L: ScoreLedgerRepository,
{
    async fn resolve_player(&self, user_id: &UserId) -> Result<User, Error> {
        let user = self
            .identity_repo
            .find_by_id(user_id)
            .await
            .map_err(map_identity_error)?;
        require_player(user)
    }

    async fn resolve_game(&self, game_id: GameId) -> Result<Game, Error> {
        self.catalog_repo
            .find_by_id(game_id)
            .await
            .map_err(map_catalog_error)?
            .ok_or_else(|| Error::game_not_found("game not found"))
    }
}

#[async_trait]
impl<I, C, L> ScoreLedgerCommand for ScoreLedgerService<I, C, L>
where
    I: IdentityRepository,
    C: CatalogRepository,
    L: ScoreLedgerRepository,
{
    async fn submit_score(
        &self,
        actor: &Actor,
        request: SubmitScoreRequest,
    ) -> Result<AcceptedScore, Error> {
        let SubmitScoreRequest {
            user_id,
            game_id,
            points,
        } = request;

        authorize_submission(actor)?;
        self.resolve_player(&user_id).await?;
        self.resolve_game(game_id).await?;

        let update = self
            .ledger_repo
            .raise_points(&user_id, game_id, points)
            .await
            .map_err(map_ledger_error)?;

        match update {
            PointsUpdate::Raised { previous, score } => {
                info!(
                    %user_id,
                    %game_id,
                    previous = %previous,
                    points = %score.points,
                    "score accepted"
                );
                Ok(AcceptedScore {
                    score,
                    previous_points: previous,
                })
            }
            PointsUpdate::NotHigher { current } => {
                warn!(%user_id, %game_id, %points, %current, "score not accepted");
                Err(Error::score_not_accepted(format!(
                    "submitted points {points} do not exceed current best {current}"
                )))
            }
            PointsUpdate::RowMissing => Err(missing_row(&user_id, game_id)),
        }
    }
}

#[async_trait]
impl<I, C, L> ScoreLedgerQuery for ScoreLedgerService<I, C, L>
where
    I: IdentityRepository,
    C: CatalogRepository,
    L: ScoreLedgerRepository,
{
    async fn get_score(&self, user_id: &UserId, game_id: GameId) -> Result<Score, Error> {
        self.resolve_player(user_id).await?;
        self.resolve_game(game_id).await?;
        self.ledger_repo
            .find(user_id, game_id)
            .await
            .map_err(map_ledger_error)?
            .ok_or_else(|| missing_row(user_id, game_id))
    }

    async fn list_scores_by_game(&self, game_id: GameId) -> Result<Vec<ScoreWithNames>, Error> {
        self.resolve_game(game_id).await?;
        self.ledger_repo
            .list_by_game(game_id)
            .await
            .map_err(map_ledger_error)
    }

    async fn list_scores_by_user(&self, user_id: &UserId) -> Result<Vec<ScoreWithNames>, Error> {
        self.resolve_player(user_id).await?;
        self.ledger_repo
            .list_by_user(user_id)
            .await
            .map_err(map_ledger_error)
    }

    async fn game_statistics(&self, game_id: GameId) -> Result<GameStatistics, Error> {
        let game = self.resolve_game(game_id).await?;
        let scores = self
            .ledger_repo
            .list_by_game(game_id)
            .await
            .map_err(map_ledger_error)?;

        Ok(GameStatistics {
            game_id,
            game_name: game.name().clone(),
            sample_size: scores.len(),
            statistics: compute_points_statistics(scores.iter().map(|row| row.points)),
        })
    }
}

#[cfg(test)]
#[path = "score_ledger_service_tests.rs"]
mod tests;
