//! PostgreSQL-backed `ScoreLedgerRepository` implementation using Diesel ORM.
//!
//! Submissions lock the target row with `SELECT ... FOR UPDATE` before
//! comparing, so two concurrent raises on the same pair run one after the
//! other and the later one compares against the earlier one's result.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt;
use uuid::Uuid;

use crate::domain::ports::{PointsUpdate, ScoreLedgerRepository, ScoreLedgerRepositoryError};
use crate::domain::{GameId, Points, Score, ScoreWithNames, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_helpers::timed_transaction;
use super::models::{
    ScoreRow, ScoreWithNamesRow, points_from_column, points_to_column, score_with_names_from_row,
};
use super::pool::{DbPool, PoolError};
use super::schema::{games, scores, users};

/// Diesel-backed implementation of the score ledger.
#[derive(Clone)]
pub struct DieselScoreLedgerRepository {
    pool: DbPool,
}

impl DieselScoreLedgerRepository {
    /// Create a new repository with the given connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use scoreboard::outbound::persistence::{
    ///     DbPool, DieselScoreLedgerRepository, PoolConfig,
    /// };
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost")).await?;
    /// let repository = DieselScoreLedgerRepository::new(pool);
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ScoreLedgerRepositoryError {
    map_basic_pool_error(error, ScoreLedgerRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> ScoreLedgerRepositoryError {
    map_basic_diesel_error(
        error,
        ScoreLedgerRepositoryError::query,
        ScoreLedgerRepositoryError::connection,
    )
}

/// Raw outcome of the locked compare-and-raise, before domain conversion.
enum RaiseOutcome {
    Raised { previous: i64, row: ScoreRow },
    NotHigher { current: i64 },
    Missing,
}

/// Whether `submitted` replaces the stored best.
///
/// A stored value outside the points range never yields to a submission;
/// `to_points_update` then reports it as corrupt.
fn improves_on(submitted: Points, stored: i64) -> bool {
    points_from_column(stored).is_ok_and(|current| submitted.beats(current))
}

fn to_points_update(outcome: RaiseOutcome) -> Result<PointsUpdate, ScoreLedgerRepositoryError> {
    match outcome {
        RaiseOutcome::Raised { previous, row } => Ok(PointsUpdate::Raised {
            previous: points_from_column(previous).map_err(ScoreLedgerRepositoryError::query)?,
            score: row
                .into_domain()
                .map_err(ScoreLedgerRepositoryError::query)?,
        }),
        RaiseOutcome::NotHigher { current } => Ok(PointsUpdate::NotHigher {
            current: points_from_column(current).map_err(ScoreLedgerRepositoryError::query)?,
        }),
        RaiseOutcome::Missing => Ok(PointsUpdate::RowMissing),
    }
}

fn to_named_scores(
    rows: Vec<ScoreWithNamesRow>,
) -> Result<Vec<ScoreWithNames>, ScoreLedgerRepositoryError> {
    rows.into_iter()
        .map(score_with_names_from_row)
        .collect::<Result<_, _>>()
        .map_err(ScoreLedgerRepositoryError::query)
}

#[async_trait]
impl ScoreLedgerRepository for DieselScoreLedgerRepository {
    async fn find(
        &self,
        user_id: &UserId,
        game_id: GameId,
    ) -> Result<Option<Score>, ScoreLedgerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let key = (*user_id.as_uuid(), *game_id.as_uuid());

        let row = timed_transaction(&mut conn, self.pool.statement_timeout(), |conn| {
            async move {
                scores::table
                    .find(key)
                    .select(ScoreRow::as_select())
                    .first(conn)
                    .await
                    .optional()
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?;

        row.map(ScoreRow::into_domain)
            .transpose()
            .map_err(ScoreLedgerRepositoryError::query)
    }

    async fn raise_points(
        &self,
        user_id: &UserId,
        game_id: GameId,
        points: Points,
    ) -> Result<PointsUpdate, ScoreLedgerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let key: (Uuid, Uuid) = (*user_id.as_uuid(), *game_id.as_uuid());
        let submitted = points_to_column(points);

        let outcome = timed_transaction(&mut conn, self.pool.statement_timeout(), |conn| {
            async move {
                let current: Option<i64> = scores::table
                    .find(key)
                    .select(scores::points)
                    .for_update()
                    .first(conn)
                    .await
                    .optional()?;

                let Some(current) = current else {
                    return Ok(RaiseOutcome::Missing);
                };
                if !improves_on(points, current) {
                    return Ok(RaiseOutcome::NotHigher { current });
                }

                let row = diesel::update(scores::table.find(key))
                    .set((
                        scores::points.eq(submitted),
                        scores::updated_at.eq(Utc::now()),
                    ))
                    .returning(ScoreRow::as_returning())
                    .get_result(conn)
                    .await?;

                Ok(RaiseOutcome::Raised {
                    previous: current,
                    row,
                })
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?;

        to_points_update(outcome)
    }

    async fn list_by_game(
        &self,
        game_id: GameId,
    ) -> Result<Vec<ScoreWithNames>, ScoreLedgerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let game_uuid = *game_id.as_uuid();

        let rows = timed_transaction(&mut conn, self.pool.statement_timeout(), |conn| {
            async move {
                scores::table
                    .inner_join(users::table)
                    .inner_join(games::table)
                    .filter(scores::game_id.eq(game_uuid))
                    .order_by((scores::points.desc(), scores::user_id.asc()))
                    .select((ScoreRow::as_select(), users::username, games::name))
                    .load::<ScoreWithNamesRow>(conn)
                    .await
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?;

        to_named_scores(rows)
    }

    async fn list_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<ScoreWithNames>, ScoreLedgerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_uuid = *user_id.as_uuid();

        let rows = timed_transaction(&mut conn, self.pool.statement_timeout(), |conn| {
            async move {
                scores::table
                    .inner_join(users::table)
                    .inner_join(games::table)
                    .filter(scores::user_id.eq(user_uuid))
                    .order_by((scores::points.desc(), scores::game_id.asc()))
                    .select((ScoreRow::as_select(), users::username, games::name))
                    .load::<ScoreWithNamesRow>(conn)
                    .await
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?;

        to_named_scores(rows)
    }
}
