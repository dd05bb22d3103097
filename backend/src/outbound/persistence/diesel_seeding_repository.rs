//! PostgreSQL-backed fan-out seeding adapter.
//!
//! This adapter implements the `SeedingRepository` port. Each creation runs in
//! one transaction that first takes the fan-out advisory lock, then inserts
//! the entity, then inserts one zero-point score row for every counterpart
//! that exists at that moment. Because every seeding transaction holds the
//! same lock, a user and a game created concurrently are paired exactly once.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt;
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{Seeded, SeedingRepository, SeedingRepositoryError};
use crate::domain::{Game, GameName, NewUser, Role, User};

use super::diesel_basic_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, unique_violation_constraint,
};
use super::diesel_helpers::{acquire_fan_out_lock, timed_transaction};
use super::models::{GameRow, NewGameRow, NewScoreRow, NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{games, scores, users};

const USERNAME_CONSTRAINT: &str = "users_username_key";
const GAME_NAME_CONSTRAINT: &str = "games_name_key";

/// Diesel-backed implementation of the fan-out seeder.
#[derive(Clone)]
pub struct DieselSeedingRepository {
    pool: DbPool,
}

impl DieselSeedingRepository {
    /// Create a new seeding repository with the given connection pool.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use scoreboard::outbound::persistence::{
    ///     DbPool, DieselSeedingRepository, PoolConfig,
    /// };
    ///
    /// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
    /// let pool = DbPool::new(PoolConfig::new("postgres://localhost")).await?;
    /// let repository = DieselSeedingRepository::new(pool);
    /// # let _ = repository;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SeedingRepositoryError {
    map_basic_pool_error(error, SeedingRepositoryError::connection)
}

/// Map Diesel errors, recognising the uniqueness constraints on names.
fn map_diesel_error(
    error: diesel::result::Error,
    username: Option<&str>,
    game_name: Option<&str>,
) -> SeedingRepositoryError {
    if let Some(constraint) = unique_violation_constraint(&error) {
        debug!(%constraint, "seeding insert hit unique constraint");
        if constraint.contains(USERNAME_CONSTRAINT) {
            return SeedingRepositoryError::duplicate_username(username.unwrap_or_default());
        }
        if constraint.contains(GAME_NAME_CONSTRAINT) {
            return SeedingRepositoryError::duplicate_game_name(game_name.unwrap_or_default());
        }
    }
    map_basic_diesel_error(
        error,
        SeedingRepositoryError::query,
        SeedingRepositoryError::connection,
    )
}

/// Insert zero-point rows, skipping any pair that already exists.
async fn insert_zero_scores(
    conn: &mut diesel_async::AsyncPgConnection,
    rows: &[NewScoreRow],
) -> Result<usize, diesel::result::Error> {
    if rows.is_empty() {
        return Ok(0);
    }
    diesel::insert_into(scores::table)
        .values(rows)
        .on_conflict_do_nothing()
        .execute(conn)
        .await
}

#[async_trait]
impl SeedingRepository for DieselSeedingRepository {
    async fn create_user_with_seeding(
        &self,
        user: NewUser,
    ) -> Result<Seeded<User>, SeedingRepositoryError> {
        let NewUser {
            id,
            username,
            credential_hash,
            role,
        } = user;
        let new_row = NewUserRow {
            id: *id.as_uuid(),
            username: username.as_ref(),
            credential_hash: credential_hash.expose(),
            role: role.as_str(),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (row, seeded_scores) =
            timed_transaction(&mut conn, self.pool.statement_timeout(), |conn| {
                async move {
                    acquire_fan_out_lock(conn).await?;

                    let row = diesel::insert_into(users::table)
                        .values(&new_row)
                        .returning(UserRow::as_returning())
                        .get_result(conn)
                        .await?;

                    if !role.holds_scores() {
                        return Ok((row, 0));
                    }

                    let game_ids: Vec<Uuid> = games::table
                        .select(games::id)
                        .order_by(games::id.asc())
                        .load(conn)
                        .await?;
                    let score_rows: Vec<NewScoreRow> = game_ids
                        .into_iter()
                        .map(|game_id| NewScoreRow::zero(new_row.id, game_id))
                        .collect();
                    let seeded = insert_zero_scores(conn, &score_rows).await?;

                    Ok((row, seeded))
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_diesel_error(err, Some(username.as_ref()), None))?;

        let entity = row.into_domain().map_err(SeedingRepositoryError::query)?;
        Ok(Seeded {
            entity,
            seeded_scores,
        })
    }

    async fn create_game_with_seeding(
        &self,
        name: GameName,
    ) -> Result<Seeded<Game>, SeedingRepositoryError> {
        let new_row = NewGameRow {
            id: Uuid::new_v4(),
            name: name.as_ref(),
        };
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let (row, seeded_scores) =
            timed_transaction(&mut conn, self.pool.statement_timeout(), |conn| {
                async move {
                    acquire_fan_out_lock(conn).await?;

                    let row = diesel::insert_into(games::table)
                        .values(&new_row)
                        .returning(GameRow::as_returning())
                        .get_result(conn)
                        .await?;

                    let player_ids: Vec<Uuid> = users::table
                        .filter(users::role.eq(Role::Player.as_str()))
                        .select(users::id)
                        .order_by(users::id.asc())
                        .load(conn)
                        .await?;
                    let score_rows: Vec<NewScoreRow> = player_ids
                        .into_iter()
                        .map(|user_id| NewScoreRow::zero(user_id, new_row.id))
                        .collect();
                    let seeded = insert_zero_scores(conn, &score_rows).await?;

                    Ok((row, seeded))
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_diesel_error(err, None, Some(name.as_ref())))?;

        let entity = row.into_domain().map_err(SeedingRepositoryError::query)?;
        Ok(Seeded {
            entity,
            seeded_scores,
        })
    }
}
