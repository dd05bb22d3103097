//! PostgreSQL-backed `CatalogRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt;

use crate::domain::ports::{CatalogRepository, CatalogRepositoryError};
use crate::domain::{Game, GameId, GameName};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_helpers::timed_transaction;
use super::models::GameRow;
use super::pool::{DbPool, PoolError};
use super::schema::games;

/// Diesel-backed implementation of the game catalog read side.
#[derive(Clone)]
pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> CatalogRepositoryError {
    map_basic_pool_error(error, CatalogRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> CatalogRepositoryError {
    map_basic_diesel_error(
        error,
        CatalogRepositoryError::query,
        CatalogRepositoryError::connection,
    )
}

fn to_domain(row: GameRow) -> Result<Game, CatalogRepositoryError> {
    row.into_domain().map_err(CatalogRepositoryError::query)
}

#[async_trait]
impl CatalogRepository for DieselCatalogRepository {
    async fn find_by_id(&self, id: GameId) -> Result<Option<Game>, CatalogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let uuid = *id.as_uuid();

        let row = timed_transaction(&mut conn, self.pool.statement_timeout(), |conn| {
            async move {
                games::table
                    .filter(games::id.eq(uuid))
                    .select(GameRow::as_select())
                    .first(conn)
                    .await
                    .optional()
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?;

        row.map(to_domain).transpose()
    }

    async fn find_by_name(&self, name: &GameName) -> Result<Option<Game>, CatalogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let name = name.as_ref();

        let row = timed_transaction(&mut conn, self.pool.statement_timeout(), |conn| {
            async move {
                games::table
                    .filter(games::name.eq(name))
                    .select(GameRow::as_select())
                    .first(conn)
                    .await
                    .optional()
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?;

        row.map(to_domain).transpose()
    }

    async fn list(&self) -> Result<Vec<Game>, CatalogRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows = timed_transaction(&mut conn, self.pool.statement_timeout(), |conn| {
            async move {
                games::table
                    .select(GameRow::as_select())
                    .order_by((games::name.asc(), games::id.asc()))
                    .load(conn)
                    .await
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?;

        rows.into_iter().map(to_domain).collect()
    }
}
