//! PostgreSQL-backed `IdentityRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt;

use crate::domain::ports::{IdentityRepository, IdentityRepositoryError};
use crate::domain::{User, UserId, Username};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::diesel_helpers::timed_transaction;
use super::models::UserRow;
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the identity store read side.
#[derive(Clone)]
pub struct DieselIdentityRepository {
    pool: DbPool,
}

impl DieselIdentityRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> IdentityRepositoryError {
    map_basic_pool_error(error, IdentityRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> IdentityRepositoryError {
    map_basic_diesel_error(
        error,
        IdentityRepositoryError::query,
        IdentityRepositoryError::connection,
    )
}

fn to_domain(row: Option<UserRow>) -> Result<Option<User>, IdentityRepositoryError> {
    row.map(UserRow::into_domain)
        .transpose()
        .map_err(IdentityRepositoryError::query)
}

#[async_trait]
impl IdentityRepository for DieselIdentityRepository {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, IdentityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let uuid = *id.as_uuid();

        let row = timed_transaction(&mut conn, self.pool.statement_timeout(), |conn| {
            async move {
                users::table
                    .filter(users::id.eq(uuid))
                    .select(UserRow::as_select())
                    .first(conn)
                    .await
                    .optional()
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?;

        to_domain(row)
    }

    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, IdentityRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let name = username.as_ref();

        let row = timed_transaction(&mut conn, self.pool.statement_timeout(), |conn| {
            async move {
                users::table
                    .filter(users::username.eq(name))
                    .select(UserRow::as_select())
                    .first(conn)
                    .await
                    .optional()
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)?;

        to_domain(row)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for identity repository error mapping.
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let err = map_pool_error(PoolError::checkout("connection refused"));
        assert!(matches!(err, IdentityRepositoryError::Connection { .. }));
        assert!(err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn missing_row_is_not_an_error() {
        assert_eq!(to_domain(None), Ok(None));
    }
}
