//! Shared Diesel error mapping for the ledger repositories.
//!
//! Every adapter funnels failures into the same two buckets: connection
//! faults (retryable, including statement timeouts and serialization
//! failures) and query faults (everything else).

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// SQLSTATE text Postgres uses when `statement_timeout` cancels a statement.
const STATEMENT_TIMEOUT_MESSAGE: &str = "canceling statement due to statement timeout";

/// Map pool errors into a repository-specific connection error constructor.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message }
        | PoolError::Build { message }
        | PoolError::InvalidConfig { message } => message,
    };
    connection(message)
}

/// Whether the failure is transient and the caller may retry.
pub fn is_transient(error: &DieselError) -> bool {
    match error {
        DieselError::DatabaseError(
            DatabaseErrorKind::ClosedConnection
            | DatabaseErrorKind::UnableToSendCommand
            | DatabaseErrorKind::SerializationFailure,
            _,
        ) => true,
        DieselError::DatabaseError(_, info) => info.message().contains(STATEMENT_TIMEOUT_MESSAGE),
        DieselError::BrokenTransactionManager => true,
        _ => false,
    }
}

/// Constraint name of a unique violation, when the error is one.
pub fn unique_violation_constraint(error: &DieselError) -> Option<String> {
    match error {
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => Some(
            info.constraint_name()
                .map(str::to_owned)
                .unwrap_or_else(|| info.message().to_owned()),
        ),
        _ => None,
    }
}

/// Map common Diesel error variants into query/connection constructors.
///
/// `NotFound` and query-builder failures map to query errors; timeouts,
/// dropped connections, and serialization failures map to connection errors.
pub fn map_basic_diesel_error<E, Q, C>(error: DieselError, query: Q, connection: C) -> E
where
    Q: Fn(&'static str) -> E,
    C: Fn(&'static str) -> E,
{
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    if is_transient(&error) {
        return match error {
            DieselError::DatabaseError(DatabaseErrorKind::SerializationFailure, _) => {
                connection("database serialization failure")
            }
            DieselError::DatabaseError(
                DatabaseErrorKind::ClosedConnection | DatabaseErrorKind::UnableToSendCommand,
                _,
            )
            | DieselError::BrokenTransactionManager => connection("database connection error"),
            _ => connection("database statement timed out"),
        };
    }

    match error {
        DieselError::NotFound => query("record not found"),
        DieselError::QueryBuilderError(_) => query("database query error"),
        DieselError::DatabaseError(_, _) => query("database error"),
        _ => query("database error"),
    }
}
