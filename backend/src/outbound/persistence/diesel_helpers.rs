//! Shared transaction helpers for Diesel repository implementations.

use std::time::Duration;

use diesel::sql_types::BigInt;
use diesel_async::scoped_futures::{ScopedBoxFuture, ScopedFutureExt};
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

/// Advisory lock key held by every seeding transaction.
///
/// Any transaction that creates a user or a game takes this lock first, so
/// seeding transactions observe each other's committed entities.
pub const FAN_OUT_LOCK_KEY: i64 = 0x5C0E_B0A2_D5EE_D001;

/// Run `work` inside a transaction bounded by `SET LOCAL statement_timeout`.
///
/// The timeout is scoped to the transaction and resets when it ends, so a
/// pooled connection never leaks it to the next checkout.
pub async fn timed_transaction<'a, T, F>(
    conn: &mut AsyncPgConnection,
    timeout: Duration,
    work: F,
) -> Result<T, diesel::result::Error>
where
    F: for<'r> FnOnce(
            &'r mut AsyncPgConnection,
        ) -> ScopedBoxFuture<'a, 'r, Result<T, diesel::result::Error>>
        + Send
        + 'a,
    T: Send + 'a,
{
    conn.transaction(|conn| {
        async move {
            apply_statement_timeout(conn, timeout).await?;
            work(conn).await
        }
        .scope_boxed()
    })
    .await
}

/// Bound every subsequent statement in the current transaction.
async fn apply_statement_timeout(
    conn: &mut AsyncPgConnection,
    timeout: Duration,
) -> Result<(), diesel::result::Error> {
    // SET does not accept bind parameters; the value is an integer.
    let millis = timeout.as_millis().max(1);
    diesel::sql_query(format!("SET LOCAL statement_timeout = {millis}"))
        .execute(conn)
        .await?;
    Ok(())
}

/// Serialise the current transaction against every other seeding transaction.
pub async fn acquire_fan_out_lock(
    conn: &mut AsyncPgConnection,
) -> Result<(), diesel::result::Error> {
    diesel::sql_query("SELECT pg_advisory_xact_lock($1)")
        .bind::<BigInt, _>(FAN_OUT_LOCK_KEY)
        .execute(conn)
        .await?;
    Ok(())
}
