//! Port abstraction for the identity store.
//!
//! Writes never go through this port: users are only ever created by the
//! seeding path so that every player starts with a full set of score rows.

use async_trait::async_trait;

use crate::domain::{User, UserId, Username};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by identity repository adapters.
    pub enum IdentityRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "identity repository connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } => "identity repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityRepository: Send + Sync {
    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, IdentityRepositoryError>;

    /// Fetch a user by exact, case-sensitive username.
    async fn find_by_username(
        &self,
        username: &Username,
    ) -> Result<Option<User>, IdentityRepositoryError>;
}
