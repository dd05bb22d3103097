//! Authorization decisions for ledger mutations.
//!
//! Token verification lives outside the domain; callers arrive here as an
//! already-authenticated [`Actor`]. The gate answers two questions: may this
//! caller submit scores at all, and is the target a player.

use super::{Error, Role, User, UserId};

/// Message shared by every "target is not a player" outcome.
///
/// Admin targets and unknown users must be indistinguishable to callers.
pub const PLAYER_NOT_FOUND: &str = "player not found";

/// Authenticated caller as produced by the token boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub caller_id: UserId,
    pub role: Role,
}

impl Actor {
    /// Build an actor from its verified identity and role.
    pub fn new(caller_id: UserId, role: Role) -> Self {
        Self { caller_id, role }
    }

    /// Whether the caller holds administrative rights.
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// Decide whether `actor` may submit scores.
///
/// Only admins may submit, whoever the target is. Players are refused even
/// for their own row.
pub fn authorize_submission(actor: &Actor) -> Result<(), Error> {
    if actor.is_admin() {
        return Ok(());
    }
    Err(Error::forbidden("only admins may submit scores"))
}

/// Accept `user` only when it exists and holds scores.
pub fn require_player(user: Option<User>) -> Result<User, Error> {
    match user {
        Some(user) if user.is_player() => Ok(user),
        _ => Err(Error::user_not_found(PLAYER_NOT_FOUND)),
    }
}
