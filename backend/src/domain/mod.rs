//! Domain primitives, services, and ports.
//!
//! Purpose: Define the strongly typed ledger model and the services that
//! enforce its invariants. Keep types immutable and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - User, Game, Score: identity, catalog, and ledger records.
//! - compute_statistics: pure mean/median/mode engine.
//! - authorize_submission / require_player: the authorization gate.
//! - RegistrationService, ScoreLedgerService, DirectoryService: driving port
//!   implementations.

pub mod authorization;
pub mod error;
pub mod game;
pub mod ports;
pub mod score;
pub mod statistics;
pub mod user;

mod directory_service;
mod registration_service;
mod score_ledger_service;

pub use self::authorization::{Actor, PLAYER_NOT_FOUND, authorize_submission, require_player};
pub use self::directory_service::DirectoryService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::game::{GAME_NAME_MAX, Game, GameId, GameName, GameValidationError};
pub use self::registration_service::RegistrationService;
pub use self::score::{Points, Score, ScoreWithNames, SubmitScoreRequest};
pub use self::score_ledger_service::ScoreLedgerService;
pub use self::statistics::{
    GameStatistics, Statistics, compute_points_statistics, compute_statistics,
};
pub use self::user::{
    CredentialHash, NewUser, Role, USERNAME_MAX, USERNAME_MIN, User, UserId, UserValidationError,
    Username,
};

/// Convenient domain result alias.
///
/// # Examples
/// ```
/// use scoreboard::domain::{DomainResult, Error};
///
/// fn reject() -> DomainResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// assert!(reject().is_err());
/// ```
pub type DomainResult<T> = Result<T, Error>;
