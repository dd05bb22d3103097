//! Domain-level error types.
//!
//! These errors are transport agnostic. Whatever sits in front of the ledger
//! (an HTTP layer, the admin CLI, a job runner) maps them to its own envelope.

use serde::{Deserialize, Serialize};

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidInput,
    /// The caller is authenticated but may not act on the target.
    Forbidden,
    /// A user with the same username already exists.
    DuplicateUsername,
    /// A game with the same name already exists.
    DuplicateGameName,
    /// The user does not exist or is not eligible to hold scores.
    UserNotFound,
    /// The game does not exist.
    GameNotFound,
    /// The submitted points did not exceed the recorded best.
    ScoreNotAccepted,
    /// A player/game pair has no score row; the seeding invariant is broken.
    ScoreRowMissing,
    /// The backing store is temporarily unreachable.
    StoreUnavailable,
    /// An unexpected error occurred inside the domain or the store.
    InternalError,
}

/// Domain error payload.
///
/// ## Invariants
/// - `message` must be non-empty once trimmed of whitespace.
///
/// # Examples
/// ```
/// use scoreboard::domain::{Error, ErrorCode};
///
/// let err = Error::new(ErrorCode::GameNotFound, "game not found");
/// assert_eq!(err.code(), ErrorCode::GameNotFound);
/// assert!(!err.is_retryable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(deny_unknown_fields)]
#[serde(try_from = "ErrorDto", into = "ErrorDto")]
pub struct Error {
    code: ErrorCode,
    message: String,
}

/// Validation errors emitted by the constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorValidationError {
    EmptyMessage,
}

impl std::fmt::Display for ErrorValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyMessage => write!(f, "error message must not be empty"),
        }
    }
}

impl std::error::Error for ErrorValidationError {}

impl Error {
    /// Create a new error, panicking if validation fails.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        match Self::try_new(code, message) {
            Ok(value) => value,
            Err(err) => panic!("error messages must satisfy validation: {err}"),
        }
    }

    /// Fallible constructor that validates the message content.
    pub fn try_new(code: ErrorCode, message: impl Into<String>) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self { code, message })
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to adapters.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Whether the whole operation may be replayed after a transient fault.
    ///
    /// Every mutation is transactional, so a `StoreUnavailable` failure left
    /// no partial state behind. Score submissions should still re-read the
    /// current best before retrying.
    pub fn is_retryable(&self) -> bool {
        self.code == ErrorCode::StoreUnavailable
    }

    /// Whether this error reports a broken ledger invariant rather than an
    /// expected outcome.
    pub fn is_consistency_fault(&self) -> bool {
        self.code == ErrorCode::ScoreRowMissing
    }

    /// Convenience constructor for [`ErrorCode::InvalidInput`].
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Convenience constructor for [`ErrorCode::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Convenience constructor for [`ErrorCode::DuplicateUsername`].
    pub fn duplicate_username(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DuplicateUsername, message)
    }

    /// Convenience constructor for [`ErrorCode::DuplicateGameName`].
    pub fn duplicate_game_name(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::DuplicateGameName, message)
    }

    /// Convenience constructor for [`ErrorCode::UserNotFound`].
    pub fn user_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UserNotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::GameNotFound`].
    pub fn game_not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::GameNotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::ScoreNotAccepted`].
    pub fn score_not_accepted(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ScoreNotAccepted, message)
    }

    /// Convenience constructor for [`ErrorCode::ScoreRowMissing`].
    pub fn score_row_missing(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ScoreRowMissing, message)
    }

    /// Convenience constructor for [`ErrorCode::StoreUnavailable`].
    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StoreUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ErrorDto {
    code: ErrorCode,
    message: String,
}

impl From<Error> for ErrorDto {
    fn from(value: Error) -> Self {
        Self {
            code: value.code,
            message: value.message,
        }
    }
}

impl TryFrom<ErrorDto> for Error {
    type Error = ErrorValidationError;

    fn try_from(value: ErrorDto) -> Result<Self, Self::Error> {
        Self::try_new(value.code, value.message)
    }
}
