//! User identity model: identifiers, usernames, credentials, and roles.

use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use zeroize::Zeroizing;

/// Validation errors returned by the user value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyId,
    InvalidId,
    EmptyUsername,
    UsernameTooShort { min: usize },
    UsernameTooLong { max: usize },
    UsernameInvalidCharacters,
    EmptyCredentialHash,
    UnknownRole { value: String },
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "user id must not be empty"),
            Self::InvalidId => write!(f, "user id must be a valid UUID"),
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooShort { min } => {
                write!(f, "username must be at least {min} characters")
            }
            Self::UsernameTooLong { max } => {
                write!(f, "username must be at most {max} characters")
            }
            Self::UsernameInvalidCharacters => write!(
                f,
                "username may only contain letters, numbers, dots, dashes, or underscores",
            ),
            Self::EmptyCredentialHash => write!(f, "credential hash must not be empty"),
            Self::UnknownRole { value } => write!(f, "unknown user role: {value}"),
        }
    }
}

impl std::error::Error for UserValidationError {}

/// Stable user identifier stored as a UUID.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(Uuid, String);

impl UserId {
    /// Validate and construct a [`UserId`] from borrowed input.
    pub fn new(id: impl AsRef<str>) -> Result<Self, UserValidationError> {
        Self::from_owned(id.as_ref().to_owned())
    }

    /// Generate a new random [`UserId`].
    pub fn random() -> Self {
        Self::from_uuid(Uuid::new_v4())
    }

    /// Wrap an already-parsed UUID, typically one read back from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid, uuid.to_string())
    }

    fn from_owned(id: String) -> Result<Self, UserValidationError> {
        if id.is_empty() {
            return Err(UserValidationError::EmptyId);
        }
        if id.trim() != id {
            return Err(UserValidationError::InvalidId);
        }

        let parsed = Uuid::parse_str(&id).map_err(|_| UserValidationError::InvalidId)?;
        Ok(Self(parsed, id))
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        self.1.as_str()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<UserId> for String {
    fn from(value: UserId) -> Self {
        let UserId(_, raw) = value;
        raw
    }
}

impl TryFrom<String> for UserId {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Unique, case-sensitive login name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

/// Minimum allowed length for a username.
pub const USERNAME_MIN: usize = 3;
/// Maximum allowed length for a username.
pub const USERNAME_MAX: usize = 32;

static USERNAME_RE: OnceLock<Regex> = OnceLock::new();

fn username_regex() -> &'static Regex {
    USERNAME_RE.get_or_init(|| {
        // Length is enforced separately; this regex constrains allowed characters.
        let pattern = "^[A-Za-z0-9_.-]+$";
        Regex::new(pattern)
            .unwrap_or_else(|error| panic!("username regex failed to compile: {error}"))
    })
}

impl Username {
    /// Validate and construct a [`Username`] from owned input.
    pub fn new(username: impl Into<String>) -> Result<Self, UserValidationError> {
        Self::from_owned(username.into())
    }

    fn from_owned(username: String) -> Result<Self, UserValidationError> {
        if username.trim().is_empty() {
            return Err(UserValidationError::EmptyUsername);
        }

        let length = username.chars().count();
        if length < USERNAME_MIN {
            return Err(UserValidationError::UsernameTooShort { min: USERNAME_MIN });
        }
        if length > USERNAME_MAX {
            return Err(UserValidationError::UsernameTooLong { max: USERNAME_MAX });
        }

        if !username_regex().is_match(&username) {
            return Err(UserValidationError::UsernameInvalidCharacters);
        }

        Ok(Self(username))
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

impl TryFrom<String> for Username {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}

/// Opaque, already-hashed credential.
///
/// Hashing happens at the authentication boundary; the ledger only stores
/// the result. The value is wiped from memory on drop and is never
/// serialised or printed.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialHash(Zeroizing<String>);

impl CredentialHash {
    /// Construct a credential hash, rejecting blank input.
    pub fn new(hash: impl Into<String>) -> Result<Self, UserValidationError> {
        let hash = hash.into();
        if hash.trim().is_empty() {
            return Err(UserValidationError::EmptyCredentialHash);
        }
        Ok(Self(Zeroizing::new(hash)))
    }

    /// Raw hash string for persistence adapters.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for CredentialHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CredentialHash(<redacted>)")
    }
}

/// Role flag controlling score ownership and submission rights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Competes in games and owns one score row per game.
    Player,
    /// Administers the catalog; never owns score rows.
    Admin,
}

impl Role {
    /// Storage representation of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Player => "player",
            Self::Admin => "admin",
        }
    }

    /// Whether users with this role receive seeded score rows.
    pub fn holds_scores(self) -> bool {
        matches!(self, Self::Player)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = UserValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "player" => Ok(Self::Player),
            "admin" => Ok(Self::Admin),
            other => Err(UserValidationError::UnknownRole {
                value: other.to_owned(),
            }),
        }
    }
}

/// Registration payload handed to the fan-out seeder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub id: UserId,
    pub username: Username,
    pub credential_hash: CredentialHash,
    pub role: Role,
}

impl NewUser {
    /// Build a registration payload with a freshly generated identifier.
    pub fn new(username: Username, credential_hash: CredentialHash, role: Role) -> Self {
        Self {
            id: UserId::random(),
            username,
            credential_hash,
            role,
        }
    }
}

/// Registered user.
///
/// ## Invariants
/// - `id` is immutable once assigned.
/// - `username` is unique across all users.
/// - The credential hash never leaves the domain through serialisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    id: UserId,
    username: Username,
    #[serde(skip)]
    credential_hash: CredentialHash,
    role: Role,
    created_at: DateTime<Utc>,
}

impl User {
    /// Build a [`User`] from validated components.
    pub fn new(
        id: UserId,
        username: Username,
        credential_hash: CredentialHash,
        role: Role,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            username,
            credential_hash,
            role,
            created_at,
        }
    }

    /// Stable user identifier.
    pub fn id(&self) -> &UserId {
        &self.id
    }

    /// Unique login name.
    pub fn username(&self) -> &Username {
        &self.username
    }

    /// Stored credential hash.
    pub fn credential_hash(&self) -> &CredentialHash {
        &self.credential_hash
    }

    /// Role flag.
    pub fn role(&self) -> Role {
        self.role
    }

    /// Registration timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether this user competes and therefore owns score rows.
    pub fn is_player(&self) -> bool {
        self.role.holds_scores()
    }
}

#[cfg(test)]
mod tests;
