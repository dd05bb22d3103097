//! Game catalog model.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Validation errors returned by the game value constructors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameValidationError {
    EmptyId,
    InvalidId,
    EmptyName,
    NameHasSurroundingWhitespace,
    NameTooLong { max: usize },
}

impl fmt::Display for GameValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "game id must not be empty"),
            Self::InvalidId => write!(f, "game id must be a valid UUID"),
            Self::EmptyName => write!(f, "game name must not be empty"),
            Self::NameHasSurroundingWhitespace => {
                write!(f, "game name must not start or end with whitespace")
            }
            Self::NameTooLong { max } => write!(f, "game name must be at most {max} characters"),
        }
    }
}

impl std::error::Error for GameValidationError {}

/// Stable game identifier stored as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GameId(Uuid);

impl GameId {
    /// Parse a [`GameId`] from its textual UUID form.
    pub fn new(id: impl AsRef<str>) -> Result<Self, GameValidationError> {
        let raw = id.as_ref();
        if raw.is_empty() {
            return Err(GameValidationError::EmptyId);
        }
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| GameValidationError::InvalidId)
    }

    /// Generate a new random [`GameId`].
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an already-parsed UUID, typically one read back from storage.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<GameId> for String {
    fn from(value: GameId) -> Self {
        value.0.to_string()
    }
}

impl TryFrom<String> for GameId {
    type Error = GameValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Maximum allowed length for a game name.
pub const GAME_NAME_MAX: usize = 64;

/// Unique, case-sensitive game title.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct GameName(String);

impl GameName {
    /// Validate and construct a [`GameName`].
    pub fn new(name: impl Into<String>) -> Result<Self, GameValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(GameValidationError::EmptyName);
        }
        if name.trim() != name {
            return Err(GameValidationError::NameHasSurroundingWhitespace);
        }
        if name.chars().count() > GAME_NAME_MAX {
            return Err(GameValidationError::NameTooLong { max: GAME_NAME_MAX });
        }
        Ok(Self(name))
    }
}

impl AsRef<str> for GameName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for GameName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_ref())
    }
}

impl From<GameName> for String {
    fn from(value: GameName) -> Self {
        value.0
    }
}

impl TryFrom<String> for GameName {
    type Error = GameValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Catalog entry players compete in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    id: GameId,
    name: GameName,
    created_at: DateTime<Utc>,
}

impl Game {
    /// Build a [`Game`] from validated components.
    pub fn new(id: GameId, name: GameName, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name,
            created_at,
        }
    }

    /// Stable game identifier.
    pub fn id(&self) -> GameId {
        self.id
    }

    /// Unique game title.
    pub fn name(&self) -> &GameName {
        &self.name
    }

    /// Catalog insertion timestamp.
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}
