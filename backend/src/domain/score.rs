//! Score ledger records.
//!
//! A score row exists for every player/game pair from the moment either side
//! is created, starting at zero. Submissions only ever raise it.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{GameId, GameName, UserId, Username};

/// Non-negative point total for a player/game pair.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Points(u32);

impl Points {
    /// The value every seeded row starts with.
    pub const ZERO: Self = Self(0);

    /// Wrap a raw point value.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Raw point value.
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Whether `self` strictly improves on `current`.
    pub fn beats(self, current: Self) -> bool {
        self > current
    }
}

impl From<u32> for Points {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Points {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Best recorded points for one player in one game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    pub user_id: UserId,
    pub game_id: GameId,
    pub points: Points,
    pub updated_at: DateTime<Utc>,
}

/// Score joined with the owning user's username and the game's name.
///
/// Read-side projection only; it never feeds back into ledger writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreWithNames {
    pub user_id: UserId,
    pub username: Username,
    pub game_id: GameId,
    pub game_name: GameName,
    pub points: Points,
    pub updated_at: DateTime<Utc>,
}

impl ScoreWithNames {
    /// Drop the presentation names.
    pub fn score(&self) -> Score {
        Score {
            user_id: self.user_id.clone(),
            game_id: self.game_id,
            points: self.points,
            updated_at: self.updated_at,
        }
    }
}

/// Request to raise a player's best score in a game.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitScoreRequest {
    pub user_id: UserId,
    pub game_id: GameId,
    pub points: Points,
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(100, 0, true)]
    #[case(150, 100, true)]
    #[case(100, 100, false)]
    #[case(50, 100, false)]
    #[case(0, 0, false)]
    fn beats_requires_strict_improvement(
        #[case] submitted: u32,
        #[case] current: u32,
        #[case] expected: bool,
    ) {
        assert_eq!(Points::new(submitted).beats(Points::new(current)), expected);
    }

    #[rstest]
    fn submit_request_deserialises_camel_case() {
        let payload = serde_json::json!({
            "userId": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "gameId": "9b2d7a4c-5d0e-4f61-8a6e-0c1f2e3d4b5a",
            "points": 100,
        });
        let request: SubmitScoreRequest = serde_json::from_value(payload).expect("valid payload");
        assert_eq!(request.points, Points::new(100));
    }

    #[rstest]
    fn submit_request_rejects_negative_points() {
        let payload = serde_json::json!({
            "userId": "3fa85f64-5717-4562-b3fc-2c963f66afa6",
            "gameId": "9b2d7a4c-5d0e-4f61-8a6e-0c1f2e3d4b5a",
            "points": -1,
        });
        assert!(serde_json::from_value::<SubmitScoreRequest>(payload).is_err());
    }
}
