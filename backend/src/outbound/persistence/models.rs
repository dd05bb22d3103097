//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{
    CredentialHash, Game, GameId, GameName, Points, Role, Score, ScoreWithNames, User, UserId,
    Username,
};

use super::schema::{games, scores, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub username: String,
    pub credential_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl UserRow {
    /// Rebuild the domain user, rejecting rows that violate domain rules.
    pub fn into_domain(self) -> Result<User, String> {
        let username = Username::new(self.username)
            .map_err(|err| format!("stored username for {}: {err}", self.id))?;
        let credential_hash = CredentialHash::new(self.credential_hash)
            .map_err(|err| format!("stored credential for {}: {err}", self.id))?;
        let role = self
            .role
            .parse::<Role>()
            .map_err(|err| format!("stored role for {}: {err}", self.id))?;
        Ok(User::new(
            UserId::from_uuid(self.id),
            username,
            credential_hash,
            role,
            self.created_at,
        ))
    }
}

/// Insertable struct for creating new user records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub username: &'a str,
    pub credential_hash: &'a str,
    pub role: &'a str,
}

/// Row struct for reading from the games table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = games)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GameRow {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl GameRow {
    pub fn into_domain(self) -> Result<Game, String> {
        let name =
            GameName::new(self.name).map_err(|err| format!("stored name for {}: {err}", self.id))?;
        Ok(Game::new(GameId::from_uuid(self.id), name, self.created_at))
    }
}

/// Insertable struct for creating new game records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = games)]
pub(crate) struct NewGameRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
}

/// Row struct for reading from the scores table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = scores)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ScoreRow {
    pub user_id: Uuid,
    pub game_id: Uuid,
    pub points: i64,
    pub updated_at: DateTime<Utc>,
}

impl ScoreRow {
    pub fn into_domain(self) -> Result<Score, String> {
        Ok(Score {
            user_id: UserId::from_uuid(self.user_id),
            game_id: GameId::from_uuid(self.game_id),
            points: points_from_column(self.points)?,
            updated_at: self.updated_at,
        })
    }
}

/// Insertable struct for seeding zero-point score rows.
#[derive(Debug, Clone, Copy, Insertable)]
#[diesel(table_name = scores)]
pub(crate) struct NewScoreRow {
    pub user_id: Uuid,
    pub game_id: Uuid,
    pub points: i64,
}

impl NewScoreRow {
    pub fn zero(user_id: Uuid, game_id: Uuid) -> Self {
        Self {
            user_id,
            game_id,
            points: points_to_column(Points::ZERO),
        }
    }
}

/// Score joined with the owning username and the game name.
pub(crate) type ScoreWithNamesRow = (ScoreRow, String, String);

pub(crate) fn score_with_names_from_row(
    (score, username, game_name): ScoreWithNamesRow,
) -> Result<ScoreWithNames, String> {
    let username = Username::new(username)
        .map_err(|err| format!("stored username for {}: {err}", score.user_id))?;
    let game_name = GameName::new(game_name)
        .map_err(|err| format!("stored name for {}: {err}", score.game_id))?;
    Ok(ScoreWithNames {
        user_id: UserId::from_uuid(score.user_id),
        username,
        game_id: GameId::from_uuid(score.game_id),
        game_name,
        points: points_from_column(score.points)?,
        updated_at: score.updated_at,
    })
}

/// Widen domain points into the `BIGINT` column type.
pub(crate) fn points_to_column(points: Points) -> i64 {
    i64::from(points.value())
}

/// Narrow a stored `BIGINT` into domain points.
pub(crate) fn points_from_column(raw: i64) -> Result<Points, String> {
    u32::try_from(raw)
        .map(Points::new)
        .map_err(|_| format!("stored points out of range: {raw}"))
}
