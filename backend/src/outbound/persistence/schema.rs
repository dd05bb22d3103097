//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Registered users, both players and admins.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Unique, case-sensitive login name (max 32 characters).
        username -> Varchar,
        /// Opaque credential hash supplied by the authentication boundary.
        credential_hash -> Text,
        /// `player` or `admin`.
        role -> Varchar,
        /// Registration timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Game catalog.
    games (id) {
        id -> Uuid,
        /// Unique, case-sensitive title (max 64 characters).
        name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Best score per (player, game) pair.
    ///
    /// Rows are inserted by the fan-out seeder at zero points and only ever
    /// raised afterwards.
    scores (user_id, game_id) {
        user_id -> Uuid,
        game_id -> Uuid,
        /// Non-negative; guarded by `scores_points_check`.
        points -> Int8,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(scores -> users (user_id));
diesel::joinable!(scores -> games (game_id));

diesel::allow_tables_to_appear_in_same_query!(games, scores, users);
