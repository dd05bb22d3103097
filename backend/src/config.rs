//! Store configuration loaded via OrthoConfig.
//!
//! Values come from `SCOREBOARD_DB_*` environment variables (and any matching
//! configuration file OrthoConfig discovers), falling back to defaults sized
//! for a single admin process.

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;

/// Connection and timeout settings for the ledger store.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "SCOREBOARD_DB")]
pub struct StoreSettings {
    /// PostgreSQL connection URL. Callers fall back to `DATABASE_URL`.
    pub url: Option<String>,
    /// Upper bound on pooled connections.
    #[ortho_config(default = 10)]
    pub max_connections: u32,
    /// Idle connections kept warm.
    #[ortho_config(default = 2)]
    pub min_idle: u32,
    /// Pool checkout timeout in milliseconds.
    #[ortho_config(default = 30000)]
    pub connection_timeout_ms: u64,
    /// Per-transaction statement timeout in milliseconds.
    #[ortho_config(default = 5000)]
    pub statement_timeout_ms: u64,
}

impl StoreSettings {
    /// Build a pool configuration for `database_url` using these limits.
    pub fn pool_config(&self, database_url: impl Into<String>) -> PoolConfig {
        PoolConfig::new(database_url)
            .with_max_size(self.max_connections)
            .with_min_idle(Some(self.min_idle))
            .with_connection_timeout(Duration::from_millis(self.connection_timeout_ms))
            .with_statement_timeout(Duration::from_millis(self.statement_timeout_ms))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for store configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    fn load_from_empty_args() -> StoreSettings {
        StoreSettings::load_from_iter([OsString::from("scoreboard-admin")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env([
            ("SCOREBOARD_DB_URL", None::<String>),
            ("SCOREBOARD_DB_MAX_CONNECTIONS", None::<String>),
            ("SCOREBOARD_DB_MIN_IDLE", None::<String>),
            ("SCOREBOARD_DB_CONNECTION_TIMEOUT_MS", None::<String>),
            ("SCOREBOARD_DB_STATEMENT_TIMEOUT_MS", None::<String>),
        ]);

        let settings = load_from_empty_args();
        assert!(settings.url.is_none());
        assert_eq!(settings.max_connections, 10);
        assert_eq!(settings.min_idle, 2);
        assert_eq!(settings.connection_timeout_ms, 30_000);
        assert_eq!(settings.statement_timeout_ms, 5_000);
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "SCOREBOARD_DB_URL",
                Some("postgres://ledger@localhost/scores".to_owned()),
            ),
            ("SCOREBOARD_DB_MAX_CONNECTIONS", Some("4".to_owned())),
            ("SCOREBOARD_DB_MIN_IDLE", Some("1".to_owned())),
            ("SCOREBOARD_DB_CONNECTION_TIMEOUT_MS", Some("1500".to_owned())),
            ("SCOREBOARD_DB_STATEMENT_TIMEOUT_MS", Some("250".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.url.as_deref(),
            Some("postgres://ledger@localhost/scores")
        );
        assert_eq!(settings.max_connections, 4);
        assert_eq!(settings.min_idle, 1);
        assert_eq!(settings.connection_timeout_ms, 1_500);
        assert_eq!(settings.statement_timeout_ms, 250);
    }

    #[rstest]
    fn pool_config_carries_limits() {
        let _guard = lock_env([
            ("SCOREBOARD_DB_MAX_CONNECTIONS", Some("3".to_owned())),
            ("SCOREBOARD_DB_STATEMENT_TIMEOUT_MS", Some("750".to_owned())),
        ]);

        let settings = load_from_empty_args();
        let config = settings.pool_config("postgres://localhost/test");
        assert_eq!(config.database_url(), "postgres://localhost/test");
        assert_eq!(config.max_size(), 3);
        assert_eq!(config.statement_timeout(), Duration::from_millis(750));
    }
}
