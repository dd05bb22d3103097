//! Pooled async PostgreSQL connections for the ledger adapters.
//!
//! `bb8` hands out `diesel-async` connections. Besides checkout limits the
//! pool carries the statement timeout every ledger transaction applies via
//! `SET LOCAL`, so one setting bounds how long a fan-out insert or a row lock
//! may stall.

use std::time::Duration;

use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::AsyncDieselConnectionManager;
use diesel_async::pooled_connection::bb8::{Pool, PooledConnection};
use tracing::debug;

/// Failures while building the pool or checking out a connection.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PoolError {
    /// Limits that can never yield a working pool.
    #[error("invalid pool configuration: {message}")]
    InvalidConfig { message: String },

    /// The pool could not be constructed.
    #[error("failed to build connection pool: {message}")]
    Build { message: String },

    /// No connection became free before the checkout timeout.
    #[error("failed to get connection from pool: {message}")]
    Checkout { message: String },
}

impl PoolError {
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    pub fn build(message: impl Into<String>) -> Self {
        Self::Build {
            message: message.into(),
        }
    }

    pub fn checkout(message: impl Into<String>) -> Self {
        Self::Checkout {
            message: message.into(),
        }
    }
}

const DEFAULT_MAX_SIZE: u32 = 10;
const DEFAULT_MIN_IDLE: u32 = 2;
const DEFAULT_CONNECTION_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_STATEMENT_TIMEOUT: Duration = Duration::from_secs(5);

/// Pool limits and the per-transaction statement timeout.
///
/// ```
/// use std::time::Duration;
/// use scoreboard::outbound::persistence::PoolConfig;
///
/// let config = PoolConfig::new("postgres://localhost/scores")
///     .with_max_size(4)
///     .with_statement_timeout(Duration::from_millis(750));
/// assert_eq!(config.max_size(), 4);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone)]
pub struct PoolConfig {
    database_url: String,
    max_size: u32,
    min_idle: Option<u32>,
    connection_timeout: Duration,
    statement_timeout: Duration,
}

impl PoolConfig {
    /// Defaults: 10 connections, 2 idle, 30 s checkout, 5 s statements.
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            max_size: DEFAULT_MAX_SIZE,
            min_idle: Some(DEFAULT_MIN_IDLE),
            connection_timeout: DEFAULT_CONNECTION_TIMEOUT,
            statement_timeout: DEFAULT_STATEMENT_TIMEOUT,
        }
    }

    pub fn with_max_size(mut self, max_size: u32) -> Self {
        self.max_size = max_size;
        self
    }

    pub fn with_min_idle(mut self, min_idle: Option<u32>) -> Self {
        self.min_idle = min_idle;
        self
    }

    pub fn with_connection_timeout(mut self, timeout: Duration) -> Self {
        self.connection_timeout = timeout;
        self
    }

    /// Bound applied to every statement inside a ledger transaction.
    pub fn with_statement_timeout(mut self, timeout: Duration) -> Self {
        self.statement_timeout = timeout;
        self
    }

    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    pub fn max_size(&self) -> u32 {
        self.max_size
    }

    pub fn statement_timeout(&self) -> Duration {
        self.statement_timeout
    }

    /// Reject limits that would deadlock checkout or disable timeouts.
    ///
    /// # Errors
    ///
    /// [`PoolError::InvalidConfig`] naming the offending setting.
    pub fn validate(&self) -> Result<(), PoolError> {
        if self.database_url.trim().is_empty() {
            return Err(PoolError::invalid_config("database URL must not be empty"));
        }
        if self.max_size == 0 {
            return Err(PoolError::invalid_config("max_size must be at least 1"));
        }
        if let Some(min_idle) = self.min_idle.filter(|idle| *idle > self.max_size) {
            return Err(PoolError::invalid_config(format!(
                "min_idle ({min_idle}) exceeds max_size ({})",
                self.max_size
            )));
        }
        // A zero statement_timeout means "no limit" to PostgreSQL.
        if self.statement_timeout.as_millis() == 0 {
            return Err(PoolError::invalid_config(
                "statement_timeout must be at least 1 ms",
            ));
        }
        Ok(())
    }
}

/// Cloneable handle to the shared connection pool.
#[derive(Clone)]
pub struct DbPool {
    inner: Pool<AsyncPgConnection>,
    statement_timeout: Duration,
}

impl DbPool {
    /// Validate `config` and build the pool.
    ///
    /// # Errors
    ///
    /// [`PoolError::InvalidConfig`] for unusable limits, [`PoolError::Build`]
    /// when bb8 cannot open the initial connections.
    pub async fn new(config: PoolConfig) -> Result<Self, PoolError> {
        config.validate()?;
        let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(&config.database_url);
        let inner = Pool::builder()
            .max_size(config.max_size)
            .min_idle(config.min_idle)
            .connection_timeout(config.connection_timeout)
            .build(manager)
            .await
            .map_err(|err| PoolError::build(err.to_string()))?;

        debug!(
            max_size = config.max_size,
            statement_timeout_ms = config.statement_timeout.as_millis(),
            "ledger connection pool ready"
        );
        Ok(Self {
            inner,
            statement_timeout: config.statement_timeout,
        })
    }

    pub fn statement_timeout(&self) -> Duration {
        self.statement_timeout
    }

    /// Check out a connection.
    ///
    /// # Errors
    ///
    /// [`PoolError::Checkout`] when the checkout timeout elapses.
    pub async fn get(&self) -> Result<PooledConnection<'_, AsyncPgConnection>, PoolError> {
        self.inner
            .get()
            .await
            .map_err(|err| PoolError::checkout(err.to_string()))
    }
}
