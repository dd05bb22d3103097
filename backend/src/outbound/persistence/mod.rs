//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of the ledger's driven ports
//! backed by PostgreSQL via the Diesel ORM with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! The persistence layer follows these principles:
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel models and domain types. The ordering of checks in a submission
//!   lives in the domain; the adapters only guarantee atomicity.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are internal implementation details, never
//!   exposed to the domain layer.
//! - **Bounded transactions**: Every unit of work runs in a transaction with
//!   `SET LOCAL statement_timeout` taken from the pool configuration.
//! - **Strongly typed errors**: All database errors are mapped to domain
//!   persistence error types.
//!
//! # Example
//!
//! ```ignore
//! use scoreboard::outbound::persistence::{DbPool, PoolConfig, DieselSeedingRepository};
//!
//! let config = PoolConfig::new("postgres://localhost/mydb");
//! let pool = DbPool::new(config).await?;
//! let repo = DieselSeedingRepository::new(pool);
//! ```

mod diesel_basic_error_mapping;
mod diesel_catalog_repository;
mod diesel_helpers;
mod diesel_identity_repository;
mod diesel_score_ledger_repository;
mod diesel_seeding_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_catalog_repository::DieselCatalogRepository;
pub use diesel_helpers::FAN_OUT_LOCK_KEY;
pub use diesel_identity_repository::DieselIdentityRepository;
pub use diesel_score_ledger_repository::DieselScoreLedgerRepository;
pub use diesel_seeding_repository::DieselSeedingRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
