//! Score ledger library: domain model, services, and Diesel adapters.
//!
//! The crate tracks the best score each player holds in each game. Creating a
//! user or a game seeds every missing score row in the same transaction, and
//! submissions only ever raise a row.

pub mod config;
pub mod domain;
pub mod outbound;
