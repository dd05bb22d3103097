//! Driven-side adapters for the ledger ports.
//!
//! Only PostgreSQL backs the identity, catalog, and score stores today. The
//! adapters translate rows and database errors; ordering of checks and the
//! monotonic-score rule stay in the domain services.

pub mod persistence;
