//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod catalog_repository;
mod directory_query;
mod identity_repository;
mod registration_command;
mod score_ledger_command;
mod score_ledger_query;
mod score_ledger_repository;
mod seeding_repository;

#[cfg(test)]
pub use catalog_repository::MockCatalogRepository;
pub use catalog_repository::{CatalogRepository, CatalogRepositoryError};
#[cfg(test)]
pub use directory_query::MockDirectoryQuery;
pub use directory_query::DirectoryQuery;
#[cfg(test)]
pub use identity_repository::MockIdentityRepository;
pub use identity_repository::{IdentityRepository, IdentityRepositoryError};
#[cfg(test)]
pub use registration_command::MockRegistrationCommand;
pub use registration_command::{CreateGameRequest, RegisterUserRequest, RegistrationCommand};
#[cfg(test)]
pub use score_ledger_command::MockScoreLedgerCommand;
pub use score_ledger_command::{AcceptedScore, ScoreLedgerCommand};
#[cfg(test)]
pub use score_ledger_query::MockScoreLedgerQuery;
pub use score_ledger_query::ScoreLedgerQuery;
#[cfg(test)]
pub use score_ledger_repository::MockScoreLedgerRepository;
pub use score_ledger_repository::{PointsUpdate, ScoreLedgerRepository, ScoreLedgerRepositoryError};
#[cfg(test)]
pub use seeding_repository::MockSeedingRepository;
pub use seeding_repository::{Seeded, SeedingRepository, SeedingRepositoryError};
