//! Shared helpers for ledger integration tests.
//!
//! Each file under `tests/` compiles as its own crate, so suites pull these
//! helpers in with `mod support;` and use whichever subset they need.
#![allow(dead_code)]

pub mod cluster;
pub mod embedded_postgres;

use std::sync::Arc;

use postgres::{Client, NoTls};
use scoreboard::domain::{DirectoryService, RegistrationService, ScoreLedgerService};
use scoreboard::outbound::persistence::{
    DbPool, DieselCatalogRepository, DieselIdentityRepository, DieselScoreLedgerRepository,
    DieselSeedingRepository,
};

pub use cluster::{handle_cluster_setup_failure, shared_cluster_handle};
pub use embedded_postgres::provision_template_database;

/// Render a `postgres` error with its SQLSTATE, message, and detail.
///
/// `postgres::Error`'s `Display` collapses server errors to `db error`.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };

    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    if let Some(hint) = db_error.hint() {
        summary.push_str("; hint: ");
        summary.push_str(hint);
    }
    summary
}

/// Count score rows, optionally restricted to one user or one game.
pub fn count_scores(url: &str, filter: ScoreFilter) -> Result<i64, String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    let row = match filter {
        ScoreFilter::All => client.query_one("SELECT COUNT(*) FROM scores", &[]),
        ScoreFilter::User(id) => {
            client.query_one("SELECT COUNT(*) FROM scores WHERE user_id = $1", &[&id])
        }
        ScoreFilter::Game(id) => {
            client.query_one("SELECT COUNT(*) FROM scores WHERE game_id = $1", &[&id])
        }
    }
    .map_err(|err| format_postgres_error(&err))?;
    Ok(row.get(0))
}

/// Number of players times number of games, computed in SQL.
pub fn expected_cross_product(url: &str) -> Result<i64, String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    let row = client
        .query_one(
            concat!(
                "SELECT (SELECT COUNT(*) FROM users WHERE role = 'player') ",
                "* (SELECT COUNT(*) FROM games)"
            ),
            &[],
        )
        .map_err(|err| format_postgres_error(&err))?;
    Ok(row.get(0))
}

/// Delete a score row behind the ledger's back.
pub fn delete_score_row(url: &str, user: uuid::Uuid, game: uuid::Uuid) -> Result<u64, String> {
    let mut client = Client::connect(url, NoTls).map_err(|err| format_postgres_error(&err))?;
    client
        .execute(
            "DELETE FROM scores WHERE user_id = $1 AND game_id = $2",
            &[&user, &game],
        )
        .map_err(|err| format_postgres_error(&err))
}

/// Row filter for [`count_scores`].
pub enum ScoreFilter {
    All,
    User(uuid::Uuid),
    Game(uuid::Uuid),
}

pub type Ledger = ScoreLedgerService<
    DieselIdentityRepository,
    DieselCatalogRepository,
    DieselScoreLedgerRepository,
>;

/// Domain services wired over one pool.
#[derive(Clone)]
pub struct Services {
    pub registration: Arc<RegistrationService<DieselSeedingRepository>>,
    pub ledger: Arc<Ledger>,
    pub directory: Arc<DirectoryService<DieselIdentityRepository, DieselCatalogRepository>>,
}

impl Services {
    pub fn new(pool: DbPool) -> Self {
        let identity = Arc::new(DieselIdentityRepository::new(pool.clone()));
        let catalog = Arc::new(DieselCatalogRepository::new(pool.clone()));
        let ledger = Arc::new(DieselScoreLedgerRepository::new(pool.clone()));
        let seeding = Arc::new(DieselSeedingRepository::new(pool));
        Self {
            registration: Arc::new(RegistrationService::new(seeding)),
            ledger: Arc::new(ScoreLedgerService::new(
                identity.clone(),
                catalog.clone(),
                ledger,
            )),
            directory: Arc::new(DirectoryService::new(identity, catalog)),
        }
    }
}
