//! Operator CLI for the score ledger.
//!
//! # Examples
//! ```sh
//! scoreboard-admin migrate
//! scoreboard-admin create-game --name chess
//! scoreboard-admin register-player --username ana --credential-hash '$argon2id$...'
//! scoreboard-admin submit-score --caller root --player ana --game chess --points 100
//! scoreboard-admin stats --game chess
//! ```
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::env;
use std::ffi::OsString;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use scoreboard::config::StoreSettings;
use scoreboard::domain::ports::{
    CreateGameRequest, DirectoryQuery, RegisterUserRequest, RegistrationCommand,
    ScoreLedgerCommand, ScoreLedgerQuery,
};
use scoreboard::domain::{
    Actor, DirectoryService, Error, ErrorCode, GameName, PLAYER_NOT_FOUND, Points,
    RegistrationService, ScoreLedgerService, SubmitScoreRequest, User, Username,
};
use scoreboard::outbound::persistence::{
    DbPool, DieselCatalogRepository, DieselIdentityRepository, DieselScoreLedgerRepository,
    DieselSeedingRepository, run_migrations,
};
use serde::Serialize;
use tokio::runtime::Builder;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

const BINARY_NAME: &str = "scoreboard-admin";

/// `scoreboard-admin` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "scoreboard-admin",
    about = "Administer the score ledger: schema, users, games, and scores",
    version
)]
struct Cli {
    /// Database connection URL. Falls back to `SCOREBOARD_DB_URL`, then
    /// `DATABASE_URL`.
    #[arg(long = "database-url", value_name = "url", global = true)]
    database_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Apply pending schema migrations.
    Migrate,
    /// Register a player and seed a zero score for every game.
    RegisterPlayer(RegisterArgs),
    /// Register an admin. Admins hold no scores.
    RegisterAdmin(RegisterArgs),
    /// Add a game and seed a zero score for every player.
    CreateGame {
        #[arg(long, value_parser = parse_game_name)]
        name: GameName,
    },
    /// List every game by name.
    ListGames,
    /// Raise a player's best score in a game.
    SubmitScore(SubmitArgs),
    /// Show a game's leaderboard.
    Leaderboard {
        #[arg(long, value_parser = parse_game_name)]
        game: GameName,
    },
    /// Show every score a player holds.
    UserScores {
        #[arg(long, value_parser = parse_username)]
        username: Username,
    },
    /// Show mean, median, and mode for a game.
    Stats {
        #[arg(long, value_parser = parse_game_name)]
        game: GameName,
    },
}

#[derive(Debug, Args)]
struct RegisterArgs {
    #[arg(long)]
    username: String,
    /// Pre-hashed credential; the ledger never sees plaintext passwords.
    #[arg(long = "credential-hash", value_name = "hash")]
    credential_hash: String,
}

#[derive(Debug, Args)]
struct SubmitArgs {
    /// Username of the authenticated caller.
    #[arg(long, value_parser = parse_username)]
    caller: Username,
    /// Username of the player receiving the score.
    #[arg(long, value_parser = parse_username)]
    player: Username,
    #[arg(long, value_parser = parse_game_name)]
    game: GameName,
    #[arg(long)]
    points: u32,
}

fn parse_username(raw: &str) -> Result<Username, String> {
    Username::new(raw).map_err(|error| error.to_string())
}

fn parse_game_name(raw: &str) -> Result<GameName, String> {
    GameName::new(raw).map_err(|error| error.to_string())
}

type Ledger =
    ScoreLedgerService<DieselIdentityRepository, DieselCatalogRepository, DieselScoreLedgerRepository>;

struct Services {
    registration: RegistrationService<DieselSeedingRepository>,
    ledger: Ledger,
    directory: DirectoryService<DieselIdentityRepository, DieselCatalogRepository>,
}

impl Services {
    fn new(pool: DbPool) -> Self {
        let identity = Arc::new(DieselIdentityRepository::new(pool.clone()));
        let catalog = Arc::new(DieselCatalogRepository::new(pool.clone()));
        let ledger = Arc::new(DieselScoreLedgerRepository::new(pool.clone()));
        let seeding = Arc::new(DieselSeedingRepository::new(pool));
        Self {
            registration: RegistrationService::new(seeding),
            ledger: ScoreLedgerService::new(identity.clone(), catalog.clone(), ledger),
            directory: DirectoryService::new(identity, catalog),
        }
    }
}

fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .json()
        .try_init()
    {
        warn!(error = %error, "tracing init failed");
    }

    let cli = Cli::parse();
    let settings = load_settings()?;
    let database_url = resolve_database_url(cli.database_url.clone(), settings.url.clone())?;

    if matches!(cli.command, Command::Migrate) {
        let applied = run_migrations(&database_url).wrap_err("apply migrations")?;
        info!(count = applied.len(), "migrations applied");
        return print_json(&applied);
    }

    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(async_main(cli.command, settings, database_url))
}

fn load_settings() -> Result<StoreSettings> {
    StoreSettings::load_from_iter([OsString::from(BINARY_NAME)])
        .map_err(|error| eyre!("load store settings: {error}"))
}

async fn async_main(command: Command, settings: StoreSettings, database_url: String) -> Result<()> {
    let pool = DbPool::new(settings.pool_config(database_url))
        .await
        .wrap_err("create database pool")?;
    let services = Services::new(pool);

    match command {
        Command::Migrate => Err(eyre!("migrations run before the pool is created")),
        Command::RegisterPlayer(args) => {
            let seeded = services
                .registration
                .register_player(register_request(args))
                .await
                .wrap_err("register player")?;
            print_json(&seeded)
        }
        Command::RegisterAdmin(args) => {
            let seeded = services
                .registration
                .register_admin(register_request(args))
                .await
                .wrap_err("register admin")?;
            print_json(&seeded)
        }
        Command::CreateGame { name } => {
            let seeded = services
                .registration
                .create_game(CreateGameRequest { name: name.into() })
                .await
                .wrap_err("create game")?;
            print_json(&seeded)
        }
        Command::ListGames => {
            let games = services
                .directory
                .list_games()
                .await
                .wrap_err("list games")?;
            print_json(&games)
        }
        Command::SubmitScore(args) => submit_score(&services, args).await,
        Command::Leaderboard { game } => {
            let game = services
                .directory
                .get_game_by_name(&game)
                .await
                .wrap_err("resolve game")?;
            let scores = services
                .ledger
                .list_scores_by_game(game.id())
                .await
                .wrap_err("list leaderboard")?;
            print_json(&scores)
        }
        Command::UserScores { username } => {
            let user = services
                .directory
                .get_user_by_username(&username)
                .await
                .wrap_err("resolve user")?;
            let scores = services
                .ledger
                .list_scores_by_user(user.id())
                .await
                .wrap_err("list user scores")?;
            print_json(&scores)
        }
        Command::Stats { game } => {
            let game = services
                .directory
                .get_game_by_name(&game)
                .await
                .wrap_err("resolve game")?;
            let stats = services
                .ledger
                .game_statistics(game.id())
                .await
                .wrap_err("compute statistics")?;
            print_json(&stats)
        }
    }
}

async fn submit_score(services: &Services, args: SubmitArgs) -> Result<()> {
    let caller = services
        .directory
        .get_user_by_username(&args.caller)
        .await
        .wrap_err("resolve caller")?;
    let player = resolve_target(services, &args.player)
        .await
        .wrap_err("submit score")?;
    let game = services
        .directory
        .get_game_by_name(&args.game)
        .await
        .wrap_err("resolve game")?;

    let actor = Actor::new(caller.id().clone(), caller.role());
    let accepted = services
        .ledger
        .submit_score(
            &actor,
            SubmitScoreRequest {
                user_id: player.id().clone(),
                game_id: game.id(),
                points: Points::new(args.points),
            },
        )
        .await
        .wrap_err("submit score")?;
    print_json(&accepted)
}

/// Look up the score target by name.
///
/// An unknown name fails exactly like an admin target does inside the ledger.
async fn resolve_target(services: &Services, username: &Username) -> Result<User, Error> {
    services
        .directory
        .get_user_by_username(username)
        .await
        .map_err(target_lookup_error)
}

fn target_lookup_error(error: Error) -> Error {
    match error.code() {
        ErrorCode::UserNotFound => Error::user_not_found(PLAYER_NOT_FOUND),
        _ => error,
    }
}

fn register_request(args: RegisterArgs) -> RegisterUserRequest {
    RegisterUserRequest {
        username: args.username,
        credential_hash: args.credential_hash,
    }
}

fn print_json(value: &impl Serialize) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).wrap_err("render JSON output")?;
    println!("{rendered}");
    Ok(())
}

/// Pick the first non-blank URL from the flag, the settings, then `DATABASE_URL`.
fn resolve_database_url(explicit: Option<String>, configured: Option<String>) -> Result<String> {
    if let Some(value) = explicit {
        if value.trim().is_empty() {
            return Err(eyre!("--database-url must not be empty when provided"));
        }
        return Ok(value);
    }
    if let Some(value) = configured.filter(|value| !value.trim().is_empty()) {
        return Ok(value);
    }

    let from_env = env::var("DATABASE_URL").map_err(|_| {
        eyre!("database URL missing: set --database-url, SCOREBOARD_DB_URL, or DATABASE_URL")
    })?;
    if from_env.trim().is_empty() {
        return Err(eyre!("DATABASE_URL must not be empty"));
    }
    Ok(from_env)
}
