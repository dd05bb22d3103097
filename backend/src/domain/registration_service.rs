//! Registration service: validated entity creation with score fan-out.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::ports::{
    CreateGameRequest, RegisterUserRequest, RegistrationCommand, Seeded, SeedingRepository,
    SeedingRepositoryError,
};
use crate::domain::{CredentialHash, Error, Game, GameName, NewUser, Role, User, Username};

/// Service implementing [`RegistrationCommand`] over a seeding repository.
#[derive(Clone)]
pub struct RegistrationService<S> {
    seeding_repo: Arc<S>,
}

impl<S> RegistrationService<S> {
    /// Create a new service with the given repository.
    pub fn new(seeding_repo: Arc<S>) -> Self {
        Self { seeding_repo }
    }
}

impl<S> RegistrationService<S>
where
    S: SeedingRepository,
{
    fn map_seeding_error(error: SeedingRepositoryError) -> Error {
        match error {
            SeedingRepositoryError::Connection { message } => {
                Error::store_unavailable(format!("seeding repository unavailable: {message}"))
            }
            SeedingRepositoryError::Query { message } => {
                Error::internal(format!("seeding repository error: {message}"))
            }
            SeedingRepositoryError::DuplicateUsername { username } => {
                warn!(%username, "registration rejected: username taken");
                Error::duplicate_username(format!("username already taken: {username}"))
            }
            SeedingRepositoryError::DuplicateGameName { name } => {
                warn!(game_name = %name, "game creation rejected: name taken");
                Error::duplicate_game_name(format!("game name already taken: {name}"))
            }
        }
    }

    fn parse_user(request: RegisterUserRequest, role: Role) -> Result<NewUser, Error> {
        let username =
            Username::new(request.username).map_err(|err| Error::invalid_input(err.to_string()))?;
        let credential_hash = CredentialHash::new(request.credential_hash)
            .map_err(|err| Error::invalid_input(err.to_string()))?;
        Ok(NewUser::new(username, credential_hash, role))
    }

    async fn register(
        &self,
        request: RegisterUserRequest,
        role: Role,
    ) -> Result<Seeded<User>, Error> {
        let new_user = Self::parse_user(request, role)?;
        let seeded = self
            .seeding_repo
            .create_user_with_seeding(new_user)
            .await
            .map_err(Self::map_seeding_error)?;
        info!(
            user_id = %seeded.entity.id(),
            role = %seeded.entity.role(),
            seeded_scores = seeded.seeded_scores,
            "user registered"
        );
        Ok(seeded)
    }
}

#[async_trait]
impl<S> RegistrationCommand for RegistrationService<S>
where
    S: SeedingRepository,
{
    async fn register_player(&self, request: RegisterUserRequest) -> Result<Seeded<User>, Error> {
        self.register(request, Role::Player).await
    }

    async fn register_admin(&self, request: RegisterUserRequest) -> Result<Seeded<User>, Error> {
        self.register(request, Role::Admin).await
    }

    async fn create_game(&self, request: CreateGameRequest) -> Result<Seeded<Game>, Error> {
        let name =
            GameName::new(request.name).map_err(|err| Error::invalid_input(err.to_string()))?;
        let seeded = self
            .seeding_repo
            .create_game_with_seeding(name)
            .await
            .map_err(Self::map_seeding_error)?;
        info!(
            game_id = %seeded.entity.id(),
            seeded_scores = seeded.seeded_scores,
            "game created"
        );
        Ok(seeded)
    }
}

#[cfg(test)]
mod tests {
    //! Unit coverage for registration with a mocked seeding repository.
    use chrono::{DateTime, Utc};
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::MockSeedingRepository;
    use crate::domain::{ErrorCode, GameId};

    fn make_service(repo: MockSeedingRepository) -> RegistrationService<MockSeedingRepository> {
        RegistrationService::new(Arc::new(repo))
    }

    fn request(username: &str) -> RegisterUserRequest {
        RegisterUserRequest {
            username: username.to_owned(),
            credential_hash: "$argon2id$stub".to_owned(),
        }
    }

    fn echo_user(new_user: NewUser, seeded_scores: usize) -> Seeded<User> {
        Seeded {
            entity: User::new(
                new_user.id,
                new_user.username,
                new_user.credential_hash,
                new_user.role,
                DateTime::<Utc>::UNIX_EPOCH,
            ),
            seeded_scores,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn register_player_passes_player_role_to_seeder() {
        let mut repo = MockSeedingRepository::new();
        repo.expect_create_user_with_seeding()
            .withf(|user| user.role == Role::Player && user.username.as_ref() == "ana")
            .times(1)
            .return_once(|user| Ok(echo_user(user, 3)));

        let seeded = make_service(repo)
            .register_player(request("ana"))
            .await
            .expect("registration succeeds");
        assert!(seeded.entity.is_player());
        assert_eq!(seeded.seeded_scores, 3);
    }

    #[rstest]
    #[tokio::test]
    async fn register_admin_passes_admin_role_to_seeder() {
        let mut repo = MockSeedingRepository::new();
        repo.expect_create_user_with_seeding()
            .withf(|user| user.role == Role::Admin)
            .times(1)
            .return_once(|user| Ok(echo_user(user, 0)));

        let seeded = make_service(repo)
            .register_admin(request("root"))
            .await
            .expect("registration succeeds");
        assert_eq!(seeded.entity.role(), Role::Admin);
    }

    #[rstest]
    #[case("ab", "hash")]
    #[case("bad name", "hash")]
    #[case("ana", "   ")]
    #[tokio::test]
    async fn malformed_registration_never_reaches_the_store(
        #[case] username: &str,
        #[case] credential_hash: &str,
    ) {
        let mut repo = MockSeedingRepository::new();
        repo.expect_create_user_with_seeding().never();

        let err = make_service(repo)
            .register_player(RegisterUserRequest {
                username: username.to_owned(),
                credential_hash: credential_hash.to_owned(),
            })
            .await
            .expect_err("invalid input");
        assert_eq!(err.code(), ErrorCode::InvalidInput);
    }

    #[rstest]
    #[case(
        SeedingRepositoryError::duplicate_username("ana"),
        ErrorCode::DuplicateUsername
    )]
    #[case(
        SeedingRepositoryError::connection("statement timeout"),
        ErrorCode::StoreUnavailable
    )]
    #[case(SeedingRepositoryError::query("syntax error"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn seeding_errors_map_to_domain_codes(
        #[case] failure: SeedingRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let mut repo = MockSeedingRepository::new();
        repo.expect_create_user_with_seeding()
            .times(1)
            .return_once(move |_| Err(failure));

        let err = make_service(repo)
            .register_player(request("ana"))
            .await
            .expect_err("seeding fails");
        assert_eq!(err.code(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn create_game_seeds_through_repository() {
        let mut repo = MockSeedingRepository::new();
        repo.expect_create_game_with_seeding()
            .withf(|name| name.as_ref() == "chess")
            .times(1)
            .return_once(|name| {
                Ok(Seeded {
                    entity: Game::new(GameId::random(), name, DateTime::<Utc>::UNIX_EPOCH),
                    seeded_scores: 2,
                })
            });

        let seeded = make_service(repo)
            .create_game(CreateGameRequest {
                name: "chess".to_owned(),
            })
            .await
            .expect("game created");
        assert_eq!(seeded.entity.name().as_ref(), "chess");
        assert_eq!(seeded.seeded_scores, 2);
    }

    #[rstest]
    #[tokio::test]
    async fn duplicate_game_name_is_reported() {
        let mut repo = MockSeedingRepository::new();
        repo.expect_create_game_with_seeding()
            .times(1)
            .return_once(|_| Err(SeedingRepositoryError::duplicate_game_name("chess")));

        let err = make_service(repo)
            .create_game(CreateGameRequest {
                name: "chess".to_owned(),
            })
            .await
            .expect_err("duplicate");
        assert_eq!(err.code(), ErrorCode::DuplicateGameName);
    }

    #[rstest]
    #[tokio::test]
    async fn blank_game_name_is_invalid_input() {
        let mut repo = MockSeedingRepository::new();
        repo.expect_create_game_with_seeding().never();

        let err = make_service(repo)
            .create_game(CreateGameRequest {
                name: "  ".to_owned(),
            })
            .await
            .expect_err("invalid");
        assert_eq!(err.code(), ErrorCode::InvalidInput);
    }
}
