//! Directory service answering user and game lookups.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{CatalogRepository, DirectoryQuery, IdentityRepository};
use crate::domain::score_ledger_service::{map_catalog_error, map_identity_error};
use crate::domain::{Error, Game, GameId, GameName, User, UserId, Username};

/// Read-only service implementing [`DirectoryQuery`].
#[derive(Clone)]
pub struct DirectoryService<I, C> {
    identity_repo: Arc<I>,
    catalog_repo: Arc<C>,
}

impl<I, C> DirectoryService<I, C> {
    /// Create a new service with the given repositories.
    pub fn new(identity_repo: Arc<I>, catalog_repo: Arc<C>) -> Self {
        Self {
            identity_repo,
            catalog_repo,
        }
    }
}

#[async_trait]
impl<I, C> DirectoryQuery for DirectoryService<I, C>
where
    I: IdentityRepository,
    C: CatalogRepository,
{
    async fn get_user_by_id(&self, id: &UserId) -> Result<User, Error> {
        self.identity_repo
            .find_by_id(id)
            .await
            .map_err(map_identity_error)?
            .ok_or_else(|| Error::user_not_found("user not found"))
    }

    async fn get_user_by_username(&self, username: &Username) -> Result<User, Error> {
        self.identity_repo
            .find_by_username(username)
            .await
            .map_err(map_identity_error)?
            .ok_or_else(|| Error::user_not_found("user not found"))
    }

    async fn get_game_by_id(&self, id: GameId) -> Result<Game, Error> {
        self.catalog_repo
            .find_by_id(id)
            .await
            .map_err(map_catalog_error)?
            .ok_or_else(|| Error::game_not_found("game not found"))
    }

    async fn get_game_by_name(&self, name: &GameName) -> Result<Game, Error> {
        self.catalog_repo
            .find_by_name(name)
            .await
            .map_err(map_catalog_error)?
            .ok_or_else(|| Error::game_not_found("game not found"))
    }

    async fn list_games(&self) -> Result<Vec<Game>, Error> {
        self.catalog_repo.list().await.map_err(map_catalog_error)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use rstest::rstest;

    use super::*;
    use crate::domain::ports::{
        CatalogRepositoryError, IdentityRepositoryError, MockCatalogRepository,
        MockIdentityRepository,
    };
    use crate::domain::{CredentialHash, ErrorCode, Role};

    fn make_service(
        identity: MockIdentityRepository,
        catalog: MockCatalogRepository,
    ) -> DirectoryService<MockIdentityRepository, MockCatalogRepository> {
        DirectoryService::new(Arc::new(identity), Arc::new(catalog))
    }

    #[rstest]
    #[tokio::test]
    async fn get_user_by_username_returns_admins_too() {
        let root = User::new(
            UserId::random(),
            Username::new("root").expect("fixture username"),
            CredentialHash::new("hash").expect("fixture hash"),
            Role::Admin,
            DateTime::<Utc>::UNIX_EPOCH,
        );
        let expected = root.clone();
        let mut identity = MockIdentityRepository::new();
        identity
            .expect_find_by_username()
            .times(1)
            .return_once(move |_| Ok(Some(root)));

        let service = make_service(identity, MockCatalogRepository::new());
        let username = Username::new("root").expect("valid");
        let found = service
            .get_user_by_username(&username)
            .await
            .expect("user found");
        assert_eq!(found, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_user_is_not_found() {
        let mut identity = MockIdentityRepository::new();
        identity
            .expect_find_by_id()
            .times(1)
            .return_once(|_| Ok(None));

        let err = make_service(identity, MockCatalogRepository::new())
            .get_user_by_id(&UserId::random())
            .await
            .expect_err("not found");
        assert_eq!(err.code(), ErrorCode::UserNotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn missing_game_is_not_found() {
        let mut catalog = MockCatalogRepository::new();
        catalog
            .expect_find_by_name()
            .times(1)
            .return_once(|_| Ok(None));

        let name = GameName::new("go").expect("valid");
        let err = make_service(MockIdentityRepository::new(), catalog)
            .get_game_by_name(&name)
            .await
            .expect_err("not found");
        assert_eq!(err.code(), ErrorCode::GameNotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn list_games_passes_repository_order_through() {
        let games: Vec<Game> = ["chess", "go"]
            .into_iter()
            .map(|name| {
                Game::new(
                    GameId::random(),
                    GameName::new(name).expect("valid"),
                    DateTime::<Utc>::UNIX_EPOCH,
                )
            })
            .collect();
        let expected = games.clone();
        let mut catalog = MockCatalogRepository::new();
        catalog.expect_list().times(1).return_once(move || Ok(games));

        let listed = make_service(MockIdentityRepository::new(), catalog)
            .list_games()
            .await
            .expect("games listed");
        assert_eq!(listed, expected);
    }

    #[rstest]
    #[case(IdentityRepositoryError::connection("refused"), ErrorCode::StoreUnavailable)]
    #[case(IdentityRepositoryError::query("bad column"), ErrorCode::InternalError)]
    #[tokio::test]
    async fn identity_failures_are_mapped(
        #[case] failure: IdentityRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        let mut identity = MockIdentityRepository::new();
        identity
            .expect_find_by_id()
            .times(1)
            .return_once(move |_| Err(failure));

        let err = make_service(identity, MockCatalogRepository::new())
            .get_user_by_id(&UserId::random())
            .await
            .expect_err("failure");
        assert_eq!(err.code(), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn catalog_connection_failure_is_retryable() {
        let mut catalog = MockCatalogRepository::new();
        catalog
            .expect_list()
            .times(1)
            .return_once(|| Err(CatalogRepositoryError::connection("pool timed out")));

        let err = make_service(MockIdentityRepository::new(), catalog)
            .list_games()
            .await
            .expect_err("failure");
        assert!(err.is_retryable());
    }
}
