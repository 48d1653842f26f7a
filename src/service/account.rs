use tracing::instrument;
use validator::Validate;

use crate::models::{self, Account, AccountPayload};
use crate::repository::account::AccountRepository;
use crate::repository::is_unique_violation;

#[derive(Debug, Clone)]
#[must_use]
pub struct AccountService {
    accounts: AccountRepository,
}

impl AccountService {
    pub const fn new(accounts: AccountRepository) -> Self {
        Self { accounts }
    }

    /// Stores a new account once the username is non-blank and unused and the
    /// password has at least four characters.
    #[instrument(skip_all, fields(username = ?candidate.username))]
    pub async fn register(&self, candidate: &AccountPayload) -> Result<Account, RegistrationError> {
        if models::is_blank(candidate.username.as_deref()) {
            tracing::debug!("Rejecting registration: blank username");
            return Err(RegistrationError::BlankUsername);
        }
        candidate
            .validate()
            .inspect_err(|error| tracing::debug!(%error, "Rejecting registration"))?;

        let (Some(username), Some(password)) = (&candidate.username, &candidate.password) else {
            return Err(RegistrationError::BlankUsername);
        };

        if self.accounts.find_by_username(username).await?.is_some() {
            tracing::debug!("Rejecting registration: username is taken");
            return Err(RegistrationError::NameTaken);
        }

        self.accounts
            .save(username, password)
            .await
            .inspect(|account| tracing::debug!(account.id, "Successfully registered new account"))
            .map_err(|error| {
                if is_unique_violation(&error) {
                    tracing::debug!("Rejecting registration: username was taken concurrently");
                    RegistrationError::NameTaken
                } else {
                    tracing::error!(?error, "Database error during registration");
                    RegistrationError::Database(error)
                }
            })
    }

    /// Looks up the stored account for `credentials.username`.
    ///
    /// The password is not checked here; callers compare it against the
    /// returned record.
    #[instrument(skip_all, fields(username = ?credentials.username))]
    pub async fn login(
        &self,
        credentials: &AccountPayload,
    ) -> Result<Option<Account>, sqlx::Error> {
        match &credentials.username {
            Some(username) => self.accounts.find_by_username(username).await,
            None => Ok(None),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RegistrationError {
    #[error("Username must not be blank")]
    BlankUsername,

    #[error("Invalid account details: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    #[error("An account with this username already exists")]
    NameTaken,

    #[error("Internal database error")]
    Database(#[from] sqlx::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::Repository;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn service() -> AccountService {
        let repository = Repository::connect("sqlite::memory:", 1).await.unwrap();
        AccountService::new(repository.accounts)
    }

    fn credentials(username: &str, password: &str) -> AccountPayload {
        AccountPayload {
            username: Some(username.to_owned()),
            password: Some(password.to_owned()),
        }
    }

    #[tokio::test]
    async fn register_assigns_an_id() {
        let service = service().await;
        let account = service.register(&credentials("user1", "password")).await.unwrap();
        assert_eq!(account.username, "user1");
        assert_eq!(account.password, "password");
        assert!(account.id > 0);
    }

    #[tokio::test]
    async fn register_rejects_blank_username() {
        let service = service().await;
        let result = service.register(&credentials("   ", "password")).await;
        assert!(matches!(result, Err(RegistrationError::BlankUsername)));

        let missing = AccountPayload {
            username: None,
            password: Some("password".to_owned()),
        };
        let result = service.register(&missing).await;
        assert!(matches!(result, Err(RegistrationError::BlankUsername)));
    }

    #[tokio::test]
    async fn register_rejects_short_or_missing_password() {
        let service = service().await;
        let result = service.register(&credentials("user1", "abc")).await;
        assert!(matches!(result, Err(RegistrationError::Invalid(_))));

        let missing = AccountPayload {
            username: Some("user1".to_owned()),
            password: None,
        };
        let result = service.register(&missing).await;
        assert!(matches!(result, Err(RegistrationError::Invalid(_))));

        let account = service.register(&credentials("user1", "abcd")).await;
        assert!(account.is_ok());
    }

    #[tokio::test]
    async fn register_rejects_duplicate_username() {
        let service = service().await;
        service.register(&credentials("user1", "password")).await.unwrap();
        let result = service.register(&credentials("user1", "another")).await;
        assert!(matches!(result, Err(RegistrationError::NameTaken)));
    }

    #[tokio::test]
    async fn register_maps_insert_collision_to_name_taken() {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        sqlx::migrate!("./migrations").run(&pool).await.unwrap();
        // The lookup compares case-sensitively, so only the insert sees the clash.
        let collation_index =
            "CREATE UNIQUE INDEX idx_account_username_nocase ON account(username COLLATE NOCASE)";
        sqlx::query(collation_index)
            .execute(&pool)
            .await
            .unwrap();
        let service = AccountService::new(Repository::new(pool).accounts);

        service.register(&credentials("Dup", "password")).await.unwrap();
        let result = service.register(&credentials("dup", "password")).await;
        assert!(matches!(result, Err(RegistrationError::NameTaken)));
    }

    #[tokio::test]
    async fn login_returns_stored_account_regardless_of_password() {
        let service = service().await;
        let registered = service.register(&credentials("user1", "password")).await.unwrap();

        let found = service.login(&credentials("user1", "wrong")).await.unwrap();
        assert_eq!(found, Some(registered));

        let missing = service.login(&credentials("nobody", "password")).await.unwrap();
        assert_eq!(missing, None);
    }
}
