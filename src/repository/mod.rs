use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::migrate::MigrateError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::instrument;

/// SQLite extended result code for `SQLITE_CONSTRAINT_UNIQUE`.
pub const CODE_NON_UNIQUE: &str = "2067";

pub mod account;
pub mod message;

#[derive(Debug, Clone)]
#[must_use]
pub struct Repository {
    pub accounts: account::AccountRepository,
    pub messages: message::MessageRepository,
}

impl Repository {
    pub fn new(connection: SqlitePool) -> Self {
        let accounts = account::AccountRepository {
            connection: connection.clone(),
        };
        let messages = message::MessageRepository { connection };
        Self { accounts, messages }
    }

    /// Opens a pool on `database_url`, creating the database if it is missing,
    /// and brings the schema up to date.
    #[instrument(err(Debug))]
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, ConnectError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let mut pool_options = SqlitePoolOptions::new().max_connections(max_connections);
        if is_in_memory(database_url) {
            // The in-memory database lives only as long as one of its connections.
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }
        let pool = pool_options.connect_with(options).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations complete");

        Ok(Self::new(pool))
    }
}

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

pub(crate) fn is_unique_violation(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(error) => error.code().is_some_and(|code| CODE_NON_UNIQUE == code),
        _ => false,
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConnectError {
    #[error("Failed to open the database")]
    Database(#[from] sqlx::Error),

    #[error("Failed to apply database migrations")]
    Migration(#[from] MigrateError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognises_in_memory_urls() {
        assert!(is_in_memory("sqlite::memory:"));
        assert!(is_in_memory("sqlite://social?mode=memory&cache=shared"));
        assert!(!is_in_memory("sqlite://social_media.db"));
    }

    #[tokio::test]
    async fn in_memory_pool_keeps_a_connection_alive() {
        let repository = Repository::connect("sqlite::memory:", 1).await.unwrap();
        let options = repository.accounts.connection.options();
        assert_eq!(options.get_min_connections(), 1);
        assert_eq!(options.get_idle_timeout(), None);
        assert_eq!(options.get_max_lifetime(), None);
    }

    #[tokio::test]
    async fn duplicate_username_insert_is_a_unique_violation() {
        let repository = Repository::connect("sqlite::memory:", 1).await.unwrap();
        repository.accounts.save("dup", "password").await.unwrap();

        let error = repository.accounts.save("dup", "other").await.unwrap_err();
        assert!(is_unique_violation(&error));

        let unrelated = sqlx::Error::RowNotFound;
        assert!(!is_unique_violation(&unrelated));
    }
}
