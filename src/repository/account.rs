use sqlx::SqlitePool;
use tracing::instrument;

use crate::models::Account;

#[derive(Debug, Clone)]
#[must_use]
pub struct AccountRepository {
    pub(super) connection: SqlitePool,
}

impl AccountRepository {
    #[instrument(skip(self, password), err(Debug))]
    pub async fn save(&self, username: &str, password: &str) -> Result<Account, sqlx::Error> {
        let query = sqlx::query_as::<_, Account>(
            r"
                INSERT INTO account (username, password) VALUES (?, ?)
                RETURNING id, username, password
            ",
        );
        query
            .bind(username)
            .bind(password)
            .fetch_one(&self.connection)
            .await
    }

    #[instrument(skip(self))]
    pub async fn find_by_username(&self, username: &str) -> Result<Option<Account>, sqlx::Error> {
        tracing::trace!("Searching for account in the repository");
        let query = sqlx::query_as::<_, Account>(
            "SELECT id, username, password FROM account WHERE username = ?",
        );
        query.bind(username).fetch_optional(&self.connection).await
    }

    #[instrument(skip(self))]
    pub async fn exists_by_id(&self, account_id: i64) -> Result<bool, sqlx::Error> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM account WHERE id = ?")
            .bind(account_id)
            .fetch_one(&self.connection)
            .await?;
        Ok(count > 0)
    }
}
