use sqlx::SqlitePool;
use tracing::instrument;

use crate::models::Message;

#[derive(Debug, Clone)]
#[must_use]
pub struct MessageRepository {
    pub(super) connection: SqlitePool,
}

impl MessageRepository {
    #[instrument(skip(self, message_text), err(Debug))]
    pub async fn save(
        &self,
        posted_by: i64,
        message_text: &str,
        posted_at: i64,
    ) -> Result<Message, sqlx::Error> {
        let query = sqlx::query_as::<_, Message>(
            r"
                INSERT INTO message (posted_by, message_text, posted_at)
                VALUES (?, ?, ?)
                RETURNING id, posted_by, message_text, posted_at
            ",
        );
        query
            .bind(posted_by)
            .bind(message_text)
            .bind(posted_at)
            .fetch_one(&self.connection)
            .await
    }

    #[instrument(skip(self), err(Debug))]
    pub async fn find_all(&self) -> Result<Vec<Message>, sqlx::Error> {
        sqlx::query_as::<_, Message>(
            "SELECT id, posted_by, message_text, posted_at FROM message ORDER BY id",
        )
        .fetch_all(&self.connection)
        .await
    }

    #[instrument(skip(self), err(Debug))]
    pub async fn find_by_id(&self, message_id: i64) -> Result<Option<Message>, sqlx::Error> {
        sqlx::query_as::<_, Message>(
            "SELECT id, posted_by, message_text, posted_at FROM message WHERE id = ?",
        )
        .bind(message_id)
        .fetch_optional(&self.connection)
        .await
    }

    #[instrument(skip(self), err(Debug))]
    pub async fn find_by_posted_by(&self, account_id: i64) -> Result<Vec<Message>, sqlx::Error> {
        sqlx::query_as::<_, Message>(
            r"
                SELECT id, posted_by, message_text, posted_at FROM message
                WHERE posted_by = ? ORDER BY id
            ",
        )
        .bind(account_id)
        .fetch_all(&self.connection)
        .await
    }

    /// Overwrites the text of an existing message, returning `None` when no
    /// message has `message_id`.
    #[instrument(skip(self, message_text), err(Debug))]
    pub async fn update_text(
        &self,
        message_id: i64,
        message_text: &str,
    ) -> Result<Option<Message>, sqlx::Error> {
        let query = sqlx::query_as::<_, Message>(
            r"
                UPDATE message SET message_text = ?
                WHERE id = ?
                RETURNING id, posted_by, message_text, posted_at
            ",
        );
        query
            .bind(message_text)
            .bind(message_id)
            .fetch_optional(&self.connection)
            .await
    }

    #[instrument(skip(self), err(Debug))]
    pub async fn delete_by_id(&self, message_id: i64) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM message WHERE id = ?")
            .bind(message_id)
            .execute(&self.connection)
            .await?;
        Ok(result.rows_affected())
    }
}
