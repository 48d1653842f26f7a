use chrono::Utc;
use tracing::instrument;
use validator::Validate;

use crate::models::{self, Message, MessagePayload};
use crate::repository::account::AccountRepository;
use crate::repository::message::MessageRepository;

#[derive(Debug, Clone)]
#[must_use]
pub struct MessageService {
    messages: MessageRepository,
    accounts: AccountRepository,
}

impl MessageService {
    pub const fn new(messages: MessageRepository, accounts: AccountRepository) -> Self {
        Self { messages, accounts }
    }

    #[instrument(skip_all, fields(posted_by = ?draft.posted_by))]
    pub async fn create_message(&self, draft: &MessagePayload) -> Result<Message, MessageError> {
        let message_text = checked_text(draft)?;
        let posted_by = draft.posted_by.ok_or(MessageError::UnknownAuthor)?;
        if !self.accounts.exists_by_id(posted_by).await? {
            tracing::debug!("Rejecting message: author does not exist");
            return Err(MessageError::UnknownAuthor);
        }

        let posted_at = draft.posted_at.unwrap_or_else(|| Utc::now().timestamp());
        let message = self
            .messages
            .save(posted_by, message_text, posted_at)
            .await?;
        tracing::debug!(message.id, "Stored new message");
        Ok(message)
    }

    pub async fn all_messages(&self) -> Result<Vec<Message>, sqlx::Error> {
        self.messages.find_all().await
    }

    pub async fn message_by_id(&self, message_id: i64) -> Result<Option<Message>, sqlx::Error> {
        self.messages.find_by_id(message_id).await
    }

    /// Removes the message if present. Returns how many rows were deleted.
    #[instrument(skip(self))]
    pub async fn delete_message(&self, message_id: i64) -> Result<u64, sqlx::Error> {
        let deleted = self.messages.delete_by_id(message_id).await?;
        tracing::debug!(deleted, "Deleted message");
        Ok(deleted)
    }

    /// Replaces the text of an existing message. Nothing else on the record
    /// changes.
    #[instrument(skip(self, patch))]
    pub async fn update_message(
        &self,
        message_id: i64,
        patch: &MessagePayload,
    ) -> Result<Message, MessageError> {
        let message_text = checked_text(patch)?;
        self.messages
            .update_text(message_id, message_text)
            .await?
            .ok_or(MessageError::NotFound(message_id))
    }

    pub async fn messages_by_account(&self, account_id: i64) -> Result<Vec<Message>, sqlx::Error> {
        self.messages.find_by_posted_by(account_id).await
    }
}

fn checked_text(payload: &MessagePayload) -> Result<&str, MessageError> {
    if models::is_blank(payload.message_text.as_deref()) {
        tracing::debug!("Rejecting message: blank text");
        return Err(MessageError::BlankText);
    }
    payload
        .validate()
        .inspect_err(|error| tracing::debug!(%error, "Rejecting message"))?;
    payload.message_text.as_deref().ok_or(MessageError::BlankText)
}

#[derive(Debug, thiserror::Error)]
pub enum MessageError {
    #[error("Message text must not be blank")]
    BlankText,

    #[error("Invalid message: {0}")]
    Invalid(#[from] validator::ValidationErrors),

    #[error("Message author does not exist")]
    UnknownAuthor,

    #[error("No message with id {0}")]
    NotFound(i64),

    #[error("Internal database error")]
    Database(#[from] sqlx::Error),
}
