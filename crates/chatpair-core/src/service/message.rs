//! Message lifecycle service.
//!
//! Owns every rule about the conversation: a user message always gets a bot
//! reply, only user messages may be edited or deleted, and editing or
//! deleting a user message carries its reply along. Each operation runs in
//! one store transaction that is committed only after every step succeeded.

use chatpair_types::error::MessageError;
use chatpair_types::message::{DeleteOutcome, Message, MessageId, NewMessage, Sender};
use chrono::Utc;
use tracing::{debug, info, warn};

use crate::repository::message::{MessageStore, MessageTransaction};
use crate::response::ResponseGenerator;

/// Orchestrates paired user/bot message creation, edits, and deletes.
///
/// Generic over the store and the reply strategy to maintain clean
/// architecture -- chatpair-core never depends on chatpair-infra.
pub struct MessageService<S: MessageStore, G: ResponseGenerator> {
    store: S,
    generator: G,
}

impl<S: MessageStore, G: ResponseGenerator> MessageService<S, G> {
    pub fn new(store: S, generator: G) -> Self {
        Self { store, generator }
    }

    /// Access the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// All messages, oldest first.
    pub async fn list(&self) -> Result<Vec<Message>, MessageError> {
        Ok(self.store.list_messages().await?)
    }

    /// Create a message. A user message also gets a bot reply whose
    /// `parent_message_id` is the new message's id.
    ///
    /// Returns the created message, never the reply.
    pub async fn create(
        &self,
        content: &str,
        sender: Sender,
        parent_message_id: Option<MessageId>,
    ) -> Result<Message, MessageError> {
        validate_content(content)?;

        let mut tx = self.store.begin().await?;

        let message = tx
            .insert(&NewMessage::now(content, sender, parent_message_id))
            .await?;

        if message.is_from_user() {
            let reply = self.generator.generate(&message.content);
            let reply = tx
                .insert(&NewMessage::now(reply, Sender::Bot, Some(message.id)))
                .await?;
            debug!(message_id = %message.id, reply_id = %reply.id, "Bot reply created");
        }

        tx.commit().await?;
        info!(message_id = %message.id, sender = %message.sender, "Message created");
        Ok(message)
    }

    /// Replace the content of a user message and regenerate its reply.
    ///
    /// A user message without a reply is updated on its own.
    pub async fn update(&self, id: MessageId, content: &str) -> Result<Message, MessageError> {
        let mut tx = self.store.begin().await?;

        let target = tx.get(id).await?.ok_or(MessageError::NotFound)?;
        if !target.is_from_user() {
            return Err(MessageError::Forbidden(
                "Can only edit user messages".to_string(),
            ));
        }
        validate_content(content)?;

        let now = Utc::now();
        let updated = tx.update_content(id, content, now).await?;

        match tx.find_reply(id).await? {
            Some(reply) => {
                let text = self.generator.generate(content);
                tx.update_content(reply.id, &text, now).await?;
                debug!(message_id = %id, reply_id = %reply.id, "Bot reply regenerated");
            }
            None => {
                warn!(message_id = %id, "User message has no bot reply to regenerate");
            }
        }

        tx.commit().await?;
        info!(message_id = %id, "Message updated");
        Ok(updated)
    }

    /// Delete a user message together with its reply, if one exists.
    pub async fn delete(&self, id: MessageId) -> Result<DeleteOutcome, MessageError> {
        let mut tx = self.store.begin().await?;

        let target = tx.get(id).await?.ok_or(MessageError::NotFound)?;
        if !target.is_from_user() {
            return Err(MessageError::Forbidden(
                "Can only delete user messages".to_string(),
            ));
        }

        let mut outcome = DeleteOutcome::default();

        let reply = tx.find_reply(id).await?;
        if tx.delete(id).await? {
            outcome.deleted.push(id);
        }
        if let Some(reply) = reply {
            if tx.delete(reply.id).await? {
                outcome.deleted.push(reply.id);
            }
        }

        tx.commit().await?;
        info!(message_id = %id, removed = outcome.deleted.len(), "Message deleted");
        Ok(outcome)
    }

    /// Regenerate a message's content from the message it replies to.
    ///
    /// The sender of the target is not checked; any message with an existing
    /// parent can be regenerated.
    pub async fn regenerate(&self, id: MessageId) -> Result<Message, MessageError> {
        let mut tx = self.store.begin().await?;

        let target = tx.get(id).await?.ok_or(MessageError::NotFound)?;
        let parent_id = target
            .parent_message_id
            .ok_or(MessageError::ParentNotFound)?;
        let parent = tx
            .get(parent_id)
            .await?
            .ok_or(MessageError::ParentNotFound)?;

        let text = self.generator.generate(&parent.content);
        let updated = tx.update_content(id, &text, Utc::now()).await?;

        tx.commit().await?;
        info!(message_id = %id, parent_id = %parent_id, "Message regenerated");
        Ok(updated)
    }

    /// Insert `greeting` as a bot message if the conversation is empty.
    ///
    /// Returns `true` if the greeting was inserted.
    pub async fn seed_greeting(&self, greeting: &str) -> Result<bool, MessageError> {
        if greeting.trim().is_empty() {
            return Ok(false);
        }

        let mut tx = self.store.begin().await?;
        if tx.count().await? > 0 {
            return Ok(false);
        }

        let message = tx
            .insert(&NewMessage::now(greeting, Sender::Bot, None))
            .await?;
        tx.commit().await?;

        info!(message_id = %message.id, "Conversation seeded with greeting");
        Ok(true)
    }
}

fn validate_content(content: &str) -> Result<(), MessageError> {
    if content.trim().is_empty() {
        return Err(MessageError::InvalidContent(
            "content cannot be empty".to_string(),
        ));
    }
    Ok(())
}
