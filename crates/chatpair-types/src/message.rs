//! Chat message domain types.
//!
//! A conversation is a flat list of [`Message`]s authored by either the user
//! or the bot. A bot reply points back at the user message that triggered it
//! through `parent_message_id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use std::fmt;
use std::str::FromStr;

/// Store-assigned message identifier (auto-increment, never reused).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MessageId(pub i64);

impl MessageId {
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl From<i64> for MessageId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl fmt::Display for MessageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for MessageId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(MessageId)
            .map_err(|_| format!("invalid message id: '{s}'"))
    }
}

/// Author of a message.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (sender IN ('user', 'bot'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    #[default]
    User,
    Bot,
}

impl fmt::Display for Sender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sender::User => write!(f, "user"),
            Sender::Bot => write!(f, "bot"),
        }
    }
}

impl FromStr for Sender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Sender::User),
            "bot" => Ok(Sender::Bot),
            other => Err(format!("invalid sender: '{other}'")),
        }
    }
}

/// A single chat turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub content: String,
    pub sender: Sender,
    pub created_at: DateTime<Utc>,
    /// Refreshed on every content mutation.
    pub updated_at: DateTime<Utc>,
    /// For a bot reply, the user message that triggered it.
    pub parent_message_id: Option<MessageId>,
}

impl Message {
    pub fn is_from_user(&self) -> bool {
        self.sender == Sender::User
    }
}

/// A message that has not been persisted yet (no id).
#[derive(Debug, Clone, PartialEq)]
pub struct NewMessage {
    pub content: String,
    pub sender: Sender,
    pub created_at: DateTime<Utc>,
    pub parent_message_id: Option<MessageId>,
}

impl NewMessage {
    /// Build a message stamped with the current time.
    pub fn now(content: impl Into<String>, sender: Sender, parent: Option<MessageId>) -> Self {
        Self {
            content: content.into(),
            sender,
            created_at: Utc::now(),
            parent_message_id: parent,
        }
    }
}

/// Request body for `POST /api/messages`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMessageRequest {
    pub content: String,
    #[serde(default)]
    pub sender: Sender,
    #[serde(default)]
    pub parent_message_id: Option<MessageId>,
}

/// Request body for `PUT /api/messages/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateMessageRequest {
    pub content: String,
}

/// What a delete removed: the target first, then its reply if one existed.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DeleteOutcome {
    pub deleted: Vec<MessageId>,
}
