//! Conversation message types.
//!
//! This module contains types for representing messages in the timeline,
//! including roles and presentational metadata.

use serde::{Deserialize, Serialize};

/// Represents the role of a message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageRole {
    /// Message from the user.
    User,
    /// Message from the assistant backend.
    Assistant,
}

/// A single message in the conversation timeline.
///
/// `has_attachments` is a snapshot of the attachment store taken at the
/// moment of send; later attachment mutations never retroactively change
/// a historical message's badge. `email_mode` is presentational metadata
/// only (drives a badge) and carries no other behavior.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// The role of the message sender.
    pub role: MessageRole,
    /// The content of the message.
    pub content: String,
    /// Timestamp when the message was created (ISO 8601 format).
    pub timestamp: String,
    /// True if the exchange looked like an email action (badge only).
    #[serde(default)]
    pub email_mode: bool,
    /// True if attachments were present when this message was sent.
    #[serde(default)]
    pub has_attachments: bool,
}

impl ChatMessage {
    /// Creates a user message, snapshotting attachment presence.
    pub fn user(content: impl Into<String>, has_attachments: bool) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            email_mode: false,
            has_attachments,
        }
    }

    /// Creates an assistant message with the email-mode display flag.
    pub fn assistant(content: impl Into<String>, email_mode: bool) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            email_mode,
            has_attachments: false,
        }
    }
}
