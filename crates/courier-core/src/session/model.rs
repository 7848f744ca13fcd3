//! Session domain model.
//!
//! This module contains the `SessionContext` entity that scopes a single
//! conversation: a stable client-generated identifier, the in-flight
//! request flag, and the attachments accumulated over the session.

use super::attachment::AttachmentStore;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upload size ceiling. Files larger than this are rejected locally,
/// before any network call.
pub const MAX_UPLOAD_BYTES: u64 = 25 * 1024 * 1024;

/// State owned by a single conversation.
///
/// The session identifier is generated once at creation and stays stable
/// for the conversation's duration; it is the correlation key on every
/// network call and the reset key when the session ends. `pending` is the
/// single-request-in-flight guard: while true, further sends are dropped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionContext {
    /// Unique session identifier (UUID format)
    pub session_id: String,
    /// True while exactly one request is in flight.
    pub pending: bool,
    /// Attachments scoped to this session, cleared when it ends.
    pub attachments: AttachmentStore,
}

impl SessionContext {
    /// Creates a fresh session with a newly generated identifier.
    pub fn new() -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            pending: false,
            attachments: AttachmentStore::new(),
        }
    }
}

impl Default for SessionContext {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sessions_get_unique_ids() {
        let a = SessionContext::new();
        let b = SessionContext::new();
        assert_ne!(a.session_id, b.session_id);
        assert!(!a.pending);
        assert!(a.attachments.is_empty());
    }
}
