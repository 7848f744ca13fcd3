//! Trait seams for the remote backend.
//!
//! The orchestrator consumes the backend exclusively through these traits,
//! so the network layer can be swapped for mocks in tests and the remote
//! classifier can later be replaced without touching the lifecycle
//! controller.

use crate::error::Result;
use crate::routing::Endpoint;
use crate::session::Provenance;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The body of a successful chat exchange.
///
/// Ephemeral: interpreted once by the lifecycle controller and never
/// persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    /// Assistant response text.
    pub response: String,
    /// Filenames the backend generated during this exchange, possibly empty.
    #[serde(default)]
    pub generated_files: Vec<String>,
}

/// Backend health report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendHealth {
    pub status: String,
}

/// Remote message classification, used only when local keyword matching
/// is inconclusive.
#[async_trait]
pub trait RouteClassifier: Send + Sync {
    /// Asks the backend which capability endpoint should handle `message`.
    ///
    /// The message is passed raw (non-normalized). A single failure is
    /// final: the caller falls back to a fixed default, no retry.
    async fn classify(&self, message: &str) -> Result<Endpoint>;
}

/// The capability endpoints the orchestrator consumes.
///
/// All methods map one-to-one onto backend HTTP calls. `delete_file` and
/// `clear_history` exist for remote-side cleanup only; callers invoke them
/// as detached best-effort operations and never block local state on their
/// outcome.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Sends one chat message to the given capability endpoint.
    async fn chat(&self, endpoint: Endpoint, message: &str, session_id: &str)
    -> Result<ChatReply>;

    /// Uploads a file into the session's remote storage.
    async fn upload(&self, filename: &str, bytes: Vec<u8>, session_id: &str) -> Result<()>;

    /// Deletes a previously tracked file from remote storage.
    async fn delete_file(
        &self,
        filename: &str,
        session_id: &str,
        provenance: Provenance,
    ) -> Result<()>;

    /// Clears the server-side conversation history for a session.
    async fn clear_history(&self, session_id: &str) -> Result<()>;

    /// Probes backend liveness.
    async fn health(&self) -> Result<BackendHealth>;
}
