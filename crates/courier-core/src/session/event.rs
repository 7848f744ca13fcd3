use serde::{Deserialize, Serialize};

use super::message::ChatMessage;

/// High-level events published to the presentation layer.
///
/// The pending indicator is modeled as explicit state transitions rather
/// than an ephemeral placeholder element: subscribers show a "typing"
/// affordance between `PendingStarted` and `PendingFinished`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    /// A request entered flight; show the awaiting-response indicator.
    PendingStarted,
    /// The in-flight request resolved (success or failure); hide the indicator.
    PendingFinished,
    /// A message was appended to the timeline.
    MessageAppended { message: ChatMessage },
    /// The session was reset; the timeline and attachments are gone.
    SessionReset { session_id: String },
    /// The attachment store changed; `count` is the new total.
    AttachmentsChanged { count: usize },
}
