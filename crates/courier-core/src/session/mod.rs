//! Session domain: context, attachments, timeline messages, and the
//! events published to the presentation layer.

pub mod attachment;
pub mod event;
pub mod message;
pub mod model;

pub use attachment::{AttachmentStore, FileRecord, Provenance};
pub use event::ChatEvent;
pub use message::{ChatMessage, MessageRole};
pub use model::{MAX_UPLOAD_BYTES, SessionContext};
