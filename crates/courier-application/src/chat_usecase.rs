//! Chat use case implementation.
//!
//! `ChatUseCase` orchestrates one conversation end to end: it guards the
//! single-request-in-flight rule, resolves intent through the router,
//! performs the network exchange, interprets the reply, and applies the
//! resulting state changes to the session. The presentation layer observes
//! everything through `ChatEvent`s and read accessors; it never reaches
//! into the session directly.

use courier_core::backend::{ChatBackend, ChatReply, RouteClassifier};
use courier_core::error::{CourierError, Result};
use courier_core::routing::{
    Endpoint, IntentRouter, RouteOrigin, is_confirmed_email_action, is_email_mode,
};
use courier_core::session::{
    ChatEvent, ChatMessage, FileRecord, MAX_UPLOAD_BYTES, Provenance, SessionContext,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::sync::mpsc::UnboundedSender;

/// Fixed user-visible message appended when a required call fails.
pub const SEND_FAILURE_MESSAGE: &str = "Sorry, I encountered an error connecting to the server.";

/// Use case for driving a single conversation session.
///
/// # Concurrency
///
/// One logical thread of control per session: state lives behind
/// `RwLock`s and is only mutated through this type's methods. The
/// `pending` flag on the session is a cheap mutual-exclusion primitive,
/// not a queue - a send attempted while another is in flight is dropped,
/// never deferred.
pub struct ChatUseCase {
    /// Backend capability endpoints.
    backend: Arc<dyn ChatBackend>,
    /// Intent routing (local phrase phase + remote fallback).
    router: IntentRouter,
    /// The session this use case drives.
    session: RwLock<SessionContext>,
    /// Conversation timeline, in arrival order.
    timeline: RwLock<Vec<ChatMessage>>,
    /// Optional sink for presentation-layer events.
    events: Option<UnboundedSender<ChatEvent>>,
}

impl ChatUseCase {
    /// Creates a use case over a fresh session.
    ///
    /// `backend` and `classifier` are usually the same object; they are
    /// separate parameters so the classifier can be replaced without
    /// touching the chat transport.
    pub fn new(backend: Arc<dyn ChatBackend>, classifier: Arc<dyn RouteClassifier>) -> Self {
        Self {
            backend,
            router: IntentRouter::new(classifier),
            session: RwLock::new(SessionContext::new()),
            timeline: RwLock::new(Vec::new()),
            events: None,
        }
    }

    /// Attaches an event sink for the presentation layer.
    pub fn with_events(mut self, events: UnboundedSender<ChatEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// Sends one user message through the full request lifecycle.
    ///
    /// Silent no-op when the trimmed text is empty or another request is
    /// already in flight - callers are expected to have disabled the send
    /// affordance. Transport failures surface as a fixed error message in
    /// the timeline, never as a returned error. Whatever happens, the
    /// pending flag is clear again by the time this returns.
    pub async fn send(&self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            return;
        }

        // Claim the in-flight slot and snapshot attachment presence in one
        // lock acquisition. The snapshot drives the message badge; later
        // attachment mutations must not alter it.
        let (session_id, had_attachments) = {
            let mut session = self.session.write().await;
            if session.pending {
                tracing::debug!(target: "lifecycle", "send dropped: request already in flight");
                return;
            }
            session.pending = true;
            (
                session.session_id.clone(),
                !session.attachments.is_empty(),
            )
        };

        self.emit(ChatEvent::PendingStarted);
        self.append_message(ChatMessage::user(text, had_attachments))
            .await;

        match self.exchange(text, &session_id).await {
            Ok((endpoint, reply)) => self.apply_reply(endpoint, text, reply).await,
            Err(err) => {
                tracing::warn!(target: "lifecycle", error = %err, "chat exchange failed");
                self.append_message(ChatMessage::assistant(SEND_FAILURE_MESSAGE, false))
                    .await;
            }
        }

        // Unconditional: a failed request must never leave the session
        // unable to send.
        self.session.write().await.pending = false;
        self.emit(ChatEvent::PendingFinished);
    }

    /// Route resolution plus exactly one POST to the chosen endpoint.
    async fn exchange(&self, text: &str, session_id: &str) -> Result<(Endpoint, ChatReply)> {
        let decision = self.router.resolve(text).await;
        match decision.origin {
            RouteOrigin::Fallback => tracing::warn!(
                target: "lifecycle",
                endpoint = decision.endpoint.as_str(),
                "route classification failed, using fallback endpoint"
            ),
            origin => tracing::debug!(
                target: "lifecycle",
                endpoint = decision.endpoint.as_str(),
                ?origin,
                "route resolved"
            ),
        }

        let reply = self.backend.chat(decision.endpoint, text, session_id).await?;
        Ok((decision.endpoint, reply))
    }

    /// Interprets a successful reply: merges generated files, clears the
    /// store on a confirmed terminal email action, and appends the
    /// assistant message with its display flag.
    async fn apply_reply(&self, endpoint: Endpoint, request: &str, reply: ChatReply) {
        if !reply.generated_files.is_empty() {
            let count = {
                let mut session = self.session.write().await;
                for name in &reply.generated_files {
                    // Size is unknown for server-generated files; duplicate
                    // names are skipped by the store.
                    session.attachments.add(FileRecord::generated(name));
                }
                session.attachments.len()
            };
            self.emit(ChatEvent::AttachmentsChanged { count });
        }

        if is_confirmed_email_action(endpoint, request, &reply.response) {
            tracing::info!(target: "lifecycle", "confirmed email action, clearing attachments");
            self.session.write().await.attachments.clear();
            self.emit(ChatEvent::AttachmentsChanged { count: 0 });
        }

        let email_mode = is_email_mode(request, &reply.response);
        self.append_message(ChatMessage::assistant(reply.response, email_mode))
            .await;
    }

    /// Starts a fresh session, returning its id.
    ///
    /// The previous session's server-side history is cleared best-effort
    /// in a detached task; its failure is logged and never blocks the
    /// local reset.
    pub async fn start_session(&self) -> String {
        let (previous_id, new_id) = {
            let mut session = self.session.write().await;
            let previous_id =
                std::mem::replace(&mut *session, SessionContext::new()).session_id;
            (previous_id, session.session_id.clone())
        };
        self.timeline.write().await.clear();

        let backend = Arc::clone(&self.backend);
        tokio::spawn(async move {
            if let Err(err) = backend.clear_history(&previous_id).await {
                tracing::warn!(
                    target: "lifecycle",
                    session_id = %previous_id,
                    error = %err,
                    "failed to clear remote history"
                );
            }
        });

        self.emit(ChatEvent::SessionReset {
            session_id: new_id.clone(),
        });
        new_id
    }

    /// Uploads a file into the session.
    ///
    /// Files over the 25 MiB ceiling are rejected locally, before any
    /// network call. On success an `Uploaded` record is tracked; on
    /// failure the server-provided detail is surfaced to the caller.
    pub async fn upload_file(&self, filename: &str, bytes: Vec<u8>) -> Result<()> {
        let size = bytes.len() as u64;
        if size > MAX_UPLOAD_BYTES {
            return Err(CourierError::validation(format!(
                "'{}' exceeds the {} MiB upload limit",
                filename,
                MAX_UPLOAD_BYTES / (1024 * 1024)
            )));
        }

        let session_id = self.session.read().await.session_id.clone();
        self.backend.upload(filename, bytes, &session_id).await?;

        let count = {
            let mut session = self.session.write().await;
            session.attachments.add(FileRecord::uploaded(filename, size));
            session.attachments.len()
        };
        self.emit(ChatEvent::AttachmentsChanged { count });
        Ok(())
    }

    /// Removes a tracked file.
    ///
    /// The remote delete is fire-and-forget; local removal happens
    /// unconditionally, even if the remote side fails.
    pub async fn remove_file(&self, name: &str, provenance: Provenance) {
        let session_id = self.session.read().await.session_id.clone();
        let backend = Arc::clone(&self.backend);
        let filename = name.to_string();
        tokio::spawn(async move {
            if let Err(err) = backend.delete_file(&filename, &session_id, provenance).await {
                tracing::warn!(
                    target: "lifecycle",
                    %filename,
                    error = %err,
                    "remote file delete failed"
                );
            }
        });

        let removed = {
            let mut session = self.session.write().await;
            let removed = session.attachments.remove(name, provenance);
            (removed.is_some()).then(|| session.attachments.len())
        };
        if let Some(count) = removed {
            self.emit(ChatEvent::AttachmentsChanged { count });
        }
    }

    /// The current session id.
    pub async fn session_id(&self) -> String {
        self.session.read().await.session_id.clone()
    }

    /// True while a request is in flight.
    pub async fn is_pending(&self) -> bool {
        self.session.read().await.pending
    }

    /// Snapshot of the conversation timeline.
    pub async fn timeline(&self) -> Vec<ChatMessage> {
        self.timeline.read().await.clone()
    }

    /// Snapshot of the tracked attachments, uploads first.
    pub async fn attachments(&self) -> Vec<FileRecord> {
        self.session.read().await.attachments.all()
    }

    async fn append_message(&self, message: ChatMessage) {
        self.timeline.write().await.push(message.clone());
        self.emit(ChatEvent::MessageAppended { message });
    }

    fn emit(&self, event: ChatEvent) {
        if let Some(sender) = &self.events {
            // A dropped receiver just means nobody is rendering.
            let _ = sender.send(event);
        }
    }
}
