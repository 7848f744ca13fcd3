//! Intent routing.
//!
//! Maps a raw message string to the backend capability endpoint that
//! should handle it. The decision procedure is local-first: a fixed,
//! ordered phrase list per domain, tested by substring after case
//! folding. Only when no local rule matches does the router issue a
//! single remote classification call; a failure there immediately yields
//! the fixed fallback, with no retry.

use crate::backend::RouteClassifier;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Phrases that route a message to the employee capability.
///
/// Substring match, not token match: a phrase appearing inside an
/// unrelated sentence is a known, accepted false positive. Order matters
/// only in that matching short-circuits on the first hit.
const EMPLOYEE_PHRASES: &[&str] = &[
    "add employee",
    "new employee",
    "update employee",
    "remove employee",
    "employee record",
    "employee",
    "new hire",
    "payroll",
];

/// Phrases that route a message to the email capability.
const EMAIL_PHRASES: &[&str] = &[
    "send an email",
    "send email",
    "send a mail",
    "compose",
    "email",
    "inbox",
];

/// The backend capability domains in scope.
///
/// `Generic` is only ever produced by the remote classifier; local
/// keyword matching resolves to `Employee` or `Email` or nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Employee,
    Email,
    Generic,
}

impl Endpoint {
    /// Wire name of the capability, also its chat path segment.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Employee => "employee",
            Self::Email => "email",
            Self::Generic => "generic",
        }
    }

    /// Maps a classifier-declared endpoint name onto a capability.
    ///
    /// The declared value is taken verbatim; anything other than the two
    /// keyword-routable domains resolves to `Generic`, the catch-all.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "employee" => Self::Employee,
            "email" => Self::Email,
            _ => Self::Generic,
        }
    }
}

/// How a routing decision was reached. Carried for logging and tests;
/// has no behavioral effect downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteOrigin {
    /// A local phrase list matched; no network call was made.
    LocalKeyword,
    /// The remote classifier declared the endpoint.
    RemoteClassifier,
    /// The remote classifier failed; the fixed default was used.
    Fallback,
}

/// The outcome of routing one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDecision {
    pub endpoint: Endpoint,
    pub origin: RouteOrigin,
}

/// Pure local phase: ordered substring match over the case-folded text.
///
/// Employee phrases are tested before email phrases; the first hit wins.
/// Returns `None` when no phrase in either list matches.
pub fn local_route(text: &str) -> Option<Endpoint> {
    let folded = text.to_lowercase();
    if EMPLOYEE_PHRASES.iter().any(|p| folded.contains(p)) {
        return Some(Endpoint::Employee);
    }
    if EMAIL_PHRASES.iter().any(|p| folded.contains(p)) {
        return Some(Endpoint::Email);
    }
    None
}

/// Resolves messages to capability endpoints.
///
/// Wraps the local phrase phase and the remote fallback behind one
/// interface so the classifier can later be replaced without touching the
/// lifecycle controller.
pub struct IntentRouter {
    classifier: Arc<dyn RouteClassifier>,
    /// Endpoint used when the remote classification itself fails.
    ///
    /// `Email` preserves the observed design. Defaulting ambiguous intent
    /// to a send-capable endpoint is a questionable policy; it is kept as
    /// a single swappable field rather than silently changed.
    fallback: Endpoint,
}

impl IntentRouter {
    /// Creates a router with the default `Email` fallback.
    pub fn new(classifier: Arc<dyn RouteClassifier>) -> Self {
        Self {
            classifier,
            fallback: Endpoint::Email,
        }
    }

    /// Overrides the fallback endpoint.
    pub fn with_fallback(mut self, fallback: Endpoint) -> Self {
        self.fallback = fallback;
        self
    }

    /// Resolves `text` to an endpoint.
    ///
    /// Local phase first; on no match, exactly one remote classification
    /// carrying the raw (non-normalized) text. Never fails: a classifier
    /// error yields the fixed fallback.
    pub async fn resolve(&self, text: &str) -> RouteDecision {
        if let Some(endpoint) = local_route(text) {
            return RouteDecision {
                endpoint,
                origin: RouteOrigin::LocalKeyword,
            };
        }

        match self.classifier.classify(text).await {
            Ok(endpoint) => RouteDecision {
                endpoint,
                origin: RouteOrigin::RemoteClassifier,
            },
            Err(_) => RouteDecision {
                endpoint: self.fallback,
                origin: RouteOrigin::Fallback,
            },
        }
    }
}

/// Textual cues used to interpret exchanges after the fact.
///
/// These drive the confirmed-action and email-mode checks in the
/// lifecycle controller; they are matched case-insensitively.
pub mod cues {
    /// Affirmative completion signal in an assistant response.
    pub const EMAIL_SENT_MARKER: &str = "email sent";
    /// Send intent expressed in the user's own text.
    pub const SEND_EMAIL_INTENT: &str = "send an email";
}

/// True iff the exchange should be treated as a confirmed terminal email
/// action: the response carries the success marker and the exchange as a
/// whole is email-classified (by endpoint choice or by textual cues on
/// either side).
pub fn is_confirmed_email_action(endpoint: Endpoint, request: &str, response: &str) -> bool {
    response.to_lowercase().contains(cues::EMAIL_SENT_MARKER)
        && (endpoint == Endpoint::Email || is_email_mode(request, response))
}

/// Display-only email-mode flag for an assistant message: the response
/// confirms a send, or the user expressed send intent.
pub fn is_email_mode(request: &str, response: &str) -> bool {
    response.to_lowercase().contains(cues::EMAIL_SENT_MARKER)
        || request.to_lowercase().contains(cues::SEND_EMAIL_INTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::RouteClassifier;
    use crate::error::{CourierError, Result};
    use async_trait::async_trait;
    use std::sync::Mutex;

    // Mock classifier counting calls, returning a fixed answer or failing.
    struct MockClassifier {
        answer: Option<Endpoint>,
        calls: Mutex<usize>,
    }

    impl MockClassifier {
        fn answering(endpoint: Endpoint) -> Self {
            Self {
                answer: Some(endpoint),
                calls: Mutex::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                answer: None,
                calls: Mutex::new(0),
            }
        }

        fn call_count(&self) -> usize {
            *self.calls.lock().unwrap()
        }
    }

    #[async_trait]
    impl RouteClassifier for MockClassifier {
        async fn classify(&self, _message: &str) -> Result<Endpoint> {
            *self.calls.lock().unwrap() += 1;
            self.answer
                .ok_or_else(|| CourierError::transport("connection refused"))
        }
    }

    #[test]
    fn employee_phrase_matches_locally() {
        assert_eq!(
            local_route("please add employee John with phone 555-1234"),
            Some(Endpoint::Employee)
        );
    }

    #[test]
    fn email_phrase_matches_locally() {
        assert_eq!(
            local_route("send an email to the team"),
            Some(Endpoint::Email)
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(local_route("ADD EMPLOYEE Jane"), Some(Endpoint::Employee));
        assert_eq!(local_route("Send An Email please"), Some(Endpoint::Email));
    }

    #[test]
    fn employee_list_is_checked_before_email() {
        // A message matching both domains resolves to the first list.
        assert_eq!(
            local_route("email the new employee record to HR"),
            Some(Endpoint::Employee)
        );
    }

    #[test]
    fn unmatched_text_returns_none() {
        assert_eq!(local_route("what's the weather"), None);
    }

    #[test]
    fn parse_unknown_endpoint_is_generic() {
        assert_eq!(Endpoint::parse("employee"), Endpoint::Employee);
        assert_eq!(Endpoint::parse(" Email "), Endpoint::Email);
        assert_eq!(Endpoint::parse("weather"), Endpoint::Generic);
    }

    #[tokio::test]
    async fn local_match_skips_the_classifier() {
        let classifier = Arc::new(MockClassifier::answering(Endpoint::Generic));
        let router = IntentRouter::new(classifier.clone());

        let decision = router.resolve("add employee Ann").await;
        assert_eq!(decision.endpoint, Endpoint::Employee);
        assert_eq!(decision.origin, RouteOrigin::LocalKeyword);
        assert_eq!(classifier.call_count(), 0);
    }

    #[tokio::test]
    async fn unmatched_text_asks_the_classifier_once() {
        let classifier = Arc::new(MockClassifier::answering(Endpoint::Generic));
        let router = IntentRouter::new(classifier.clone());

        let decision = router.resolve("what's the weather").await;
        assert_eq!(decision.endpoint, Endpoint::Generic);
        assert_eq!(decision.origin, RouteOrigin::RemoteClassifier);
        assert_eq!(classifier.call_count(), 1);
    }

    #[tokio::test]
    async fn classifier_failure_yields_fixed_fallback() {
        let classifier = Arc::new(MockClassifier::failing());
        let router = IntentRouter::new(classifier.clone());

        let decision = router.resolve("what's the weather").await;
        assert_eq!(decision.endpoint, Endpoint::Email);
        assert_eq!(decision.origin, RouteOrigin::Fallback);
        assert_eq!(classifier.call_count(), 1);
    }

    #[test]
    fn confirmed_action_requires_success_marker() {
        assert!(is_confirmed_email_action(
            Endpoint::Email,
            "send an email to bob",
            "Email sent successfully."
        ));
        assert!(!is_confirmed_email_action(
            Endpoint::Email,
            "send an email to bob",
            "Which subject should I use?"
        ));
    }

    #[test]
    fn confirmed_action_on_generic_endpoint_with_marker() {
        // The marker itself email-classifies the exchange.
        assert!(is_confirmed_email_action(
            Endpoint::Generic,
            "go ahead",
            "Done - email sent to the team."
        ));
    }

    #[test]
    fn email_mode_from_request_intent_alone() {
        assert!(is_email_mode("send an email to Ann", "What subject?"));
        assert!(!is_email_mode("what's the weather", "It is sunny."));
    }
}
