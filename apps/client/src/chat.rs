//! Conversation state and the chat controller.
//!
//! The transcript is append-only: a user turn lands as soon as a submission
//! is accepted, the assistant turn follows on success, and nothing follows
//! on failure. The leading system turn (if any) is part of every outbound
//! payload but never part of the user-visible view.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;

use crate::backend::ChatBackend;
use crate::flight::{RequestState, SingleFlight};

/// Substituted when the backend answers without a `reply` field.
pub const FALLBACK_REPLY: &str = "I couldn't generate a response.";

/// Fixed user-facing message for any chat transport failure.
pub const CHAT_ERROR: &str = "Backend is not responding. Check if the server is up.";

/// Default persona seed for the chat widget.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are the portfolio's assistant. Answer questions about the owner's \
     projects, tech stack, and experience.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message in a conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }
}

/// Chat controller: owns the transcript, the input buffer, and the
/// single-flight guard for the one outstanding chat request.
pub struct ChatSession {
    backend: Arc<dyn ChatBackend>,
    transcript: Arc<watch::Sender<Vec<Turn>>>,
    input: watch::Sender<String>,
    flight: SingleFlight<String>,
}

impl ChatSession {
    /// Session with no system seed.
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self::with_transcript(backend, Vec::new())
    }

    /// Session seeded with a leading system turn. The seed rides along in
    /// every payload but never shows in [`ChatSession::visible_transcript`].
    pub fn with_system_prompt(backend: Arc<dyn ChatBackend>, prompt: impl Into<String>) -> Self {
        Self::with_transcript(backend, vec![Turn::new(Role::System, prompt)])
    }

    fn with_transcript(backend: Arc<dyn ChatBackend>, seed: Vec<Turn>) -> Self {
        Self {
            backend,
            transcript: Arc::new(watch::Sender::new(seed)),
            input: watch::Sender::new(String::new()),
            flight: SingleFlight::new(CHAT_ERROR),
        }
    }

    pub fn set_input(&self, text: impl Into<String>) {
        self.input.send_replace(text.into());
    }

    pub fn input(&self) -> String {
        self.input.borrow().clone()
    }

    /// Full transcript in payload order, system seed included.
    pub fn transcript(&self) -> Vec<Turn> {
        self.transcript.borrow().clone()
    }

    /// Transcript without the system seed, in display order.
    pub fn visible_transcript(&self) -> Vec<Turn> {
        self.transcript
            .borrow()
            .iter()
            .filter(|t| t.role != Role::System)
            .cloned()
            .collect()
    }

    pub fn watch_transcript(&self) -> watch::Receiver<Vec<Turn>> {
        self.transcript.subscribe()
    }

    pub fn state(&self) -> RequestState<String> {
        self.flight.state()
    }

    pub fn watch_state(&self) -> watch::Receiver<RequestState<String>> {
        self.flight.subscribe()
    }

    /// Sends whatever is in the input buffer.
    pub async fn send(&self) -> bool {
        let text = self.input();
        self.send_message(&text).await
    }

    /// Appends `text` as a user turn and drives one chat request.
    ///
    /// Dropped without any state change when `text` trims to empty or a
    /// request is already in flight. The payload is the entire transcript
    /// including the just-appended turn; the assistant turn is appended
    /// before the success transition is published, so an observer that sees
    /// success sees the complete exchange. Returns whether the submission
    /// was accepted.
    pub async fn send_message(&self, text: &str) -> bool {
        if text.trim().is_empty() {
            return false;
        }

        self.flight
            .submit(|| {
                self.input.send_replace(String::new());
                self.transcript
                    .send_modify(|t| t.push(Turn::new(Role::User, text)));
                let snapshot = self.transcript.borrow().clone();

                let backend = Arc::clone(&self.backend);
                let transcript = Arc::clone(&self.transcript);
                async move {
                    let reply = backend.chat(&snapshot).await?;
                    let content = reply.reply.unwrap_or_else(|| FALLBACK_REPLY.to_string());
                    transcript.send_modify(|t| t.push(Turn::new(Role::Assistant, content.clone())));
                    Ok(content)
                }
            })
            .await
            .accepted()
    }
}
