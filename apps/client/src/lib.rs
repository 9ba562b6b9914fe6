//! UI-agnostic core for the portfolio's interactive widgets.
//!
//! Two independent controllers, [`ChatSession`] and [`ResumeAnalyzer`],
//! drive the chat and resume-match widgets over an injected HTTP transport.
//! Both are built on the same [`SingleFlight`] guard: one request in flight
//! per controller, observable idle/pending/success/error state, and a fixed
//! user-facing message for any failure. The rendering layer subscribes to
//! the watch channels and is not part of this crate.

pub mod analyzer;
pub mod backend;
pub mod chat;
pub mod config;
pub mod flight;

// Re-export main types for convenience
pub use analyzer::{ResumeAnalyzer, ANALYZE_ERROR};
pub use backend::{
    AnalysisBackend, AnalysisResult, BackendError, ChatBackend, ChatReply, HttpBackend,
};
pub use chat::{ChatSession, Role, Turn, CHAT_ERROR, DEFAULT_SYSTEM_PROMPT, FALLBACK_REPLY};
pub use config::Config;
pub use flight::{RequestState, RequestStatus, SingleFlight, Submission};
