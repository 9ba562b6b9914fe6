//! Resume and job-posting match controller.

use std::sync::Arc;

use tokio::sync::watch;

use crate::backend::{AnalysisBackend, AnalysisResult};
use crate::flight::{RequestState, SingleFlight};

/// Fixed user-facing message for any analyzer transport failure.
pub const ANALYZE_ERROR: &str =
    "Something went wrong talking to the backend. Is the API running?";

/// Analyzer controller: two free-text buffers and one trigger.
///
/// There is deliberately no emptiness gate on submission; the backend owns
/// that validation and an empty pair comes back as a generic failure.
pub struct ResumeAnalyzer {
    backend: Arc<dyn AnalysisBackend>,
    resume: watch::Sender<String>,
    job: watch::Sender<String>,
    flight: SingleFlight<AnalysisResult>,
}

impl ResumeAnalyzer {
    pub fn new(backend: Arc<dyn AnalysisBackend>) -> Self {
        Self {
            backend,
            resume: watch::Sender::new(String::new()),
            job: watch::Sender::new(String::new()),
            flight: SingleFlight::new(ANALYZE_ERROR),
        }
    }

    pub fn set_resume(&self, text: impl Into<String>) {
        self.resume.send_replace(text.into());
    }

    pub fn set_job(&self, text: impl Into<String>) {
        self.job.send_replace(text.into());
    }

    pub fn resume(&self) -> String {
        self.resume.borrow().clone()
    }

    pub fn job(&self) -> String {
        self.job.borrow().clone()
    }

    pub fn state(&self) -> RequestState<AnalysisResult> {
        self.flight.state()
    }

    /// The current result, if the last request succeeded.
    pub fn result(&self) -> Option<AnalysisResult> {
        self.flight.state().data
    }

    pub fn watch_state(&self) -> watch::Receiver<RequestState<AnalysisResult>> {
        self.flight.subscribe()
    }

    /// Submits the current resume/job pair.
    ///
    /// The previous result is cleared as soon as the submission is accepted,
    /// before the outcome is known, so a failure never shows stale data.
    /// No-op while a request is in flight. Returns whether the submission
    /// was accepted.
    pub async fn analyze(&self) -> bool {
        self.flight
            .submit(|| {
                let resume = self.resume();
                let job = self.job();
                let backend = Arc::clone(&self.backend);
                async move { backend.analyze(&resume, &job).await }
            })
            .await
            .accepted()
    }
}
