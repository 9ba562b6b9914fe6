//! Request lifecycle guard shared by the chat and analyzer controllers.
//!
//! At most one request per guard is ever in flight. A submission made while
//! one is pending is dropped without touching any state, and a settled
//! request transitions to exactly one of success or error.

use std::future::Future;

use tokio::sync::watch;
use tracing::warn;

use crate::backend::BackendError;

/// Where the guarded request currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStatus {
    Idle,
    Pending,
    Success,
    Error,
}

/// UI-facing request state.
///
/// `data` is populated only on success and `error` only on error; both are
/// empty while idle or pending.
#[derive(Debug, Clone)]
pub struct RequestState<R> {
    pub status: RequestStatus,
    pub data: Option<R>,
    pub error: Option<String>,
}

impl<R> RequestState<R> {
    fn idle() -> Self {
        Self {
            status: RequestStatus::Idle,
            data: None,
            error: None,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == RequestStatus::Pending
    }
}

/// Outcome of a [`SingleFlight::submit`] call.
#[derive(Debug)]
pub enum Submission<R> {
    /// A request was already pending; nothing changed.
    Dropped,
    /// The request ran and settled one way or the other.
    Settled(Result<R, BackendError>),
}

impl<R> Submission<R> {
    pub fn accepted(&self) -> bool {
        !matches!(self, Submission::Dropped)
    }
}

/// Single-flight request guard.
///
/// Owns the observable [`RequestState`] and the fixed user-facing message
/// shown for any failure. The raw transport error never reaches the user;
/// it goes to the log and is replaced with that message.
pub struct SingleFlight<R> {
    state: watch::Sender<RequestState<R>>,
    error_message: &'static str,
}

impl<R: Clone> SingleFlight<R> {
    pub fn new(error_message: &'static str) -> Self {
        Self {
            state: watch::Sender::new(RequestState::idle()),
            error_message,
        }
    }

    /// Submits a request unless one is already pending.
    ///
    /// `build` runs synchronously once the guard has moved to pending, so it
    /// can snapshot whatever local state the payload needs before the first
    /// suspension point. Accepting a submission clears the previous `data`
    /// and `error` in the same state change.
    pub async fn submit<F, Fut>(&self, build: F) -> Submission<R>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<R, BackendError>>,
    {
        if !self.begin() {
            return Submission::Dropped;
        }

        match build().await {
            Ok(data) => {
                self.state.send_modify(|s| {
                    s.status = RequestStatus::Success;
                    s.data = Some(data.clone());
                });
                Submission::Settled(Ok(data))
            }
            Err(err) => {
                warn!(error = %err, "request failed");
                self.state.send_modify(|s| {
                    s.status = RequestStatus::Error;
                    s.error = Some(self.error_message.to_string());
                });
                Submission::Settled(Err(err))
            }
        }
    }

    /// Atomically moves the guard to pending. Returns false when a request
    /// is already in flight, in which case nothing changes.
    fn begin(&self) -> bool {
        let mut accepted = false;
        self.state.send_if_modified(|s| {
            if s.is_pending() {
                return false;
            }
            accepted = true;
            s.status = RequestStatus::Pending;
            s.data = None;
            s.error = None;
            true
        });
        accepted
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> RequestState<R> {
        self.state.borrow().clone()
    }

    /// Watch receiver for the presentation layer to subscribe to.
    pub fn subscribe(&self) -> watch::Receiver<RequestState<R>> {
        self.state.subscribe()
    }

    pub fn is_pending(&self) -> bool {
        self.state.borrow().is_pending()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::Notify;

    fn flight() -> SingleFlight<u32> {
        SingleFlight::new("request failed")
    }

    #[tokio::test]
    async fn test_success_transition_stores_data() {
        let flight = flight();
        let outcome = flight.submit(|| async { Ok(7) }).await;

        assert!(outcome.accepted());
        let state = flight.state();
        assert_eq!(state.status, RequestStatus::Success);
        assert_eq!(state.data, Some(7));
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_failure_stores_fixed_message_only() {
        let flight = flight();
        let outcome = flight
            .submit(|| async {
                Err(BackendError::Api {
                    status: 500,
                    message: "boom".to_string(),
                })
            })
            .await;

        assert!(outcome.accepted());
        let state = flight.state();
        assert_eq!(state.status, RequestStatus::Error);
        assert_eq!(state.error.as_deref(), Some("request failed"));
        assert!(state.data.is_none());
    }

    #[tokio::test]
    async fn test_error_state_is_resubmittable() {
        let flight = flight();
        flight
            .submit(|| async {
                Err(BackendError::Api {
                    status: 502,
                    message: "bad gateway".to_string(),
                })
            })
            .await;

        let retry = flight.submit(|| async { Ok(3) }).await;
        assert!(retry.accepted());

        let state = flight.state();
        assert_eq!(state.status, RequestStatus::Success);
        assert_eq!(state.data, Some(3));
        assert_eq!(state.error, None);
    }

    #[tokio::test]
    async fn test_submit_while_pending_is_dropped() {
        let flight = Arc::new(flight());
        let gate = Arc::new(Notify::new());

        let first = {
            let flight = Arc::clone(&flight);
            let gate = Arc::clone(&gate);
            tokio::spawn(async move {
                flight
                    .submit(|| async move {
                        gate.notified().await;
                        Ok(1)
                    })
                    .await
            })
        };

        let mut rx = flight.subscribe();
        rx.wait_for(|s| s.is_pending()).await.unwrap();

        let second = flight.submit(|| async { Ok(2) }).await;
        assert!(!second.accepted());
        assert!(flight.is_pending());

        gate.notify_one();
        let outcome = first.await.unwrap();
        assert!(outcome.accepted());
        assert_eq!(flight.state().data, Some(1));
    }

    #[tokio::test]
    async fn test_accepting_a_submit_clears_previous_data() {
        let flight = flight();
        flight.submit(|| async { Ok(9) }).await;
        assert_eq!(flight.state().data, Some(9));

        flight
            .submit(|| async {
                Err(BackendError::Api {
                    status: 500,
                    message: "down".to_string(),
                })
            })
            .await;

        // The stale 9 must not survive into the new cycle.
        let state = flight.state();
        assert!(state.data.is_none());
        assert_eq!(state.status, RequestStatus::Error);
    }
}
