//! Mock route service for testing without a backend.
//!
//! Serves canned results or failures in submission order and records the
//! queries it receives.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::domain::{RouteQuery, RouteResult};

use super::RouteService;
use super::error::RoutesApiError;

/// A canned outcome for one submission.
///
/// Failures are stored as status/message pairs rather than full errors so
/// outcomes stay cloneable.
#[derive(Debug, Clone)]
enum CannedOutcome {
    Ok(RouteResult),
    Err { status: u16, message: String },
}

#[derive(Debug, Default)]
struct MockState {
    queue: VecDeque<CannedOutcome>,
    fallback: Option<RouteResult>,
    calls: Vec<RouteQuery>,
}

/// Mock implementation of [`RouteService`].
///
/// Outcomes enqueued with [`enqueue_ok`](Self::enqueue_ok) and
/// [`enqueue_err`](Self::enqueue_err) are served in order; when the queue is
/// empty, the fallback result (if any) is served. A submission with neither
/// fails with a 404-style error, which surfaces quickly in tests that
/// forgot to prime the mock.
#[derive(Debug, Clone, Default)]
pub struct MockRouteService {
    state: Arc<Mutex<MockState>>,
}

impl MockRouteService {
    /// Create an empty mock with no canned outcomes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mock that always serves the given result.
    pub fn with_result(result: RouteResult) -> Self {
        let mock = Self::new();
        mock.state.lock().unwrap().fallback = Some(result);
        mock
    }

    /// Enqueue a successful outcome for the next unserved submission.
    pub fn enqueue_ok(&self, result: RouteResult) {
        self.state
            .lock()
            .unwrap()
            .queue
            .push_back(CannedOutcome::Ok(result));
    }

    /// Enqueue a failure for the next unserved submission.
    pub fn enqueue_err(&self, status: u16, message: impl Into<String>) {
        self.state.lock().unwrap().queue.push_back(CannedOutcome::Err {
            status,
            message: message.into(),
        });
    }

    /// The queries received so far, in submission order.
    pub fn calls(&self) -> Vec<RouteQuery> {
        self.state.lock().unwrap().calls.clone()
    }

    /// The number of submissions received so far.
    pub fn call_count(&self) -> usize {
        self.state.lock().unwrap().calls.len()
    }
}

#[async_trait]
impl RouteService for MockRouteService {
    async fn submit(&self, query: &RouteQuery) -> Result<RouteResult, RoutesApiError> {
        let outcome = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(query.clone());
            state
                .queue
                .pop_front()
                .or_else(|| state.fallback.clone().map(CannedOutcome::Ok))
        };

        match outcome {
            Some(CannedOutcome::Ok(result)) => Ok(result),
            Some(CannedOutcome::Err { status, message }) => {
                Err(RoutesApiError::ApiError { status, message })
            }
            None => Err(RoutesApiError::ApiError {
                status: 404,
                message: format!("no canned outcome for query {:?}", query),
            }),
        }
    }
}
