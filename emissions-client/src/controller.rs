//! Application state machine and orchestration.
//!
//! The controller owns the single [`AppState`] instance for the session and
//! sequences the whole flow: locate the user on startup, dispatch route
//! requests on submission, apply the outcome, and keep the map viewport
//! fitted to the result geometry.
//!
//! Transitions are a pure function over `(state, event)`; the controller
//! applies them, publishes every new state on a watch channel for the
//! presentation layer, and guards request completions with a sequence
//! number so a superseded request's outcome is discarded rather than
//! applied out of order.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::watch;
use tracing::{debug, warn};

use crate::domain::{GeoPoint, RouteQuery, RouteResult, TravelMode};
use crate::location::LocationResolver;
use crate::map::ViewportSynchronizer;
use crate::polyline;
use crate::routes_api::RouteService;

/// The one user-facing message for any failed request. Error subtypes are
/// logged, not shown.
pub const REQUEST_FAILED_MESSAGE: &str = "Failed to calculate route. Please try again.";

/// Application state. Exactly one variant is active at any time.
#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    /// Session not started yet.
    Idle,

    /// Waiting for the user's location.
    LocatingUser,

    /// Located; ready to accept a submission.
    Ready { location: GeoPoint },

    /// A route request is in flight.
    Submitting { location: GeoPoint },

    /// The most recent request produced a route.
    Success {
        location: GeoPoint,
        result: RouteResult,
    },

    /// The most recent submission failed; the user may resubmit.
    Failure { location: GeoPoint, message: String },
}

impl AppState {
    /// The user location, once resolved. Carried through every state after
    /// `LocatingUser`.
    pub fn location(&self) -> Option<GeoPoint> {
        match self {
            AppState::Idle | AppState::LocatingUser => None,
            AppState::Ready { location }
            | AppState::Submitting { location }
            | AppState::Success { location, .. }
            | AppState::Failure { location, .. } => Some(*location),
        }
    }

    /// Whether a loading indicator should be shown.
    pub fn is_loading(&self) -> bool {
        matches!(self, AppState::LocatingUser | AppState::Submitting { .. })
    }

    /// The current route result, if any.
    pub fn result(&self) -> Option<&RouteResult> {
        match self {
            AppState::Success { result, .. } => Some(result),
            _ => None,
        }
    }
}

/// An event the state machine can react to.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Location acquisition started.
    LocateStarted,

    /// The resolver produced a location (real or fallback).
    LocationResolved(GeoPoint),

    /// A well-formed submission was accepted for dispatch.
    QueryAccepted,

    /// A submission was rejected before dispatch.
    QueryRejected { message: String },

    /// The in-flight request produced a route.
    RequestSucceeded { result: RouteResult },

    /// The in-flight request failed.
    RequestFailed { message: String },
}

/// Compute the state after `event`, or `None` when the event does not apply
/// in `state` and must be ignored.
///
/// Pure: no side effects, no knowledge of request ordering. Supersession is
/// the controller's concern; by the time a completion event reaches this
/// function it is known to be current.
pub fn transition(state: &AppState, event: &AppEvent) -> Option<AppState> {
    match (state, event) {
        (AppState::Idle, AppEvent::LocateStarted) => Some(AppState::LocatingUser),

        (AppState::LocatingUser, AppEvent::LocationResolved(location)) => {
            Some(AppState::Ready {
                location: *location,
            })
        }

        // Submissions are accepted from any located state, including
        // Submitting: a new submission supersedes the in-flight one.
        (_, AppEvent::QueryAccepted) => state
            .location()
            .map(|location| AppState::Submitting { location }),

        (_, AppEvent::QueryRejected { message }) => state.location().map(|location| {
            AppState::Failure {
                location,
                message: message.clone(),
            }
        }),

        (AppState::Submitting { location }, AppEvent::RequestSucceeded { result }) => {
            Some(AppState::Success {
                location: *location,
                result: result.clone(),
            })
        }

        (AppState::Submitting { location }, AppEvent::RequestFailed { message }) => {
            Some(AppState::Failure {
                location: *location,
                message: message.clone(),
            })
        }

        _ => None,
    }
}

/// Owns the application state and sequences the session.
///
/// At most one request outcome is ever applied per submission generation:
/// submitting again while a request is in flight supersedes it, and the
/// superseded completion is discarded. The in-flight transport call is not
/// cancelled; it completes and its result is dropped.
pub struct OrchestrationController {
    service: Arc<dyn RouteService>,
    resolver: LocationResolver,
    viewport: ViewportSynchronizer,
    state: Mutex<AppState>,
    sequence: AtomicU64,
    publisher: watch::Sender<AppState>,
}

impl OrchestrationController {
    /// Create a controller in the `Idle` state.
    pub fn new(
        service: Arc<dyn RouteService>,
        resolver: LocationResolver,
        viewport: ViewportSynchronizer,
    ) -> Self {
        let (publisher, _) = watch::channel(AppState::Idle);

        Self {
            service,
            resolver,
            viewport,
            state: Mutex::new(AppState::Idle),
            sequence: AtomicU64::new(0),
            publisher,
        }
    }

    /// Subscribe to state changes. The receiver always observes the latest
    /// state; the presentation layer renders from this and holds no copy of
    /// its own.
    pub fn subscribe(&self) -> watch::Receiver<AppState> {
        self.publisher.subscribe()
    }

    /// The current state.
    pub fn state(&self) -> AppState {
        self.state.lock().unwrap().clone()
    }

    /// Start the session: acquire the user's location.
    ///
    /// Idempotent; calling again after startup does nothing.
    pub async fn start(&self) {
        if self.apply(AppEvent::LocateStarted).is_none() {
            return;
        }

        let location = self.resolver.resolve().await;
        self.apply(AppEvent::LocationResolved(location));
    }

    /// Submit a route request from raw form input.
    ///
    /// Empty origin or destination is rejected before dispatch and moves
    /// the machine to `Failure`. A submission while a request is in flight
    /// supersedes it: only the outcome of the most recent submission is
    /// ever applied. Submissions before the location resolves are ignored.
    pub async fn submit(&self, origin: &str, destination: &str, mode: TravelMode) {
        let query = match RouteQuery::new(origin, destination, mode) {
            Ok(query) => query,
            Err(e) => {
                if self
                    .apply(AppEvent::QueryRejected {
                        message: e.to_string(),
                    })
                    .is_none()
                {
                    warn!("submission before location resolved; ignored");
                }
                return;
            }
        };

        if self.apply(AppEvent::QueryAccepted).is_none() {
            warn!(
                origin = query.origin(),
                "submission before location resolved; ignored"
            );
            return;
        }

        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        let outcome = self.service.submit(&query).await;

        if self.sequence.load(Ordering::SeqCst) != sequence {
            debug!(sequence, "request superseded; outcome discarded");
            return;
        }

        match outcome {
            Ok(result) => {
                let path = polyline::decode(&result.encoded_path);
                if self.apply(AppEvent::RequestSucceeded { result }).is_some() {
                    self.viewport.fit_to_path(&path);
                }
            }
            Err(e) => {
                debug!(error = %e, "route request failed");
                self.apply(AppEvent::RequestFailed {
                    message: REQUEST_FAILED_MESSAGE.to_string(),
                });
            }
        }
    }

    /// Apply an event: run the pure transition, store the new state, and
    /// publish it. Returns the new state, or `None` if the event was
    /// ignored. The lock is never held across an await.
    fn apply(&self, event: AppEvent) -> Option<AppState> {
        let mut state = self.state.lock().unwrap();
        match transition(&state, &event) {
            Some(next) => {
                *state = next.clone();
                drop(state);
                self.publisher.send_replace(next.clone());
                Some(next)
            }
            None => {
                debug!(?event, "event ignored in current state");
                None
            }
        }
    }
}


#[cfg(test)]
mod controller_tests {
    use super::*;
    use std::sync::Arc;

    use async_trait::async_trait;
    use tokio::sync::oneshot;

    use crate::format;
    use crate::location::{DEFAULT_LOCATION, Denied, StaticPosition};
    use crate::map::{MapCommand, RecordingMapSurface};
    use crate::routes_api::{MockRouteService, RoutesApiError};

    fn stub_result() -> RouteResult {
        RouteResult {
            distance_meters: 100000.0,
            duration_seconds: 3600.0,
            emissions_kg: 20.0,
            encoded_path: "_p~iF~ps|U".into(),
            mode: TravelMode::Drive,
        }
    }

    fn controller_with(
        service: Arc<dyn RouteService>,
        map: &RecordingMapSurface,
    ) -> OrchestrationController {
        OrchestrationController::new(
            service,
            LocationResolver::new(Arc::new(StaticPosition(GeoPoint::new(38.627, -90.1994)))),
            ViewportSynchronizer::new(Arc::new(map.clone())),
        )
    }

    /// Route service whose completions are released by the test, so
    /// completion order can be controlled exactly.
    #[derive(Clone)]
    struct GatedRouteService {
        waiters: Arc<Mutex<Vec<Option<oneshot::Sender<Result<RouteResult, RoutesApiError>>>>>>,
        arrived: Arc<watch::Sender<usize>>,
    }

    impl GatedRouteService {
        fn new() -> Self {
            let (arrived, _) = watch::channel(0);
            Self {
                waiters: Arc::default(),
                arrived: Arc::new(arrived),
            }
        }

        /// Wait until `n` submissions have arrived.
        async fn wait_for(&self, n: usize) {
            let mut rx = self.arrived.subscribe();
            while *rx.borrow_and_update() < n {
                rx.changed().await.unwrap();
            }
        }

        /// Release submission `idx` (0-based, arrival order) with `outcome`.
        fn release(&self, idx: usize, outcome: Result<RouteResult, RoutesApiError>) {
            let sender = self.waiters.lock().unwrap()[idx].take().unwrap();
            sender.send(outcome).unwrap();
        }
    }

    #[async_trait]
    impl RouteService for GatedRouteService {
        async fn submit(&self, _query: &RouteQuery) -> Result<RouteResult, RoutesApiError> {
            let (tx, rx) = oneshot::channel();
            let count = {
                let mut waiters = self.waiters.lock().unwrap();
                waiters.push(Some(tx));
                waiters.len()
            };
            self.arrived.send_replace(count);
            rx.await.expect("test dropped the gate")
        }
    }

    #[tokio::test]
    async fn startup_resolves_location_into_ready() {
        let map = RecordingMapSurface::new();
        let controller = controller_with(Arc::new(MockRouteService::new()), &map);

        assert_eq!(controller.state(), AppState::Idle);
        controller.start().await;

        assert_eq!(
            controller.state(),
            AppState::Ready {
                location: GeoPoint::new(38.627, -90.1994)
            }
        );
    }

    #[tokio::test]
    async fn denied_geolocation_resolves_to_default() {
        let map = RecordingMapSurface::new();
        let controller = OrchestrationController::new(
            Arc::new(MockRouteService::new()),
            LocationResolver::new(Arc::new(Denied)),
            ViewportSynchronizer::new(Arc::new(map.clone())),
        );

        controller.start().await;

        assert_eq!(
            controller.state(),
            AppState::Ready {
                location: DEFAULT_LOCATION
            }
        );
    }

    #[tokio::test]
    async fn successful_submission_end_to_end() {
        let mock = MockRouteService::new();
        mock.enqueue_ok(stub_result());
        let map = RecordingMapSurface::new();
        let controller = controller_with(Arc::new(mock.clone()), &map);

        controller.start().await;
        controller
            .submit("Saint Louis", "Seattle", TravelMode::Drive)
            .await;

        let state = controller.state();
        let result = state.result().expect("expected Success");
        assert_eq!(
            format::format_distance_km(result.distance_meters),
            "100.00 km"
        );
        assert_eq!(format::format_duration(result.duration_seconds), "1h 0m");
        assert_eq!(format::format_emissions(result.emissions_kg), "20.00 kg CO2");
        assert_eq!(format::format_mode(result.mode), "drive");

        // The viewport was fitted exactly once, to the decoded path bounds.
        let fits = map.fits();
        assert_eq!(fits.len(), 1);
        let (region, padding) = &fits[0];
        assert_eq!(*padding, 50);
        assert!((region.southwest.latitude - 38.5).abs() < 1e-9);
        assert!((region.southwest.longitude - -120.2).abs() < 1e-9);
        assert_eq!(region.southwest, region.northeast);

        // The dispatched query carried the trimmed input and mode.
        let calls = mock.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].origin(), "Saint Louis");
        assert_eq!(calls[0].destination(), "Seattle");
        assert_eq!(calls[0].mode(), TravelMode::Drive);
    }

    #[tokio::test]
    async fn failed_request_surfaces_generic_message() {
        let mock = MockRouteService::new();
        mock.enqueue_err(503, "upstream unavailable");
        let map = RecordingMapSurface::new();
        let controller = controller_with(Arc::new(mock), &map);

        controller.start().await;
        controller
            .submit("Saint Louis", "Seattle", TravelMode::Drive)
            .await;

        match controller.state() {
            AppState::Failure { message, .. } => {
                assert_eq!(message, REQUEST_FAILED_MESSAGE);
            }
            other => panic!("expected Failure, got {other:?}"),
        }
        assert!(controller.state().result().is_none());
        assert!(map.fits().is_empty());
    }

    #[tokio::test]
    async fn empty_input_is_rejected_before_dispatch() {
        let mock = MockRouteService::new();
        let map = RecordingMapSurface::new();
        let controller = controller_with(Arc::new(mock.clone()), &map);

        controller.start().await;
        controller.submit("   ", "Seattle", TravelMode::Walk).await;

        assert!(matches!(controller.state(), AppState::Failure { .. }));
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn submission_before_startup_is_ignored() {
        let mock = MockRouteService::new();
        let map = RecordingMapSurface::new();
        let controller = controller_with(Arc::new(mock.clone()), &map);

        controller.submit("A", "B", TravelMode::Drive).await;

        assert_eq!(controller.state(), AppState::Idle);
        assert_eq!(mock.call_count(), 0);
    }

    #[tokio::test]
    async fn result_without_geometry_leaves_viewport_alone() {
        let mock = MockRouteService::new();
        mock.enqueue_ok(RouteResult {
            encoded_path: String::new(),
            ..stub_result()
        });
        let map = RecordingMapSurface::new();
        let controller = controller_with(Arc::new(mock), &map);

        controller.start().await;
        controller.submit("A", "B", TravelMode::Drive).await;

        assert!(matches!(controller.state(), AppState::Success { .. }));
        assert!(map.fits().is_empty());
    }

    #[tokio::test]
    async fn resubmission_recovers_from_failure() {
        let mock = MockRouteService::new();
        mock.enqueue_err(500, "boom");
        mock.enqueue_ok(stub_result());
        let map = RecordingMapSurface::new();
        let controller = controller_with(Arc::new(mock), &map);

        controller.start().await;
        controller.submit("A", "B", TravelMode::Drive).await;
        assert!(matches!(controller.state(), AppState::Failure { .. }));

        controller.submit("A", "B", TravelMode::Drive).await;
        assert!(matches!(controller.state(), AppState::Success { .. }));
    }

    #[tokio::test]
    async fn superseded_request_is_discarded_when_it_finishes_last() {
        let gate = GatedRouteService::new();
        let map = RecordingMapSurface::new();
        let controller = Arc::new(controller_with(Arc::new(gate.clone()), &map));
        controller.start().await;

        let first = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit("A", "B", TravelMode::Drive).await }
        });
        gate.wait_for(1).await;

        let second = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit("C", "D", TravelMode::Walk).await }
        });
        gate.wait_for(2).await;

        // The second submission completes first and wins.
        let winning = RouteResult {
            distance_meters: 5000.0,
            mode: TravelMode::Walk,
            ..stub_result()
        };
        gate.release(1, Ok(winning.clone()));
        second.await.unwrap();
        assert_eq!(controller.state().result(), Some(&winning));

        // The first submission completes afterwards; its outcome is stale
        // and must not overwrite the second's.
        gate.release(0, Ok(stub_result()));
        first.await.unwrap();
        assert_eq!(controller.state().result(), Some(&winning));
        assert_eq!(map.fits().len(), 1);
    }

    #[tokio::test]
    async fn superseded_request_is_discarded_when_it_finishes_first() {
        let gate = GatedRouteService::new();
        let map = RecordingMapSurface::new();
        let controller = Arc::new(controller_with(Arc::new(gate.clone()), &map));
        controller.start().await;

        let first = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit("A", "B", TravelMode::Drive).await }
        });
        gate.wait_for(1).await;

        let second = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit("C", "D", TravelMode::Walk).await }
        });
        gate.wait_for(2).await;

        // The first (superseded) submission completes first; its outcome
        // is discarded and the machine stays in Submitting.
        gate.release(0, Ok(stub_result()));
        first.await.unwrap();
        assert!(matches!(controller.state(), AppState::Submitting { .. }));
        assert!(map.fits().is_empty());

        let winning = RouteResult {
            distance_meters: 5000.0,
            mode: TravelMode::Walk,
            ..stub_result()
        };
        gate.release(1, Ok(winning.clone()));
        second.await.unwrap();
        assert_eq!(controller.state().result(), Some(&winning));
        assert_eq!(map.fits().len(), 1);
    }

    #[tokio::test]
    async fn stale_failure_does_not_clobber_fresh_success() {
        let gate = GatedRouteService::new();
        let map = RecordingMapSurface::new();
        let controller = Arc::new(controller_with(Arc::new(gate.clone()), &map));
        controller.start().await;

        let first = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit("A", "B", TravelMode::Drive).await }
        });
        gate.wait_for(1).await;

        let second = tokio::spawn({
            let controller = controller.clone();
            async move { controller.submit("C", "D", TravelMode::Drive).await }
        });
        gate.wait_for(2).await;

        gate.release(1, Ok(stub_result()));
        second.await.unwrap();

        gate.release(
            0,
            Err(RoutesApiError::ApiError {
                status: 500,
                message: "late failure".into(),
            }),
        );
        first.await.unwrap();

        assert!(matches!(controller.state(), AppState::Success { .. }));
    }

    #[tokio::test]
    async fn every_transition_is_published() {
        let mock = MockRouteService::new();
        mock.enqueue_ok(stub_result());
        let map = RecordingMapSurface::new();
        let controller = controller_with(Arc::new(mock), &map);
        let mut states = controller.subscribe();

        controller.start().await;
        controller.submit("A", "B", TravelMode::Drive).await;

        // The receiver sees at least the final state; intermediate states
        // were published in order (observed here via has_changed).
        assert!(states.has_changed().unwrap());
        let last = states.borrow_and_update().clone();
        assert!(matches!(last, AppState::Success { .. }));

        let renders: Vec<_> = map
            .commands()
            .iter()
            .filter(|c| matches!(c, MapCommand::Render { .. }))
            .cloned()
            .collect();
        assert!(renders.is_empty(), "controller never renders");
    }
}
