//! Submission controller
//!
//! Drives one registration form: keeps the draft, the error map and the
//! submission status, and runs validate -> create -> delayed navigation.
//!
//! ```text
//!            submit()                    create ok
//!   Idle ───────────────▶ Submitting ───────────────▶ Succeeded
//!    ▲                     │      │                       │
//!    │   invalid draft     │      │ registry failure      │ navigation delay
//!    ├─────────────────────┘      │ (general error)       │ (navigate to list)
//!    ├────────────────────────────┘                       │
//!    └────────────────────────────────────────────────────┘
//! ```

use crate::api::GuestRegistry;
use crate::draft::DraftState;
use crate::error_map::ErrorMap;
use crate::guest::Field;
use crate::schema::{self, Validation};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Message shown when the registry could not take the submission
pub const GENERAL_SUBMIT_ERROR: &str = "Failed to submit form. Please try again.";

/// Banner shown while [`SubmissionStatus::Succeeded`]
pub const SUCCESS_MESSAGE: &str = "Guest registered successfully!";

pub const DEFAULT_NAVIGATION_DELAY: Duration = Duration::from_secs(2);

/// Submission status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Submitting,
    Succeeded,
}

/// What a call to [`SubmissionController::submit`] did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Another submission was still running
    Ignored,
    /// Draft rejected by the schema, nothing was sent
    Invalid,
    /// Registry call failed
    Failed,
    /// Guest stored, navigation is pending
    Succeeded,
}

/// Views a form can ask to move to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    GuestList,
}

/// Receives navigation requests from the controller
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

impl Navigator for mpsc::UnboundedSender<Route> {
    fn navigate(&self, route: Route) {
        if self.send(route).is_err() {
            tracing::debug!("Navigation to {:?} dropped, no listener", route);
        }
    }
}

/// Everything a presentation layer needs to render the form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormState {
    pub draft: DraftState,
    pub errors: ErrorMap,
    pub status: SubmissionStatus,
}

/// Handle to the pending post-success transition
#[derive(Debug)]
pub struct NavigationTimer {
    handle: JoinHandle<()>,
}

impl NavigationTimer {
    pub fn cancel(self) {
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Puts the form back to Idle if a submission exits while still Submitting,
/// including when the submit future is dropped mid-flight.
struct SubmittingGuard<'a> {
    state: &'a RwLock<FormState>,
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        let mut state = self.state.write();
        if state.status == SubmissionStatus::Submitting {
            state.status = SubmissionStatus::Idle;
        }
    }
}

/// Guest registration form controller.
///
/// One controller per form session. Methods take `&self`; the state sits
/// behind a lock so the delayed navigation task can reset it.
pub struct SubmissionController {
    registry: Arc<dyn GuestRegistry>,
    navigator: Arc<dyn Navigator>,
    state: Arc<RwLock<FormState>>,
    navigation_delay: Duration,
    timer: Mutex<Option<NavigationTimer>>,
}

impl SubmissionController {
    pub fn new(registry: Arc<dyn GuestRegistry>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            registry,
            navigator,
            state: Arc::new(RwLock::new(FormState::default())),
            navigation_delay: DEFAULT_NAVIGATION_DELAY,
            timer: Mutex::new(None),
        }
    }

    pub fn with_navigation_delay(mut self, delay: Duration) -> Self {
        self.navigation_delay = delay;
        self
    }

    /// Record a user edit. Never validates.
    pub fn update_field(&self, field: Field, value: impl Into<String>) {
        self.state.write().draft.set(field, value);
    }

    /// Validate the draft and, when valid, send it to the registry.
    ///
    /// Failures end up in the error map; nothing is returned as an error.
    pub async fn submit(&self) -> SubmitOutcome {
        let draft = {
            let mut state = self.state.write();
            if state.status != SubmissionStatus::Idle {
                tracing::debug!("Submit ignored while {:?}", state.status);
                return SubmitOutcome::Ignored;
            }
            state.errors.clear();
            state.status = SubmissionStatus::Submitting;
            state.draft.clone()
        };
        let _guard = SubmittingGuard { state: &self.state };

        let record = match schema::validate(&draft) {
            Validation::Valid(record) => record,
            Validation::Invalid(errors) => {
                tracing::warn!("Registration rejected: {} invalid field(s)", errors.len());
                let mut state = self.state.write();
                state.errors = errors;
                state.status = SubmissionStatus::Idle;
                return SubmitOutcome::Invalid;
            }
        };

        tracing::info!("Submitting guest registration for {}", record.email());

        match self.registry.create_guest(&record).await {
            Ok(receipt) if receipt.success => {
                tracing::info!("Guest registered");
                self.state.write().status = SubmissionStatus::Succeeded;
                self.arm_navigation();
                SubmitOutcome::Succeeded
            }
            Ok(receipt) => {
                tracing::warn!(
                    "Registry refused registration: {}",
                    receipt.error.as_deref().unwrap_or("no reason given")
                );
                self.fail();
                SubmitOutcome::Failed
            }
            Err(e) => {
                tracing::warn!("Registration failed: {}", e);
                self.fail();
                SubmitOutcome::Failed
            }
        }
    }

    fn fail(&self) {
        let mut state = self.state.write();
        state.errors = ErrorMap::general(GENERAL_SUBMIT_ERROR);
        state.status = SubmissionStatus::Idle;
    }

    fn arm_navigation(&self) {
        let state = Arc::clone(&self.state);
        let navigator = Arc::clone(&self.navigator);
        let delay = self.navigation_delay;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            {
                let mut state = state.write();
                if state.status != SubmissionStatus::Succeeded {
                    return;
                }
                state.status = SubmissionStatus::Idle;
                state.draft.clear();
            }
            tracing::debug!("Navigating to guest list");
            navigator.navigate(Route::GuestList);
        });

        if let Some(previous) = self.timer.lock().replace(NavigationTimer { handle }) {
            previous.cancel();
        }
    }

    /// Drop the pending navigation (the user left the success screen).
    ///
    /// Returns `true` when a transition was still pending. The draft is kept.
    pub fn cancel_pending_navigation(&self) -> bool {
        let pending = match self.timer.lock().take() {
            Some(timer) => {
                let pending = !timer.is_finished();
                timer.cancel();
                pending
            }
            None => false,
        };

        let mut state = self.state.write();
        if state.status == SubmissionStatus::Succeeded {
            state.status = SubmissionStatus::Idle;
        }
        pending
    }

    pub fn state(&self) -> FormState {
        self.state.read().clone()
    }

    pub fn status(&self) -> SubmissionStatus {
        self.state.read().status
    }

    pub fn draft(&self) -> DraftState {
        self.state.read().draft.clone()
    }

    pub fn errors(&self) -> ErrorMap {
        self.state.read().errors.clone()
    }

    /// Value to render in the input; absent reads as empty
    pub fn field_value(&self, field: Field) -> String {
        self.state.read().draft.value_or_empty(field).to_string()
    }

    pub fn field_error(&self, field: Field) -> Option<String> {
        self.state.read().errors.get(field).map(String::from)
    }

    /// Error styling flag for an input
    pub fn has_error(&self, field: Field) -> bool {
        self.state.read().errors.contains(field)
    }

    pub fn general_error(&self) -> Option<String> {
        self.state.read().errors.general_message().map(String::from)
    }

    pub fn is_submit_enabled(&self) -> bool {
        self.status() == SubmissionStatus::Idle
    }

    pub fn submit_label(&self) -> &'static str {
        match self.status() {
            SubmissionStatus::Submitting => "Registering...",
            _ => "Register Guest",
        }
    }

    pub fn success_message(&self) -> Option<&'static str> {
        (self.status() == SubmissionStatus::Succeeded).then_some(SUCCESS_MESSAGE)
    }
}

impl Drop for SubmissionController {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.get_mut().take() {
            timer.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::memory::InMemoryGuestRegistry;

    fn setup() -> (
        Arc<InMemoryGuestRegistry>,
        Arc<SubmissionController>,
        mpsc::UnboundedReceiver<Route>,
    ) {
        let registry = Arc::new(InMemoryGuestRegistry::new());
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = SubmissionController::new(registry.clone(), Arc::new(tx));
        (registry, Arc::new(controller), rx)
    }

    fn fill_valid(controller: &SubmissionController) {
        controller.update_field(Field::Name, "Jane Doe");
        controller.update_field(Field::Email, "jane@x.com");
        controller.update_field(Field::Phone, "0812345678");
        controller.update_field(Field::IdCard, "123456789012");
        controller.update_field(Field::Remark, "Meeting");
    }

    #[tokio::test(start_paused = true)]
    async fn test_valid_draft_is_created_once() {
        let (registry, controller, _rx) = setup();
        fill_valid(&controller);

        assert_eq!(controller.submit().await, SubmitOutcome::Succeeded);

        let created = registry.created_records();
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].name(), "Jane Doe");
        assert_eq!(created[0].email(), "jane@x.com");
        assert_eq!(created[0].phone(), "0812345678");
        assert_eq!(created[0].id_card(), "123456789012");
        assert_eq!(created[0].remark().as_str(), "Meeting");
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_draft_never_reaches_registry() {
        let (registry, controller, _rx) = setup();
        controller.update_field(Field::Name, "");
        controller.update_field(Field::Email, "bad");
        controller.update_field(Field::Phone, "123");
        controller.update_field(Field::IdCard, "x");
        controller.update_field(Field::Remark, "Party");

        assert_eq!(controller.submit().await, SubmitOutcome::Invalid);

        let errors = controller.errors();
        assert_eq!(errors.len(), 5);
        for field in Field::ALL {
            assert!(controller.has_error(field), "missing error for {}", field);
        }
        assert_eq!(registry.create_calls(), 0);
        assert_eq!(controller.status(), SubmissionStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_registry_failure_sets_general_error() {
        let (registry, controller, mut rx) = setup();
        registry.fail_with(ApiError::Transport("connection refused".into()));
        fill_valid(&controller);
        let before = controller.draft();

        assert_eq!(controller.submit().await, SubmitOutcome::Failed);

        let errors = controller.errors();
        assert_eq!(errors, ErrorMap::general(GENERAL_SUBMIT_ERROR));
        assert_eq!(controller.status(), SubmissionStatus::Idle);
        assert_eq!(controller.draft(), before);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_receipt_is_a_failure() {
        let (registry, controller, _rx) = setup();
        registry.reject_creates("Invalid request body");
        fill_valid(&controller);

        assert_eq!(controller.submit().await, SubmitOutcome::Failed);
        assert_eq!(controller.general_error().as_deref(), Some(GENERAL_SUBMIT_ERROR));
    }

    #[tokio::test(start_paused = true)]
    async fn test_success_navigates_after_delay() {
        let (registry, controller, mut rx) = setup();
        fill_valid(&controller);

        assert_eq!(controller.submit().await, SubmitOutcome::Succeeded);
        assert_eq!(controller.status(), SubmissionStatus::Succeeded);
        assert_eq!(controller.success_message(), Some(SUCCESS_MESSAGE));
        assert!(!controller.is_submit_enabled());

        // A second submit while the banner shows must not register twice
        assert_eq!(controller.submit().await, SubmitOutcome::Ignored);
        assert_eq!(controller.status(), SubmissionStatus::Succeeded);
        assert_eq!(registry.create_calls(), 1);

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert_eq!(controller.status(), SubmissionStatus::Succeeded);
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(rx.try_recv(), Ok(Route::GuestList));
        assert_eq!(controller.status(), SubmissionStatus::Idle);
        assert!(controller.draft().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_submitting_is_visible_and_exclusive() {
        let (registry, controller, _rx) = setup();
        registry.set_latency(Duration::from_secs(1));
        fill_valid(&controller);

        let background = controller.clone();
        let first = tokio::spawn(async move { background.submit().await });
        tokio::task::yield_now().await;

        assert_eq!(controller.status(), SubmissionStatus::Submitting);
        assert_eq!(controller.submit_label(), "Registering...");
        assert!(!controller.is_submit_enabled());
        assert_eq!(controller.submit().await, SubmitOutcome::Ignored);

        assert_eq!(first.await.unwrap(), SubmitOutcome::Succeeded);
        assert_eq!(registry.create_calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_submit_does_not_stick() {
        let (registry, controller, _rx) = setup();
        registry.set_latency(Duration::from_secs(10));
        fill_valid(&controller);

        let res = tokio::time::timeout(Duration::from_millis(100), controller.submit()).await;
        assert!(res.is_err());
        assert_eq!(controller.status(), SubmissionStatus::Idle);
        assert!(controller.is_submit_enabled());
    }

    #[tokio::test(start_paused = true)]
    async fn test_resubmit_after_failure_clears_errors() {
        let (registry, controller, _rx) = setup();
        registry.fail_with(ApiError::Status { status: 500, message: "down".into() });
        fill_valid(&controller);
        assert_eq!(controller.submit().await, SubmitOutcome::Failed);

        registry.recover();
        assert_eq!(controller.submit().await, SubmitOutcome::Succeeded);
        assert!(controller.errors().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_edits_do_not_validate() {
        let (_registry, controller, _rx) = setup();
        controller.update_field(Field::Email, "bad");
        assert!(controller.errors().is_empty());

        assert_eq!(controller.submit().await, SubmitOutcome::Invalid);
        assert!(controller.has_error(Field::Email));

        // Errors stay until the next submit
        controller.update_field(Field::Email, "jane@x.com");
        assert!(controller.has_error(Field::Email));
        assert_eq!(controller.field_value(Field::Email), "jane@x.com");
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_pending_navigation() {
        let (_registry, controller, mut rx) = setup();
        fill_valid(&controller);
        controller.submit().await;

        assert!(controller.cancel_pending_navigation());
        assert_eq!(controller.status(), SubmissionStatus::Idle);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
        assert_eq!(controller.field_value(Field::Name), "Jane Doe");
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropping_controller_cancels_navigation() {
        let (_registry, controller, mut rx) = setup();
        fill_valid(&controller);
        controller.submit().await;
        drop(controller);

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_custom_delay() {
        let registry = Arc::new(InMemoryGuestRegistry::new());
        let (tx, mut rx) = mpsc::unbounded_channel();
        let controller = SubmissionController::new(registry, Arc::new(tx))
            .with_navigation_delay(Duration::from_millis(250));
        fill_valid(&controller);
        controller.submit().await;

        tokio::time::sleep(Duration::from_millis(251)).await;
        assert_eq!(rx.try_recv(), Ok(Route::GuestList));
    }
}
