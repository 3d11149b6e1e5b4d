//! Planner form state and the submission lifecycle.
//!
//! A submission moves `Idle -> Submitting -> {Success, Error} -> Idle`. The
//! `Submitting` state is held by an [`InFlightGuard`]; while one exists the
//! form refuses to start another submission, and dropping it (on any exit
//! path) returns the form to `Idle`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::form::{
    cycle_option, ExerciseFrequency, FitnessLevel, FormField, FormInput, FormValues, Gender,
    ValidationErrors,
};
use crate::toast::{ToastConfig, ToastKind, ToastQueue};
use crate::workflow::{PlanError, WorkflowApi};

pub const ERROR_TOAST_TITLE: &str = "エラー";
pub const ERROR_TOAST_MESSAGE: &str =
    "トレーニングメニューの取得に失敗しました。もう一度お試しください。";

/// Shared loading flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct SubmissionGate {
    in_flight: Arc<AtomicBool>,
}

impl SubmissionGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the flag if it is clear. `None` means a submission is already running.
    pub fn try_acquire(&self) -> Option<InFlightGuard> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightGuard {
                in_flight: Arc::clone(&self.in_flight),
            })
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

/// Clears the loading flag when dropped.
#[derive(Debug)]
pub struct InFlightGuard {
    in_flight: Arc<AtomicBool>,
}

impl InFlightGuard {
    /// True if this guard holds `gate`'s flag.
    pub fn belongs_to(&self, gate: &SubmissionGate) -> bool {
        Arc::ptr_eq(&self.in_flight, &gate.in_flight)
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.in_flight.store(false, Ordering::Release);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionPhase {
    Idle,
    Submitting,
}

/// How the most recent settled submission ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LastOutcome {
    Success,
    Error,
}

#[derive(Error, Debug)]
pub enum SubmitBlocked {
    #[error("Form input is invalid: {0}")]
    Invalid(ValidationErrors),
    #[error("A submission is already in flight.")]
    InFlight,
}

/// Returned by [`PlannerForm::finish_submit`] when the submission was begun
/// on another form. That form still shows as loading until it receives it.
#[derive(Error, Debug)]
#[error("Submission was started by a different form")]
pub struct ForeignSubmission(pub SettledSubmission);

/// Validated values plus the guard that keeps the form in `Submitting`.
#[derive(Debug)]
pub struct PendingSubmission {
    values: FormValues,
    guard: InFlightGuard,
}

impl PendingSubmission {
    pub const fn values(&self) -> &FormValues {
        &self.values
    }

    /// Performs the single workflow call for this submission.
    pub async fn execute<A: WorkflowApi>(self, api: &A) -> SettledSubmission {
        let result = api.run_workflow(&self.values).await;
        self.settle(result)
    }

    /// Settles without calling the API, e.g. when the call could not be started.
    pub fn settle(self, result: Result<String, PlanError>) -> SettledSubmission {
        SettledSubmission {
            result,
            guard: self.guard,
        }
    }
}

/// A finished call that has not been applied to the form yet. The form
/// stays loading until [`PlannerForm::finish_submit`] consumes it.
#[derive(Debug)]
pub struct SettledSubmission {
    result: Result<String, PlanError>,
    guard: InFlightGuard,
}

impl SettledSubmission {
    pub const fn result(&self) -> &Result<String, PlanError> {
        &self.result
    }
}

#[derive(Debug)]
pub struct PlannerForm {
    input: FormInput,
    field_errors: ValidationErrors,
    training_menu: Option<String>,
    last_outcome: Option<LastOutcome>,
    toasts: ToastQueue,
    gate: SubmissionGate,
}

impl Default for PlannerForm {
    fn default() -> Self {
        Self::new(ToastConfig::default())
    }
}

impl PlannerForm {
    pub fn new(toast_config: ToastConfig) -> Self {
        Self {
            input: FormInput::default(),
            field_errors: ValidationErrors::new(),
            training_menu: None,
            last_outcome: None,
            toasts: ToastQueue::new(toast_config),
            gate: SubmissionGate::new(),
        }
    }

    pub const fn input(&self) -> &FormInput {
        &self.input
    }

    pub fn input_mut(&mut self) -> &mut FormInput {
        &mut self.input
    }

    pub fn set_age_text(&mut self, text: impl Into<String>) {
        self.input.age = text.into();
    }

    pub fn push_age_char(&mut self, c: char) {
        self.input.age.push(c);
    }

    pub fn pop_age_char(&mut self) {
        self.input.age.pop();
    }

    pub fn cycle_gender(&mut self, forward: bool) {
        let current = self.input.gender.parse::<Gender>().unwrap_or_default();
        self.input.gender = cycle_option(current, forward).to_string();
    }

    pub fn cycle_fitness_level(&mut self, forward: bool) {
        let current = self
            .input
            .fitness_level
            .parse::<FitnessLevel>()
            .unwrap_or_default();
        self.input.fitness_level = cycle_option(current, forward).to_string();
    }

    pub fn cycle_exercise_frequency(&mut self, forward: bool) {
        let current = self
            .input
            .exercise_frequency
            .parse::<ExerciseFrequency>()
            .unwrap_or_default();
        self.input.exercise_frequency = cycle_option(current, forward).to_string();
    }

    pub fn field_error(&self, field: FormField) -> Option<&str> {
        self.field_errors.get(field)
    }

    pub const fn field_errors(&self) -> &ValidationErrors {
        &self.field_errors
    }

    /// Validates the current input and records per-field errors for display.
    ///
    /// # Errors
    /// Returns the collected `ValidationErrors` if any field is invalid.
    pub fn validate(&mut self) -> Result<FormValues, ValidationErrors> {
        match self.input.validate() {
            Ok(values) => {
                self.field_errors = ValidationErrors::new();
                Ok(values)
            }
            Err(errors) => {
                self.field_errors = errors.clone();
                Err(errors)
            }
        }
    }

    /// Moves the form to `Submitting`.
    ///
    /// # Errors
    /// - `SubmitBlocked::InFlight` while another submission holds the gate.
    /// - `SubmitBlocked::Invalid` if validation fails; no request is made.
    pub fn begin_submit(&mut self) -> Result<PendingSubmission, SubmitBlocked> {
        if self.gate.is_busy() {
            return Err(SubmitBlocked::InFlight);
        }
        let values = self.validate().map_err(SubmitBlocked::Invalid)?;
        let guard = self.gate.try_acquire().ok_or(SubmitBlocked::InFlight)?;
        info!("Submitting planner form: {:?}", values);
        Ok(PendingSubmission { values, guard })
    }

    /// Applies a settled call and returns the form to `Idle`.
    ///
    /// # Errors
    /// Returns `ForeignSubmission`, untouched, if `settled` was begun on a
    /// different form. Neither form's state changes.
    pub fn finish_submit(
        &mut self,
        settled: SettledSubmission,
    ) -> Result<LastOutcome, ForeignSubmission> {
        if !settled.guard.belongs_to(&self.gate) {
            warn!("Refusing to apply a submission begun on another form");
            return Err(ForeignSubmission(settled));
        }
        Ok(self.apply_settled(settled))
    }

    fn apply_settled(&mut self, settled: SettledSubmission) -> LastOutcome {
        let SettledSubmission { result, guard } = settled;
        let outcome = match result {
            Ok(text) => {
                self.training_menu = Some(text);
                self.field_errors = ValidationErrors::new();
                LastOutcome::Success
            }
            Err(err) => {
                self.report_failure(&err);
                LastOutcome::Error
            }
        };
        self.last_outcome = Some(outcome);
        drop(guard);
        outcome
    }

    /// Logs `err` and shows the generic error toast. The displayed plan is kept.
    pub fn report_failure(&mut self, err: &PlanError) {
        error!("Error: {}", err);
        self.toasts
            .add_titled(ERROR_TOAST_TITLE, ERROR_TOAST_MESSAGE, ToastKind::Error);
        self.last_outcome = Some(LastOutcome::Error);
    }

    /// Begin, execute and finish in one step.
    ///
    /// # Errors
    /// Returns `SubmitBlocked` when the submission never started. Request
    /// failures are not errors here; they surface as a toast and
    /// `LastOutcome::Error`.
    pub async fn submit<A: WorkflowApi>(&mut self, api: &A) -> Result<LastOutcome, SubmitBlocked> {
        let pending = self.begin_submit()?;
        let settled = pending.execute(api).await;
        Ok(self.apply_settled(settled))
    }

    pub fn training_menu(&self) -> Option<&str> {
        self.training_menu.as_deref()
    }

    pub const fn last_outcome(&self) -> Option<LastOutcome> {
        self.last_outcome
    }

    pub fn is_loading(&self) -> bool {
        self.gate.is_busy()
    }

    pub fn phase(&self) -> SubmissionPhase {
        if self.is_loading() {
            SubmissionPhase::Submitting
        } else {
            SubmissionPhase::Idle
        }
    }

    /// A handle to the loading flag for observers outside the form.
    pub fn loading_flag(&self) -> SubmissionGate {
        self.gate.clone()
    }

    pub const fn toasts(&self) -> &ToastQueue {
        &self.toasts
    }

    pub fn toasts_mut(&mut self) -> &mut ToastQueue {
        &mut self.toasts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicUsize;

    enum Reply {
        Text(&'static str),
        Status(u16),
    }

    struct MockApi {
        reply: Reply,
        calls: AtomicUsize,
    }

    impl MockApi {
        fn new(reply: Reply) -> Self {
            Self {
                reply,
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl WorkflowApi for MockApi {
        async fn run_workflow(&self, _inputs: &FormValues) -> Result<String, PlanError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Reply::Text(text) => Ok(text.to_string()),
                Reply::Status(status) => Err(PlanError::Server { status }),
            }
        }
    }

    fn error_toasts(form: &PlannerForm) -> usize {
        form.toasts()
            .iter()
            .filter(|t| t.kind == ToastKind::Error)
            .count()
    }

    #[tokio::test]
    async fn out_of_range_age_never_reaches_the_network() {
        let api = MockApi::new(Reply::Text("unused"));
        for age in ["0", "121", "-1", "", "thirty"] {
            let mut form = PlannerForm::default();
            form.set_age_text(age);
            let result = form.submit(&api).await;
            assert!(matches!(result, Err(SubmitBlocked::Invalid(_))), "age {age:?}");
            assert!(form.field_error(FormField::Age).is_some());
            assert!(!form.is_loading());
        }
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn enum_outside_its_set_is_blocked() {
        let api = MockApi::new(Reply::Text("unused"));
        let mut form = PlannerForm::default();
        form.input_mut().fitness_level = "プロ".into();
        assert!(matches!(
            form.submit(&api).await,
            Err(SubmitBlocked::Invalid(_))
        ));
        assert!(form.field_error(FormField::FitnessLevel).is_some());
        assert_eq!(api.calls(), 0);
    }

    #[tokio::test]
    async fn success_stores_text_verbatim() {
        let api = MockApi::new(Reply::Text("X"));
        let mut form = PlannerForm::default();
        let outcome = form.submit(&api).await.unwrap();
        assert_eq!(outcome, LastOutcome::Success);
        assert_eq!(form.training_menu(), Some("X"));
        assert_eq!(api.calls(), 1);
        assert!(form.toasts().is_empty());
    }

    #[tokio::test]
    async fn server_error_keeps_plan_and_adds_one_toast() {
        let mut form = PlannerForm::default();
        form.submit(&MockApi::new(Reply::Text("previous plan")))
            .await
            .unwrap();

        let failing = MockApi::new(Reply::Status(500));
        let outcome = form.submit(&failing).await.unwrap();
        assert_eq!(outcome, LastOutcome::Error);
        assert_eq!(form.training_menu(), Some("previous plan"));
        assert_eq!(error_toasts(&form), 1);
        let toast = form.toasts().iter().next().unwrap();
        assert_eq!(toast.title.as_deref(), Some(ERROR_TOAST_TITLE));
        assert_eq!(toast.message, ERROR_TOAST_MESSAGE);
    }

    #[tokio::test]
    async fn failure_without_previous_plan_shows_nothing() {
        let mut form = PlannerForm::default();
        form.submit(&MockApi::new(Reply::Status(401))).await.unwrap();
        assert_eq!(form.training_menu(), None);
        assert_eq!(error_toasts(&form), 1);
        assert_eq!(form.last_outcome(), Some(LastOutcome::Error));
    }

    #[tokio::test]
    async fn loading_spans_begin_to_finish() {
        let api = MockApi::new(Reply::Text("plan"));
        let mut form = PlannerForm::default();
        let observer = form.loading_flag();
        assert_eq!(form.phase(), SubmissionPhase::Idle);

        let pending = form.begin_submit().unwrap();
        assert!(observer.is_busy());
        assert_eq!(form.phase(), SubmissionPhase::Submitting);
        assert!(matches!(form.begin_submit(), Err(SubmitBlocked::InFlight)));

        let settled = pending.execute(&api).await;
        assert!(observer.is_busy());

        form.finish_submit(settled).unwrap();
        assert!(!observer.is_busy());
        assert_eq!(form.phase(), SubmissionPhase::Idle);
        assert_eq!(api.calls(), 1);
    }

    #[test]
    fn result_from_another_form_is_refused() {
        let mut first = PlannerForm::default();
        let mut second = PlannerForm::default();
        let settled = first.begin_submit().unwrap().settle(Ok("x".to_string()));

        let ForeignSubmission(settled) = second.finish_submit(settled).unwrap_err();
        assert!(first.is_loading());
        assert_eq!(second.training_menu(), None);
        assert_eq!(second.last_outcome(), None);

        assert_eq!(first.finish_submit(settled).unwrap(), LastOutcome::Success);
        assert!(!first.is_loading());
        assert_eq!(first.training_menu(), Some("x"));
    }

    #[test]
    fn dropping_a_pending_submission_releases_the_gate() {
        let mut form = PlannerForm::default();
        let pending = form.begin_submit().unwrap();
        assert!(form.is_loading());
        drop(pending);
        assert!(!form.is_loading());
        assert!(form.begin_submit().is_ok());
    }

    #[test]
    fn cycling_recovers_from_invalid_text() {
        let mut form = PlannerForm::default();
        form.input_mut().gender = "???".into();
        form.cycle_gender(true);
        assert_eq!(form.input().gender, "男性");
        form.cycle_exercise_frequency(false);
        assert_eq!(form.input().exercise_frequency, "週1回");
    }
}
