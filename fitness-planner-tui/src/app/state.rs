// src/app/state.rs
use fitness_planner_lib::{
    FormField, LastOutcome, PlanError, PlannerForm, PlannerService, SettledSubmission,
    SubmitBlocked,
};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, warn};

use super::worker::spawn_submission;

const SPINNER_FRAMES: [char; 4] = ['|', '/', '-', '\\'];

// Which control on the page has focus
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FocusedField {
    Age,
    Gender,
    FitnessLevel,
    ExerciseFrequency,
    Submit,
}

impl FocusedField {
    const ORDER: [Self; 5] = [
        Self::Age,
        Self::Gender,
        Self::FitnessLevel,
        Self::ExerciseFrequency,
        Self::Submit,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn previous(self) -> Self {
        let len = Self::ORDER.len();
        Self::ORDER[(self.position() + len - 1) % len]
    }

    /// The form field behind this control; `None` for the submit button.
    pub const fn form_field(self) -> Option<FormField> {
        match self {
            Self::Age => Some(FormField::Age),
            Self::Gender => Some(FormField::Gender),
            Self::FitnessLevel => Some(FormField::FitnessLevel),
            Self::ExerciseFrequency => Some(FormField::ExerciseFrequency),
            Self::Submit => None,
        }
    }
}

impl From<FormField> for FocusedField {
    fn from(field: FormField) -> Self {
        match field {
            FormField::Age => Self::Age,
            FormField::Gender => Self::Gender,
            FormField::FitnessLevel => Self::FitnessLevel,
            FormField::ExerciseFrequency => Self::ExerciseFrequency,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActiveModal {
    None,
    Help,
}

// Holds the application state
pub struct App {
    pub service: PlannerService,
    pub form: PlannerForm,
    pub focused_field: FocusedField,
    pub active_modal: ActiveModal,
    pub should_quit: bool,
    pub result_scroll: u16,
    spinner_tick: usize,
    pending: Option<Receiver<SettledSubmission>>,
}

impl App {
    pub fn new(service: PlannerService) -> Self {
        let form = service.new_form();
        Self {
            service,
            form,
            focused_field: FocusedField::Age,
            active_modal: ActiveModal::None,
            should_quit: false,
            result_scroll: 0,
            spinner_tick: 0,
            pending: None,
        }
    }

    /// Called once per loop iteration, before drawing.
    pub fn tick(&mut self) {
        self.form.toasts_mut().prune_expired(Instant::now());

        let Some(receiver) = &self.pending else {
            return;
        };
        self.spinner_tick = self.spinner_tick.wrapping_add(1);

        match receiver.try_recv() {
            Ok(settled) => {
                self.pending = None;
                match self.form.finish_submit(settled) {
                    Ok(LastOutcome::Success) => self.result_scroll = 0,
                    Ok(LastOutcome::Error) => {}
                    Err(e) => warn!("Dropping settled submission: {}", e),
                }
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                // The worker dropped its submission, which already released the gate.
                self.pending = None;
                warn!("Submission worker exited without a result");
                self.form.report_failure(&PlanError::Network(
                    "submission worker exited unexpectedly".to_string(),
                ));
            }
        }
    }

    /// Starts a submission on a worker thread. Invalid input moves focus to
    /// the first offending field instead.
    ///
    /// The client is built per submission so `DIFY_*` overrides are read at
    /// call time.
    pub fn submit(&mut self) {
        match self.form.begin_submit() {
            Ok(pending) => {
                let client = Arc::new(self.service.workflow_client());
                self.pending = Some(spawn_submission(client, pending));
            }
            Err(SubmitBlocked::InFlight) => {
                debug!("Submit ignored: a request is already in flight");
            }
            Err(SubmitBlocked::Invalid(errors)) => {
                debug!("Submit blocked by validation: {}", errors);
                if let Some(field) = errors.first_field() {
                    self.focused_field = field.into();
                }
            }
        }
    }

    pub fn cycle_focused(&mut self, forward: bool) {
        match self.focused_field {
            FocusedField::Gender => self.form.cycle_gender(forward),
            FocusedField::FitnessLevel => self.form.cycle_fitness_level(forward),
            FocusedField::ExerciseFrequency => self.form.cycle_exercise_frequency(forward),
            FocusedField::Age | FocusedField::Submit => {}
        }
    }

    pub fn spinner(&self) -> char {
        SPINNER_FRAMES[self.spinner_tick % SPINNER_FRAMES.len()]
    }
}
