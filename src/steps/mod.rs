//! Per-step editing and confirmation.
//!
//! A [`StepController`] owns a draft of one step's fields. Edits touch only
//! the draft; [`StepController::confirm`] validates it and, on success,
//! merges the result into the [`FormStore`] and marks the step complete.

pub mod basic_info;
pub mod preferences;
pub mod schedule;
pub mod services;
pub mod skills;

use std::{fmt::Debug, marker::PhantomData};

use tracing::{debug, info};

use crate::{
    answers::{FormAnswers, FormPatch},
    errors::Result,
    sequencer::{next_of, Position, StepNumber},
    store::FormStore,
    validation::FieldErrors,
};

pub use basic_info::{BasicInfoDraft, BasicInfoStep};
pub use preferences::{PreferencesDraft, PreferencesStep};
pub use schedule::{ScheduleDraft, ScheduleStep};
pub use services::{ServicesDraft, ServicesStep};
pub use skills::{SkillsDraft, SkillsStep};

/// Schema of one data step.
pub trait StepForm {
    const STEP: StepNumber;

    /// Field names owned by this step, in display order.
    const FIELDS: &'static [&'static str];

    type Draft: Clone + Debug + Default + PartialEq;

    /// Copies this step's slice out of the stored answers.
    fn seed(answers: &FormAnswers) -> Self::Draft;

    /// Either the full normalized slice or at least one field error.
    fn validate(draft: &Self::Draft) -> std::result::Result<FormPatch, FieldErrors>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// Nothing was written; the draft is kept for correction.
    Rejected(FieldErrors),
    /// The slice was merged and the step marked complete.
    Advanced(Position),
}

#[derive(Debug, Clone)]
pub struct StepController<S: StepForm> {
    draft: S::Draft,
    seeded: S::Draft,
    errors: FieldErrors,
    _step: PhantomData<S>,
}

impl<S: StepForm> StepController<S> {
    pub fn new(store: &FormStore) -> Self {
        let seeded = S::seed(store.answers());
        Self {
            draft: seeded.clone(),
            seeded,
            errors: FieldErrors::new(),
            _step: PhantomData,
        }
    }

    pub fn step(&self) -> StepNumber {
        S::STEP
    }

    pub fn draft(&self) -> &S::Draft {
        &self.draft
    }

    /// Errors from the most recent edit or confirmation.
    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Changes the draft and re-runs validation. Errors are informational and
    /// never prevent further edits.
    pub fn edit<R>(&mut self, change: impl FnOnce(&mut S::Draft) -> R) -> R {
        let result = change(&mut self.draft);
        self.errors = S::validate(&self.draft).err().unwrap_or_default();
        result
    }

    pub fn is_dirty(&self) -> bool {
        self.draft != self.seeded
    }

    /// Re-seeds the draft when the stored slice changed since it was last
    /// seeded, for example after a reset. Returns whether it did.
    pub fn resync(&mut self, store: &FormStore) -> bool {
        let fresh = S::seed(store.answers());
        if fresh == self.seeded {
            return false;
        }
        debug!(step = S::STEP.get(), "stored answers changed; re-seeding draft");
        self.draft = fresh.clone();
        self.seeded = fresh;
        self.errors = FieldErrors::new();
        true
    }

    pub fn confirm(&mut self, store: &mut FormStore) -> Result<StepOutcome> {
        let patch = match S::validate(&self.draft) {
            Ok(patch) => patch,
            Err(errors) => {
                debug!(
                    step = S::STEP.get(),
                    fields = ?errors.fields().collect::<Vec<_>>(),
                    "step rejected"
                );
                self.errors = errors.clone();
                return Ok(StepOutcome::Rejected(errors));
            }
        };

        store.commit_step(patch, S::STEP)?;

        self.seeded = S::seed(store.answers());
        self.draft = self.seeded.clone();
        self.errors = FieldErrors::new();

        let next = next_of(Position::Step(S::STEP)).unwrap_or(Position::Review);
        info!(step = S::STEP.get(), next = %next, "step accepted");
        Ok(StepOutcome::Advanced(next))
    }
}

/// Validates `S` against already stored answers.
pub fn check<S: StepForm>(answers: &FormAnswers) -> Option<(StepNumber, FieldErrors)> {
    S::validate(&S::seed(answers))
        .err()
        .map(|errors| (S::STEP, errors))
}

/// A controller for whichever step is currently on screen.
#[derive(Debug, Clone)]
pub enum ActiveStep {
    BasicInfo(StepController<BasicInfoStep>),
    Schedule(StepController<ScheduleStep>),
    Services(StepController<ServicesStep>),
    Skills(StepController<SkillsStep>),
    Preferences(StepController<PreferencesStep>),
}

macro_rules! each_step {
    ($value:expr, $controller:ident => $body:expr) => {
        match $value {
            ActiveStep::BasicInfo($controller) => $body,
            ActiveStep::Schedule($controller) => $body,
            ActiveStep::Services($controller) => $body,
            ActiveStep::Skills($controller) => $body,
            ActiveStep::Preferences($controller) => $body,
        }
    };
}

impl ActiveStep {
    pub fn open(step: StepNumber, store: &FormStore) -> Self {
        match step.get() {
            1 => ActiveStep::BasicInfo(StepController::new(store)),
            2 => ActiveStep::Schedule(StepController::new(store)),
            3 => ActiveStep::Services(StepController::new(store)),
            4 => ActiveStep::Skills(StepController::new(store)),
            _ => ActiveStep::Preferences(StepController::new(store)),
        }
    }

    pub fn step(&self) -> StepNumber {
        each_step!(self, controller => controller.step())
    }

    pub fn fields(&self) -> &'static [&'static str] {
        match self {
            ActiveStep::BasicInfo(_) => BasicInfoStep::FIELDS,
            ActiveStep::Schedule(_) => ScheduleStep::FIELDS,
            ActiveStep::Services(_) => ServicesStep::FIELDS,
            ActiveStep::Skills(_) => SkillsStep::FIELDS,
            ActiveStep::Preferences(_) => PreferencesStep::FIELDS,
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        each_step!(self, controller => controller.errors())
    }

    pub fn is_dirty(&self) -> bool {
        each_step!(self, controller => controller.is_dirty())
    }

    pub fn resync(&mut self, store: &FormStore) -> bool {
        each_step!(self, controller => controller.resync(store))
    }

    pub fn confirm(&mut self, store: &mut FormStore) -> Result<StepOutcome> {
        each_step!(self, controller => controller.confirm(store))
    }
}

/// Step owning `field`, if any.
pub fn step_for_field(field: &str) -> Option<StepNumber> {
    [
        (BasicInfoStep::STEP, BasicInfoStep::FIELDS),
        (ScheduleStep::STEP, ScheduleStep::FIELDS),
        (ServicesStep::STEP, ServicesStep::FIELDS),
        (SkillsStep::STEP, SkillsStep::FIELDS),
        (PreferencesStep::STEP, PreferencesStep::FIELDS),
    ]
    .into_iter()
    .find(|(_, names)| names.iter().any(|name| *name == field))
    .map(|(step, _)| step)
}
