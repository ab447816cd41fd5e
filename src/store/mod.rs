//! Shared, persisted form state.
//!
//! [`FormStore`] is the single owner of the accumulated answers and the set of
//! completed steps. Every mutation goes through its methods and is written to
//! the backend before the call returns.

pub mod json_backend;
pub mod memory;

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    answers::{FormAnswers, FormPatch},
    errors::Result,
    sequencer::StepNumber,
};

pub use json_backend::JsonFileBackend;
pub use memory::MemoryBackend;

/// Layout version of the persisted blob. Blobs carrying any other version are
/// discarded on load.
pub const STATE_VERSION: u32 = 0;

pub const LOAD_WARNING: &str = "Saved progress could not be restored; starting with an empty form";

/// Abstraction over where the serialized state lives.
pub trait StateBackend: Send + Sync {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<PersistedState>>;
    fn save(&self, state: &PersistedState) -> Result<()>;

    fn describe(&self) -> String {
        "custom backend".into()
    }
}

/// On-disk layout: `{ "state": { "formData": …, "completedSteps": […] }, "version": 0 }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersistedState {
    pub state: WizardState,
    pub version: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardState {
    #[serde(default)]
    pub form_data: FormAnswers,
    #[serde(default)]
    pub completed_steps: BTreeSet<StepNumber>,
}

pub struct FormStore {
    backend: Box<dyn StateBackend>,
    state: WizardState,
    load_warning: Option<String>,
}

impl FormStore {
    /// Opens the store, restoring whatever the backend holds. Unreadable or
    /// foreign state is replaced by the empty state and reported through
    /// [`FormStore::take_load_warning`].
    pub fn open(backend: Box<dyn StateBackend>) -> Self {
        let (state, load_warning) = match backend.load() {
            Ok(Some(persisted)) if persisted.version == STATE_VERSION => {
                debug!(
                    backend = %backend.describe(),
                    completed = persisted.state.completed_steps.len(),
                    "restored saved form state"
                );
                (persisted.state, None)
            }
            Ok(Some(persisted)) => {
                warn!(
                    backend = %backend.describe(),
                    version = persisted.version,
                    "discarding saved form state with unknown version"
                );
                (WizardState::default(), Some(LOAD_WARNING.to_string()))
            }
            Ok(None) => (WizardState::default(), None),
            Err(err) => {
                warn!(
                    backend = %backend.describe(),
                    error = %err,
                    "failed to load saved form state; using defaults"
                );
                (WizardState::default(), Some(LOAD_WARNING.to_string()))
            }
        };
        Self {
            backend,
            state,
            load_warning,
        }
    }

    pub fn in_memory() -> Self {
        Self::open(Box::new(MemoryBackend::new()))
    }

    pub fn answers(&self) -> &FormAnswers {
        &self.state.form_data
    }

    pub fn get_answers(&self) -> FormAnswers {
        self.state.form_data.clone()
    }

    /// Shallow merge without validation; last write wins per field.
    pub fn update_answers(&mut self, patch: FormPatch) -> Result<()> {
        let touched = self.state.form_data.merge(patch);
        debug!(fields = ?touched, "updated form answers");
        self.persist()
    }

    /// Idempotent. Completed steps stay sorted ascending.
    pub fn mark_step_complete(&mut self, step: StepNumber) -> Result<()> {
        if !self.state.completed_steps.insert(step) {
            return Ok(());
        }
        info!(step = step.get(), "step completed");
        self.persist()
    }

    /// Merges `patch` and marks `step` complete in a single save. On failure
    /// neither change is kept.
    pub fn commit_step(&mut self, patch: FormPatch, step: StepNumber) -> Result<()> {
        let mut candidate = self.state.clone();
        let touched = candidate.form_data.merge(patch);
        candidate.completed_steps.insert(step);
        self.persist_state(&candidate)?;
        debug!(fields = ?touched, "updated form answers");
        info!(step = step.get(), "step completed");
        self.state = candidate;
        Ok(())
    }

    pub fn is_step_complete(&self, step: StepNumber) -> bool {
        self.state.completed_steps.contains(&step)
    }

    pub fn completed_steps(&self) -> Vec<StepNumber> {
        self.state.completed_steps.iter().copied().collect()
    }

    /// Restores the empty answers and clears step completion.
    pub fn reset(&mut self) -> Result<()> {
        self.state = WizardState::default();
        info!("form state reset");
        self.persist()
    }

    pub fn snapshot(&self) -> PersistedState {
        PersistedState {
            state: self.state.clone(),
            version: STATE_VERSION,
        }
    }

    /// Returns the load warning once; later calls yield `None`.
    pub fn take_load_warning(&mut self) -> Option<String> {
        self.load_warning.take()
    }

    pub fn backend_description(&self) -> String {
        self.backend.describe()
    }

    fn persist(&self) -> Result<()> {
        self.persist_state(&self.state)
    }

    fn persist_state(&self, state: &WizardState) -> Result<()> {
        let persisted = PersistedState {
            state: state.clone(),
            version: STATE_VERSION,
        };
        self.backend.save(&persisted).map_err(|err| {
            warn!(
                backend = %self.backend.describe(),
                error = %err,
                "failed to persist form state"
            );
            err
        })
    }
}

impl std::fmt::Debug for FormStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormStore")
            .field("backend", &self.backend.describe())
            .field("state", &self.state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::Role;

    fn step(n: u8) -> StepNumber {
        StepNumber::new(n).expect("valid step")
    }

    #[test]
    fn disjoint_patches_accumulate() {
        let mut store = FormStore::in_memory();
        store
            .update_answers(FormPatch {
                full_name: Some("Ada Lovelace".into()),
                ..FormPatch::default()
            })
            .expect("update");
        store
            .update_answers(FormPatch {
                role: Some(Role::Developer),
                ..FormPatch::default()
            })
            .expect("update");
        assert_eq!(store.answers().full_name, "Ada Lovelace");
        assert_eq!(store.answers().role, Some(Role::Developer));
    }

    #[test]
    fn overlapping_patches_keep_last_value() {
        let mut store = FormStore::in_memory();
        for name in ["First", "Second"] {
            store
                .update_answers(FormPatch {
                    full_name: Some(name.into()),
                    ..FormPatch::default()
                })
                .expect("update");
        }
        assert_eq!(store.answers().full_name, "Second");
    }

    #[test]
    fn completion_is_idempotent_and_sorted() {
        let mut store = FormStore::in_memory();
        store.mark_step_complete(step(3)).expect("mark");
        store.mark_step_complete(step(1)).expect("mark");
        store.mark_step_complete(step(3)).expect("mark");
        assert_eq!(store.completed_steps(), vec![step(1), step(3)]);
        assert!(store.is_step_complete(step(3)));
        assert!(!store.is_step_complete(step(2)));
    }

    #[test]
    fn reset_restores_defaults() {
        let mut store = FormStore::in_memory();
        store
            .update_answers(FormPatch {
                terms_accepted: Some(true),
                ..FormPatch::default()
            })
            .expect("update");
        store.mark_step_complete(step(5)).expect("mark");
        store.reset().expect("reset");
        assert_eq!(store.get_answers(), FormAnswers::default());
        assert!(StepNumber::all().all(|n| !store.is_step_complete(n)));
    }

    #[test]
    fn snapshot_uses_persisted_layout() {
        let mut store = FormStore::in_memory();
        store.mark_step_complete(step(2)).expect("mark");
        let json = serde_json::to_value(store.snapshot()).expect("json");
        assert_eq!(json["version"], 0);
        assert_eq!(json["state"]["completedSteps"], serde_json::json!([2]));
        assert_eq!(json["state"]["formData"]["fullName"], "");
    }

    #[test]
    fn failed_commit_keeps_previous_state() {
        let mut store = FormStore::open(Box::new(MemoryBackend::failing()));
        let err = store
            .commit_step(
                FormPatch {
                    full_name: Some("Ada Lovelace".into()),
                    ..FormPatch::default()
                },
                step(1),
            )
            .expect_err("save fails");
        assert!(matches!(err, crate::errors::WizardError::StorageError(_)));
        assert_eq!(store.answers().full_name, "");
        assert!(!store.is_step_complete(step(1)));
    }

    #[test]
    fn commit_records_answers_and_completion_together() {
        let backend = MemoryBackend::new();
        let mut store = FormStore::open(Box::new(backend.clone()));
        store
            .commit_step(
                FormPatch {
                    role: Some(Role::Designer),
                    ..FormPatch::default()
                },
                step(1),
            )
            .expect("commit");
        let reopened = FormStore::open(Box::new(backend));
        assert_eq!(reopened.answers().role, Some(Role::Designer));
        assert!(reopened.is_step_complete(step(1)));
    }
}
