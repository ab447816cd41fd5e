use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    errors::{Result, WizardError},
    utils::{paths, persistence::write_atomic},
};

use super::{PersistedState, StateBackend};

/// Keeps the form state in `<base>/<storage-key>.json`.
#[derive(Debug, Clone)]
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(base: &Path, storage_key: &str) -> Self {
        Self::at_path(paths::state_file_in(base, storage_key))
    }

    pub fn at_path(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateBackend for JsonFileBackend {
    fn load(&self) -> Result<Option<PersistedState>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&self.path)?;
        let state = serde_json::from_str(&data).map_err(|err| {
            WizardError::StorageError(format!(
                "`{}` is not a saved form state: {err}",
                self.path.display()
            ))
        })?;
        Ok(Some(state))
    }

    fn save(&self, state: &PersistedState) -> Result<()> {
        let json = serde_json::to_string_pretty(state)?;
        write_atomic(&self.path, &json)?;
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{answers::FormPatch, sequencer::StepNumber, store::FormStore};
    use tempfile::tempdir;

    #[test]
    fn state_survives_reopening() {
        let dir = tempdir().expect("tempdir");
        let backend = JsonFileBackend::new(dir.path(), "form-wizard-storage");
        let mut store = FormStore::open(Box::new(backend.clone()));
        store
            .update_answers(FormPatch {
                email: Some("ada@example.com".into()),
                ..FormPatch::default()
            })
            .expect("update");
        store.mark_step_complete(StepNumber::FIRST).expect("mark");

        let mut reopened = FormStore::open(Box::new(backend));
        assert_eq!(reopened.answers().email, "ada@example.com");
        assert!(reopened.is_step_complete(StepNumber::FIRST));
        assert!(reopened.take_load_warning().is_none());
    }

    #[test]
    fn corrupt_file_falls_back_with_warning() {
        let dir = tempdir().expect("tempdir");
        let backend = JsonFileBackend::new(dir.path(), "form-wizard-storage");
        fs::write(backend.path(), "{ not json").expect("write");

        let mut store = FormStore::open(Box::new(backend));
        assert_eq!(store.completed_steps(), Vec::new());
        assert!(store.take_load_warning().is_some());
        assert!(store.take_load_warning().is_none());
    }

    #[test]
    fn unknown_version_is_discarded() {
        let dir = tempdir().expect("tempdir");
        let backend = JsonFileBackend::new(dir.path(), "form-wizard-storage");
        fs::write(
            backend.path(),
            r#"{"state":{"formData":{"fullName":"Old"},"completedSteps":[1]},"version":3}"#,
        )
        .expect("write");

        let mut store = FormStore::open(Box::new(backend));
        assert!(store.answers().full_name.is_empty());
        assert!(store.take_load_warning().is_some());
    }
}
