use std::sync::{Arc, Mutex};

use crate::errors::{Result, WizardError};

use super::{PersistedState, StateBackend};

/// Keeps the serialized state in memory. Clones share the same slot, so a
/// second store opened on a clone sees what the first one saved.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    slot: Arc<Mutex<Option<String>>>,
    fail_saves: bool,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose saves always fail, for exercising error paths.
    pub fn failing() -> Self {
        Self {
            fail_saves: true,
            ..Self::default()
        }
    }

    /// Seeds the slot with raw text, as if a previous session had written it.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(raw.into()))),
            fail_saves: false,
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl StateBackend for MemoryBackend {
    fn load(&self) -> Result<Option<PersistedState>> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| WizardError::StorageError("memory slot poisoned".into()))?;
        match slot.as_deref() {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn save(&self, state: &PersistedState) -> Result<()> {
        if self.fail_saves {
            return Err(WizardError::StorageError("storage unavailable".into()));
        }
        let json = serde_json::to_string(state)?;
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| WizardError::StorageError("memory slot poisoned".into()))?;
        *slot = Some(json);
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".into()
    }
}
