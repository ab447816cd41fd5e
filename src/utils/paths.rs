use dirs::home_dir;
use std::{
    env,
    path::{Path, PathBuf},
};

const DEFAULT_DIR_NAME: &str = ".form_wizard";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const SUBMISSIONS_FILE: &str = "submissions.jsonl";

/// Returns the application data directory, defaulting to `~/.form_wizard`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("FORM_WIZARD_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub fn config_dir_in(base: &Path) -> PathBuf {
    base.join(CONFIG_DIR)
}

pub fn config_file_in(base: &Path) -> PathBuf {
    config_dir_in(base).join(CONFIG_FILE)
}

/// Path of the persisted form state for a storage key.
pub fn state_file_in(base: &Path, storage_key: &str) -> PathBuf {
    base.join(format!("{}.json", canonical_key(storage_key)))
}

/// Append-only log of submitted applications.
pub fn submissions_file_in(base: &Path) -> PathBuf {
    base.join(SUBMISSIONS_FILE)
}

/// Reduces a storage key to a safe file stem.
pub fn canonical_key(key: &str) -> String {
    let cleaned: String = key
        .trim()
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_') {
                ch.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect();
    let trimmed = cleaned.trim_matches('-');
    if trimmed.is_empty() {
        crate::config::DEFAULT_STORAGE_KEY.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_key_strips_path_characters() {
        assert_eq!(canonical_key("form-wizard-storage"), "form-wizard-storage");
        assert_eq!(canonical_key("../My Form"), "my-form");
        assert_eq!(canonical_key("  "), "form-wizard-storage");
    }

    #[test]
    fn state_file_uses_json_extension() {
        let path = state_file_in(Path::new("/tmp/wizard"), "form-wizard-storage");
        assert_eq!(path, PathBuf::from("/tmp/wizard/form-wizard-storage.json"));
    }
}
