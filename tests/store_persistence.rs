use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

use form_wizard::{
    answers::{FormPatch, LabelSet, Role},
    errors::WizardError,
    sequencer::StepNumber,
    store::{FormStore, JsonFileBackend, MemoryBackend, LOAD_WARNING},
};

fn basic_info() -> FormPatch {
    FormPatch {
        full_name: Some("Ada Lovelace".into()),
        email: Some("ada@example.com".into()),
        role: Some(Role::Developer),
        subscribe: Some(true),
        ..FormPatch::default()
    }
}

#[test]
fn saved_state_uses_the_versioned_layout() {
    let temp = TempDir::new().unwrap();
    let mut store = FormStore::open(Box::new(JsonFileBackend::new(
        temp.path(),
        "form-wizard-storage",
    )));
    store.update_answers(basic_info()).unwrap();
    store.mark_step_complete(StepNumber::BASIC_INFO).unwrap();

    let file = temp.child("form-wizard-storage.json");
    file.assert(predicate::path::exists());
    file.assert(predicate::str::contains("\"formData\""));
    file.assert(predicate::str::contains("\"completedSteps\""));
    file.assert(predicate::str::contains("\"fullName\": \"Ada Lovelace\""));
    file.assert(predicate::str::contains("\"version\": 0"));
}

#[test]
fn reopening_restores_answers_and_completed_steps() {
    let temp = TempDir::new().unwrap();
    let backend = JsonFileBackend::new(temp.path(), "applications");
    {
        let mut store = FormStore::open(Box::new(backend.clone()));
        store.update_answers(basic_info()).unwrap();
        store.mark_step_complete(StepNumber::BASIC_INFO).unwrap();
        store.mark_step_complete(StepNumber::BASIC_INFO).unwrap();
    }

    let mut store = FormStore::open(Box::new(backend));
    assert_eq!(store.take_load_warning(), None);
    assert_eq!(store.answers().full_name, "Ada Lovelace");
    assert_eq!(store.completed_steps(), vec![StepNumber::BASIC_INFO]);
}

#[test]
fn foreign_versions_are_discarded_with_a_warning() {
    let temp = TempDir::new().unwrap();
    temp.child("form-wizard-storage.json")
        .write_str(r#"{"state":{"formData":{"fullName":"Old"},"completedSteps":[1]},"version":7}"#)
        .unwrap();

    let mut store = FormStore::open(Box::new(JsonFileBackend::new(
        temp.path(),
        "form-wizard-storage",
    )));
    assert_eq!(store.take_load_warning().as_deref(), Some(LOAD_WARNING));
    assert_eq!(store.take_load_warning(), None);
    assert_eq!(store.answers().full_name, "");
    assert!(store.completed_steps().is_empty());
}

#[test]
fn later_patches_win_and_untouched_fields_survive() {
    let mut store = FormStore::in_memory();
    store.update_answers(basic_info()).unwrap();
    store
        .update_answers(FormPatch {
            email: Some("countess@example.com".into()),
            services: Some(LabelSet::from(vec!["UI Design".to_string()])),
            ..FormPatch::default()
        })
        .unwrap();

    let answers = store.get_answers();
    assert_eq!(answers.full_name, "Ada Lovelace");
    assert_eq!(answers.email, "countess@example.com");
    assert!(answers.services.contains("UI Design"));
}

#[test]
fn failed_saves_surface_as_storage_errors() {
    let mut store = FormStore::open(Box::new(MemoryBackend::failing()));
    let err = store.update_answers(basic_info()).unwrap_err();
    assert!(matches!(err, WizardError::StorageError(_)));
    assert_eq!(store.answers().full_name, "Ada Lovelace");
}

#[test]
fn reset_clears_everything_on_disk_too() {
    let temp = TempDir::new().unwrap();
    let backend = JsonFileBackend::new(temp.path(), "form-wizard-storage");
    let mut store = FormStore::open(Box::new(backend.clone()));
    store.update_answers(basic_info()).unwrap();
    store.mark_step_complete(StepNumber::BASIC_INFO).unwrap();
    store.reset().unwrap();

    let reopened = FormStore::open(Box::new(backend));
    assert_eq!(reopened.answers().full_name, "");
    assert!(!reopened.is_step_complete(StepNumber::BASIC_INFO));
    temp.child("form-wizard-storage.json")
        .assert(predicate::str::contains("\"completedSteps\": []"));
}
