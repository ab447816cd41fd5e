use crate::{
    answers::{fields, FormAnswers, FormPatch, WorkPreference},
    sequencer::StepNumber,
    validation::{require, FieldErrors, TERMS_REQUIRED, WORK_PREFERENCE_REQUIRED},
};

use super::StepForm;

/// Step five. The two follow-up booleans only hold `true` while the work
/// preference they belong to is selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreferencesDraft {
    work_preference: Option<WorkPreference>,
    home_office_ready: bool,
    relocation_willingness: bool,
    terms_accepted: bool,
}

impl PreferencesDraft {
    pub fn work_preference(&self) -> Option<WorkPreference> {
        self.work_preference
    }

    pub fn home_office_ready(&self) -> bool {
        self.home_office_ready
    }

    pub fn relocation_willingness(&self) -> bool {
        self.relocation_willingness
    }

    pub fn terms_accepted(&self) -> bool {
        self.terms_accepted
    }

    /// Selects `preference` and clears whichever follow-up no longer applies.
    pub fn set_work_preference(&mut self, preference: WorkPreference) {
        self.work_preference = Some(preference);
        self.enforce_exclusivity();
    }

    /// Returns `false` and leaves the draft alone unless Remote is selected.
    pub fn set_home_office_ready(&mut self, ready: bool) -> bool {
        if self.work_preference != Some(WorkPreference::Remote) {
            return false;
        }
        self.home_office_ready = ready;
        true
    }

    /// Returns `false` and leaves the draft alone unless On-site is selected.
    pub fn set_relocation_willingness(&mut self, willing: bool) -> bool {
        if self.work_preference != Some(WorkPreference::OnSite) {
            return false;
        }
        self.relocation_willingness = willing;
        true
    }

    pub fn set_terms_accepted(&mut self, accepted: bool) {
        self.terms_accepted = accepted;
    }

    fn enforce_exclusivity(&mut self) {
        match self.work_preference {
            Some(WorkPreference::Remote) => self.relocation_willingness = false,
            Some(WorkPreference::OnSite) => self.home_office_ready = false,
            _ => {
                self.home_office_ready = false;
                self.relocation_willingness = false;
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PreferencesStep;

impl StepForm for PreferencesStep {
    const STEP: StepNumber = StepNumber::PREFERENCES;
    const FIELDS: &'static [&'static str] = &[
        fields::WORK_PREFERENCE,
        fields::HOME_OFFICE_READY,
        fields::RELOCATION_WILLINGNESS,
        fields::TERMS_ACCEPTED,
    ];

    type Draft = PreferencesDraft;

    fn seed(answers: &FormAnswers) -> Self::Draft {
        let mut draft = PreferencesDraft {
            work_preference: answers.work_preference,
            home_office_ready: answers.home_office_ready,
            relocation_willingness: answers.relocation_willingness,
            terms_accepted: answers.terms_accepted,
        };
        draft.enforce_exclusivity();
        draft
    }

    fn validate(draft: &Self::Draft) -> Result<FormPatch, FieldErrors> {
        let mut errors = FieldErrors::new();
        let work_preference = require(
            &mut errors,
            fields::WORK_PREFERENCE,
            draft.work_preference,
            WORK_PREFERENCE_REQUIRED,
        );
        if !draft.terms_accepted {
            errors.insert(fields::TERMS_ACCEPTED, TERMS_REQUIRED);
        }
        errors.into_result(FormPatch {
            work_preference,
            home_office_ready: Some(draft.home_office_ready),
            relocation_willingness: Some(draft.relocation_willingness),
            terms_accepted: Some(draft.terms_accepted),
            ..FormPatch::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switching_preference_resets_the_stale_follow_up() {
        let mut draft = PreferencesDraft::default();
        draft.set_work_preference(WorkPreference::Remote);
        assert!(draft.set_home_office_ready(true));

        draft.set_work_preference(WorkPreference::OnSite);
        assert!(!draft.home_office_ready());
        assert!(draft.set_relocation_willingness(true));
        assert!(draft.relocation_willingness());

        draft.set_work_preference(WorkPreference::Hybrid);
        assert!(!draft.home_office_ready());
        assert!(!draft.relocation_willingness());
    }

    #[test]
    fn follow_ups_ignore_unrelated_preferences() {
        let mut draft = PreferencesDraft::default();
        assert!(!draft.set_home_office_ready(true));
        draft.set_work_preference(WorkPreference::Remote);
        assert!(!draft.set_relocation_willingness(true));
        assert!(!draft.relocation_willingness());
    }

    #[test]
    fn seed_drops_inconsistent_stored_flags() {
        let answers = FormAnswers {
            work_preference: Some(WorkPreference::Hybrid),
            home_office_ready: true,
            relocation_willingness: true,
            ..FormAnswers::default()
        };
        let draft = PreferencesStep::seed(&answers);
        assert!(!draft.home_office_ready());
        assert!(!draft.relocation_willingness());
    }

    #[test]
    fn terms_must_be_accepted() {
        let mut draft = PreferencesDraft::default();
        draft.set_work_preference(WorkPreference::Hybrid);
        let errors = PreferencesStep::validate(&draft).expect_err("invalid");
        assert_eq!(errors.get("termsAccepted"), Some(TERMS_REQUIRED));
        draft.set_terms_accepted(true);
        assert!(PreferencesStep::validate(&draft).is_ok());
    }
}
