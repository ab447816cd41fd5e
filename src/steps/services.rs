use crate::{
    answers::{fields, FormAnswers, FormPatch, LabelSet},
    sequencer::StepNumber,
    validation::{FieldErrors, SERVICES_REQUIRED},
};

use super::StepForm;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServicesDraft {
    services: LabelSet,
}

impl ServicesDraft {
    pub fn selected(&self) -> &LabelSet {
        &self.services
    }

    /// No-op when already selected.
    pub fn add(&mut self, service: &str) -> bool {
        self.services.insert(service)
    }

    /// No-op when not selected.
    pub fn remove(&mut self, service: &str) -> bool {
        self.services.remove(service)
    }

    pub fn toggle(&mut self, service: &str) {
        self.services.toggle(service);
    }

    pub fn clear_all(&mut self) {
        self.services.clear();
    }

    /// Adds every service in `services`, keeping existing selections. Used by
    /// "select all" over the current filter.
    pub fn select_all<'a>(&mut self, services: impl IntoIterator<Item = &'a str>) {
        self.services.extend(services);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ServicesStep;

impl StepForm for ServicesStep {
    const STEP: StepNumber = StepNumber::SERVICES;
    const FIELDS: &'static [&'static str] = &[fields::SERVICES];

    type Draft = ServicesDraft;

    fn seed(answers: &FormAnswers) -> Self::Draft {
        ServicesDraft {
            services: answers.services.clone(),
        }
    }

    fn validate(draft: &Self::Draft) -> Result<FormPatch, FieldErrors> {
        let mut errors = FieldErrors::new();
        if draft.services.is_empty() {
            errors.insert(fields::SERVICES, SERVICES_REQUIRED);
        }
        errors.into_result(FormPatch {
            services: Some(draft.services.clone()),
            ..FormPatch::default()
        })
    }
}
