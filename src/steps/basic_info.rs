use crate::{
    answers::{fields, FormAnswers, FormPatch, Role},
    sequencer::StepNumber,
    validation::{
        check_text, require, FieldErrors, Validator, INVALID_EMAIL, MIN_NAME_CHARS,
        NAME_TOO_SHORT, ROLE_REQUIRED,
    },
};

use super::StepForm;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BasicInfoDraft {
    pub full_name: String,
    pub email: String,
    pub role: Option<Role>,
    pub subscribe: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct BasicInfoStep;

impl StepForm for BasicInfoStep {
    const STEP: StepNumber = StepNumber::BASIC_INFO;
    const FIELDS: &'static [&'static str] =
        &[fields::FULL_NAME, fields::EMAIL, fields::ROLE, fields::SUBSCRIBE];

    type Draft = BasicInfoDraft;

    fn seed(answers: &FormAnswers) -> Self::Draft {
        BasicInfoDraft {
            full_name: answers.full_name.clone(),
            email: answers.email.clone(),
            role: answers.role,
            subscribe: answers.subscribe,
        }
    }

    fn validate(draft: &Self::Draft) -> Result<FormPatch, FieldErrors> {
        let mut errors = FieldErrors::new();
        let full_name = check_text(
            &mut errors,
            fields::FULL_NAME,
            &draft.full_name,
            &Validator::MinChars(MIN_NAME_CHARS, NAME_TOO_SHORT),
        );
        let email = check_text(
            &mut errors,
            fields::EMAIL,
            &draft.email,
            &Validator::Email(INVALID_EMAIL),
        );
        let role = require(&mut errors, fields::ROLE, draft.role, ROLE_REQUIRED);
        errors.into_result(FormPatch {
            full_name,
            email,
            role,
            subscribe: Some(draft.subscribe),
            ..FormPatch::default()
        })
    }
}
