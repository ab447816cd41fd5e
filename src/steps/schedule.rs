use chrono::NaiveDate;

use crate::{
    answers::{fields, FormAnswers, FormPatch},
    catalog::{TIMEZONES, TIME_SLOTS},
    sequencer::StepNumber,
    validation::{
        check_text, require, FieldErrors, Validator, DATE_REQUIRED, TIMEZONE_REQUIRED,
        TIME_REQUIRED,
    },
};

use super::StepForm;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScheduleDraft {
    pub preferred_date: Option<NaiveDate>,
    pub preferred_time: String,
    pub timezone: String,
}

#[derive(Debug, Clone, Copy)]
pub struct ScheduleStep;

impl StepForm for ScheduleStep {
    const STEP: StepNumber = StepNumber::SCHEDULE;
    const FIELDS: &'static [&'static str] = &[
        fields::PREFERRED_DATE,
        fields::PREFERRED_TIME,
        fields::TIMEZONE,
    ];

    type Draft = ScheduleDraft;

    fn seed(answers: &FormAnswers) -> Self::Draft {
        ScheduleDraft {
            preferred_date: answers.preferred_date,
            preferred_time: answers.preferred_time.clone(),
            timezone: answers.timezone.clone(),
        }
    }

    fn validate(draft: &Self::Draft) -> Result<FormPatch, FieldErrors> {
        let mut errors = FieldErrors::new();
        let preferred_date = require(
            &mut errors,
            fields::PREFERRED_DATE,
            draft.preferred_date,
            DATE_REQUIRED,
        );
        let preferred_time = check_text(
            &mut errors,
            fields::PREFERRED_TIME,
            &draft.preferred_time,
            &Validator::OneOf(&TIME_SLOTS, TIME_REQUIRED),
        );
        let timezone = check_text(
            &mut errors,
            fields::TIMEZONE,
            &draft.timezone,
            &Validator::OneOf(&TIMEZONES, TIMEZONE_REQUIRED),
        );
        errors.into_result(FormPatch {
            preferred_date,
            preferred_time,
            timezone,
            ..FormPatch::default()
        })
    }
}
