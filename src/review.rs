//! Summary of the collected answers and the final submission.

use std::{fmt, thread};

use tracing::{info, warn};

use crate::{
    answers::{FormAnswers, WorkPreference},
    catalog,
    config::{Config, SubmissionSettings},
    errors::{Result, WizardError},
    sequencer::{Position, Route, StepNumber},
    store::FormStore,
    submission::{Receipt, SubmissionSink},
    validation::{validate_all, StepErrors},
};

pub const NOT_SET: &str = "Not set";
pub const NONE_PROVIDED: &str = "None provided";
pub const NO_SERVICES: &str = "No services selected";
pub const NO_SKILLS: &str = "No skills selected";

const DATE_FORMAT: &str = "%d-%m-%Y";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewState {
    Reviewing,
    Submitting,
    Submitted(Receipt),
    Failed(String),
}

/// One block of the review screen, each editable through its own step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    BasicInfo,
    Schedule,
    Services,
    Skills,
    Preferences,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::BasicInfo,
        Section::Schedule,
        Section::Services,
        Section::Skills,
        Section::Preferences,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Section::BasicInfo => "Basic Information",
            Section::Schedule => "Meeting Schedule",
            Section::Services => "Selected Services",
            Section::Skills => "Skills & Interests",
            Section::Preferences => "Preferences",
        }
    }

    pub fn step(self) -> StepNumber {
        match self {
            Section::BasicInfo => StepNumber::BASIC_INFO,
            Section::Schedule => StepNumber::SCHEDULE,
            Section::Services => StepNumber::SERVICES,
            Section::Skills => StepNumber::SKILLS,
            Section::Preferences => StepNumber::PREFERENCES,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryRow {
    pub label: &'static str,
    pub value: String,
}

impl SummaryRow {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummarySection {
    pub section: Section,
    pub rows: Vec<SummaryRow>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewSummary {
    pub sections: Vec<SummarySection>,
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

fn or_default(value: &str, fallback: &str) -> String {
    if value.trim().is_empty() {
        fallback.to_string()
    } else {
        value.to_string()
    }
}

/// Builds the read-only summary. Services are grouped by category; a service
/// outside the catalog appears in no group.
pub fn summary(answers: &FormAnswers) -> ReviewSummary {
    let basic = vec![
        SummaryRow::new("Full Name", or_default(&answers.full_name, NOT_SET)),
        SummaryRow::new("Email", or_default(&answers.email, NOT_SET)),
        SummaryRow::new(
            "Role",
            answers.role.map_or(NOT_SET, |role| role.label()),
        ),
        SummaryRow::new("Newsletter", yes_no(answers.subscribe)),
    ];

    let schedule = vec![
        SummaryRow::new(
            "Preferred Date",
            answers
                .preferred_date
                .map_or_else(|| NOT_SET.to_string(), |date| date.format(DATE_FORMAT).to_string()),
        ),
        SummaryRow::new("Preferred Time", or_default(&answers.preferred_time, NOT_SET)),
        SummaryRow::new("Timezone", or_default(&answers.timezone, NOT_SET)),
    ];

    let groups = catalog::group_services(&answers.services);
    let services = if groups.is_empty() {
        vec![SummaryRow::new("Services", NO_SERVICES)]
    } else {
        groups
            .into_iter()
            .map(|(label, chosen)| SummaryRow::new(label, chosen.join(", ")))
            .collect()
    };

    let skills_value = if answers.skills.is_empty() {
        NO_SKILLS.to_string()
    } else {
        answers.skills.iter().collect::<Vec<_>>().join(", ")
    };
    let skills = vec![
        SummaryRow::new("Skills", skills_value),
        SummaryRow::new(
            "Interested Topics",
            or_default(&answers.interested_topics, NONE_PROVIDED),
        ),
    ];

    let mut preferences = vec![SummaryRow::new(
        "Work Preference",
        answers
            .work_preference
            .map_or(NOT_SET, |preference| preference.label()),
    )];
    match answers.work_preference {
        Some(WorkPreference::Remote) => preferences.push(SummaryRow::new(
            "Home Office Ready",
            yes_no(answers.home_office_ready),
        )),
        Some(WorkPreference::OnSite) => preferences.push(SummaryRow::new(
            "Willing to Relocate",
            yes_no(answers.relocation_willingness),
        )),
        _ => {}
    }
    preferences.push(SummaryRow::new("Terms Accepted", yes_no(answers.terms_accepted)));

    let sections = Section::ALL
        .into_iter()
        .zip([basic, schedule, services, skills, preferences])
        .map(|(section, rows)| SummarySection { section, rows })
        .collect();
    ReviewSummary { sections }
}

impl fmt::Display for ReviewSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, block) in self.sections.iter().enumerate() {
            if index > 0 {
                f.write_str("\n\n")?;
            }
            write!(f, "{} (step {})", block.section.title(), block.section.step())?;
            for row in &block.rows {
                write!(f, "\n  {}: {}", row.label, row.value)?;
            }
        }
        Ok(())
    }
}

/// Where the Edit action of `section` leads. Nothing is mutated.
pub fn edit_target(section: Section) -> Position {
    Position::Step(section.step())
}

fn describe_failures(failures: &StepErrors) -> String {
    failures
        .iter()
        .map(|(step, errors)| format!("step {} ({}): {}", step, step.label(), errors))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Clone)]
pub struct ReviewController {
    state: ReviewState,
    settings: SubmissionSettings,
    reset_after_submit: bool,
}

impl ReviewController {
    pub fn new(settings: SubmissionSettings, reset_after_submit: bool) -> Self {
        Self {
            state: ReviewState::Reviewing,
            settings,
            reset_after_submit,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.submission.clone(), config.reset_after_submit)
    }

    pub fn state(&self) -> &ReviewState {
        &self.state
    }

    pub fn summary(&self, store: &FormStore) -> ReviewSummary {
        summary(store.answers())
    }

    /// Enters `Submitting`. Refused while a submission is running or after
    /// one has succeeded.
    pub fn begin(&mut self) -> Result<()> {
        match self.state {
            ReviewState::Submitting => Err(WizardError::SubmissionInProgress),
            ReviewState::Submitted(_) => Err(WizardError::AlreadySubmitted),
            ReviewState::Reviewing | ReviewState::Failed(_) => {
                self.state = ReviewState::Submitting;
                Ok(())
            }
        }
    }

    /// Validates the whole form and hands it to `sink`, retrying failed
    /// attempts with a fixed back-off. Must follow [`ReviewController::begin`].
    pub fn complete(&mut self, store: &mut FormStore, sink: &dyn SubmissionSink) -> Result<Receipt> {
        if self.state != ReviewState::Submitting {
            return Err(WizardError::InvalidInput(
                "submission has not been started".into(),
            ));
        }

        let answers = store.get_answers();
        if let Err(failures) = validate_all(&answers) {
            self.state = ReviewState::Reviewing;
            return Err(WizardError::Incomplete(describe_failures(&failures)));
        }

        let attempts = self.settings.attempts();
        let mut last_error = String::new();
        for attempt in 1..=attempts {
            match sink.submit(&answers) {
                Ok(receipt) => {
                    info!(id = %receipt.id, attempt, sink = %sink.describe(), "submission accepted");
                    self.state = ReviewState::Submitted(receipt.clone());
                    if self.reset_after_submit {
                        if let Err(err) = store.reset() {
                            warn!(error = %err, "failed to clear answers after submission");
                        }
                    }
                    return Ok(receipt);
                }
                Err(err) => {
                    warn!(attempt, attempts, error = %err, "submission attempt failed");
                    last_error = err.to_string();
                    if attempt < attempts {
                        thread::sleep(self.settings.retry_backoff());
                    }
                }
            }
        }

        self.state = ReviewState::Failed(last_error.clone());
        Err(WizardError::SubmissionFailed(last_error))
    }

    pub fn submit(&mut self, store: &mut FormStore, sink: &dyn SubmissionSink) -> Result<Receipt> {
        self.begin()?;
        self.complete(store, sink)
    }

    /// Clears every answer and returns to the entry screen.
    pub fn start_over(&mut self, store: &mut FormStore) -> Result<Route> {
        store.reset()?;
        self.state = ReviewState::Reviewing;
        Ok(Route::Entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::answers::{FormPatch, LabelSet, Role};
    use crate::submission::JsonlSubmissionLog;
    use std::sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    };

    struct FlakySink {
        failures_left: AtomicU32,
        calls: AtomicU32,
    }

    impl FlakySink {
        fn failing(times: u32) -> Self {
            Self {
                failures_left: AtomicU32::new(times),
                calls: AtomicU32::new(0),
            }
        }
    }

    impl SubmissionSink for FlakySink {
        fn submit(&self, _answers: &FormAnswers) -> Result<Receipt> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let left = self.failures_left.load(Ordering::SeqCst);
            if left > 0 {
                self.failures_left.store(left - 1, Ordering::SeqCst);
                return Err(WizardError::SubmissionFailed("service unavailable".into()));
            }
            Ok(Receipt::issue())
        }
    }

    impl SubmissionSink for Arc<FlakySink> {
        fn submit(&self, answers: &FormAnswers) -> Result<Receipt> {
            self.as_ref().submit(answers)
        }
    }

    fn settings(max_attempts: u32) -> SubmissionSettings {
        SubmissionSettings {
            delay_ms: 0,
            max_attempts,
            retry_backoff_ms: 0,
        }
    }

    fn complete_store() -> FormStore {
        let mut store = FormStore::in_memory();
        store
            .update_answers(FormPatch {
                full_name: Some("Ada Lovelace".into()),
                email: Some("ada@example.com".into()),
                role: Some(Role::Developer),
                preferred_date: chrono::NaiveDate::from_ymd_opt(2030, 3, 9),
                preferred_time: Some("10:00 AM".into()),
                timezone: Some("UTC+00:00".into()),
                services: Some(["UI Design"].into_iter().collect()),
                skills: Some(["Rust"].into_iter().collect()),
                work_preference: Some(WorkPreference::Remote),
                home_office_ready: Some(true),
                terms_accepted: Some(true),
                ..FormPatch::default()
            })
            .expect("update");
        store
    }

    #[test]
    fn empty_answers_show_placeholders() {
        let rendered = summary(&FormAnswers::default());
        let services = &rendered.sections[2];
        assert_eq!(services.rows, vec![SummaryRow::new("Services", NO_SERVICES)]);
        assert_eq!(rendered.sections[3].rows[0].value, NO_SKILLS);
        assert_eq!(rendered.sections[3].rows[1].value, NONE_PROVIDED);
        assert_eq!(rendered.sections[1].rows[0].value, NOT_SET);
    }

    #[test]
    fn follow_up_rows_depend_on_work_preference() {
        let mut answers = FormAnswers {
            work_preference: Some(WorkPreference::OnSite),
            relocation_willingness: true,
            ..FormAnswers::default()
        };
        let labels = |answers: &FormAnswers| -> Vec<&'static str> {
            summary(answers).sections[4].rows.iter().map(|row| row.label).collect()
        };
        assert_eq!(
            labels(&answers),
            vec!["Work Preference", "Willing to Relocate", "Terms Accepted"]
        );
        answers.work_preference = Some(WorkPreference::Hybrid);
        assert_eq!(labels(&answers), vec!["Work Preference", "Terms Accepted"]);
    }

    #[test]
    fn unknown_services_are_left_out_of_every_group() {
        let answers = FormAnswers {
            services: LabelSet::from(vec!["Time Travel".to_string()]),
            ..FormAnswers::default()
        };
        assert_eq!(summary(&answers).sections[2].rows[0].value, NO_SERVICES);
    }

    #[test]
    fn edit_targets_match_section_steps() {
        assert_eq!(
            edit_target(Section::Skills),
            Position::Step(StepNumber::SKILLS)
        );
    }

    #[test]
    fn incomplete_form_is_refused() {
        let mut store = FormStore::in_memory();
        let mut review = ReviewController::new(settings(1), false);
        let sink = FlakySink::failing(0);
        let err = review.submit(&mut store, &sink).expect_err("incomplete");
        assert!(matches!(err, WizardError::Incomplete(_)));
        assert_eq!(review.state(), &ReviewState::Reviewing);
        assert_eq!(sink.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn second_begin_is_refused_while_submitting() {
        let mut store = complete_store();
        let mut review = ReviewController::new(settings(1), false);
        review.begin().expect("begin");
        assert!(matches!(review.begin(), Err(WizardError::SubmissionInProgress)));
        let sink = FlakySink::failing(0);
        review.complete(&mut store, &sink).expect("complete");
        assert!(matches!(review.state(), ReviewState::Submitted(_)));
        assert!(matches!(
            review.submit(&mut store, &sink),
            Err(WizardError::AlreadySubmitted)
        ));
    }

    #[test]
    fn transient_failures_are_retried() {
        let mut store = complete_store();
        let mut review = ReviewController::new(settings(3), false);
        let sink = FlakySink::failing(2);
        review.submit(&mut store, &sink).expect("third attempt succeeds");
        assert_eq!(sink.calls.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn exhausted_retries_allow_resubmitting() {
        let mut store = complete_store();
        let mut review = ReviewController::new(settings(2), false);
        let sink = FlakySink::failing(2);
        let err = review.submit(&mut store, &sink).expect_err("both attempts fail");
        assert!(matches!(err, WizardError::SubmissionFailed(_)));
        assert!(matches!(review.state(), ReviewState::Failed(_)));

        review.submit(&mut store, &sink).expect("retry after failure");
        assert!(matches!(review.state(), ReviewState::Submitted(_)));
    }

    #[test]
    fn reset_after_submit_clears_answers() {
        let mut store = complete_store();
        let mut review = ReviewController::new(settings(1), true);
        review
            .submit(&mut store, &FlakySink::failing(0))
            .expect("submit");
        assert_eq!(store.get_answers(), FormAnswers::default());
    }

    #[test]
    fn start_over_resets_and_returns_to_entry() {
        let mut store = complete_store();
        store.mark_step_complete(StepNumber::FIRST).expect("mark");
        let mut review = ReviewController::new(settings(1), false);
        review
            .submit(&mut store, &FlakySink::failing(0))
            .expect("submit");
        assert_eq!(store.answers().full_name, "Ada Lovelace");

        assert_eq!(review.start_over(&mut store).expect("start over"), Route::Entry);
        assert_eq!(review.state(), &ReviewState::Reviewing);
        assert_eq!(store.get_answers(), FormAnswers::default());
        assert!(store.completed_steps().is_empty());
    }

    #[test]
    fn unwritable_log_does_not_trigger_a_resubmission() {
        let dir = tempfile::tempdir().expect("tempdir");
        let inner = Arc::new(FlakySink::failing(0));
        // A directory in place of the log file makes every append fail.
        let sink = JsonlSubmissionLog::new(dir.path().to_path_buf(), Box::new(inner.clone()));
        let mut store = complete_store();
        let mut review = ReviewController::new(settings(3), false);

        review.submit(&mut store, &sink).expect("accepted despite log failure");
        assert_eq!(inner.calls.load(Ordering::SeqCst), 1);
        assert!(matches!(review.state(), ReviewState::Submitted(_)));
    }
}
