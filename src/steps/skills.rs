use crate::{
    answers::{fields, FormAnswers, FormPatch, LabelSet},
    sequencer::StepNumber,
    validation::{FieldErrors, SKILLS_REQUIRED},
};

use super::StepForm;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkillsDraft {
    skills: LabelSet,
    pub interested_topics: String,
}

impl SkillsDraft {
    pub fn selected(&self) -> &LabelSet {
        &self.skills
    }

    pub fn add(&mut self, skill: &str) -> bool {
        self.skills.insert(skill)
    }

    pub fn remove(&mut self, skill: &str) -> bool {
        self.skills.remove(skill)
    }

    pub fn toggle(&mut self, skill: &str) {
        self.skills.toggle(skill);
    }

    pub fn clear_all(&mut self) {
        self.skills.clear();
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SkillsStep;

impl StepForm for SkillsStep {
    const STEP: StepNumber = StepNumber::SKILLS;
    const FIELDS: &'static [&'static str] = &[fields::SKILLS, fields::INTERESTED_TOPICS];

    type Draft = SkillsDraft;

    fn seed(answers: &FormAnswers) -> Self::Draft {
        SkillsDraft {
            skills: answers.skills.clone(),
            interested_topics: answers.interested_topics.clone(),
        }
    }

    fn validate(draft: &Self::Draft) -> Result<FormPatch, FieldErrors> {
        let mut errors = FieldErrors::new();
        if draft.skills.is_empty() {
            errors.insert(fields::SKILLS, SKILLS_REQUIRED);
        }
        // Blank topics are stored as the empty string, which reads as "none".
        errors.into_result(FormPatch {
            skills: Some(draft.skills.clone()),
            interested_topics: Some(draft.interested_topics.trim().to_string()),
            ..FormPatch::default()
        })
    }
}
