//! Accumulated form answers and the partial updates applied to them.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Field names as they appear in the persisted blob and in field errors.
pub mod fields {
    pub const FULL_NAME: &str = "fullName";
    pub const EMAIL: &str = "email";
    pub const ROLE: &str = "role";
    pub const SUBSCRIBE: &str = "subscribe";
    pub const PREFERRED_DATE: &str = "preferredDate";
    pub const PREFERRED_TIME: &str = "preferredTime";
    pub const TIMEZONE: &str = "timezone";
    pub const SERVICES: &str = "services";
    pub const SKILLS: &str = "skills";
    pub const INTERESTED_TOPICS: &str = "interestedTopics";
    pub const WORK_PREFERENCE: &str = "workPreference";
    pub const HOME_OFFICE_READY: &str = "homeOfficeReady";
    pub const RELOCATION_WILLINGNESS: &str = "relocationWillingness";
    pub const TERMS_ACCEPTED: &str = "termsAccepted";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Developer,
    Designer,
    #[serde(rename = "PM")]
    Pm,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Developer, Role::Designer, Role::Pm];

    pub fn label(&self) -> &'static str {
        match self {
            Role::Developer => "Developer",
            Role::Designer => "Designer",
            Role::Pm => "PM",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let needle = value.trim();
        Self::ALL
            .into_iter()
            .find(|role| role.label().eq_ignore_ascii_case(needle))
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WorkPreference {
    Remote,
    Hybrid,
    #[serde(rename = "On-site")]
    OnSite,
}

impl WorkPreference {
    pub const ALL: [WorkPreference; 3] = [
        WorkPreference::Remote,
        WorkPreference::Hybrid,
        WorkPreference::OnSite,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            WorkPreference::Remote => "Remote",
            WorkPreference::Hybrid => "Hybrid",
            WorkPreference::OnSite => "On-site",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "remote" => Some(WorkPreference::Remote),
            "hybrid" => Some(WorkPreference::Hybrid),
            "onsite" => Some(WorkPreference::OnSite),
            _ => None,
        }
    }
}

impl fmt::Display for WorkPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Deduplicated collection of labels. Insertion order is kept for display
/// only; equality ignores it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct LabelSet {
    labels: Vec<String>,
}

impl LabelSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `label` unless it is blank or already present. Returns whether the
    /// set changed.
    pub fn insert(&mut self, label: impl Into<String>) -> bool {
        let label = label.into();
        let trimmed = label.trim();
        if trimmed.is_empty() || self.contains(trimmed) {
            return false;
        }
        self.labels.push(trimmed.to_string());
        true
    }

    /// Removes `label` if present. Returns whether the set changed.
    pub fn remove(&mut self, label: &str) -> bool {
        let before = self.labels.len();
        self.labels.retain(|existing| existing != label.trim());
        before != self.labels.len()
    }

    /// Inserts when absent, removes when present.
    pub fn toggle(&mut self, label: &str) {
        if !self.remove(label) {
            self.insert(label);
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels.iter().any(|existing| existing == label)
    }

    pub fn clear(&mut self) {
        self.labels.clear();
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.labels.iter().map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.labels
    }
}

impl PartialEq for LabelSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|label| other.contains(label))
    }
}

impl Eq for LabelSet {}

impl From<Vec<String>> for LabelSet {
    fn from(values: Vec<String>) -> Self {
        values.into_iter().collect()
    }
}

impl From<LabelSet> for Vec<String> {
    fn from(set: LabelSet) -> Self {
        set.labels
    }
}

impl<S: Into<String>> FromIterator<S> for LabelSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = LabelSet::new();
        for label in iter {
            set.insert(label);
        }
        set
    }
}

impl<S: Into<String>> Extend<S> for LabelSet {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        for label in iter {
            self.insert(label);
        }
    }
}

/// The record the user builds up across the five data steps. Every field
/// carries an empty default until its owning step is confirmed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormAnswers {
    pub full_name: String,
    pub email: String,
    pub role: Option<Role>,
    pub subscribe: bool,
    pub preferred_date: Option<NaiveDate>,
    pub preferred_time: String,
    pub timezone: String,
    pub services: LabelSet,
    pub skills: LabelSet,
    pub interested_topics: String,
    pub work_preference: Option<WorkPreference>,
    pub home_office_ready: bool,
    pub relocation_willingness: bool,
    pub terms_accepted: bool,
}

/// Shallow partial update of [`FormAnswers`]. `None` leaves the stored value
/// alone; optional answers can be set through a patch but only cleared by a
/// store reset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormPatch {
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<Role>,
    pub subscribe: Option<bool>,
    pub preferred_date: Option<NaiveDate>,
    pub preferred_time: Option<String>,
    pub timezone: Option<String>,
    pub services: Option<LabelSet>,
    pub skills: Option<LabelSet>,
    pub interested_topics: Option<String>,
    pub work_preference: Option<WorkPreference>,
    pub home_office_ready: Option<bool>,
    pub relocation_willingness: Option<bool>,
    pub terms_accepted: Option<bool>,
}

macro_rules! patch_fields {
    ($patch:expr, $target:expr, plain: [$($plain:ident => $plain_key:ident),*], optional: [$($optional:ident => $optional_key:ident),*]) => {{
        let mut touched = Vec::new();
        $(
            if let Some(value) = $patch.$plain {
                $target.$plain = value;
                touched.push(fields::$plain_key);
            }
        )*
        $(
            if let Some(value) = $patch.$optional {
                $target.$optional = Some(value);
                touched.push(fields::$optional_key);
            }
        )*
        touched
    }};
}

impl FormAnswers {
    /// Applies `patch` field by field, last write wins. Returns the names of
    /// the fields that were written.
    pub fn merge(&mut self, patch: FormPatch) -> Vec<&'static str> {
        patch_fields!(
            patch,
            self,
            plain: [
                full_name => FULL_NAME,
                email => EMAIL,
                subscribe => SUBSCRIBE,
                preferred_time => PREFERRED_TIME,
                timezone => TIMEZONE,
                services => SERVICES,
                skills => SKILLS,
                interested_topics => INTERESTED_TOPICS,
                home_office_ready => HOME_OFFICE_READY,
                relocation_willingness => RELOCATION_WILLINGNESS,
                terms_accepted => TERMS_ACCEPTED
            ],
            optional: [
                role => ROLE,
                preferred_date => PREFERRED_DATE,
                work_preference => WORK_PREFERENCE
            ]
        )
    }
}
