//! Text-driven edits of the step on screen, shared by the `set`/`add`/
//! `remove`/`clear` commands and the interactive prompts.

use chrono::NaiveDate;
use strsim::levenshtein;

use crate::{
    answers::{fields, Role, WorkPreference},
    catalog::{self, AVAILABLE_SKILLS, TIMEZONES, TIME_SLOTS},
    sequencer::StepNumber,
    steps::{
        step_for_field, ActiveStep, BasicInfoStep, PreferencesStep, ScheduleStep, ServicesStep,
        SkillsStep, StepForm,
    },
};

use super::core::CommandError;
use super::io::parse_yes_no;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Every field name in step order.
pub(crate) fn field_names() -> impl Iterator<Item = &'static str> {
    BasicInfoStep::FIELDS
        .iter()
        .chain(ScheduleStep::FIELDS)
        .chain(ServicesStep::FIELDS)
        .chain(SkillsStep::FIELDS)
        .chain(PreferencesStep::FIELDS)
        .copied()
}

fn squash(name: &str) -> String {
    name.chars()
        .filter(|ch| ch.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Accepts `fullName`, `full-name`, `full_name` and so on.
pub(crate) fn resolve_field(input: &str) -> Result<&'static str, CommandError> {
    let needle = squash(input);
    if let Some(field) = field_names().find(|field| squash(field) == needle) {
        return Ok(field);
    }

    let closest = field_names()
        .map(|field| (levenshtein(&squash(field), &needle), field))
        .min_by_key(|(distance, _)| *distance)
        .filter(|(distance, _)| *distance <= 3)
        .map(|(_, field)| format!(" Did you mean `{}`?", field))
        .unwrap_or_default();
    Err(CommandError::InvalidArguments(format!(
        "Unknown field `{}`.{}",
        input, closest
    )))
}

/// Errors unless `field` belongs to the step on screen.
fn ensure_on_step(active: &ActiveStep, field: &'static str) -> Result<(), CommandError> {
    let owner = step_for_field(field).unwrap_or(StepNumber::FIRST);
    if owner == active.step() {
        Ok(())
    } else {
        Err(CommandError::InvalidArguments(format!(
            "`{}` belongs to step {} ({}). Use `goto /step/{}` first.",
            field,
            owner,
            owner.title(),
            owner
        )))
    }
}

pub(crate) fn parse_bool(field: &str, raw: &str) -> Result<bool, CommandError> {
    parse_yes_no(raw).ok_or_else(|| {
        CommandError::InvalidArguments(format!("`{}` expects yes or no, got `{}`", field, raw))
    })
}

pub(crate) fn parse_date(raw: &str) -> Result<Option<NaiveDate>, CommandError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map(Some)
        .map_err(|_| {
            CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", raw))
        })
}

fn unknown_option<'a>(
    what: &str,
    raw: &str,
    options: impl IntoIterator<Item = &'a str> + Clone,
) -> CommandError {
    let hint = catalog::suggest(raw, options.clone())
        .map(|best| format!(" Did you mean `{}`?", best))
        .unwrap_or_else(|| {
            format!(
                " Choose one of: {}.",
                options.into_iter().collect::<Vec<_>>().join(", ")
            )
        });
    CommandError::InvalidArguments(format!("Unknown {} `{}`.{}", what, raw, hint))
}

/// Catalog spelling of `raw` when it names a known option, else `raw` itself.
/// Unknown values are kept so live validation can report them.
fn canonical<'a>(raw: &str, options: impl IntoIterator<Item = &'a str>) -> String {
    catalog::lookup(raw, options)
        .map(str::to_string)
        .unwrap_or_else(|| raw.trim().to_string())
}

/// Applies `field = raw` to the draft on screen. Returns an optional note
/// for the user when the change was accepted but had no effect.
pub(crate) fn set_field(
    active: &mut ActiveStep,
    field: &'static str,
    raw: &str,
) -> Result<Option<String>, CommandError> {
    ensure_on_step(active, field)?;

    match active {
        ActiveStep::BasicInfo(controller) => match field {
            fields::FULL_NAME => controller.edit(|draft| draft.full_name = raw.to_string()),
            fields::EMAIL => controller.edit(|draft| draft.email = raw.to_string()),
            fields::ROLE => {
                let role = Role::parse(raw).ok_or_else(|| {
                    unknown_option("role", raw, Role::ALL.iter().map(|role| role.label()))
                })?;
                controller.edit(|draft| draft.role = Some(role));
            }
            _ => {
                let subscribe = parse_bool(field, raw)?;
                controller.edit(|draft| draft.subscribe = subscribe);
            }
        },
        ActiveStep::Schedule(controller) => match field {
            fields::PREFERRED_DATE => {
                let date = parse_date(raw)?;
                controller.edit(|draft| draft.preferred_date = date);
            }
            fields::PREFERRED_TIME => {
                let time = canonical(raw, TIME_SLOTS);
                controller.edit(|draft| draft.preferred_time = time);
            }
            _ => {
                let timezone = canonical(raw, TIMEZONES);
                controller.edit(|draft| draft.timezone = timezone);
            }
        },
        ActiveStep::Services(_) => return Err(collection_hint(field)),
        ActiveStep::Skills(controller) => match field {
            fields::INTERESTED_TOPICS => {
                controller.edit(|draft| draft.interested_topics = raw.to_string())
            }
            _ => return Err(collection_hint(field)),
        },
        ActiveStep::Preferences(controller) => match field {
            fields::WORK_PREFERENCE => {
                let preference = WorkPreference::parse(raw).ok_or_else(|| {
                    unknown_option(
                        "work preference",
                        raw,
                        WorkPreference::ALL.iter().map(|preference| preference.label()),
                    )
                })?;
                controller.edit(|draft| draft.set_work_preference(preference));
            }
            fields::HOME_OFFICE_READY => {
                let ready = parse_bool(field, raw)?;
                if !controller.edit(|draft| draft.set_home_office_ready(ready)) {
                    return Ok(Some(
                        "Home office readiness only applies to Remote work.".into(),
                    ));
                }
            }
            fields::RELOCATION_WILLINGNESS => {
                let willing = parse_bool(field, raw)?;
                if !controller.edit(|draft| draft.set_relocation_willingness(willing)) {
                    return Ok(Some(
                        "Relocation willingness only applies to On-site work.".into(),
                    ));
                }
            }
            _ => {
                let accepted = parse_bool(field, raw)?;
                controller.edit(|draft| draft.set_terms_accepted(accepted));
            }
        },
    }
    Ok(None)
}

fn collection_hint(field: &str) -> CommandError {
    CommandError::InvalidArguments(format!(
        "`{0}` holds several values. Use `add {0} <label>` or `remove {0} <label>`.",
        field
    ))
}

/// The two set-valued fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Collection {
    Services,
    Skills,
}

impl Collection {
    pub(crate) fn parse(raw: &str) -> Result<Self, CommandError> {
        match squash(raw).as_str() {
            "services" | "service" => Ok(Collection::Services),
            "skills" | "skill" => Ok(Collection::Skills),
            _ => Err(CommandError::InvalidArguments(format!(
                "`{}` is not a list; expected `services` or `skills`",
                raw
            ))),
        }
    }

    pub(crate) fn field(self) -> &'static str {
        match self {
            Collection::Services => fields::SERVICES,
            Collection::Skills => fields::SKILLS,
        }
    }

    fn catalog_label(self, raw: &str) -> (String, bool) {
        let known = match self {
            Collection::Services => catalog::lookup(raw, catalog::all_services()),
            Collection::Skills => catalog::lookup(raw, AVAILABLE_SKILLS),
        };
        match known {
            Some(label) => (label.to_string(), true),
            None => (raw.trim().to_string(), false),
        }
    }

    fn suggestion(self, raw: &str) -> Option<&'static str> {
        match self {
            Collection::Services => catalog::suggest(raw, catalog::all_services()),
            Collection::Skills => catalog::suggest(raw, AVAILABLE_SKILLS),
        }
    }
}

/// Result of an add or remove on a set-valued field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ListChange {
    pub label: String,
    pub changed: bool,
    pub note: Option<String>,
}

pub(crate) fn add_label(
    active: &mut ActiveStep,
    list: Collection,
    raw: &str,
) -> Result<ListChange, CommandError> {
    ensure_on_step(active, list.field())?;
    if raw.trim().is_empty() {
        return Err(CommandError::InvalidArguments(format!(
            "`add {}` needs a label",
            list.field()
        )));
    }

    let (label, known) = list.catalog_label(raw);
    let changed = match active {
        ActiveStep::Services(controller) => controller.edit(|draft| draft.add(&label)),
        ActiveStep::Skills(controller) => controller.edit(|draft| draft.add(&label)),
        _ => false,
    };

    let note = if known {
        None
    } else {
        Some(match list.suggestion(raw) {
            Some(best) => format!("`{}` is not in the catalog. Did you mean `{}`?", label, best),
            None => format!("`{}` is not in the catalog.", label),
        })
    };
    Ok(ListChange {
        label,
        changed,
        note,
    })
}

pub(crate) fn remove_label(
    active: &mut ActiveStep,
    list: Collection,
    raw: &str,
) -> Result<ListChange, CommandError> {
    ensure_on_step(active, list.field())?;
    let (label, _) = list.catalog_label(raw);
    let changed = match active {
        ActiveStep::Services(controller) => controller.edit(|draft| draft.remove(&label)),
        ActiveStep::Skills(controller) => controller.edit(|draft| draft.remove(&label)),
        _ => false,
    };
    Ok(ListChange {
        label,
        changed,
        note: None,
    })
}

pub(crate) fn clear_list(active: &mut ActiveStep, list: Collection) -> Result<(), CommandError> {
    ensure_on_step(active, list.field())?;
    match active {
        ActiveStep::Services(controller) => controller.edit(|draft| draft.clear_all()),
        ActiveStep::Skills(controller) => controller.edit(|draft| draft.clear_all()),
        _ => {}
    }
    Ok(())
}

/// Flips `label` in the list. Returns whether it is now selected.
pub(crate) fn toggle_label(
    active: &mut ActiveStep,
    list: Collection,
    label: &str,
) -> Result<bool, CommandError> {
    ensure_on_step(active, list.field())?;
    Ok(match active {
        ActiveStep::Services(controller) => controller.edit(|draft| {
            draft.toggle(label);
            draft.selected().contains(label)
        }),
        ActiveStep::Skills(controller) => controller.edit(|draft| {
            draft.toggle(label);
            draft.selected().contains(label)
        }),
        _ => false,
    })
}

/// Labels currently selected in the list, in selection order.
pub(crate) fn selected_labels(active: &ActiveStep, list: Collection) -> Vec<String> {
    let selected = match (active, list) {
        (ActiveStep::Services(controller), Collection::Services) => controller.draft().selected(),
        (ActiveStep::Skills(controller), Collection::Skills) => controller.draft().selected(),
        _ => return Vec::new(),
    };
    selected.iter().map(str::to_string).collect()
}

/// Selects every catalog service whose name contains `term`. Returns how
/// many services matched.
pub(crate) fn select_matching_services(
    active: &mut ActiveStep,
    term: &str,
) -> Result<usize, CommandError> {
    ensure_on_step(active, fields::SERVICES)?;
    let matches: Vec<&'static str> = catalog::search_services(term)
        .into_iter()
        .flat_map(|(_, services)| services)
        .collect();
    if let ActiveStep::Services(controller) = active {
        controller.edit(|draft| draft.select_all(matches.iter().copied()));
    }
    Ok(matches.len())
}

/// Current draft value of `field` as display text.
pub(crate) fn draft_value(active: &ActiveStep, field: &str) -> String {
    let flag = |value: bool| (if value { "Yes" } else { "No" }).to_string();
    match active {
        ActiveStep::BasicInfo(controller) => {
            let draft = controller.draft();
            match field {
                fields::FULL_NAME => draft.full_name.clone(),
                fields::EMAIL => draft.email.clone(),
                fields::ROLE => draft.role.map(|role| role.to_string()).unwrap_or_default(),
                _ => flag(draft.subscribe),
            }
        }
        ActiveStep::Schedule(controller) => {
            let draft = controller.draft();
            match field {
                fields::PREFERRED_DATE => draft
                    .preferred_date
                    .map(|date| date.format(DATE_FORMAT).to_string())
                    .unwrap_or_default(),
                fields::PREFERRED_TIME => draft.preferred_time.clone(),
                _ => draft.timezone.clone(),
            }
        }
        ActiveStep::Services(controller) => controller
            .draft()
            .selected()
            .iter()
            .collect::<Vec<_>>()
            .join(", "),
        ActiveStep::Skills(controller) => {
            let draft = controller.draft();
            match field {
                fields::SKILLS => draft.selected().iter().collect::<Vec<_>>().join(", "),
                _ => draft.interested_topics.clone(),
            }
        }
        ActiveStep::Preferences(controller) => {
            let draft = controller.draft();
            match field {
                fields::WORK_PREFERENCE => draft
                    .work_preference()
                    .map(|preference| preference.to_string())
                    .unwrap_or_default(),
                fields::HOME_OFFICE_READY => flag(draft.home_office_ready()),
                fields::RELOCATION_WILLINGNESS => flag(draft.relocation_willingness()),
                _ => flag(draft.terms_accepted()),
            }
        }
    }
}

/// Fields worth showing right now. The follow-up booleans of step five only
/// appear for their work preference.
pub(crate) fn visible_fields(active: &ActiveStep) -> Vec<&'static str> {
    let preference = match active {
        ActiveStep::Preferences(controller) => controller.draft().work_preference(),
        _ => None,
    };
    active
        .fields()
        .iter()
        .copied()
        .filter(|field| match *field {
            fields::HOME_OFFICE_READY => preference == Some(WorkPreference::Remote),
            fields::RELOCATION_WILLINGNESS => preference == Some(WorkPreference::OnSite),
            _ => true,
        })
        .collect()
}

/// Human label for a field name.
pub(crate) fn field_label(field: &str) -> &'static str {
    match field {
        fields::FULL_NAME => "Full Name",
        fields::EMAIL => "Email",
        fields::ROLE => "Role",
        fields::SUBSCRIBE => "Subscribe to newsletter",
        fields::PREFERRED_DATE => "Preferred Date",
        fields::PREFERRED_TIME => "Preferred Time",
        fields::TIMEZONE => "Timezone",
        fields::SERVICES => "Services",
        fields::SKILLS => "Skills",
        fields::INTERESTED_TOPICS => "Interested Topics",
        fields::WORK_PREFERENCE => "Work Preference",
        fields::HOME_OFFICE_READY => "Home office ready",
        fields::RELOCATION_WILLINGNESS => "Willing to relocate",
        fields::TERMS_ACCEPTED => "Accept terms and conditions",
        _ => "Field",
    }
}
