//! Position arithmetic over the five data steps and the review screen.
//!
//! Nothing here touches form data. Out-of-range step requests are corrected
//! to the first step rather than rejected.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Number of positions shown in the progress indicator, review included.
pub const TOTAL_POSITIONS: usize = 6;

/// A data step, always within `1..=5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct StepNumber(u8);

impl StepNumber {
    pub const BASIC_INFO: StepNumber = StepNumber(1);
    pub const SCHEDULE: StepNumber = StepNumber(2);
    pub const SERVICES: StepNumber = StepNumber(3);
    pub const SKILLS: StepNumber = StepNumber(4);
    pub const PREFERENCES: StepNumber = StepNumber(5);
    pub const FIRST: StepNumber = Self::BASIC_INFO;
    pub const LAST: StepNumber = Self::PREFERENCES;
    pub const COUNT: u8 = 5;

    pub fn new(value: u8) -> Option<Self> {
        (1..=Self::COUNT).contains(&value).then_some(Self(value))
    }

    pub fn get(self) -> u8 {
        self.0
    }

    pub fn all() -> impl Iterator<Item = StepNumber> {
        (1..=Self::COUNT).map(StepNumber)
    }

    /// Heading shown above the step's fields.
    pub fn title(self) -> &'static str {
        match self.0 {
            1 => "Basic Information",
            2 => "Schedule Meeting",
            3 => "Select Services",
            4 => "Skills & Interests",
            _ => "Preferences",
        }
    }

    /// Short name used in the progress bar.
    pub fn label(self) -> &'static str {
        match self.0 {
            1 => "Basic Info",
            2 => "Schedule",
            3 => "Services",
            4 => "Skills",
            _ => "Preferences",
        }
    }

    pub fn description(self) -> &'static str {
        match self.0 {
            1 => "Tell us about yourself",
            2 => "Pick a time for an introductory call",
            3 => "Choose the services you are interested in",
            4 => "Share your skills and interests",
            _ => "Set your work preferences and accept the terms",
        }
    }
}

impl TryFrom<u8> for StepNumber {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        StepNumber::new(value).ok_or_else(|| format!("step {value} is outside 1..=5"))
    }
}

impl From<StepNumber> for u8 {
    fn from(step: StepNumber) -> Self {
        step.0
    }
}

impl fmt::Display for StepNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Position {
    Step(StepNumber),
    Review,
}

impl Position {
    pub fn all() -> [Position; TOTAL_POSITIONS] {
        [
            Position::Step(StepNumber(1)),
            Position::Step(StepNumber(2)),
            Position::Step(StepNumber(3)),
            Position::Step(StepNumber(4)),
            Position::Step(StepNumber(5)),
            Position::Review,
        ]
    }

    /// Zero-based index within the six-position sequence.
    pub fn index(self) -> usize {
        match self {
            Position::Step(step) => usize::from(step.get()) - 1,
            Position::Review => TOTAL_POSITIONS - 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(label(*self))
    }
}

/// Canonical step for a requested number.
pub fn clamp(requested: i64) -> StepNumber {
    u8::try_from(requested)
        .ok()
        .and_then(StepNumber::new)
        .unwrap_or(StepNumber::FIRST)
}

/// Like [`clamp`], but for raw path segments. Anything that is not an integer
/// lands on step one.
pub fn clamp_str(raw: &str) -> StepNumber {
    raw.trim()
        .parse::<i64>()
        .map(clamp)
        .unwrap_or(StepNumber::FIRST)
}

pub fn previous_of(position: Position) -> Option<Position> {
    match position {
        Position::Step(step) if step == StepNumber::FIRST => None,
        Position::Step(step) => Some(Position::Step(StepNumber(step.get() - 1))),
        Position::Review => Some(Position::Step(StepNumber::LAST)),
    }
}

pub fn next_of(position: Position) -> Option<Position> {
    match position {
        Position::Step(step) if step == StepNumber::LAST => Some(Position::Review),
        Position::Step(step) => Some(Position::Step(StepNumber(step.get() + 1))),
        Position::Review => None,
    }
}

/// `(current, total)` for the "Step X of Y" indicator.
pub fn progress_label(position: Position) -> (usize, usize) {
    (position.index() + 1, TOTAL_POSITIONS)
}

pub fn label(position: Position) -> &'static str {
    match position {
        Position::Step(step) => step.label(),
        Position::Review => "Review",
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    Completed,
    Current,
    Upcoming,
}

/// Progress bar state for every position, derived from index order only.
pub fn progress_markers(current: Position) -> Vec<(Position, Marker)> {
    let current_index = current.index();
    Position::all()
        .into_iter()
        .map(|position| {
            let marker = match position.index().cmp(&current_index) {
                std::cmp::Ordering::Less => Marker::Completed,
                std::cmp::Ordering::Equal => Marker::Current,
                std::cmp::Ordering::Greater => Marker::Upcoming,
            };
            (position, marker)
        })
        .collect()
}

/// Navigable locations of the wizard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Entry,
    Step(StepNumber),
    Review,
}

/// Outcome of resolving a path. `redirected` is set whenever the canonical
/// route differs from what was asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub route: Route,
    pub redirected: bool,
}

impl Route {
    pub fn parse(path: &str) -> Resolution {
        let trimmed = path.trim();
        let normalized = trimmed.trim_end_matches('/');
        match normalized {
            "" => Resolution {
                route: Route::Entry,
                redirected: false,
            },
            "/review" => Resolution {
                route: Route::Review,
                redirected: false,
            },
            _ => match normalized.strip_prefix("/step") {
                Some(rest) if rest.is_empty() || rest.starts_with('/') => {
                    let segment = rest.trim_start_matches('/');
                    let step = clamp_str(segment);
                    Resolution {
                        route: Route::Step(step),
                        redirected: segment != step.to_string(),
                    }
                }
                _ => Resolution {
                    route: Route::Entry,
                    redirected: true,
                },
            },
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Entry => "/".to_string(),
            Route::Step(step) => format!("/step/{step}"),
            Route::Review => "/review".to_string(),
        }
    }

    pub fn position(&self) -> Option<Position> {
        match self {
            Route::Entry => None,
            Route::Step(step) => Some(Position::Step(*step)),
            Route::Review => Some(Position::Review),
        }
    }
}

impl From<Position> for Route {
    fn from(position: Position) -> Self {
        match position {
            Position::Step(step) => Route::Step(step),
            Position::Review => Route::Review,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
