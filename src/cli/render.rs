//! Text screens for each wizard position. Every function returns plain lines
//! so the same screen serves as menu context and as script-mode output.

use crate::{
    review::{ReviewState, ReviewSummary},
    sequencer::{self, Marker, Position, StepNumber},
    steps::ActiveStep,
    store::FormStore,
};

use super::fields::{draft_value, field_label, visible_fields};
use super::ui::formatting::Formatter;

/// "Step X of 6: Label".
pub fn progress_line(position: Position) -> String {
    let (current, total) = sequencer::progress_label(position);
    format!("Step {} of {}: {}", current, total, sequencer::label(position))
}

pub fn progress_bar(position: Position, plain: bool) -> String {
    sequencer::progress_markers(position)
        .into_iter()
        .map(|(position, marker)| {
            let symbol = match (marker, plain) {
                (Marker::Completed, true) => "[x]",
                (Marker::Current, true) => "[>]",
                (Marker::Upcoming, true) => "[ ]",
                (Marker::Completed, false) => "✔",
                (Marker::Current, false) => "●",
                (Marker::Upcoming, false) => "○",
            };
            format!("{} {}", symbol, sequencer::label(position))
        })
        .collect::<Vec<_>>()
        .join("  ")
}

fn header(formatter: &Formatter, position: Position, plain: bool) -> Vec<String> {
    vec![
        formatter.detail_text(progress_line(position)),
        progress_bar(position, plain),
        String::new(),
    ]
}

/// Fields of the step on screen with their draft values and live errors.
pub fn step_screen(active: &ActiveStep, plain: bool) -> Vec<String> {
    let formatter = Formatter::new();
    let step = active.step();
    let mut lines = header(&formatter, Position::Step(step), plain);
    lines.push(formatter.header_text(step.title()));
    lines.push(formatter.detail_text(step.description()));
    lines.push(String::new());

    for field in visible_fields(active) {
        let value = draft_value(active, field);
        let shown = if value.is_empty() { "-".to_string() } else { value };
        lines.push(format!("  {}: {}", field_label(field), shown));
        if let Some(message) = active.errors().get(field) {
            lines.push(formatter.field_error_text(message));
        }
    }
    lines
}

pub fn entry_screen(store: &FormStore, plain: bool) -> Vec<String> {
    let formatter = Formatter::new();
    let mut lines = vec![
        formatter.header_text("Multi-step Application"),
        formatter.detail_text("Five short steps, then a review before you submit."),
        String::new(),
    ];
    for step in StepNumber::all() {
        let done = store.is_step_complete(step);
        let mark = match (done, plain) {
            (true, true) => "[x]",
            (false, true) => "[ ]",
            (true, false) => "✔",
            (false, false) => "○",
        };
        lines.push(format!("  {} {}. {}", mark, step, step.title()));
    }
    lines
}

pub fn review_screen(summary: &ReviewSummary, state: &ReviewState, plain: bool) -> Vec<String> {
    let formatter = Formatter::new();
    let mut lines = header(&formatter, Position::Review, plain);
    lines.push(formatter.header_text("Review Your Application"));
    lines.push(String::new());
    lines.extend(summary.to_string().lines().map(str::to_string));

    match state {
        ReviewState::Reviewing => {}
        ReviewState::Submitting => {
            lines.push(String::new());
            lines.push(formatter.detail_text("Submitting..."));
        }
        ReviewState::Submitted(receipt) => {
            lines.push(String::new());
            lines.push(formatter.emphasis_text(format!(
                "Application submitted (reference {}).",
                receipt.id
            )));
        }
        ReviewState::Failed(message) => {
            lines.push(String::new());
            lines.push(formatter.field_error_text(format!(
                "Last submission failed: {}. You can try again.",
                message
            )));
        }
    }
    lines
}
