use std::io::{self, Stdout, Write};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    terminal::{self, ClearType},
    ExecutableCommand,
};

use crate::cli::ui::formatting::Formatter;
use crate::cli::ui::menu_renderer::{MenuRenderer, MenuUI, MenuUIItem};
use crate::cli::ui::test_mode::{self, TextTestInput};

const BACK_KEY: &str = "__BACK";

pub enum TextPromptResult {
    Value(String),
    Keep,
    Back,
    Cancel,
}

pub enum ChoicePromptResult {
    Value(String),
    Back,
    Cancel,
}

/// Answer to the menu shown after a step's fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepAction {
    Continue,
    EditFields,
    Back,
    Exit,
}

/// Single-line text prompt. An empty answer keeps `default` when one is
/// offered.
pub fn text_input(label: &str, default: Option<&str>) -> io::Result<TextPromptResult> {
    if let Some(scripted) = test_mode::next_text_input(label) {
        return Ok(match scripted {
            TextTestInput::Value(value) => interpret_buffer(&value, default),
            TextTestInput::Keep => TextPromptResult::Keep,
            TextTestInput::Back => TextPromptResult::Back,
            TextTestInput::Cancel => TextPromptResult::Cancel,
        });
    }

    let formatter = Formatter::new();
    match default {
        Some(current) if !current.is_empty() => println!(
            "{} {}",
            label,
            formatter.detail_text(format!("[{}]", current))
        ),
        _ => println!("{}", label),
    }

    let mut guard = RawModeGuard::activate()?;
    let mut stdout = io::stdout();
    redraw_input(&mut stdout, "")?;
    let mut buffer = String::new();

    loop {
        let event = event::read()?;
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => {
                if key.modifiers.contains(KeyModifiers::CONTROL) {
                    match key.code {
                        KeyCode::Char('c') | KeyCode::Char('C') => {
                            guard.deactivate();
                            println!();
                            return Ok(TextPromptResult::Cancel);
                        }
                        KeyCode::Char('u') | KeyCode::Char('U') => {
                            buffer.clear();
                            redraw_input(&mut stdout, &buffer)?;
                            continue;
                        }
                        _ => {}
                    }
                }

                match key.code {
                    KeyCode::Esc => {
                        guard.deactivate();
                        println!();
                        return Ok(TextPromptResult::Back);
                    }
                    KeyCode::Enter => {
                        guard.deactivate();
                        println!();
                        return Ok(interpret_buffer(&buffer, default));
                    }
                    KeyCode::Backspace => {
                        buffer.pop();
                        redraw_input(&mut stdout, &buffer)?;
                    }
                    KeyCode::Char(ch) => {
                        buffer.push(ch);
                        redraw_input(&mut stdout, &buffer)?;
                    }
                    KeyCode::Delete => {
                        buffer.clear();
                        redraw_input(&mut stdout, &buffer)?;
                    }
                    _ => {}
                }
            }
            _ => continue,
        }
    }
}

pub fn choice_menu(
    title: &str,
    context_lines: &[String],
    options: &[String],
    default: Option<&str>,
    enable_back: bool,
) -> io::Result<ChoicePromptResult> {
    if options.is_empty() {
        return Ok(ChoicePromptResult::Cancel);
    }

    let mut items: Vec<MenuUIItem> = options
        .iter()
        .map(|label| MenuUIItem::new(label.clone(), label.clone(), ""))
        .collect();
    if enable_back {
        items.push(MenuUIItem::new(BACK_KEY, "← Back", "Keep the current value"));
    }

    let mut menu = MenuUI::new(title.to_string(), items);
    if let Some(context) = join_context(context_lines) {
        menu = menu.with_context(context);
    }
    if let Some(default_label) = default {
        if let Some(index) = options
            .iter()
            .position(|candidate| candidate.eq_ignore_ascii_case(default_label))
        {
            menu = menu.with_initial_index(index);
        }
    }

    let selection = match MenuRenderer::new().show(&menu) {
        Ok(value) => value,
        Err(_) => return Ok(ChoicePromptResult::Cancel),
    };
    match selection {
        Some(selection) if selection == BACK_KEY => Ok(ChoicePromptResult::Back),
        Some(selection) => Ok(ChoicePromptResult::Value(selection)),
        None => Ok(ChoicePromptResult::Cancel),
    }
}

/// Yes/No as a two-item menu, preselecting `current`.
pub fn yes_no_menu(
    title: &str,
    context_lines: &[String],
    current: bool,
) -> io::Result<Option<bool>> {
    let options = vec!["Yes".to_string(), "No".to_string()];
    let default = if current { "Yes" } else { "No" };
    Ok(
        match choice_menu(title, context_lines, &options, Some(default), false)? {
            ChoicePromptResult::Value(choice) => Some(choice == "Yes"),
            _ => None,
        },
    )
}

pub fn step_actions_menu(title: &str, context_lines: &[String]) -> io::Result<StepAction> {
    let items = vec![
        MenuUIItem::new("continue", "Continue", "Validate and save this step"),
        MenuUIItem::new("edit", "Edit fields", "Change one of the answers above"),
        MenuUIItem::new(BACK_KEY, "Back", "Return to the previous screen"),
        MenuUIItem::new("exit", "Exit", "Leave the wizard; saved steps are kept"),
    ];

    let mut menu = MenuUI::new(title.to_string(), items);
    if let Some(context) = join_context(context_lines) {
        menu = menu.with_context(context);
    }

    let selection = match MenuRenderer::new().show(&menu) {
        Ok(value) => value,
        Err(_) => return Ok(StepAction::Exit),
    };
    Ok(match selection.as_deref() {
        Some("continue") => StepAction::Continue,
        Some("edit") => StepAction::EditFields,
        Some("exit") => StepAction::Exit,
        _ => StepAction::Back,
    })
}

fn redraw_input(stdout: &mut Stdout, buffer: &str) -> io::Result<()> {
    stdout.execute(cursor::MoveToColumn(0))?;
    stdout.execute(terminal::Clear(ClearType::CurrentLine))?;
    write!(stdout, "> {}", buffer)?;
    stdout.flush()
}

fn interpret_buffer(buffer: &str, default: Option<&str>) -> TextPromptResult {
    let trimmed = buffer.trim();
    if trimmed.is_empty() {
        return if default.is_some() {
            TextPromptResult::Keep
        } else {
            TextPromptResult::Value(String::new())
        };
    }

    match trimmed.to_ascii_lowercase().as_str() {
        ":cancel" => TextPromptResult::Cancel,
        ":back" => TextPromptResult::Back,
        ":clear" => TextPromptResult::Value(String::new()),
        _ => TextPromptResult::Value(buffer.to_string()),
    }
}

pub(crate) fn join_context(lines: &[String]) -> Option<String> {
    if lines.is_empty() {
        return None;
    }
    let filtered: Vec<String> = lines
        .iter()
        .map(|line| line.trim_end().to_string())
        .collect();
    if filtered.iter().all(|line| line.is_empty()) {
        None
    } else {
        Some(filtered.join("\n"))
    }
}

struct RawModeGuard {
    active: bool,
}

impl RawModeGuard {
    fn activate() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self { active: true })
    }

    fn deactivate(&mut self) {
        if self.active {
            let _ = terminal::disable_raw_mode();
            self.active = false;
        }
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        self.deactivate();
    }
}
