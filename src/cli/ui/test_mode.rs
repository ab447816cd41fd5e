//! Scripted terminal input for automated runs.
//!
//! `FORM_WIZARD_TEST_MENU_EVENTS` holds `|`-separated menu interactions, each a
//! comma-separated list of keys (`DOWN,DOWN,ENTER`). `FORM_WIZARD_TEST_TEXT_INPUTS`
//! holds `|`-separated answers for text prompts.

use once_cell::sync::Lazy;
use std::{
    collections::VecDeque,
    env,
    sync::{Mutex, MutexGuard},
};

pub const MENU_EVENTS_VAR: &str = "FORM_WIZARD_TEST_MENU_EVENTS";
pub const TEXT_INPUTS_VAR: &str = "FORM_WIZARD_TEST_TEXT_INPUTS";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuTestEvent {
    Up,
    Down,
    Home,
    End,
    PageUp,
    PageDown,
    Enter,
    Esc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextTestInput {
    Value(String),
    Keep,
    Back,
    Cancel,
}

struct Queue<T> {
    enabled: bool,
    items: VecDeque<T>,
}

impl<T> Queue<T> {
    fn from_env(var: &str, parse: fn(&str) -> VecDeque<T>) -> Self {
        match env::var(var) {
            Ok(raw) => Self {
                enabled: true,
                items: parse(&raw),
            },
            Err(_) => Self {
                enabled: false,
                items: VecDeque::new(),
            },
        }
    }
}

static MENU_EVENTS: Lazy<Mutex<Queue<Vec<MenuTestEvent>>>> =
    Lazy::new(|| Mutex::new(Queue::from_env(MENU_EVENTS_VAR, parse_menu_sequences)));

static TEXT_INPUTS: Lazy<Mutex<Queue<TextTestInput>>> =
    Lazy::new(|| Mutex::new(Queue::from_env(TEXT_INPUTS_VAR, parse_text_sequences)));

fn lock<T>(queue: &Mutex<T>) -> MutexGuard<'_, T> {
    queue
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Next scripted interaction for a menu. An exhausted script behaves like
/// pressing ESC so automated runs wind down instead of blocking on a TTY.
pub fn next_menu_events(label: &str) -> Option<Vec<MenuTestEvent>> {
    let mut guard = lock(&MENU_EVENTS);
    if !guard.enabled {
        return None;
    }
    Some(guard.items.pop_front().unwrap_or_else(|| {
        tracing::debug!(menu = label, "scripted menu events exhausted");
        vec![MenuTestEvent::Esc]
    }))
}

pub fn next_text_input(label: &str) -> Option<TextTestInput> {
    let mut guard = lock(&TEXT_INPUTS);
    if !guard.enabled {
        return None;
    }
    Some(guard.items.pop_front().unwrap_or_else(|| {
        tracing::debug!(prompt = label, "scripted text inputs exhausted");
        TextTestInput::Cancel
    }))
}

fn parse_menu_event(token: &str) -> Option<MenuTestEvent> {
    match token.to_ascii_uppercase().as_str() {
        "UP" => Some(MenuTestEvent::Up),
        "DOWN" => Some(MenuTestEvent::Down),
        "HOME" => Some(MenuTestEvent::Home),
        "END" => Some(MenuTestEvent::End),
        "PAGEUP" | "PAGE_UP" => Some(MenuTestEvent::PageUp),
        "PAGEDOWN" | "PAGE_DOWN" => Some(MenuTestEvent::PageDown),
        "ENTER" | "RETURN" => Some(MenuTestEvent::Enter),
        "ESC" | "ESCAPE" => Some(MenuTestEvent::Esc),
        _ => None,
    }
}

fn parse_text_input(token: &str) -> TextTestInput {
    match token.to_ascii_uppercase().as_str() {
        "<CANCEL>" | "<ESC>" => TextTestInput::Cancel,
        "<BACK>" => TextTestInput::Back,
        "<KEEP>" => TextTestInput::Keep,
        "<BLANK>" | "<EMPTY>" => TextTestInput::Value(String::new()),
        _ => TextTestInput::Value(token.to_string()),
    }
}

fn parse_menu_sequences(raw: &str) -> VecDeque<Vec<MenuTestEvent>> {
    raw.split('|')
        .filter_map(|segment| {
            let events = segment
                .split(',')
                .filter_map(|token| parse_menu_event(token.trim()))
                .collect::<Vec<_>>();
            if events.is_empty() {
                None
            } else {
                Some(events)
            }
        })
        .collect()
}

fn parse_text_sequences(raw: &str) -> VecDeque<TextTestInput> {
    raw.split('|')
        .filter_map(|segment| {
            let trimmed = segment.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(parse_text_input(trimmed))
            }
        })
        .collect()
}

pub fn install_menu_events(events: Vec<Vec<MenuTestEvent>>) {
    let mut guard = lock(&MENU_EVENTS);
    guard.enabled = true;
    guard.items = events.into();
}

pub fn install_text_inputs(inputs: Vec<TextTestInput>) {
    let mut guard = lock(&TEXT_INPUTS);
    guard.enabled = true;
    guard.items = inputs.into();
}

pub fn reset() {
    let mut menus = lock(&MENU_EVENTS);
    menus.enabled = false;
    menus.items.clear();
    drop(menus);
    let mut texts = lock(&TEXT_INPUTS);
    texts.enabled = false;
    texts.items.clear();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn menu_sequences_split_on_pipes_and_commas() {
        let parsed = parse_menu_sequences("down, down ,enter|ESC||bogus");
        assert_eq!(
            parsed,
            VecDeque::from(vec![
                vec![MenuTestEvent::Down, MenuTestEvent::Down, MenuTestEvent::Enter],
                vec![MenuTestEvent::Esc],
            ])
        );
    }

    #[test]
    fn text_sequences_understand_markers() {
        let parsed = parse_text_sequences("Ada Lovelace|<blank>|<keep>|<cancel>");
        assert_eq!(
            parsed,
            VecDeque::from(vec![
                TextTestInput::Value("Ada Lovelace".into()),
                TextTestInput::Value(String::new()),
                TextTestInput::Keep,
                TextTestInput::Cancel,
            ])
        );
    }
}
