// Key mapping and input handling

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::date::DateField;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Selection
    Shift(DateField, i32),
    SelectToday,

    // Free scrolling
    ScrollUp,
    ScrollDown,

    // Options
    ToggleAnimate,
    ToggleCenter,
    ToggleWeekNumber,
    CycleFirstDayOfWeek,

    Quit,
    None,
}

pub fn map_key(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Action::Quit,

        KeyCode::Char('h') | KeyCode::Left => Action::Shift(DateField::Day, -1),
        KeyCode::Char('l') | KeyCode::Right => Action::Shift(DateField::Day, 1),
        KeyCode::Char('k') => Action::Shift(DateField::Week, -1),
        KeyCode::Char('j') => Action::Shift(DateField::Week, 1),
        KeyCode::Char('p') | KeyCode::PageUp => Action::Shift(DateField::Month, -1),
        KeyCode::Char('n') | KeyCode::PageDown => Action::Shift(DateField::Month, 1),
        KeyCode::Char('P') => Action::Shift(DateField::Year, -1),
        KeyCode::Char('N') => Action::Shift(DateField::Year, 1),
        KeyCode::Char('t') | KeyCode::Home => Action::SelectToday,

        KeyCode::Up => Action::ScrollUp,
        KeyCode::Down => Action::ScrollDown,

        KeyCode::Char('a') => Action::ToggleAnimate,
        KeyCode::Char('c') => Action::ToggleCenter,
        KeyCode::Char('w') => Action::ToggleWeekNumber,
        KeyCode::Char('f') => Action::CycleFirstDayOfWeek,

        KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
        _ => Action::None,
    }
}
