//! Terminal events to controller input events.

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use rc_core::{ControlButton, InputEvent, Key};

pub const GRID_LEFT: u16 = 2;
pub const GRID_TOP: u16 = 2;
pub const CELL_WIDTH: u16 = 6;

#[derive(Debug, PartialEq, Eq)]
pub enum Translated {
    Quit,
    Input(Vec<InputEvent>),
}

/// Every key gets an identifier, so any key-down sets the router's latch even
/// when nothing is bound to it.
pub fn key_id(code: KeyCode) -> Key {
    let named = match code {
        KeyCode::Char(c) => return Key::char(c),
        KeyCode::Up => "ArrowUp",
        KeyCode::Down => "ArrowDown",
        KeyCode::Left => "ArrowLeft",
        KeyCode::Right => "ArrowRight",
        KeyCode::Enter => "Enter",
        KeyCode::Tab => "Tab",
        KeyCode::Backspace => "Backspace",
        other => return Key::new(format!("{other:?}")),
    };
    Key::new(named)
}

/// Grid button under a terminal cell, if any.
pub fn button_at(column: u16, row: u16) -> Option<ControlButton> {
    let column = column.checked_sub(GRID_LEFT)? / CELL_WIDTH;
    let row = row.checked_sub(GRID_TOP)?;
    ControlButton::at(u8::try_from(row).ok()?, u8::try_from(column).ok()?)
}

/// When the terminal does not report key releases, every press is followed
/// by a synthetic release so the key latch never sticks.
pub fn translate(event: &Event, reports_release: bool) -> Translated {
    match event {
        Event::Key(key) => translate_key(key, reports_release),
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            ..
        }) => Translated::Input(
            button_at(*column, *row)
                .map(InputEvent::ButtonActivated)
                .into_iter()
                .collect(),
        ),
        _ => Translated::Input(Vec::new()),
    }
}

fn translate_key(key: &KeyEvent, reports_release: bool) -> Translated {
    let is_ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char(c) if c.eq_ignore_ascii_case(&'c'));
    if key.kind == KeyEventKind::Press
        && (is_ctrl_c || key.code == KeyCode::Esc)
    {
        return Translated::Quit;
    }

    let id = key_id(key.code);
    let events = match key.kind {
        KeyEventKind::Press if reports_release => vec![InputEvent::KeyDown(id)],
        KeyEventKind::Press => vec![InputEvent::KeyDown(id.clone()), InputEvent::KeyUp(id)],
        KeyEventKind::Repeat => vec![InputEvent::KeyDown(id)],
        KeyEventKind::Release => vec![InputEvent::KeyUp(id)],
    };
    Translated::Input(events)
}

#[cfg(test)]
#[path = "tests/keymap_tests.rs"]
mod tests;
