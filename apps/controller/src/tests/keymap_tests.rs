use crossterm::event::KeyEventState;

use super::*;

fn key(code: KeyCode, kind: KeyEventKind) -> Event {
    Event::Key(KeyEvent {
        code,
        modifiers: KeyModifiers::NONE,
        kind,
        state: KeyEventState::NONE,
    })
}

fn click(column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

#[test]
fn press_and_release_map_to_key_down_and_up() {
    let w = Key::char('w');
    assert_eq!(
        translate(&key(KeyCode::Char('w'), KeyEventKind::Press), true),
        Translated::Input(vec![InputEvent::KeyDown(w.clone())])
    );
    assert_eq!(
        translate(&key(KeyCode::Char('w'), KeyEventKind::Repeat), true),
        Translated::Input(vec![InputEvent::KeyDown(w.clone())])
    );
    assert_eq!(
        translate(&key(KeyCode::Char('w'), KeyEventKind::Release), true),
        Translated::Input(vec![InputEvent::KeyUp(w)])
    );
}

#[test]
fn press_without_release_reporting_is_a_tap() {
    let f = Key::char('f');
    assert_eq!(
        translate(&key(KeyCode::Char('f'), KeyEventKind::Press), false),
        Translated::Input(vec![InputEvent::KeyDown(f.clone()), InputEvent::KeyUp(f)])
    );
}

#[test]
fn quit_keys() {
    assert_eq!(
        translate(&key(KeyCode::Char('q'), KeyEventKind::Press), true),
        Translated::Input(vec![InputEvent::KeyDown(Key::char('q'))]),
        "q stays available for profile bindings"
    );
    assert_eq!(
        translate(&key(KeyCode::Esc, KeyEventKind::Press), true),
        Translated::Quit
    );
    let ctrl_c = Event::Key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
    assert_eq!(translate(&ctrl_c, true), Translated::Quit);
}

#[test]
fn arrow_keys_use_named_identifiers() {
    assert_eq!(key_id(KeyCode::Up), Key::new("ArrowUp"));
    assert_eq!(key_id(KeyCode::F(5)), Key::new("F(5)"));
}

#[test]
fn unnamed_keys_still_produce_key_down() {
    assert_eq!(
        translate(&key(KeyCode::Home, KeyEventKind::Press), true),
        Translated::Input(vec![InputEvent::KeyDown(Key::new("Home"))])
    );
    assert_eq!(
        translate(&key(KeyCode::F(2), KeyEventKind::Release), true),
        Translated::Input(vec![InputEvent::KeyUp(Key::new("F(2)"))])
    );
}

#[test]
fn unbound_key_latches_router_until_release() {
    let mut router = rc_core::InputRouter::new(rc_core::KeyBindings::full());
    let Translated::Input(events) = translate(&key(KeyCode::F(5), KeyEventKind::Press), true)
    else {
        panic!("input expected");
    };
    for event in &events {
        assert_eq!(router.route(event), None);
    }
    assert!(router.key_held());
    assert_eq!(router.route(&InputEvent::KeyDown(Key::char('w'))), None);
}

#[test]
fn clicks_resolve_grid_cells() {
    assert_eq!(
        translate(&click(GRID_LEFT, GRID_TOP), true),
        Translated::Input(vec![InputEvent::ButtonActivated(ControlButton::HeadUp)])
    );
    assert_eq!(
        button_at(GRID_LEFT + CELL_WIDTH + 1, GRID_TOP + 1),
        Some(ControlButton::Fire)
    );
    assert_eq!(
        button_at(GRID_LEFT + CELL_WIDTH, GRID_TOP + 2),
        Some(ControlButton::Backward)
    );
    assert_eq!(button_at(GRID_LEFT + 2 * CELL_WIDTH, GRID_TOP), None);
    assert_eq!(button_at(0, 0), None);
    assert_eq!(
        translate(&click(GRID_LEFT, GRID_TOP + 5), true),
        Translated::Input(Vec::new())
    );
}
