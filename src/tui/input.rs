use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Pan(Direction),
    ZoomIn,
    ZoomOut,
    ResetView,
    ToggleOrientation,
    ToggleNames,
    ToggleHelp,
    OpenSelector,
    NextPost,
    Move(Direction),
    Confirm,
    Cancel,
    Quit,
    Noop,
}

pub fn action_for_key(key: KeyEvent, selector_open: bool) -> Action {
    if selector_open {
        return match key.code {
            KeyCode::Up | KeyCode::Char('k') => Action::Move(Direction::Up),
            KeyCode::Down | KeyCode::Char('j') => Action::Move(Direction::Down),
            KeyCode::Enter => Action::Confirm,
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('p') | KeyCode::Char('q') => {
                Action::Cancel
            }
            _ => Action::Noop,
        };
    }

    match key.code {
        KeyCode::Up => Action::Pan(Direction::Up),
        KeyCode::Down => Action::Pan(Direction::Down),
        KeyCode::Left => Action::Pan(Direction::Left),
        KeyCode::Right => Action::Pan(Direction::Right),
        KeyCode::Char('h') => Action::Pan(Direction::Left),
        KeyCode::Char('j') => Action::Pan(Direction::Down),
        KeyCode::Char('k') => Action::Pan(Direction::Up),
        KeyCode::Char('l') => Action::Pan(Direction::Right),
        KeyCode::Char('+') => Action::ZoomIn,
        KeyCode::Char('=') if key.modifiers.contains(KeyModifiers::SHIFT) => Action::ZoomIn,
        KeyCode::Char('-') => Action::ZoomOut,
        KeyCode::Char('r') => Action::ResetView,
        KeyCode::Char('o') => Action::ToggleOrientation,
        KeyCode::Char('n') => Action::ToggleNames,
        KeyCode::Char('p') => Action::OpenSelector,
        KeyCode::Tab => Action::NextPost,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Esc => Action::Cancel,
        KeyCode::Char('q') => Action::Quit,
        _ => Action::Noop,
    }
}

/// Mouse gestures, in terminal cell coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseAction {
    MovedTo(u16, u16),
    PressedAt(u16, u16),
    DraggedTo(u16, u16),
    Released,
    ZoomIn(u16, u16),
    ZoomOut(u16, u16),
    Noop,
}

pub fn action_for_mouse(event: MouseEvent) -> MouseAction {
    match event.kind {
        MouseEventKind::Moved => MouseAction::MovedTo(event.column, event.row),
        MouseEventKind::Down(MouseButton::Left) => MouseAction::PressedAt(event.column, event.row),
        MouseEventKind::Drag(MouseButton::Left) => MouseAction::DraggedTo(event.column, event.row),
        MouseEventKind::Up(MouseButton::Left) => MouseAction::Released,
        MouseEventKind::ScrollUp => MouseAction::ZoomIn(event.column, event.row),
        MouseEventKind::ScrollDown => MouseAction::ZoomOut(event.column, event.row),
        _ => MouseAction::Noop,
    }
}
