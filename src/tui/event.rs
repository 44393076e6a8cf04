use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// What a key press means to the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Hand the input line to the dispatcher
    Submit,
    /// Ctrl-C, the quit gesture
    Interrupt,
    ScrollUp,
    ScrollDown,
    /// Anything else goes to the input editor
    Edit(KeyEvent),
}

/// Map a terminal key event onto a console action.
///
/// Release and repeat events are ignored so a held key does not count twice
/// on terminals that report them.
pub fn map_key(key: KeyEvent) -> Option<KeyAction> {
    if key.kind != KeyEventKind::Press {
        return None;
    }

    let action = match key.code {
        KeyCode::Char('c') | KeyCode::Char('C') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            KeyAction::Interrupt
        }
        KeyCode::Enter => KeyAction::Submit,
        KeyCode::PageUp => KeyAction::ScrollUp,
        KeyCode::PageDown => KeyAction::ScrollDown,
        _ => KeyAction::Edit(key),
    };
    Some(action)
}
