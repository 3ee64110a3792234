use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};

use crate::shared::Key;

// poll for a key press, waiting at most `timeout`; this wait is also the
// control loop's sleep between clock updates
pub fn poll_key(timeout: Duration) -> anyhow::Result<Option<Key>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }

    if let Event::Key(key) = event::read()? {
        if key.kind != KeyEventKind::Press {
            return Ok(None);
        }
        // raw mode swallows ctrl-c, treat it like esc
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(Some(Key::Esc));
        }
        return Ok(to_key(key.code));
    }
    Ok(None)
}

fn to_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Esc => Some(Key::Esc),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Char(' ') => Some(Key::Space),
        KeyCode::Char(c) => Some(Key::Char(c.to_ascii_lowercase())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_named_keys() {
        assert_eq!(to_key(KeyCode::Char(' ')), Some(Key::Space));
        assert_eq!(to_key(KeyCode::Enter), Some(Key::Enter));
        assert_eq!(to_key(KeyCode::Esc), Some(Key::Esc));
        assert_eq!(to_key(KeyCode::Tab), None);
    }

    #[test]
    fn letters_are_lowercased_symbols_kept() {
        assert_eq!(to_key(KeyCode::Char('Q')), Some(Key::Char('q')));
        assert_eq!(to_key(KeyCode::Char('+')), Some(Key::Char('+')));
        assert_eq!(to_key(KeyCode::Char('\'')), Some(Key::Char('\'')));
    }
}
