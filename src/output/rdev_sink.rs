//! Synthetic keyboard events through rdev
//!
//! Text is typed key by key assuming a US keyboard layout; characters that
//! layout cannot produce are skipped with a warning.

use super::OutputSink;
use crate::mapping::Key;
use rdev::{simulate, EventType, Key as RdevKey};
use tracing::{debug, warn};

#[derive(Debug, Default)]
pub struct RdevSink;

impl RdevSink {
    pub fn new() -> Self {
        Self
    }

    fn send(&self, event: EventType) {
        if let Err(e) = simulate(&event) {
            warn!("Failed to simulate {:?}: {:?}", event, e);
        }
    }

    fn tap(&self, key: RdevKey, shift: bool) {
        if shift {
            self.send(EventType::KeyPress(RdevKey::ShiftLeft));
        }
        self.send(EventType::KeyPress(key));
        self.send(EventType::KeyRelease(key));
        if shift {
            self.send(EventType::KeyRelease(RdevKey::ShiftLeft));
        }
    }
}

impl OutputSink for RdevSink {
    fn press_key(&mut self, key: Key) {
        debug!("Pressing {}", key);
        self.send(EventType::KeyPress(named_key(key)));
    }

    fn release_key(&mut self, key: Key) {
        debug!("Releasing {}", key);
        self.send(EventType::KeyRelease(named_key(key)));
    }

    fn write_text(&mut self, text: &str) {
        debug!("Writing {:?}", text);
        for c in text.chars() {
            match char_key(c) {
                Some((key, shift)) => self.tap(key, shift),
                None => warn!("No key for {:?} on a US layout, skipping", c),
            }
        }
    }
}

pub fn named_key(key: Key) -> RdevKey {
    match key {
        Key::Up => RdevKey::UpArrow,
        Key::Down => RdevKey::DownArrow,
        Key::Left => RdevKey::LeftArrow,
        Key::Right => RdevKey::RightArrow,
        Key::Space => RdevKey::Space,
        Key::Enter => RdevKey::Return,
        Key::Tab => RdevKey::Tab,
        Key::Backspace => RdevKey::Backspace,
        Key::Delete => RdevKey::Delete,
        Key::Escape => RdevKey::Escape,
        Key::Home => RdevKey::Home,
        Key::Control => RdevKey::ControlLeft,
        Key::AltGr => RdevKey::AltGr,
    }
}

/// Physical key and shift state producing `c` on a US layout
pub fn char_key(c: char) -> Option<(RdevKey, bool)> {
    if c.is_ascii_alphabetic() {
        return letter_key(c.to_ascii_lowercase()).map(|key| (key, c.is_ascii_uppercase()));
    }

    let mapped = match c {
        '0' => (RdevKey::Num0, false),
        '1' => (RdevKey::Num1, false),
        '2' => (RdevKey::Num2, false),
        '3' => (RdevKey::Num3, false),
        '4' => (RdevKey::Num4, false),
        '5' => (RdevKey::Num5, false),
        '6' => (RdevKey::Num6, false),
        '7' => (RdevKey::Num7, false),
        '8' => (RdevKey::Num8, false),
        '9' => (RdevKey::Num9, false),
        ')' => (RdevKey::Num0, true),
        '!' => (RdevKey::Num1, true),
        '@' => (RdevKey::Num2, true),
        '#' => (RdevKey::Num3, true),
        '$' => (RdevKey::Num4, true),
        '%' => (RdevKey::Num5, true),
        '^' => (RdevKey::Num6, true),
        '&' => (RdevKey::Num7, true),
        '*' => (RdevKey::Num8, true),
        '(' => (RdevKey::Num9, true),
        '-' => (RdevKey::Minus, false),
        '_' => (RdevKey::Minus, true),
        '=' => (RdevKey::Equal, false),
        '+' => (RdevKey::Equal, true),
        '[' => (RdevKey::LeftBracket, false),
        '{' => (RdevKey::LeftBracket, true),
        ']' => (RdevKey::RightBracket, false),
        '}' => (RdevKey::RightBracket, true),
        ';' => (RdevKey::SemiColon, false),
        ':' => (RdevKey::SemiColon, true),
        '\'' => (RdevKey::Quote, false),
        '"' => (RdevKey::Quote, true),
        '`' => (RdevKey::BackQuote, false),
        '~' => (RdevKey::BackQuote, true),
        '\\' => (RdevKey::BackSlash, false),
        '|' => (RdevKey::BackSlash, true),
        ',' => (RdevKey::Comma, false),
        '<' => (RdevKey::Comma, true),
        '.' => (RdevKey::Dot, false),
        '>' => (RdevKey::Dot, true),
        '/' => (RdevKey::Slash, false),
        '?' => (RdevKey::Slash, true),
        ' ' => (RdevKey::Space, false),
        '\n' => (RdevKey::Return, false),
        '\t' => (RdevKey::Tab, false),
        _ => return None,
    };
    Some(mapped)
}

fn letter_key(c: char) -> Option<RdevKey> {
    let key = match c {
        'a' => RdevKey::KeyA,
        'b' => RdevKey::KeyB,
        'c' => RdevKey::KeyC,
        'd' => RdevKey::KeyD,
        'e' => RdevKey::KeyE,
        'f' => RdevKey::KeyF,
        'g' => RdevKey::KeyG,
        'h' => RdevKey::KeyH,
        'i' => RdevKey::KeyI,
        'j' => RdevKey::KeyJ,
        'k' => RdevKey::KeyK,
        'l' => RdevKey::KeyL,
        'm' => RdevKey::KeyM,
        'n' => RdevKey::KeyN,
        'o' => RdevKey::KeyO,
        'p' => RdevKey::KeyP,
        'q' => RdevKey::KeyQ,
        'r' => RdevKey::KeyR,
        's' => RdevKey::KeyS,
        't' => RdevKey::KeyT,
        'u' => RdevKey::KeyU,
        'v' => RdevKey::KeyV,
        'w' => RdevKey::KeyW,
        'x' => RdevKey::KeyX,
        'y' => RdevKey::KeyY,
        'z' => RdevKey::KeyZ,
        _ => return None,
    };
    Some(key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::table::ActionTable;
    use crate::mapping::{Binding, InputId};

    #[test]
    fn letters_carry_shift_by_case() {
        assert_eq!(char_key('k'), Some((RdevKey::KeyK, false)));
        assert_eq!(char_key('K'), Some((RdevKey::KeyK, true)));
    }

    #[test]
    fn shifted_symbols() {
        assert_eq!(char_key('?'), Some((RdevKey::Slash, true)));
        assert_eq!(char_key('|'), Some((RdevKey::BackSlash, true)));
        assert_eq!(char_key('\\'), Some((RdevKey::BackSlash, false)));
        assert_eq!(char_key('é'), None);
    }

    #[test]
    fn every_default_layout_character_is_typeable() {
        let table = ActionTable::default_layout();
        let stick_inputs = table.stick_inputs();
        assert!(!stick_inputs.is_empty());

        // Walk all cells through the public lookup
        use crate::controller::JoystickType;
        use crate::mapping::quadrant::{Aim, Quadrant};
        use crate::mapping::table::{FN1, FN2};
        let mut aims = vec![None];
        for stick in [JoystickType::Left, JoystickType::Right] {
            for quadrant in [Quadrant::Up, Quadrant::Down, Quadrant::Left, Quadrant::Right] {
                aims.push(Aim::new(stick, quadrant));
            }
        }
        for input in InputId::ALL {
            for aim in &aims {
                for modifier in [None, Some(FN1), Some(FN2)] {
                    if let Some(Binding::Write(text)) = table.get(input, *aim, modifier) {
                        for c in text.chars() {
                            assert!(char_key(c).is_some(), "{:?} has no key", c);
                        }
                    }
                }
            }
        }
    }
}
