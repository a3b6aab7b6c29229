//! Key names
//!
//! Scenarios ask for keys by name. Single letters and digits name their key;
//! an uppercase letter means the letter together with Shift. Longer names are
//! case insensitive.

use std::sync::LazyLock;

use rustc_hash::FxHashMap;
use smallvec::{SmallVec, smallvec};
use winit::keyboard::KeyCode;

use super::Input;

type Keys = SmallVec<[KeyCode; 2]>;

const LETTERS: [KeyCode; 26] = [
    KeyCode::KeyA,
    KeyCode::KeyB,
    KeyCode::KeyC,
    KeyCode::KeyD,
    KeyCode::KeyE,
    KeyCode::KeyF,
    KeyCode::KeyG,
    KeyCode::KeyH,
    KeyCode::KeyI,
    KeyCode::KeyJ,
    KeyCode::KeyK,
    KeyCode::KeyL,
    KeyCode::KeyM,
    KeyCode::KeyN,
    KeyCode::KeyO,
    KeyCode::KeyP,
    KeyCode::KeyQ,
    KeyCode::KeyR,
    KeyCode::KeyS,
    KeyCode::KeyT,
    KeyCode::KeyU,
    KeyCode::KeyV,
    KeyCode::KeyW,
    KeyCode::KeyX,
    KeyCode::KeyY,
    KeyCode::KeyZ,
];

const DIGITS: [KeyCode; 10] = [
    KeyCode::Digit0,
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
    KeyCode::Digit5,
    KeyCode::Digit6,
    KeyCode::Digit7,
    KeyCode::Digit8,
    KeyCode::Digit9,
];

const FUNCTION_KEYS: [KeyCode; 12] = [
    KeyCode::F1,
    KeyCode::F2,
    KeyCode::F3,
    KeyCode::F4,
    KeyCode::F5,
    KeyCode::F6,
    KeyCode::F7,
    KeyCode::F8,
    KeyCode::F9,
    KeyCode::F10,
    KeyCode::F11,
    KeyCode::F12,
];

const FUNCTION_NAMES: [&str; 12] = [
    "f1", "f2", "f3", "f4", "f5", "f6", "f7", "f8", "f9", "f10", "f11", "f12",
];

const SHIFT: [KeyCode; 2] = [KeyCode::ShiftLeft, KeyCode::ShiftRight];

/// Multi-character names, lowercase
static NAMED: LazyLock<FxHashMap<&'static str, Keys>> = LazyLock::new(|| {
    let mut map: FxHashMap<&'static str, Keys> = FxHashMap::default();
    map.insert("shift", SmallVec::from_slice(&SHIFT));
    map.insert("ctrl", smallvec![KeyCode::ControlLeft, KeyCode::ControlRight]);
    map.insert("strg", smallvec![KeyCode::ControlLeft, KeyCode::ControlRight]);
    map.insert("alt", smallvec![KeyCode::AltLeft]);
    map.insert("alt gr", smallvec![KeyCode::AltRight]);
    map.insert("meta", smallvec![KeyCode::SuperLeft, KeyCode::SuperRight]);
    map.insert("backspace", smallvec![KeyCode::Backspace]);
    map.insert("delete", smallvec![KeyCode::Delete]);
    map.insert("insert", smallvec![KeyCode::Insert]);
    map.insert("space", smallvec![KeyCode::Space]);
    map.insert("enter", smallvec![KeyCode::Enter]);
    map.insert("return", smallvec![KeyCode::Enter]);
    map.insert("escape", smallvec![KeyCode::Escape]);
    map.insert("esc", smallvec![KeyCode::Escape]);
    map.insert("tab", smallvec![KeyCode::Tab]);
    map.insert("up", smallvec![KeyCode::ArrowUp]);
    map.insert("down", smallvec![KeyCode::ArrowDown]);
    map.insert("left", smallvec![KeyCode::ArrowLeft]);
    map.insert("right", smallvec![KeyCode::ArrowRight]);
    map.insert("home", smallvec![KeyCode::Home]);
    map.insert("end", smallvec![KeyCode::End]);
    map.insert("page up", smallvec![KeyCode::PageUp]);
    map.insert("page down", smallvec![KeyCode::PageDown]);
    map.insert(".", smallvec![KeyCode::Period]);
    map.insert(",", smallvec![KeyCode::Comma]);
    map.insert("-", smallvec![KeyCode::Minus]);
    for (name, key) in FUNCTION_NAMES.into_iter().zip(FUNCTION_KEYS) {
        map.insert(name, smallvec![key]);
    }
    map
});

/// A parsed key name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyQuery {
    /// Any of these keys satisfies the query
    keys: Keys,
    /// Shift must be held as well
    shift: bool,
}

impl KeyQuery {
    /// Parse a key name; `None` for names that do not exist
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            if c.is_ascii_lowercase() {
                return Some(Self::single(LETTERS[(c as u8 - b'a') as usize]));
            }
            if c.is_ascii_uppercase() {
                return Some(Self {
                    keys: smallvec![LETTERS[(c as u8 - b'A') as usize]],
                    shift: true,
                });
            }
            if c.is_ascii_digit() {
                return Some(Self::single(DIGITS[(c as u8 - b'0') as usize]));
            }
        }

        let lower = name.to_ascii_lowercase();
        NAMED.get(lower.as_str()).map(|keys| Self {
            keys: keys.clone(),
            shift: false,
        })
    }

    fn single(key: KeyCode) -> Self {
        Self {
            keys: smallvec![key],
            shift: false,
        }
    }

    /// The keys this name stands for
    #[must_use]
    pub fn keys(&self) -> &[KeyCode] {
        &self.keys
    }

    #[must_use]
    pub fn needs_shift(&self) -> bool {
        self.shift
    }

    /// Whether the named key is held down
    #[must_use]
    pub fn is_pressed(&self, input: &Input) -> bool {
        let key_down = self.keys.iter().any(|&key| input.is_key_pressed(key));
        let shift_ok = !self.shift || SHIFT.iter().any(|&key| input.is_key_pressed(key));
        key_down && shift_ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::event::ElementState;

    fn pressed(keys: &[KeyCode]) -> Input {
        let mut input = Input::new();
        for &key in keys {
            input.process_keyboard(key, ElementState::Pressed);
        }
        input
    }

    #[test]
    fn test_single_characters() {
        assert_eq!(KeyQuery::parse("a").unwrap().keys(), &[KeyCode::KeyA]);
        assert_eq!(KeyQuery::parse("7").unwrap().keys(), &[KeyCode::Digit7]);
        let upper = KeyQuery::parse("Q").unwrap();
        assert_eq!(upper.keys(), &[KeyCode::KeyQ]);
        assert!(upper.needs_shift());
    }

    #[test]
    fn test_names_are_case_insensitive() {
        assert_eq!(KeyQuery::parse("SPACE"), KeyQuery::parse("space"));
        assert_eq!(KeyQuery::parse("F5").unwrap().keys(), &[KeyCode::F5]);
        assert_eq!(KeyQuery::parse("f12").unwrap().keys(), &[KeyCode::F12]);
        assert_eq!(KeyQuery::parse("Page Up").unwrap().keys(), &[KeyCode::PageUp]);
        assert_eq!(KeyQuery::parse("esc"), KeyQuery::parse("escape"));
        assert_eq!(KeyQuery::parse("strg"), KeyQuery::parse("ctrl"));
    }

    #[test]
    fn test_unknown_names() {
        assert!(KeyQuery::parse("f13").is_none());
        assert!(KeyQuery::parse("").is_none());
        assert!(KeyQuery::parse("ä").is_none());
    }

    #[test]
    fn test_uppercase_requires_shift() {
        let query = KeyQuery::parse("A").unwrap();
        assert!(!query.is_pressed(&pressed(&[KeyCode::KeyA])));
        assert!(query.is_pressed(&pressed(&[KeyCode::KeyA, KeyCode::ShiftRight])));
    }

    #[test]
    fn test_alt_and_alt_gr_differ() {
        let input = pressed(&[KeyCode::AltRight]);
        assert!(!KeyQuery::parse("alt").unwrap().is_pressed(&input));
        assert!(KeyQuery::parse("alt gr").unwrap().is_pressed(&input));
    }

    #[test]
    fn test_either_side_modifier() {
        let input = pressed(&[KeyCode::ControlRight]);
        assert!(KeyQuery::parse("ctrl").unwrap().is_pressed(&input));
        assert!(KeyQuery::parse("shift").unwrap().is_pressed(&pressed(&[KeyCode::ShiftLeft])));
    }
}
