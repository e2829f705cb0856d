//! Key contract shared by the popup controller and its hosts

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

bitflags! {
    /// Modifier keys held during a key press
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT = 1 << 2;
        const SUPER = 1 << 3;
    }
}

/// A single modifier, as named in the config file
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ModifierKey {
    Shift,
    Control,
    Alt,
    Super,
}

impl ModifierKey {
    pub fn flag(self) -> Modifiers {
        match self {
            ModifierKey::Shift => Modifiers::SHIFT,
            ModifierKey::Control => Modifiers::CONTROL,
            ModifierKey::Alt => Modifiers::ALT,
            ModifierKey::Super => Modifiers::SUPER,
        }
    }
}

/// Logical key name. Hosts translate their own key events into this.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Escape,
    Tab,
    Enter,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
    PageUp,
    PageDown,
    Backspace,
    Char(char),
    /// Anything else (function keys, media keys...). Only ever passed through.
    Other(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("empty key name")]
pub struct EmptyKeyName;

impl FromStr for Key {
    type Err = EmptyKeyName;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        let key = match name {
            "" => return Err(EmptyKeyName),
            "Escape" | "Esc" => Key::Escape,
            "Tab" | "ISO_Left_Tab" => Key::Tab,
            "Return" | "Enter" | "KP_Enter" => Key::Enter,
            "Up" => Key::Up,
            "Down" => Key::Down,
            "Left" => Key::Left,
            "Right" => Key::Right,
            "Home" => Key::Home,
            "End" => Key::End,
            "Prior" | "PageUp" => Key::PageUp,
            "Next" | "PageDown" => Key::PageDown,
            "BackSpace" | "Backspace" => Key::Backspace,
            "space" => Key::Char(' '),
            other => {
                let mut chars = other.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Key::Char(c),
                    _ => Key::Other(other.to_string()),
                }
            }
        };
        Ok(key)
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Char(c) => write!(f, "{}", c),
            Key::Other(name) => f.write_str(name),
            named => write!(f, "{:?}", named),
        }
    }
}

/// A key press as delivered through the modal grab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub modifiers: Modifiers,
    pub key: Key,
}

impl KeyPress {
    pub fn new(modifiers: Modifiers, key: Key) -> Self {
        Self { modifiers, key }
    }

    pub fn plain(key: Key) -> Self {
        Self::new(Modifiers::empty(), key)
    }

    pub fn shift(&self) -> bool {
        self.modifiers.contains(Modifiers::SHIFT)
    }
}

impl fmt::Display for KeyPress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (name, _) in self.modifiers.iter_names() {
            write!(f, "{}+", name)?;
        }
        write!(f, "{}", self.key)
    }
}
