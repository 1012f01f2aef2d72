//! Non-character keys: navigation, function, and lock keys.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::keymap::hid::HidKeyCode;

/// Returned by [`NamedKey::from_str`] for names that match no key.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown key name: {0:?}")]
pub struct UnknownKeyName(pub String);

/// A key identified by name rather than by the character it types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamedKey {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    Home,
    End,
    PageUp,
    PageDown,
    Insert,
    Delete,
    Escape,
    CapsLock,
    Enter,
    Tab,
    Backspace,
    Space,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    PrintScreen,
    ScrollLock,
    Pause,
    NumLock,
    ContextMenu,
}

impl NamedKey {
    pub const ALL: [NamedKey; 33] = [
        NamedKey::ArrowUp,
        NamedKey::ArrowDown,
        NamedKey::ArrowLeft,
        NamedKey::ArrowRight,
        NamedKey::Home,
        NamedKey::End,
        NamedKey::PageUp,
        NamedKey::PageDown,
        NamedKey::Insert,
        NamedKey::Delete,
        NamedKey::Escape,
        NamedKey::CapsLock,
        NamedKey::Enter,
        NamedKey::Tab,
        NamedKey::Backspace,
        NamedKey::Space,
        NamedKey::F1,
        NamedKey::F2,
        NamedKey::F3,
        NamedKey::F4,
        NamedKey::F5,
        NamedKey::F6,
        NamedKey::F7,
        NamedKey::F8,
        NamedKey::F9,
        NamedKey::F10,
        NamedKey::F11,
        NamedKey::F12,
        NamedKey::PrintScreen,
        NamedKey::ScrollLock,
        NamedKey::Pause,
        NamedKey::NumLock,
        NamedKey::ContextMenu,
    ];

    /// The HID usage code sent for this key.
    pub fn usage(self) -> HidKeyCode {
        match self {
            NamedKey::ArrowUp => HidKeyCode::ArrowUp,
            NamedKey::ArrowDown => HidKeyCode::ArrowDown,
            NamedKey::ArrowLeft => HidKeyCode::ArrowLeft,
            NamedKey::ArrowRight => HidKeyCode::ArrowRight,
            NamedKey::Home => HidKeyCode::Home,
            NamedKey::End => HidKeyCode::End,
            NamedKey::PageUp => HidKeyCode::PageUp,
            NamedKey::PageDown => HidKeyCode::PageDown,
            NamedKey::Insert => HidKeyCode::Insert,
            NamedKey::Delete => HidKeyCode::Delete,
            NamedKey::Escape => HidKeyCode::Escape,
            NamedKey::CapsLock => HidKeyCode::CapsLock,
            NamedKey::Enter => HidKeyCode::Enter,
            NamedKey::Tab => HidKeyCode::Tab,
            NamedKey::Backspace => HidKeyCode::Backspace,
            NamedKey::Space => HidKeyCode::Space,
            NamedKey::F1 => HidKeyCode::F1,
            NamedKey::F2 => HidKeyCode::F2,
            NamedKey::F3 => HidKeyCode::F3,
            NamedKey::F4 => HidKeyCode::F4,
            NamedKey::F5 => HidKeyCode::F5,
            NamedKey::F6 => HidKeyCode::F6,
            NamedKey::F7 => HidKeyCode::F7,
            NamedKey::F8 => HidKeyCode::F8,
            NamedKey::F9 => HidKeyCode::F9,
            NamedKey::F10 => HidKeyCode::F10,
            NamedKey::F11 => HidKeyCode::F11,
            NamedKey::F12 => HidKeyCode::F12,
            NamedKey::PrintScreen => HidKeyCode::PrintScreen,
            NamedKey::ScrollLock => HidKeyCode::ScrollLock,
            NamedKey::Pause => HidKeyCode::Pause,
            NamedKey::NumLock => HidKeyCode::NumLock,
            NamedKey::ContextMenu => HidKeyCode::ContextMenu,
        }
    }

    /// Reverse of [`NamedKey::usage`].
    pub fn from_usage(code: HidKeyCode) -> Option<NamedKey> {
        NamedKey::ALL.into_iter().find(|k| k.usage() == code)
    }

    /// Short text shown by the echo path when a report carries this key.
    pub fn label(self) -> &'static str {
        match self {
            NamedKey::ArrowUp => "↑",
            NamedKey::ArrowDown => "↓",
            NamedKey::ArrowLeft => "←",
            NamedKey::ArrowRight => "→",
            NamedKey::Home => "Home",
            NamedKey::End => "End",
            NamedKey::PageUp => "PgUp",
            NamedKey::PageDown => "PgDn",
            NamedKey::Insert => "Ins",
            NamedKey::Delete => "Del",
            NamedKey::Escape => "Esc",
            NamedKey::CapsLock => "CapsLock",
            NamedKey::Enter => "Enter",
            NamedKey::Tab => "Tab",
            NamedKey::Backspace => "Backspace",
            NamedKey::Space => "Space",
            NamedKey::F1 => "F1",
            NamedKey::F2 => "F2",
            NamedKey::F3 => "F3",
            NamedKey::F4 => "F4",
            NamedKey::F5 => "F5",
            NamedKey::F6 => "F6",
            NamedKey::F7 => "F7",
            NamedKey::F8 => "F8",
            NamedKey::F9 => "F9",
            NamedKey::F10 => "F10",
            NamedKey::F11 => "F11",
            NamedKey::F12 => "F12",
            NamedKey::PrintScreen => "PrtSc",
            NamedKey::ScrollLock => "ScrLk",
            NamedKey::Pause => "Pause",
            NamedKey::NumLock => "NumLock",
            NamedKey::ContextMenu => "Menu",
        }
    }
}

impl FromStr for NamedKey {
    type Err = UnknownKeyName;

    /// Parses canonical variant names and common short aliases, ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        let key = match lowered.as_str() {
            "arrowup" | "up" => NamedKey::ArrowUp,
            "arrowdown" | "down" => NamedKey::ArrowDown,
            "arrowleft" | "left" => NamedKey::ArrowLeft,
            "arrowright" | "right" => NamedKey::ArrowRight,
            "home" => NamedKey::Home,
            "end" => NamedKey::End,
            "pageup" | "pgup" => NamedKey::PageUp,
            "pagedown" | "pgdn" => NamedKey::PageDown,
            "insert" | "ins" => NamedKey::Insert,
            "delete" | "del" => NamedKey::Delete,
            "escape" | "esc" => NamedKey::Escape,
            "capslock" => NamedKey::CapsLock,
            "enter" | "return" => NamedKey::Enter,
            "tab" => NamedKey::Tab,
            "backspace" => NamedKey::Backspace,
            "space" => NamedKey::Space,
            "f1" => NamedKey::F1,
            "f2" => NamedKey::F2,
            "f3" => NamedKey::F3,
            "f4" => NamedKey::F4,
            "f5" => NamedKey::F5,
            "f6" => NamedKey::F6,
            "f7" => NamedKey::F7,
            "f8" => NamedKey::F8,
            "f9" => NamedKey::F9,
            "f10" => NamedKey::F10,
            "f11" => NamedKey::F11,
            "f12" => NamedKey::F12,
            "printscreen" | "prtsc" => NamedKey::PrintScreen,
            "scrolllock" => NamedKey::ScrollLock,
            "pause" => NamedKey::Pause,
            "numlock" => NamedKey::NumLock,
            "contextmenu" | "menu" => NamedKey::ContextMenu,
            _ => return Err(UnknownKeyName(s.to_string())),
        };
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_function_keys_use_hid_codes_not_ps2_codes() {
        assert_eq!(NamedKey::F1.usage().as_u8(), 0x3A);
        assert_eq!(NamedKey::F11.usage().as_u8(), 0x44);
        assert_eq!(NamedKey::F12.usage().as_u8(), 0x45);
    }

    #[test]
    fn test_usage_and_from_usage_agree_for_every_key() {
        for key in NamedKey::ALL {
            assert_eq!(NamedKey::from_usage(key.usage()), Some(key), "{key:?}");
        }
    }

    #[test]
    fn test_letters_are_not_named_keys() {
        assert_eq!(NamedKey::from_usage(HidKeyCode::KeyA), None);
        assert_eq!(NamedKey::from_usage(HidKeyCode::Unknown), None);
    }

    #[test]
    fn test_parse_accepts_aliases_case_insensitively() {
        assert_eq!("Esc".parse::<NamedKey>(), Ok(NamedKey::Escape));
        assert_eq!("PAGEDOWN".parse::<NamedKey>(), Ok(NamedKey::PageDown));
        assert_eq!(" up ".parse::<NamedKey>(), Ok(NamedKey::ArrowUp));
        assert_eq!("f10".parse::<NamedKey>(), Ok(NamedKey::F10));
    }

    #[test]
    fn test_parse_unknown_name_returns_error() {
        let err = "Hyper".parse::<NamedKey>().unwrap_err();
        assert_eq!(err, UnknownKeyName("Hyper".to_string()));
    }
}
