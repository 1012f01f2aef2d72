//! Static key tables: characters, named keys and modifiers to HID usage codes.
//!
//! The canonical representation is USB HID Usage IDs (page 0x07). Input
//! backends translate whatever they capture into the types here; nothing
//! downstream knows about OS key codes.

pub mod hid;
pub mod modifier;
pub mod named;
pub mod table;

pub use hid::HidKeyCode;
pub use modifier::{ModifierKey, ModifierMask};
pub use named::{NamedKey, UnknownKeyName};

/// Read-only lookups across all key tables.
///
/// Every lookup is total and reports a miss as `None`; callers pick the
/// fallback.
pub struct ScancodeTable;

impl ScancodeTable {
    /// Usage for a character typed without Shift.
    pub fn unshifted(c: char) -> Option<HidKeyCode> {
        table::char_to_usage(c)
    }

    /// Usage and Shift bit for a character that needs Shift.
    pub fn shifted(c: char) -> Option<(HidKeyCode, ModifierMask)> {
        table::shifted_char_to_usage(c).map(|code| (code, ModifierMask::LEFT_SHIFT))
    }

    /// Usage for a named key. Always succeeds; every [`NamedKey`] has a code.
    pub fn named(key: NamedKey) -> HidKeyCode {
        key.usage()
    }

    /// Bitmask for a modifier key.
    pub fn modifier(key: ModifierKey) -> ModifierMask {
        key.mask()
    }

    /// Character a usage types, with or without Shift.
    pub fn character(code: HidKeyCode, shift: bool) -> Option<char> {
        if shift {
            table::usage_to_shifted_char(code)
        } else {
            table::usage_to_char(code)
        }
    }

    /// Ctrl chord for a terminal control byte such as `^C`.
    pub fn control_chord(c: char) -> Option<(ModifierMask, HidKeyCode)> {
        table::control_char_chord(c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shifted_lookup_reports_left_shift() {
        assert_eq!(
            ScancodeTable::shifted('A'),
            Some((HidKeyCode::KeyA, ModifierMask::LEFT_SHIFT))
        );
        assert_eq!(ScancodeTable::shifted('a'), None);
    }

    #[test]
    fn test_character_honours_shift_flag() {
        assert_eq!(ScancodeTable::character(HidKeyCode::Digit1, false), Some('1'));
        assert_eq!(ScancodeTable::character(HidKeyCode::Digit1, true), Some('!'));
        assert_eq!(ScancodeTable::character(HidKeyCode::F5, true), None);
    }
}
