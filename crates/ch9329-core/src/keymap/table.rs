//! Character ↔ HID usage tables for the supported keyboard layout (UK-ISO).
//!
//! Every entry is a physical key position together with the character it
//! types unshifted and, when it has one, the character it types with Shift
//! held. All lookups are total: a miss is `None`, never a panic.

use crate::keymap::hid::HidKeyCode;
use crate::keymap::modifier::ModifierMask;

/// One physical key of the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyPosition {
    pub code: HidKeyCode,
    pub base: char,
    pub shifted: Option<char>,
}

const fn pos(code: HidKeyCode, base: char, shifted: Option<char>) -> KeyPosition {
    KeyPosition {
        code,
        base,
        shifted,
    }
}

/// The UK-ISO layout, one entry per key position that types a character.
pub const UK_ISO_LAYOUT: &[KeyPosition] = &[
    pos(HidKeyCode::KeyA, 'a', Some('A')),
    pos(HidKeyCode::KeyB, 'b', Some('B')),
    pos(HidKeyCode::KeyC, 'c', Some('C')),
    pos(HidKeyCode::KeyD, 'd', Some('D')),
    pos(HidKeyCode::KeyE, 'e', Some('E')),
    pos(HidKeyCode::KeyF, 'f', Some('F')),
    pos(HidKeyCode::KeyG, 'g', Some('G')),
    pos(HidKeyCode::KeyH, 'h', Some('H')),
    pos(HidKeyCode::KeyI, 'i', Some('I')),
    pos(HidKeyCode::KeyJ, 'j', Some('J')),
    pos(HidKeyCode::KeyK, 'k', Some('K')),
    pos(HidKeyCode::KeyL, 'l', Some('L')),
    pos(HidKeyCode::KeyM, 'm', Some('M')),
    pos(HidKeyCode::KeyN, 'n', Some('N')),
    pos(HidKeyCode::KeyO, 'o', Some('O')),
    pos(HidKeyCode::KeyP, 'p', Some('P')),
    pos(HidKeyCode::KeyQ, 'q', Some('Q')),
    pos(HidKeyCode::KeyR, 'r', Some('R')),
    pos(HidKeyCode::KeyS, 's', Some('S')),
    pos(HidKeyCode::KeyT, 't', Some('T')),
    pos(HidKeyCode::KeyU, 'u', Some('U')),
    pos(HidKeyCode::KeyV, 'v', Some('V')),
    pos(HidKeyCode::KeyW, 'w', Some('W')),
    pos(HidKeyCode::KeyX, 'x', Some('X')),
    pos(HidKeyCode::KeyY, 'y', Some('Y')),
    pos(HidKeyCode::KeyZ, 'z', Some('Z')),
    pos(HidKeyCode::Digit1, '1', Some('!')),
    pos(HidKeyCode::Digit2, '2', Some('"')),
    pos(HidKeyCode::Digit3, '3', Some('£')),
    pos(HidKeyCode::Digit4, '4', Some('$')),
    pos(HidKeyCode::Digit5, '5', Some('%')),
    pos(HidKeyCode::Digit6, '6', Some('^')),
    pos(HidKeyCode::Digit7, '7', Some('&')),
    pos(HidKeyCode::Digit8, '8', Some('*')),
    pos(HidKeyCode::Digit9, '9', Some('(')),
    pos(HidKeyCode::Digit0, '0', Some(')')),
    pos(HidKeyCode::Minus, '-', Some('_')),
    pos(HidKeyCode::Equal, '=', Some('+')),
    pos(HidKeyCode::BracketLeft, '[', Some('{')),
    pos(HidKeyCode::BracketRight, ']', Some('}')),
    pos(HidKeyCode::NonUsHash, '#', Some('~')),
    pos(HidKeyCode::Semicolon, ';', Some(':')),
    pos(HidKeyCode::Quote, '\'', Some('@')),
    pos(HidKeyCode::Backquote, '`', Some('¬')),
    pos(HidKeyCode::Comma, ',', Some('<')),
    pos(HidKeyCode::Period, '.', Some('>')),
    pos(HidKeyCode::Slash, '/', Some('?')),
    pos(HidKeyCode::NonUsBackslash, '\\', Some('|')),
    pos(HidKeyCode::Enter, '\n', None),
    pos(HidKeyCode::Tab, '\t', None),
    pos(HidKeyCode::Backspace, '\u{8}', None),
    pos(HidKeyCode::Space, ' ', None),
];

/// Positions that decode to a character but are never produced by the encoder.
///
/// Many ISO keyboards report the key left of Enter as the US backslash usage.
const DECODE_ALIASES: &[KeyPosition] = &[pos(HidKeyCode::Backslash, '#', Some('~'))];

/// Unshifted character → usage.
pub fn char_to_usage(c: char) -> Option<HidKeyCode> {
    UK_ISO_LAYOUT.iter().find(|p| p.base == c).map(|p| p.code)
}

/// Shifted character → usage. The caller adds the Shift bit.
pub fn shifted_char_to_usage(c: char) -> Option<HidKeyCode> {
    UK_ISO_LAYOUT
        .iter()
        .find(|p| p.shifted == Some(c))
        .map(|p| p.code)
}

fn position_of(code: HidKeyCode) -> Option<&'static KeyPosition> {
    UK_ISO_LAYOUT
        .iter()
        .chain(DECODE_ALIASES.iter())
        .find(|p| p.code == code)
}

/// Usage → the character it types with no modifier.
pub fn usage_to_char(code: HidKeyCode) -> Option<char> {
    position_of(code).map(|p| p.base)
}

/// Usage → the character it types with Shift held.
///
/// Whitespace keys have no shifted glyph and type the same character either way.
pub fn usage_to_shifted_char(code: HidKeyCode) -> Option<char> {
    position_of(code).and_then(|p| match p.shifted {
        Some(shifted) => Some(shifted),
        None => Some(p.base),
    })
}

/// Maps a terminal control byte to the Ctrl chord that produces it.
///
/// `^A`..`^Z` become Ctrl+letter, `^[` Ctrl+Esc, `^\`..`^_` Ctrl+4..7 and
/// DEL Ctrl+Backspace. Backspace, tab, line feed and carriage return are
/// excluded: they are ordinary characters (or line endings) to a terminal.
pub fn control_char_chord(c: char) -> Option<(ModifierMask, HidKeyCode)> {
    let code = match c as u32 {
        0x08 | 0x09 | 0x0A | 0x0D => return None,
        raw @ 0x01..=0x1A => HidKeyCode::from_u8(HidKeyCode::KeyA.as_u8() + (raw as u8 - 1)),
        0x1B => HidKeyCode::Escape,
        0x1C => HidKeyCode::Digit4,
        0x1D => HidKeyCode::Digit5,
        0x1E => HidKeyCode::Digit6,
        0x1F => HidKeyCode::Digit7,
        0x7F => HidKeyCode::Backspace,
        _ => return None,
    };
    Some((ModifierMask::LEFT_CTRL, code))
}

/// Every character the encoder produces without Shift.
pub fn unshifted_chars() -> impl Iterator<Item = char> {
    UK_ISO_LAYOUT.iter().map(|p| p.base)
}

/// Every character the encoder produces only with Shift.
pub fn shifted_chars() -> impl Iterator<Item = char> {
    UK_ISO_LAYOUT.iter().filter_map(|p| p.shifted)
}
