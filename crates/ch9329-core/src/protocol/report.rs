//! The 8-byte HID boot keyboard report carried by keyboard packets.
//!
//! ```text
//! [modifiers:1][reserved:1][key0..key5:6]
//! ```
//! Key slots are left-packed and zero-padded. A report never lists the same
//! usage twice.

use std::fmt;

use crate::keymap::hid::HidKeyCode;
use crate::keymap::modifier::ModifierMask;

/// Size of a keyboard report on the wire.
pub const REPORT_LEN: usize = 8;

/// Number of non-modifier keys one report can carry (6-key rollover).
pub const MAX_ROLLOVER_KEYS: usize = 6;

/// An 8-byte HID keyboard report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HidKeyboardReport {
    modifiers: ModifierMask,
    keys: [u8; MAX_ROLLOVER_KEYS],
}

impl HidKeyboardReport {
    /// The "nothing is held" report.
    pub const EMPTY: HidKeyboardReport = HidKeyboardReport {
        modifiers: ModifierMask::NONE,
        keys: [0; MAX_ROLLOVER_KEYS],
    };

    /// A report with one key in slot 0 (byte 2).
    pub fn single(modifiers: ModifierMask, key: HidKeyCode) -> Self {
        let mut keys = [0; MAX_ROLLOVER_KEYS];
        keys[0] = key.as_u8();
        Self { modifiers, keys }
    }

    /// A report with only modifier bits set.
    pub fn modifiers_only(modifiers: ModifierMask) -> Self {
        Self {
            modifiers,
            keys: [0; MAX_ROLLOVER_KEYS],
        }
    }

    /// Builds a report from up to six usage bytes, in order.
    ///
    /// Returns `None` if more than six codes are given. Zero bytes are
    /// skipped so the result stays left-packed.
    pub fn from_parts(modifiers: ModifierMask, codes: &[u8]) -> Option<Self> {
        let mut keys = [0; MAX_ROLLOVER_KEYS];
        let mut filled = 0;
        for &code in codes.iter().filter(|&&c| c != 0) {
            if filled == MAX_ROLLOVER_KEYS {
                return None;
            }
            keys[filled] = code;
            filled += 1;
        }
        Some(Self { modifiers, keys })
    }

    /// Parses a raw report as read from a USB keyboard endpoint.
    ///
    /// Anything past the first 8 bytes is ignored, as is the reserved byte.
    /// Returns `None` for input shorter than [`REPORT_LEN`].
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() < REPORT_LEN {
            return None;
        }
        let mut keys = [0; MAX_ROLLOVER_KEYS];
        keys.copy_from_slice(&bytes[2..REPORT_LEN]);
        Some(Self {
            modifiers: ModifierMask(bytes[0]),
            keys,
        })
    }

    pub fn modifiers(&self) -> ModifierMask {
        self.modifiers
    }

    /// The six raw usage slots, bytes 2–7.
    pub fn key_slots(&self) -> &[u8; MAX_ROLLOVER_KEYS] {
        &self.keys
    }

    /// Non-zero usage slots in order.
    pub fn pressed(&self) -> impl Iterator<Item = u8> + '_ {
        self.keys.iter().copied().filter(|&c| c != 0)
    }

    /// The first non-zero usage slot, scanning left to right.
    pub fn first_key(&self) -> Option<u8> {
        self.pressed().next()
    }

    /// Returns `true` if `code` occupies any slot.
    pub fn contains(&self, code: HidKeyCode) -> bool {
        code != HidKeyCode::Unknown && self.keys.contains(&code.as_u8())
    }

    /// Returns `true` for the all-zero report.
    pub fn is_empty(&self) -> bool {
        *self == Self::EMPTY
    }

    /// Wire bytes; the reserved byte is always zero.
    pub fn to_bytes(&self) -> [u8; REPORT_LEN] {
        let mut out = [0u8; REPORT_LEN];
        out[0] = self.modifiers.bits();
        out[2..].copy_from_slice(&self.keys);
        out
    }
}

impl fmt::Display for HidKeyboardReport {
    /// Space-separated hex, e.g. `02 00 04 00 00 00 00 00`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.to_bytes();
        for (i, b) in bytes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{b:02X}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report_is_eight_zero_bytes() {
        assert_eq!(HidKeyboardReport::EMPTY.to_bytes(), [0u8; 8]);
        assert!(HidKeyboardReport::default().is_empty());
    }

    #[test]
    fn test_single_places_key_in_byte_two() {
        let report = HidKeyboardReport::single(ModifierMask::LEFT_SHIFT, HidKeyCode::KeyA);
        assert_eq!(report.to_bytes(), [0x02, 0, 0x04, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn test_from_parts_left_packs_and_rejects_seven_keys() {
        let report = HidKeyboardReport::from_parts(ModifierMask::NONE, &[0, 0x04, 0, 0x05]).unwrap();
        assert_eq!(report.key_slots(), &[0x04, 0x05, 0, 0, 0, 0]);

        assert!(HidKeyboardReport::from_parts(ModifierMask::NONE, &[1, 2, 3, 4, 5, 6, 7]).is_none());
    }

    #[test]
    fn test_from_slice_ignores_reserved_byte_and_trailing_bytes() {
        let raw = [0x01, 0xFF, 0x06, 0, 0, 0, 0, 0, 0xAA, 0xBB];
        let report = HidKeyboardReport::from_slice(&raw).unwrap();
        assert_eq!(report.modifiers(), ModifierMask::LEFT_CTRL);
        assert_eq!(report.first_key(), Some(0x06));
        assert_eq!(report.to_bytes()[1], 0);
    }

    #[test]
    fn test_from_slice_rejects_short_input() {
        assert!(HidKeyboardReport::from_slice(&[0u8; 7]).is_none());
        assert!(HidKeyboardReport::from_slice(&[]).is_none());
    }

    #[test]
    fn test_first_key_skips_empty_slots() {
        let report = HidKeyboardReport::from_slice(&[0, 0, 0, 0, 0x29, 0x04, 0, 0]).unwrap();
        assert_eq!(report.first_key(), Some(0x29));
        assert!(report.contains(HidKeyCode::Escape));
        assert!(!report.contains(HidKeyCode::Unknown));
    }

    #[test]
    fn test_display_is_hex() {
        let report = HidKeyboardReport::single(ModifierMask::NONE, HidKeyCode::Enter);
        assert_eq!(report.to_string(), "00 00 28 00 00 00 00 00");
    }
}
