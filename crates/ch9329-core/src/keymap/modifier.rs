//! Modifier keys and the byte-0 modifier bitmask of a keyboard report.
//!
//! Bit layout (USB HID boot keyboard):
//! - Bit 0: Left Ctrl
//! - Bit 1: Left Shift
//! - Bit 2: Left Alt
//! - Bit 3: Left Meta (Windows/Command/Super)
//! - Bit 4: Right Ctrl
//! - Bit 5: Right Shift
//! - Bit 6: Right Alt (AltGr)
//! - Bit 7: Right Meta

use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

/// Byte 0 of a keyboard report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ModifierMask(pub u8);

impl ModifierMask {
    pub const NONE: ModifierMask = ModifierMask(0);
    pub const LEFT_CTRL: ModifierMask = ModifierMask(1 << 0);
    pub const LEFT_SHIFT: ModifierMask = ModifierMask(1 << 1);
    pub const LEFT_ALT: ModifierMask = ModifierMask(1 << 2);
    pub const LEFT_META: ModifierMask = ModifierMask(1 << 3);
    pub const RIGHT_CTRL: ModifierMask = ModifierMask(1 << 4);
    pub const RIGHT_SHIFT: ModifierMask = ModifierMask(1 << 5);
    pub const RIGHT_ALT: ModifierMask = ModifierMask(1 << 6);
    pub const RIGHT_META: ModifierMask = ModifierMask(1 << 7);

    /// Returns the raw byte.
    pub fn bits(self) -> u8 {
        self.0
    }

    /// Returns `true` if no modifier bit is set.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if every bit of `other` is set in `self`.
    pub fn contains(self, other: ModifierMask) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if either Ctrl modifier is active.
    pub fn ctrl(self) -> bool {
        self.0 & (Self::LEFT_CTRL.0 | Self::RIGHT_CTRL.0) != 0
    }

    /// Returns `true` if either Shift modifier is active.
    pub fn shift(self) -> bool {
        self.0 & (Self::LEFT_SHIFT.0 | Self::RIGHT_SHIFT.0) != 0
    }

    /// Returns `true` if either Alt modifier is active.
    pub fn alt(self) -> bool {
        self.0 & (Self::LEFT_ALT.0 | Self::RIGHT_ALT.0) != 0
    }

    /// Returns `true` if either Meta (Win/Cmd/Super) modifier is active.
    pub fn meta(self) -> bool {
        self.0 & (Self::LEFT_META.0 | Self::RIGHT_META.0) != 0
    }
}

impl BitOr for ModifierMask {
    type Output = ModifierMask;

    fn bitor(self, rhs: ModifierMask) -> ModifierMask {
        ModifierMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for ModifierMask {
    fn bitor_assign(&mut self, rhs: ModifierMask) {
        self.0 |= rhs.0;
    }
}

/// A physical modifier key, left and right variants distinguished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierKey {
    LeftCtrl,
    LeftShift,
    LeftAlt,
    LeftMeta,
    RightCtrl,
    RightShift,
    RightAlt,
    RightMeta,
}

impl ModifierKey {
    pub const ALL: [ModifierKey; 8] = [
        ModifierKey::LeftCtrl,
        ModifierKey::LeftShift,
        ModifierKey::LeftAlt,
        ModifierKey::LeftMeta,
        ModifierKey::RightCtrl,
        ModifierKey::RightShift,
        ModifierKey::RightAlt,
        ModifierKey::RightMeta,
    ];

    /// The single byte-0 bit this key sets while held.
    pub fn mask(self) -> ModifierMask {
        match self {
            ModifierKey::LeftCtrl => ModifierMask::LEFT_CTRL,
            ModifierKey::LeftShift => ModifierMask::LEFT_SHIFT,
            ModifierKey::LeftAlt => ModifierMask::LEFT_ALT,
            ModifierKey::LeftMeta => ModifierMask::LEFT_META,
            ModifierKey::RightCtrl => ModifierMask::RIGHT_CTRL,
            ModifierKey::RightShift => ModifierMask::RIGHT_SHIFT,
            ModifierKey::RightAlt => ModifierMask::RIGHT_ALT,
            ModifierKey::RightMeta => ModifierMask::RIGHT_META,
        }
    }

    /// Returns `true` for the two Ctrl keys.
    pub fn is_ctrl(self) -> bool {
        matches!(self, ModifierKey::LeftCtrl | ModifierKey::RightCtrl)
    }
}
