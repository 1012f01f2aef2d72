//! The set of keys currently held down in one capture session.
//!
//! # How merging works (for beginners)
//!
//! A USB keyboard does not send "A pressed" and "A released" events. It sends
//! a snapshot of *everything* currently held: one modifier byte plus up to six
//! key codes. [`HeldKeyState`] remembers which logical keys are down, in the
//! order they went down, and rebuilds that snapshot after every change:
//!
//! ```text
//! down Shift, down A, down B  →  02 00 04 05 00 00 00 00
//! up A                        →  02 00 05 00 00 00 00 00
//! ```
//!
//! Only six non-modifier keys fit. What happens to a seventh is decided by
//! the session's [`RolloverPolicy`].

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::keymap::hid::HidKeyCode;
use crate::keymap::modifier::{ModifierKey, ModifierMask};
use crate::keymap::named::NamedKey;
use crate::keymap::ScancodeTable;
use crate::protocol::report::{HidKeyboardReport, MAX_ROLLOVER_KEYS};

/// Raised when more than six regular keys would be held at once.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RolloverError {
    #[error("rollover overflow: {held} regular keys held, report holds 6")]
    Overflow { held: usize },
}

/// What to do with a key-down that would exceed six regular keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RolloverPolicy {
    /// Fail the key-down and leave the held set unchanged.
    #[default]
    Reject,
    /// Drop the new key silently and keep reporting the current set.
    IgnoreNewest,
    /// Release the longest-held regular key to make room.
    DropOldest,
}

/// Identity of a key independent of whether it is up or down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalKeyId {
    Modifier(ModifierKey),
    Named(NamedKey),
    /// A key identified by the character it types; `'a'` and `'A'` are the same key.
    ///
    /// Build these with [`LogicalKeyId::from_char`]; [`HeldKeyState`] folds
    /// any shifted character it is handed onto its unshifted key.
    Char(char),
    /// A raw usage code from a backend that already speaks HID.
    Usage(HidKeyCode),
}

impl LogicalKeyId {
    /// A `Char` id for `c`, folded to the character its key types without
    /// Shift (`'A'` → `'a'`, `'!'` → `'1'`). Characters outside the layout
    /// are kept as given.
    pub fn from_char(c: char) -> Self {
        let base = if ScancodeTable::unshifted(c).is_some() {
            c
        } else {
            ScancodeTable::shifted(c)
                .and_then(|(code, _)| ScancodeTable::character(code, false))
                .unwrap_or(c)
        };
        LogicalKeyId::Char(base)
    }

    /// The canonical form of this id; only `Char` ids change.
    pub fn normalized(self) -> Self {
        match self {
            LogicalKeyId::Char(c) => LogicalKeyId::from_char(c),
            other => other,
        }
    }

    /// The contribution this key makes to a report, from the key tables.
    ///
    /// Returns `None` for characters outside the layout and for
    /// [`HidKeyCode::Unknown`].
    pub fn default_contribution(&self) -> Option<KeyContribution> {
        match *self {
            LogicalKeyId::Modifier(key) => Some(KeyContribution::Modifier(key.mask())),
            LogicalKeyId::Named(key) => Some(KeyContribution::Key(ScancodeTable::named(key))),
            LogicalKeyId::Char(c) => ScancodeTable::unshifted(c)
                .or_else(|| ScancodeTable::shifted(c).map(|(code, _)| code))
                .map(KeyContribution::Key),
            LogicalKeyId::Usage(HidKeyCode::Unknown) => None,
            LogicalKeyId::Usage(code) => Some(match code.modifier_mask() {
                Some(mask) => KeyContribution::Modifier(mask),
                None => KeyContribution::Key(code),
            }),
        }
    }
}

/// What one held key adds to the merged report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyContribution {
    /// Bits OR'd into byte 0.
    Modifier(ModifierMask),
    /// One usage code in bytes 2–7.
    Key(HidKeyCode),
}

/// Keys currently held in one session, in the order they went down.
#[derive(Debug, Clone, Default)]
pub struct HeldKeyState {
    held: Vec<(LogicalKeyId, KeyContribution)>,
    policy: RolloverPolicy,
}

impl HeldKeyState {
    /// Creates an empty set with the default [`RolloverPolicy::Reject`].
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: RolloverPolicy) -> Self {
        Self {
            held: Vec::new(),
            policy,
        }
    }

    pub fn policy(&self) -> RolloverPolicy {
        self.policy
    }

    pub fn set_policy(&mut self, policy: RolloverPolicy) {
        self.policy = policy;
    }

    /// Records `id` as held and returns the merged report.
    ///
    /// Pressing a key that is already held changes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`RolloverError::Overflow`] under [`RolloverPolicy::Reject`]
    /// when a seventh distinct usage code would be held. The key is not
    /// recorded in that case.
    pub fn on_key_down(
        &mut self,
        id: LogicalKeyId,
        contribution: KeyContribution,
    ) -> Result<HidKeyboardReport, RolloverError> {
        let id = id.normalized();
        if self.is_held(&id) {
            return self.merge();
        }

        if let KeyContribution::Key(code) = contribution {
            if !self.holds_usage(code) && self.distinct_usages().len() >= MAX_ROLLOVER_KEYS {
                match self.policy {
                    RolloverPolicy::Reject => {
                        warn!(?id, "rollover overflow, key rejected");
                        return Err(RolloverError::Overflow {
                            held: MAX_ROLLOVER_KEYS + 1,
                        });
                    }
                    RolloverPolicy::IgnoreNewest => {
                        warn!(?id, "rollover overflow, key ignored");
                        return self.merge();
                    }
                    RolloverPolicy::DropOldest => {
                        while self.distinct_usages().len() >= MAX_ROLLOVER_KEYS {
                            let Some(oldest) = self
                                .held
                                .iter()
                                .position(|(_, c)| matches!(c, KeyContribution::Key(_)))
                            else {
                                break;
                            };
                            let (evicted, _) = self.held.remove(oldest);
                            warn!(?evicted, ?id, "rollover overflow, oldest key released");
                        }
                    }
                }
            }
        }

        self.held.push((id, contribution));
        self.merge()
    }

    /// Forgets `id` and returns the merged report. Unknown ids are ignored.
    pub fn on_key_up(&mut self, id: &LogicalKeyId) -> Result<HidKeyboardReport, RolloverError> {
        let id = id.normalized();
        self.held.retain(|(held, _)| *held != id);
        self.merge()
    }

    /// Builds the report for the current held set.
    ///
    /// Byte 0 is the OR of every held modifier; the key slots list each
    /// distinct usage once, oldest first.
    ///
    /// # Errors
    ///
    /// Returns [`RolloverError::Overflow`] if more than six distinct usage
    /// codes are held. Keys are never silently dropped here.
    pub fn merge(&self) -> Result<HidKeyboardReport, RolloverError> {
        let modifiers = self.modifiers();
        let usages = self.distinct_usages();
        if usages.len() > MAX_ROLLOVER_KEYS {
            return Err(RolloverError::Overflow { held: usages.len() });
        }
        HidKeyboardReport::from_parts(modifiers, &usages)
            .ok_or(RolloverError::Overflow { held: usages.len() })
    }

    /// Returns `true` if Ctrl is currently held and `just_pressed` is Escape.
    ///
    /// Callers check this after [`HeldKeyState::on_key_down`] so the Escape
    /// key itself is part of the held set.
    pub fn is_escape_sequence(&self, just_pressed: &LogicalKeyId) -> bool {
        let just_pressed = just_pressed.normalized();
        self.contribution_of(&just_pressed)
            .or_else(|| just_pressed.default_contribution())
            .is_some_and(|contribution| self.completes_escape_sequence(contribution))
    }

    /// Returns `true` if pressing a key with `contribution` now would form
    /// Ctrl+Esc.
    ///
    /// Unlike [`HeldKeyState::is_escape_sequence`] this is checked before the
    /// key-down, so it still holds when all six slots are taken and the
    /// rollover policy would refuse the Escape key.
    pub fn completes_escape_sequence(&self, contribution: KeyContribution) -> bool {
        contribution == KeyContribution::Key(HidKeyCode::Escape) && self.modifiers().ctrl()
    }

    /// Releases everything and returns the empty report.
    pub fn clear(&mut self) -> HidKeyboardReport {
        self.held.clear();
        HidKeyboardReport::EMPTY
    }

    pub fn is_held(&self, id: &LogicalKeyId) -> bool {
        let id = id.normalized();
        self.held.iter().any(|(held, _)| *held == id)
    }

    pub fn len(&self) -> usize {
        self.held.len()
    }

    pub fn is_empty(&self) -> bool {
        self.held.is_empty()
    }

    /// Held ids, oldest first.
    pub fn held_ids(&self) -> impl Iterator<Item = &LogicalKeyId> {
        self.held.iter().map(|(id, _)| id)
    }

    // ── Private helpers ──────────────────────────────────────────────────────

    fn contribution_of(&self, id: &LogicalKeyId) -> Option<KeyContribution> {
        self.held
            .iter()
            .find(|(held, _)| held == id)
            .map(|(_, contribution)| *contribution)
    }

    fn modifiers(&self) -> ModifierMask {
        self.held
            .iter()
            .fold(ModifierMask::NONE, |acc, (_, contribution)| match contribution {
                KeyContribution::Modifier(mask) => acc | *mask,
                KeyContribution::Key(_) => acc,
            })
    }

    fn holds_usage(&self, code: HidKeyCode) -> bool {
        self.held
            .iter()
            .any(|(_, contribution)| *contribution == KeyContribution::Key(code))
    }

    fn distinct_usages(&self) -> Vec<u8> {
        let mut usages: Vec<u8> = Vec::with_capacity(MAX_ROLLOVER_KEYS);
        for (_, contribution) in &self.held {
            if let KeyContribution::Key(code) = contribution {
                let raw = code.as_u8();
                if raw != 0 && !usages.contains(&raw) {
                    usages.push(raw);
                }
            }
        }
        usages
    }
}
