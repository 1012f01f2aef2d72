//! Stateless conversions between characters, named keys and keyboard reports.
//!
//! Encoding never fails: a character with no table entry encodes to the
//! all-zero report. Decoding returns `None` when a report carries nothing
//! printable.

use thiserror::Error;

use crate::keymap::hid::HidKeyCode;
use crate::keymap::modifier::ModifierMask;
use crate::keymap::named::NamedKey;
use crate::keymap::ScancodeTable;
use crate::protocol::report::HidKeyboardReport;

/// Errors from multi-report text encoding.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// `key_repeat` must be at least 1 or no character would ever be sent.
    #[error("invalid typing options: key_repeat must be >= 1, got {key_repeat}")]
    InvalidTypingOptions { key_repeat: u32 },
}

/// How each character of a text is played back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypingOptions {
    /// Times each character's report is sent; values above 1 emulate auto-repeat.
    pub key_repeat: u32,
    /// All-zero release reports sent after each character.
    pub key_up: u32,
}

impl Default for TypingOptions {
    fn default() -> Self {
        Self {
            key_repeat: 1,
            key_up: 1,
        }
    }
}

impl TypingOptions {
    /// Checks the options before any report is produced.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidTypingOptions`] when `key_repeat` is zero.
    pub fn validate(&self) -> Result<(), CodecError> {
        if self.key_repeat == 0 {
            return Err(CodecError::InvalidTypingOptions {
                key_repeat: self.key_repeat,
            });
        }
        Ok(())
    }
}

// ── Encoding ──────────────────────────────────────────────────────────────────

/// Report that types `c`: unshifted table, then shifted table with Left Shift.
///
/// Unknown characters give [`HidKeyboardReport::EMPTY`].
///
/// # Examples
///
/// ```rust
/// use ch9329_core::protocol::codec::encode_char;
///
/// assert_eq!(encode_char('A').to_bytes(), [0x02, 0, 0x04, 0, 0, 0, 0, 0]);
/// assert!(encode_char('€').is_empty());
/// ```
pub fn encode_char(c: char) -> HidKeyboardReport {
    if let Some(code) = ScancodeTable::unshifted(c) {
        return HidKeyboardReport::single(ModifierMask::NONE, code);
    }
    if let Some((code, shift)) = ScancodeTable::shifted(c) {
        return HidKeyboardReport::single(shift, code);
    }
    HidKeyboardReport::EMPTY
}

/// Report for a named key with the given modifiers held.
pub fn encode_named_key(key: NamedKey, modifiers: ModifierMask) -> HidKeyboardReport {
    HidKeyboardReport::single(modifiers, ScancodeTable::named(key))
}

/// Ctrl chord report for a terminal control byte (`^C`, `^[`, DEL, ...).
pub fn encode_control_char(c: char) -> Option<HidKeyboardReport> {
    ScancodeTable::control_chord(c).map(|(mask, code)| HidKeyboardReport::single(mask, code))
}

/// Like [`encode_char`] but falls back to the control-character chords and
/// reports a total miss as `None` instead of an empty report.
pub fn encode_typed_char(c: char) -> Option<HidKeyboardReport> {
    let report = encode_char(c);
    if !report.is_empty() {
        return Some(report);
    }
    encode_control_char(c)
}

/// The full report sequence that types `text`.
///
/// Each character contributes `key_repeat` copies of its report followed by
/// `key_up` empty reports. Characters that cannot be mapped contribute empty
/// reports in place of their key report.
///
/// # Errors
///
/// Returns [`CodecError::InvalidTypingOptions`] if `options.key_repeat == 0`.
pub fn encode_text(
    text: &str,
    options: TypingOptions,
) -> Result<Vec<HidKeyboardReport>, CodecError> {
    options.validate()?;

    let per_char = (options.key_repeat + options.key_up) as usize;
    let mut reports = Vec::with_capacity(text.chars().count() * per_char);
    for c in text.chars() {
        let report = encode_typed_char(c).unwrap_or(HidKeyboardReport::EMPTY);
        for _ in 0..options.key_repeat {
            reports.push(report);
        }
        for _ in 0..options.key_up {
            reports.push(HidKeyboardReport::EMPTY);
        }
    }
    Ok(reports)
}

// ── Decoding ──────────────────────────────────────────────────────────────────

/// Character typed by a report, judged from its first non-zero key slot.
///
/// Either Shift bit selects the shifted table. Later slots are ignored.
pub fn decode_to_char(report: &HidKeyboardReport) -> Option<char> {
    let code = HidKeyCode::from_u8(report.first_key()?);
    ScancodeTable::character(code, report.modifiers().shift())
}

/// Short display text for a report, used when echoing forwarded keys.
///
/// Printable characters are returned as themselves. Keys whose character is
/// whitespace or a control byte, and keys with no character at all, use the
/// named-key label (`"Enter"`, `"Esc"`, `"→"`).
pub fn describe_report(report: &HidKeyboardReport) -> Option<String> {
    match decode_to_char(report) {
        Some(c) if !c.is_control() && !c.is_whitespace() => Some(c.to_string()),
        _ => {
            let code = HidKeyCode::from_u8(report.first_key()?);
            NamedKey::from_usage(code).map(|key| key.label().to_string())
        }
    }
}
