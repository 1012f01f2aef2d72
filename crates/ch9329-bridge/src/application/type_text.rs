//! TypeTextUseCase: types a string on the remote machine.
//!
//! Each character becomes its own key report, repeated `key_repeat` times and
//! followed by `key_up` release reports. Characters with no key mapping are
//! skipped and logged rather than sent as blank reports.

use std::sync::Arc;

use ch9329_core::protocol::{
    codec::{encode_typed_char, TypingOptions},
    packet::{frame_keyboard_report, frame_release},
    report::HidKeyboardReport,
};
use tracing::{debug, warn};
use uuid::Uuid;

use super::{send_packet, ForwardError};
use crate::infrastructure::transport::Transport;

/// Counts from one [`TypeTextUseCase::type_text`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypedText {
    /// Characters that produced key reports.
    pub typed: usize,
    /// Characters skipped because nothing maps to them.
    pub skipped: usize,
    /// Packets written, releases included.
    pub packets: usize,
}

/// The Type Text use case.
pub struct TypeTextUseCase {
    session_id: Uuid,
    transport: Arc<dyn Transport>,
    options: TypingOptions,
}

impl TypeTextUseCase {
    /// Creates the use case after checking `options`.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError::Codec`] if `options.key_repeat` is zero.
    pub fn new(
        session_id: Uuid,
        transport: Arc<dyn Transport>,
        options: TypingOptions,
    ) -> Result<Self, ForwardError> {
        options.validate()?;
        Ok(Self {
            session_id,
            transport,
            options,
        })
    }

    pub fn options(&self) -> TypingOptions {
        self.options
    }

    /// Types `text` and leaves every key released.
    ///
    /// When `key_up` is zero a single release is still sent after the last
    /// character.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError::Transport`] on the first failed write; the
    /// remaining characters are not sent.
    pub fn type_text(&self, text: &str) -> Result<TypedText, ForwardError> {
        let mut summary = TypedText::default();

        for c in text.chars() {
            let Some(report) = encode_typed_char(c) else {
                warn!(session = %self.session_id, "no key for character {c:?}, skipped");
                summary.skipped += 1;
                continue;
            };
            summary.packets += self.send_char(&report)?;
            summary.typed += 1;
        }

        if self.options.key_up == 0 && summary.typed > 0 {
            send_packet(self.transport.as_ref(), self.session_id, &frame_release())?;
            summary.packets += 1;
        }

        debug!(
            session = %self.session_id,
            typed = summary.typed,
            skipped = summary.skipped,
            "text typed"
        );
        Ok(summary)
    }

    fn send_char(&self, report: &HidKeyboardReport) -> Result<usize, ForwardError> {
        let press = frame_keyboard_report(report);
        for _ in 0..self.options.key_repeat {
            send_packet(self.transport.as_ref(), self.session_id, &press)?;
        }
        let release = frame_release();
        for _ in 0..self.options.key_up {
            send_packet(self.transport.as_ref(), self.session_id, &release)?;
        }
        Ok((self.options.key_repeat + self.options.key_up) as usize)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
