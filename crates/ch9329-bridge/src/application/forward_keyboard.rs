//! Keyboard forwarding: logical key events and raw USB reports to packets.
//!
//! [`KeyboardForwarder`] serves capture backends that report individual key
//! presses (terminal readers, global key hooks). It keeps the session's
//! [`HeldKeyState`] and writes one keyboard packet per event.
//!
//! [`RawReportForwarder`] serves backends that already read 8-byte HID
//! reports from a physical keyboard and only need them framed.
//!
//! Both stop the session on Ctrl+Esc after sending a release packet, so the
//! remote machine is never left with a key held down.

use std::sync::Arc;

use ch9329_core::{
    domain::held_keys::{HeldKeyState, KeyContribution, LogicalKeyId, RolloverPolicy},
    protocol::{
        codec::describe_report,
        packet::{frame_fixed, frame_keyboard_report, frame_release, Command},
        report::{HidKeyboardReport, REPORT_LEN},
    },
    HidKeyCode,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::{send_packet, ForwardError, SessionControl};
use crate::infrastructure::transport::Transport;

// ── Live key events ───────────────────────────────────────────────────────────

/// Forwards key-down/key-up events for one capture session.
pub struct KeyboardForwarder {
    session_id: Uuid,
    transport: Arc<dyn Transport>,
    held: HeldKeyState,
}

impl KeyboardForwarder {
    pub fn new(session_id: Uuid, transport: Arc<dyn Transport>, policy: RolloverPolicy) -> Self {
        info!(session = %session_id, ?policy, "keyboard session started");
        Self {
            session_id,
            transport,
            held: HeldKeyState::with_policy(policy),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Keys currently held, oldest first.
    pub fn held_keys(&self) -> impl Iterator<Item = &LogicalKeyId> {
        self.held.held_ids()
    }

    /// Handles a key press using the key's table contribution.
    ///
    /// Keys with no table entry are logged and ignored.
    ///
    /// # Errors
    ///
    /// [`ForwardError::Rollover`] when a seventh key is rejected by the
    /// rollover policy, [`ForwardError::Transport`] if the write fails.
    pub fn key_down(&mut self, id: LogicalKeyId) -> Result<SessionControl, ForwardError> {
        match id.default_contribution() {
            Some(contribution) => self.key_down_with(id, contribution),
            None => {
                warn!(session = %self.session_id, ?id, "unmapped key ignored");
                Ok(SessionControl::Continue)
            }
        }
    }

    /// Handles a key press with an explicit contribution.
    ///
    /// If the press completes Ctrl+Esc, a release packet is sent instead of
    /// the merged report and [`SessionControl::Stop`] is returned. This is
    /// decided before the rollover policy sees the key, so a full report
    /// cannot block the exit.
    ///
    /// # Errors
    ///
    /// See [`KeyboardForwarder::key_down`].
    pub fn key_down_with(
        &mut self,
        id: LogicalKeyId,
        contribution: KeyContribution,
    ) -> Result<SessionControl, ForwardError> {
        if self.held.completes_escape_sequence(contribution) {
            warn!(session = %self.session_id, "Ctrl+Esc escape sequence detected, ending session");
            self.release_all()?;
            return Ok(SessionControl::Stop);
        }

        let report = self.held.on_key_down(id, contribution)?;
        self.send(&report)?;
        Ok(SessionControl::Continue)
    }

    /// Handles a key release. Releasing a key that is not held still sends
    /// the current report.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError::Transport`] if the write fails.
    pub fn key_up(&mut self, id: &LogicalKeyId) -> Result<(), ForwardError> {
        if !self.held.is_held(id) {
            debug!(session = %self.session_id, ?id, "key-up for a key that is not held");
        }
        let report = self.held.on_key_up(id)?;
        self.send(&report)
    }

    /// Forgets every held key and sends the release packet.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError::Transport`] if the write fails.
    pub fn release_all(&mut self) -> Result<(), ForwardError> {
        let report = self.held.clear();
        self.send(&report)
    }

    fn send(&self, report: &HidKeyboardReport) -> Result<(), ForwardError> {
        send_packet(
            self.transport.as_ref(),
            self.session_id,
            &frame_keyboard_report(report),
        )
    }
}

// ── Raw report passthrough ────────────────────────────────────────────────────

/// Suppresses repeated echo of the same key while it is held.
///
/// A held key arrives as a stream of identical reports; the echo should show
/// it once. Any report without a displayable key resets the filter.
#[derive(Debug, Default)]
pub struct EchoFilter {
    last: Option<String>,
}

impl EchoFilter {
    /// Returns the text to echo for `report`, or `None` to stay silent.
    pub fn accept(&mut self, report: &HidKeyboardReport) -> Option<String> {
        match describe_report(report) {
            Some(text) if self.last.as_deref() != Some(text.as_str()) => {
                self.last = Some(text.clone());
                Some(text)
            }
            Some(_) => None,
            None => {
                self.last = None;
                None
            }
        }
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

/// Result of forwarding one raw report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Forwarded {
    pub control: SessionControl,
    /// Text to show the operator, when echo is on and the key is new.
    pub echo: Option<String>,
}

impl Forwarded {
    fn continue_with(echo: Option<String>) -> Self {
        Self {
            control: SessionControl::Continue,
            echo,
        }
    }
}

/// Forwards raw HID reports read from a physical keyboard.
pub struct RawReportForwarder {
    session_id: Uuid,
    transport: Arc<dyn Transport>,
    echo: Option<EchoFilter>,
}

impl RawReportForwarder {
    pub fn new(session_id: Uuid, transport: Arc<dyn Transport>, echo: bool) -> Self {
        Self {
            session_id,
            transport,
            echo: echo.then(EchoFilter::default),
        }
    }

    /// Frames the first 8 bytes of `raw` unchanged and writes them.
    ///
    /// Reads shorter than a report are ignored. Ctrl+Esc sends a release
    /// packet and stops the session without forwarding the chord.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError::Transport`] if the write fails.
    pub fn forward(&mut self, raw: &[u8]) -> Result<Forwarded, ForwardError> {
        let Some(report) = HidKeyboardReport::from_slice(raw) else {
            debug!(session = %self.session_id, len = raw.len(), "short read ignored");
            return Ok(Forwarded::continue_with(None));
        };

        if report.modifiers().ctrl() && report.contains(HidKeyCode::Escape) {
            warn!(session = %self.session_id, "Ctrl+Esc escape sequence detected, ending session");
            send_packet(self.transport.as_ref(), self.session_id, &frame_release())?;
            return Ok(Forwarded {
                control: SessionControl::Stop,
                echo: None,
            });
        }

        if report.modifiers().ctrl() && report.first_key() == Some(HidKeyCode::KeyC.as_u8()) {
            warn!(session = %self.session_id, "Ctrl+C passed through; use Ctrl+Esc to exit");
        }

        let packet = frame_fixed(Command::Keyboard, &raw[..REPORT_LEN]);
        send_packet(self.transport.as_ref(), self.session_id, &packet)?;

        let echo = self.echo.as_mut().and_then(|filter| filter.accept(&report));
        Ok(Forwarded::continue_with(echo))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
