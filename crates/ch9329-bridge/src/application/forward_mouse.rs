//! MouseForwarder: pointer events to mouse packets.
//!
//! Absolute moves are scaled against the configured remote screen size and
//! deduplicated; clicks, relative moves and wheel use the relative command.

use std::sync::Arc;

use ch9329_core::protocol::mouse::{
    encode_absolute, encode_click, encode_relative_move, encode_scroll, MouseButton, MousePayload,
    ScreenSize,
};
use tracing::debug;
use uuid::Uuid;

use super::{send_packet, ForwardError};
use crate::infrastructure::transport::Transport;

/// Filters duplicate consecutive positions so a stationary pointer sends nothing.
#[derive(Default)]
struct DedupFilter {
    last_pos: Option<(i32, i32)>,
}

impl DedupFilter {
    fn should_send(&mut self, x: i32, y: i32) -> bool {
        if self.last_pos == Some((x, y)) {
            return false;
        }
        self.last_pos = Some((x, y));
        true
    }

    fn reset(&mut self) {
        self.last_pos = None;
    }
}

/// Forwards mouse events for one session.
pub struct MouseForwarder {
    session_id: Uuid,
    transport: Arc<dyn Transport>,
    screen: ScreenSize,
    horizontal_scroll: bool,
    buttons: u8,
    dedup: DedupFilter,
}

impl MouseForwarder {
    pub fn new(
        session_id: Uuid,
        transport: Arc<dyn Transport>,
        screen: ScreenSize,
        horizontal_scroll: bool,
    ) -> Self {
        Self {
            session_id,
            transport,
            screen,
            horizontal_scroll,
            buttons: 0,
            dedup: DedupFilter::default(),
        }
    }

    /// Moves the pointer to pixel `(x, y)`. Repeats of the last position are dropped.
    ///
    /// # Errors
    ///
    /// [`ForwardError::Mouse`] if the coordinate cannot be scaled,
    /// [`ForwardError::Transport`] if the write fails.
    pub fn move_to(&mut self, x: i32, y: i32) -> Result<(), ForwardError> {
        if !self.dedup.should_send(x, y) {
            return Ok(());
        }
        let payload = encode_absolute(x, y, self.screen)?;
        self.send(&payload)
    }

    /// Moves the pointer by a relative offset with the currently held buttons.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError::Transport`] if the write fails.
    pub fn move_by(&mut self, dx: i8, dy: i8) -> Result<(), ForwardError> {
        self.dedup.reset();
        self.send(&encode_relative_move(dx, dy, self.buttons))
    }

    /// Presses or releases `button`.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError::Transport`] if the write fails.
    pub fn button(&mut self, button: MouseButton, is_down: bool) -> Result<(), ForwardError> {
        if is_down {
            self.buttons |= button.bit();
        } else {
            self.buttons &= !button.bit();
        }
        self.send(&encode_click(button, is_down))
    }

    /// Scrolls the wheel. `dx` is dropped unless horizontal scrolling is enabled.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError::Transport`] if the write fails.
    pub fn scroll(&mut self, dx: i16, dy: i16) -> Result<(), ForwardError> {
        let dx = if self.horizontal_scroll { dx } else { 0 };
        self.send(&encode_scroll(dx, dy))
    }

    /// Updates the remote screen size, e.g. after a resolution change.
    pub fn set_screen(&mut self, screen: ScreenSize) {
        self.screen = screen;
        self.dedup.reset();
    }

    /// Forgets button and position state.
    pub fn reset(&mut self) {
        self.buttons = 0;
        self.dedup.reset();
    }

    fn send(&self, payload: &MousePayload) -> Result<(), ForwardError> {
        debug!(session = %self.session_id, mode = payload.mode(), "mouse event");
        send_packet(self.transport.as_ref(), self.session_id, &payload.to_packet())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::transport::mock::RecordingTransport;
    use ch9329_core::MouseError;

    fn make_forwarder(horizontal_scroll: bool) -> (MouseForwarder, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::new());
        let fwd = MouseForwarder::new(
            Uuid::new_v4(),
            Arc::clone(&transport) as Arc<dyn Transport>,
            ScreenSize::new(1920, 1080),
            horizontal_scroll,
        );
        (fwd, transport)
    }

    #[test]
    fn test_move_to_sends_absolute_packet() {
        // Arrange
        let (mut fwd, transport) = make_forwarder(false);

        // Act
        fwd.move_to(1919, 0).unwrap();

        // Assert
        let packets = transport.packets();
        assert_eq!(packets.len(), 1);
        assert_eq!(packets[0].command(), 0x04);
        assert_eq!(packets[0].data(), &[0x02, 0, 0xFD, 0x0F, 0, 0, 0]);
    }

    #[test]
    fn test_move_to_deduplicates_identical_consecutive_positions() {
        let (mut fwd, transport) = make_forwarder(false);

        fwd.move_to(100, 200).unwrap();
        fwd.move_to(100, 200).unwrap();
        fwd.move_to(101, 200).unwrap();

        assert_eq!(transport.write_count(), 2);
    }

    #[test]
    fn test_reset_clears_dedup_state() {
        let (mut fwd, transport) = make_forwarder(false);
        fwd.move_to(5, 5).unwrap();

        fwd.reset();
        fwd.move_to(5, 5).unwrap();

        assert_eq!(transport.write_count(), 2);
    }

    #[test]
    fn test_invalid_screen_size_is_reported() {
        let (mut fwd, transport) = make_forwarder(false);
        fwd.set_screen(ScreenSize::new(0, 0));

        let result = fwd.move_to(1, 1);

        assert!(matches!(
            result,
            Err(ForwardError::Mouse(MouseError::InvalidScreenSize { .. }))
        ));
        assert_eq!(transport.write_count(), 0);
    }

    #[test]
    fn test_click_down_and_up() {
        let (mut fwd, transport) = make_forwarder(false);

        fwd.button(MouseButton::Right, true).unwrap();
        fwd.button(MouseButton::Right, false).unwrap();

        assert_eq!(
            transport.payloads(),
            vec![vec![0x01, 0x02, 0, 0, 0], vec![0x01, 0x00, 0, 0, 0]]
        );
    }

    #[test]
    fn test_relative_move_carries_held_buttons() {
        let (mut fwd, transport) = make_forwarder(false);
        fwd.button(MouseButton::Left, true).unwrap();

        fwd.move_by(10, -10).unwrap();

        assert_eq!(transport.payloads()[1], vec![0x01, 0x01, 0x0A, 0xF6, 0x00]);
    }

    #[test]
    fn test_horizontal_scroll_dropped_when_disabled() {
        let (mut fwd, transport) = make_forwarder(false);
        fwd.scroll(-3, 1).unwrap();
        assert_eq!(transport.payloads()[0], vec![0x01, 0, 0, 0, 0x01]);
    }

    #[test]
    fn test_horizontal_scroll_sent_when_enabled() {
        let (mut fwd, transport) = make_forwarder(true);
        fwd.scroll(-3, 1).unwrap();
        assert_eq!(transport.payloads()[0], vec![0x01, 0xFF, 0xFD, 0, 0x01]);
    }
}
