//! BridgeSession: every forwarder for one capture session, built from config.
//!
//! All forwarders share one transport and one session id, so their log lines
//! correlate and their packets interleave in event order.

use std::sync::Arc;

use uuid::Uuid;

use super::{
    forward_keyboard::{KeyboardForwarder, RawReportForwarder},
    forward_mouse::MouseForwarder,
    type_text::TypeTextUseCase,
    ForwardError,
};
use crate::infrastructure::{storage::config::BridgeConfig, transport::Transport};

/// The forwarders of one session.
pub struct BridgeSession {
    session_id: Uuid,
    pub keyboard: KeyboardForwarder,
    pub raw: RawReportForwarder,
    pub mouse: MouseForwarder,
    pub typist: TypeTextUseCase,
}

impl BridgeSession {
    /// Builds the forwarders with a fresh session id.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError::Codec`] if the `[keyboard]` typing options are
    /// invalid.
    pub fn from_config(
        transport: Arc<dyn Transport>,
        config: &BridgeConfig,
    ) -> Result<Self, ForwardError> {
        Self::with_id(Uuid::new_v4(), transport, config)
    }

    /// Like [`BridgeSession::from_config`] with a caller-chosen id.
    ///
    /// # Errors
    ///
    /// See [`BridgeSession::from_config`].
    pub fn with_id(
        session_id: Uuid,
        transport: Arc<dyn Transport>,
        config: &BridgeConfig,
    ) -> Result<Self, ForwardError> {
        let typist =
            TypeTextUseCase::new(session_id, Arc::clone(&transport), config.typing_options())?;
        Ok(Self {
            session_id,
            keyboard: KeyboardForwarder::new(
                session_id,
                Arc::clone(&transport),
                config.keyboard.rollover_policy,
            ),
            raw: RawReportForwarder::new(session_id, Arc::clone(&transport), config.keyboard.echo),
            mouse: MouseForwarder::new(
                session_id,
                transport,
                config.screen_size(),
                config.mouse.horizontal_scroll,
            ),
            typist,
        })
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Releases every key and forgets mouse state. Call before teardown.
    ///
    /// # Errors
    ///
    /// Returns [`ForwardError::Transport`] if the release cannot be written.
    pub fn shutdown(&mut self) -> Result<(), ForwardError> {
        self.mouse.reset();
        self.keyboard.release_all()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::transport::mock::RecordingTransport;
    use ch9329_core::protocol::packet::frame_release;
    use ch9329_core::{CodecError, LogicalKeyId, RolloverPolicy};

    const CAPITAL_A: [u8; 8] = [0x02, 0, 0x04, 0, 0, 0, 0, 0];

    fn make_session(config: &BridgeConfig) -> (BridgeSession, Arc<RecordingTransport>) {
        let transport = Arc::new(RecordingTransport::new());
        let session = BridgeSession::from_config(
            Arc::clone(&transport) as Arc<dyn Transport>,
            config,
        )
        .expect("valid config");
        (session, transport)
    }

    #[test]
    fn test_echo_enabled_by_default_config() {
        // Arrange
        let (mut session, _transport) = make_session(&BridgeConfig::default());

        // Act
        let forwarded = session.raw.forward(&CAPITAL_A).unwrap();

        // Assert
        assert_eq!(forwarded.echo, Some("A".to_string()));
    }

    #[test]
    fn test_echo_disabled_in_config_silences_raw_forwarder() {
        // Arrange
        let mut config = BridgeConfig::default();
        config.keyboard.echo = false;
        let (mut session, transport) = make_session(&config);

        // Act
        let forwarded = session.raw.forward(&CAPITAL_A).unwrap();

        // Assert: still forwarded, just not echoed
        assert_eq!(forwarded.echo, None);
        assert_eq!(transport.payloads(), vec![CAPITAL_A.to_vec()]);
    }

    #[test]
    fn test_rollover_policy_comes_from_config() {
        let mut config = BridgeConfig::default();
        config.keyboard.rollover_policy = RolloverPolicy::IgnoreNewest;
        let (mut session, transport) = make_session(&config);

        for c in "abcdefg".chars() {
            session.keyboard.key_down(LogicalKeyId::Char(c)).unwrap();
        }

        assert_eq!(transport.write_count(), 7);
        assert!(session
            .keyboard
            .held_keys()
            .all(|id| *id != LogicalKeyId::Char('g')));
    }

    #[test]
    fn test_horizontal_scroll_comes_from_config() {
        let mut config = BridgeConfig::default();
        config.mouse.horizontal_scroll = true;
        let (mut session, transport) = make_session(&config);

        session.mouse.scroll(1, 0).unwrap();

        assert_eq!(transport.payloads()[0], vec![0x01, 0x00, 0x01, 0x00, 0x00]);
    }

    #[test]
    fn test_invalid_typing_options_are_rejected() {
        let mut config = BridgeConfig::default();
        config.keyboard.key_repeat = 0;

        let result = BridgeSession::from_config(Arc::new(RecordingTransport::new()), &config);

        assert!(matches!(
            result,
            Err(ForwardError::Codec(CodecError::InvalidTypingOptions { .. }))
        ));
    }

    #[test]
    fn test_shutdown_releases_held_keys() {
        let (mut session, transport) = make_session(&BridgeConfig::default());
        session.keyboard.key_down(LogicalKeyId::Char('w')).unwrap();

        session.shutdown().unwrap();

        assert_eq!(transport.packets().last(), Some(&frame_release()));
        assert_eq!(session.keyboard.held_keys().count(), 0);
    }
}
