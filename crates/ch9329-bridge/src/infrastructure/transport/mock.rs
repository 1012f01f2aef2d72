//! In-memory transport for tests and dry runs.
//!
//! Every write is appended to `writes` so assertions can inspect exactly
//! which packets were sent and in what order.
//!
//! # Usage in tests
//!
//! ```ignore
//! let transport = Arc::new(RecordingTransport::new());
//! let mut forwarder = KeyboardForwarder::new(
//!     Uuid::new_v4(),
//!     Arc::clone(&transport) as Arc<dyn Transport>,
//!     RolloverPolicy::Reject,
//! );
//!
//! forwarder.key_down(LogicalKeyId::Char('a')).unwrap();
//!
//! assert_eq!(transport.packets().len(), 1);
//! ```

use std::sync::Mutex;

use ch9329_core::protocol::packet::decode_packet;
use ch9329_core::Packet;

use super::{Transport, TransportError};

/// A transport that records every write instead of touching hardware.
#[derive(Default)]
pub struct RecordingTransport {
    /// Raw byte slices passed to `write`, one entry per call.
    pub writes: Mutex<Vec<Vec<u8>>>,
    /// When `true`, every write fails with [`TransportError::Rejected`].
    pub should_fail: bool,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transport whose writes always fail.
    pub fn failing() -> Self {
        Self {
            writes: Mutex::new(Vec::new()),
            should_fail: true,
        }
    }

    /// Recorded writes parsed back into packets. Writes that do not parse
    /// are skipped.
    pub fn packets(&self) -> Vec<Packet> {
        self.writes
            .lock()
            .expect("lock poisoned")
            .iter()
            .filter_map(|bytes| decode_packet(bytes).ok().map(|(packet, _)| packet))
            .collect()
    }

    /// DATA sections of the recorded packets.
    pub fn payloads(&self) -> Vec<Vec<u8>> {
        self.packets().iter().map(|p| p.data().to_vec()).collect()
    }

    pub fn write_count(&self) -> usize {
        self.writes.lock().expect("lock poisoned").len()
    }
}

impl Transport for RecordingTransport {
    fn write(&self, bytes: &[u8]) -> Result<(), TransportError> {
        if self.should_fail {
            return Err(TransportError::Rejected("injected failure".to_string()));
        }
        self.writes
            .lock()
            .expect("lock poisoned")
            .push(bytes.to_vec());
        Ok(())
    }
}
