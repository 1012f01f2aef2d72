//! Byte transports to the CH9329.
//!
//! The chip is fire-and-forget: packets are written and never acknowledged,
//! so a transport only needs `write`. [`SerialTransport`] talks to a real
//! serial device; [`mock::RecordingTransport`] keeps packets in memory for
//! tests.

pub mod mock;

use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

/// Write timeout for the serial device.
const WRITE_TIMEOUT: Duration = Duration::from_millis(500);

/// Error type for transport operations.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The serial device could not be opened.
    #[error("failed to open serial port {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: serialport::Error,
    },

    /// Writing to the device failed.
    #[error("serial write failed: {0}")]
    Write(#[from] std::io::Error),

    /// Another writer panicked while holding the port.
    #[error("serial port lock poisoned")]
    Poisoned,

    /// The transport refused the write (used by in-memory transports).
    #[error("transport rejected write: {0}")]
    Rejected(String),
}

/// A byte sink that delivers framed packets to the chip.
///
/// Implementations must write the whole slice or fail; there is no retry.
#[cfg_attr(test, mockall::automock)]
pub trait Transport: Send + Sync {
    fn write(&self, bytes: &[u8]) -> Result<(), TransportError>;
}

/// A CH9329 attached to a local serial port.
pub struct SerialTransport {
    path: String,
    port: Mutex<Box<dyn serialport::SerialPort>>,
}

impl SerialTransport {
    /// Opens `path` at `baud_rate` (the chip ships configured for 9600).
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::Open`] if the device is missing, busy, or
    /// rejects the settings.
    pub fn open(path: &str, baud_rate: u32) -> Result<Self, TransportError> {
        let port = serialport::new(path, baud_rate)
            .timeout(WRITE_TIMEOUT)
            .open()
            .map_err(|source| TransportError::Open {
                path: path.to_string(),
                source,
            })?;
        info!("serial port opened: {path} @ {baud_rate} baud");
        Ok(Self {
            path: path.to_string(),
            port: Mutex::new(port),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl Transport for SerialTransport {
    fn write(&self, bytes: &[u8]) -> Result<(), TransportError> {
        let mut port = self.port.lock().map_err(|_| TransportError::Poisoned)?;
        port.write_all(bytes)?;
        port.flush()?;
        debug!("TX {} bytes: {:02X?}", bytes.len(), bytes);
        Ok(())
    }
}
