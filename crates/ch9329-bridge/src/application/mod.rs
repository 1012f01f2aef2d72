//! Application layer use cases for the bridge.
//!
//! Each use case turns logical input events into framed packets and writes
//! them to an injected [`Transport`]. None of them open devices or read
//! files, so every one can be driven from tests with a recording transport.
//!
//! # Sub-modules
//!
//! - **`forward_keyboard`** – Live key-down/key-up forwarding through a
//!   per-session held-key set, plus the raw USB report passthrough.
//!
//! - **`type_text`** – Plays back pasted or piped text one character at a
//!   time.
//!
//! - **`forward_mouse`** – Absolute moves, clicks, relative moves and wheel.
//!
//! - **`session`** – Builds all of the above for one session from
//!   [`BridgeConfig`](crate::infrastructure::storage::config::BridgeConfig).

pub mod forward_keyboard;
pub mod forward_mouse;
pub mod session;
pub mod type_text;

use ch9329_core::{CodecError, MouseError, RolloverError};
use thiserror::Error;

use crate::infrastructure::transport::{Transport, TransportError};

/// Error type shared by the forwarding use cases.
#[derive(Debug, Error)]
pub enum ForwardError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Rollover(#[from] RolloverError),

    #[error(transparent)]
    Mouse(#[from] MouseError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Whether the capture loop should keep running after an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionControl {
    Continue,
    /// The operator pressed Ctrl+Esc; a release has already been sent.
    Stop,
}

/// Writes one framed packet, logging it at debug level.
fn send_packet(
    transport: &dyn Transport,
    session_id: uuid::Uuid,
    packet: &ch9329_core::Packet,
) -> Result<(), ForwardError> {
    tracing::debug!(session = %session_id, "TX {}", packet.to_hex());
    transport.write(packet.as_bytes())?;
    Ok(())
}
