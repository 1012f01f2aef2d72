//! ch9329-bridge library entry point.
//!
//! Re-exports all public modules so that integration tests in `tests/`
//! and the binary entry point in `main.rs` share the same module tree.
//!
//! # What does the bridge do? (for beginners)
//!
//! A CH9329 is a small chip with a serial (UART) side and a USB side. Plug the
//! USB side into the machine you want to control and the serial side into
//! this host. The chip then types and clicks on the remote machine whatever
//! the host tells it to.
//!
//! The bridge:
//!
//! 1. Loads its configuration (serial device, baud rate, typing options).
//! 2. Opens the serial port.
//! 3. Turns input events into framed packets via `ch9329_core` and writes
//!    them to the port.
//! 4. Sends a "release everything" packet on exit so no key stays stuck.

/// Application layer: forwarding use cases.
pub mod application;

/// Infrastructure layer: serial transport and config storage.
pub mod infrastructure;
