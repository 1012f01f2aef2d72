//! # ch9329-core
//!
//! Scancode tables, the held-key merge engine and the serial packet framer for
//! the CH9329 USB-HID-over-serial bridge chip.
//!
//! This crate has no serial, OS input or async dependencies. It turns logical
//! key and mouse events into the exact bytes the chip expects; writing those
//! bytes somewhere is the caller's job.
//!
//! # Architecture overview (for beginners)
//!
//! The CH9329 sits between a host's serial port and a target machine's USB
//! port. To the target it looks like an ordinary keyboard and mouse. The host
//! drives it with small framed packets:
//!
//! ```text
//! 57 AB | 00 | CMD | LEN | DATA... | SUM
//! ```
//!
//! - **`keymap`** – Static tables mapping characters, named keys and modifier
//!   keys to USB HID usage codes (UK-ISO character set).
//!
//! - **`domain`** – [`HeldKeyState`]: which keys are down right now, merged
//!   into one 8-byte keyboard report after every press or release.
//!
//! - **`protocol`** – Keyboard reports, the character codec, mouse payloads and
//!   the packet framer that adds header, length and checksum.

pub mod domain;
pub mod keymap;
pub mod protocol;

pub use domain::held_keys::{
    HeldKeyState, KeyContribution, LogicalKeyId, RolloverError, RolloverPolicy,
};
pub use keymap::{HidKeyCode, ModifierKey, ModifierMask, NamedKey, ScancodeTable};
pub use protocol::codec::{CodecError, TypingOptions};
pub use protocol::mouse::{MouseButton, MouseError, ScreenSize};
pub use protocol::packet::{Command, FrameError, Packet};
pub use protocol::report::HidKeyboardReport;
