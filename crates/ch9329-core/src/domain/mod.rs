//! Domain state for a capture session.
//!
//! Nothing here touches a serial port or an OS input API. A session owns one
//! [`held_keys::HeldKeyState`] and feeds it key-down/key-up events; every
//! mutation hands back the report the remote machine should now see.

/// Held-key tracking and the 6-key rollover merge.
pub mod held_keys;
