//! CH9329 serial packet framing.
//!
//! Wire format:
//! ```text
//! [0x57 0xAB][addr:1][cmd:1][len:1][data:len][checksum:1]
//! ```
//! The checksum is the sum of every preceding byte, truncated to 8 bits.

use thiserror::Error;

use crate::protocol::report::{HidKeyboardReport, REPORT_LEN};

/// Magic bytes at the start of every packet.
pub const HEADER: [u8; 2] = [0x57, 0xAB];

/// The chip's default address; single-device buses always use it.
pub const DEVICE_ADDRESS: u8 = 0x00;

/// Largest DATA section the one-byte LEN field can describe.
pub const MAX_DATA_LEN: usize = u8::MAX as usize;

/// Header, address, command and length bytes before DATA.
pub const PREFIX_LEN: usize = 5;

/// Errors produced while building or parsing a packet.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    /// DATA does not fit the one-byte LEN field.
    #[error("payload too long: {len} bytes, maximum is 255")]
    PayloadTooLong { len: usize },

    /// The byte slice ends before the packet does.
    #[error("insufficient data: need at least {needed} bytes, got {available}")]
    InsufficientData { needed: usize, available: usize },

    /// The first two bytes are not `57 AB`.
    #[error("invalid header: {0:02X?}")]
    InvalidHeader([u8; 2]),

    /// The trailing byte disagrees with the computed sum.
    #[error("checksum mismatch: expected 0x{expected:02X}, found 0x{found:02X}")]
    ChecksumMismatch { expected: u8, found: u8 },
}

/// The commands this crate emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Command {
    /// 8-byte keyboard report.
    Keyboard = 0x02,
    /// 7-byte absolute pointer payload.
    MouseAbsolute = 0x04,
    /// 5-byte relative pointer payload (moves, clicks, wheel).
    MouseRelative = 0x05,
}

impl Command {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0x02 => Some(Command::Keyboard),
            0x04 => Some(Command::MouseAbsolute),
            0x05 => Some(Command::MouseRelative),
            _ => None,
        }
    }

    /// DATA length the chip expects for this command.
    pub fn fixed_len(self) -> usize {
        match self {
            Command::Keyboard => REPORT_LEN,
            Command::MouseAbsolute => 7,
            Command::MouseRelative => 5,
        }
    }
}

/// A complete, checksummed packet ready for the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet(Vec<u8>);

impl Packet {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; a packet has at least its 6 envelope bytes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn address(&self) -> u8 {
        self.0[2]
    }

    pub fn command(&self) -> u8 {
        self.0[3]
    }

    /// The DATA section.
    pub fn data(&self) -> &[u8] {
        &self.0[PREFIX_LEN..self.0.len() - 1]
    }

    pub fn checksum(&self) -> u8 {
        self.0[self.0.len() - 1]
    }

    /// Space-separated hex, for log lines.
    pub fn to_hex(&self) -> String {
        self.0
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl AsRef<[u8]> for Packet {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// ── Framing ───────────────────────────────────────────────────────────────────

/// 8-bit truncated sum of `bytes`.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}

/// Wraps `data` in the envelope for command byte `cmd`.
///
/// # Errors
///
/// Returns [`FrameError::PayloadTooLong`] if `data` exceeds 255 bytes.
///
/// # Examples
///
/// ```rust
/// use ch9329_core::protocol::packet::frame;
///
/// let packet = frame(0x02, &[0u8; 8]).unwrap();
/// assert_eq!(packet.as_bytes()[..5], [0x57, 0xAB, 0x00, 0x02, 0x08]);
/// assert_eq!(packet.checksum(), 0x0C);
/// ```
pub fn frame(cmd: u8, data: &[u8]) -> Result<Packet, FrameError> {
    if data.len() > MAX_DATA_LEN {
        return Err(FrameError::PayloadTooLong { len: data.len() });
    }
    Ok(envelope(cmd, data))
}

/// Frames `data` for a fixed-length command, zero-padding or truncating it
/// to exactly [`Command::fixed_len`] bytes.
pub fn frame_fixed(command: Command, data: &[u8]) -> Packet {
    let mut sized = vec![0u8; command.fixed_len()];
    let n = data.len().min(sized.len());
    sized[..n].copy_from_slice(&data[..n]);
    envelope(command.as_u8(), &sized)
}

/// Header, address, command, length, `data`, checksum. `data` must fit LEN.
fn envelope(cmd: u8, data: &[u8]) -> Packet {
    debug_assert!(data.len() <= MAX_DATA_LEN);
    let mut buf = Vec::with_capacity(PREFIX_LEN + data.len() + 1);
    buf.extend_from_slice(&HEADER);
    buf.push(DEVICE_ADDRESS);
    buf.push(cmd);
    buf.push(data.len() as u8);
    buf.extend_from_slice(data);
    buf.push(checksum(&buf));
    Packet(buf)
}

/// Keyboard packet carrying `report`.
pub fn frame_keyboard_report(report: &HidKeyboardReport) -> Packet {
    frame_fixed(Command::Keyboard, &report.to_bytes())
}

/// Keyboard packet that releases every key.
pub fn frame_release() -> Packet {
    frame_keyboard_report(&HidKeyboardReport::EMPTY)
}

// ── Parsing ───────────────────────────────────────────────────────────────────

/// Validates one packet at the start of `bytes`.
///
/// Returns the packet and the number of bytes it occupied so the caller can
/// advance through a captured stream.
///
/// # Errors
///
/// [`FrameError::InsufficientData`] if the slice is shorter than the packet,
/// [`FrameError::InvalidHeader`] on a bad magic, and
/// [`FrameError::ChecksumMismatch`] if the trailing byte is wrong.
pub fn decode_packet(bytes: &[u8]) -> Result<(Packet, usize), FrameError> {
    if bytes.len() < PREFIX_LEN + 1 {
        return Err(FrameError::InsufficientData {
            needed: PREFIX_LEN + 1,
            available: bytes.len(),
        });
    }
    let header = [bytes[0], bytes[1]];
    if header != HEADER {
        return Err(FrameError::InvalidHeader(header));
    }

    let data_len = bytes[4] as usize;
    let total = PREFIX_LEN + data_len + 1;
    if bytes.len() < total {
        return Err(FrameError::InsufficientData {
            needed: total,
            available: bytes.len(),
        });
    }

    let expected = checksum(&bytes[..total - 1]);
    let found = bytes[total - 1];
    if expected != found {
        return Err(FrameError::ChecksumMismatch { expected, found });
    }

    Ok((Packet(bytes[..total].to_vec()), total))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::hid::HidKeyCode;
    use crate::keymap::modifier::ModifierMask;

    #[test]
    fn test_frame_release_matches_reference_bytes() {
        let packet = frame(0x02, &[0u8; 8]).unwrap();
        assert_eq!(
            packet.as_bytes(),
            &[0x57, 0xAB, 0x00, 0x02, 0x08, 0, 0, 0, 0, 0, 0, 0, 0, 0x0C]
        );
        assert_eq!(frame_release(), packet);
    }

    #[test]
    fn test_checksum_wraps_modulo_256() {
        // Arrange: 0x57 + 0xAB + 0x02 + 0x08 = 0x10C, plus 0xFF * 8
        let data = [0xFFu8; 8];

        // Act
        let packet = frame(0x02, &data).unwrap();

        // Assert
        let sum: u32 = packet.as_bytes()[..packet.len() - 1]
            .iter()
            .map(|&b| b as u32)
            .sum();
        assert_eq!(packet.checksum() as u32, sum % 256);
    }

    #[test]
    fn test_frame_accepts_255_bytes_and_rejects_256() {
        let packet = frame(0x05, &[1u8; 255]).unwrap();
        assert_eq!(packet.as_bytes()[4], 0xFF);
        assert_eq!(packet.len(), 255 + 6);

        assert_eq!(
            frame(0x05, &[1u8; 256]),
            Err(FrameError::PayloadTooLong { len: 256 })
        );
    }

    #[test]
    fn test_frame_empty_data() {
        let packet = frame(0x02, &[]).unwrap();
        assert_eq!(packet.as_bytes(), &[0x57, 0xAB, 0x00, 0x02, 0x00, 0x04]);
        assert!(packet.data().is_empty());
    }

    #[test]
    fn test_frame_fixed_pads_short_payload() {
        let packet = frame_fixed(Command::MouseAbsolute, &[0x02, 0x00, 0x10]);
        assert_eq!(packet.data(), &[0x02, 0x00, 0x10, 0, 0, 0, 0]);
        assert_eq!(packet.as_bytes()[4], 7);
    }

    #[test]
    fn test_frame_fixed_matches_frame_for_exact_length_payload() {
        let data = [0x01, 0x02, 0x03, 0x04, 0x05];
        assert_eq!(
            frame_fixed(Command::MouseRelative, &data),
            frame(Command::MouseRelative.as_u8(), &data).unwrap()
        );
    }

    #[test]
    fn test_frame_fixed_truncates_long_payload() {
        let packet = frame_fixed(Command::MouseRelative, &[1, 2, 3, 4, 5, 6, 7]);
        assert_eq!(packet.data(), &[1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_frame_keyboard_report_carries_report_bytes() {
        let report = HidKeyboardReport::single(ModifierMask::LEFT_SHIFT, HidKeyCode::KeyA);
        let packet = frame_keyboard_report(&report);
        assert_eq!(packet.command(), Command::Keyboard.as_u8());
        assert_eq!(packet.data(), &report.to_bytes());
    }

    #[test]
    fn test_decode_packet_accepts_framed_bytes_and_reports_consumed() {
        // Arrange: a packet followed by trailing garbage
        let packet = frame_release();
        let mut stream = packet.as_bytes().to_vec();
        stream.extend_from_slice(&[0xDE, 0xAD]);

        // Act
        let (decoded, consumed) = decode_packet(&stream).unwrap();

        // Assert
        assert_eq!(decoded, packet);
        assert_eq!(consumed, 14);
    }

    #[test]
    fn test_decode_packet_rejects_bad_checksum() {
        let mut bytes = frame_release().into_bytes();
        let last = bytes.len() - 1;
        bytes[last] = 0x0D;
        assert_eq!(
            decode_packet(&bytes),
            Err(FrameError::ChecksumMismatch {
                expected: 0x0C,
                found: 0x0D
            })
        );
    }

    #[test]
    fn test_decode_packet_rejects_bad_header() {
        let mut bytes = frame_release().into_bytes();
        bytes[0] = 0x58;
        assert_eq!(
            decode_packet(&bytes),
            Err(FrameError::InvalidHeader([0x58, 0xAB]))
        );
    }

    #[test]
    fn test_decode_packet_rejects_truncated_input() {
        let bytes = frame_release().into_bytes();
        assert!(matches!(
            decode_packet(&bytes[..3]),
            Err(FrameError::InsufficientData { needed: 6, available: 3 })
        ));
        assert!(matches!(
            decode_packet(&bytes[..10]),
            Err(FrameError::InsufficientData { needed: 14, available: 10 })
        ));
    }

    #[test]
    fn test_command_fixed_lengths() {
        assert_eq!(Command::Keyboard.fixed_len(), 8);
        assert_eq!(Command::MouseAbsolute.fixed_len(), 7);
        assert_eq!(Command::MouseRelative.fixed_len(), 5);
        assert_eq!(Command::from_u8(0x04), Some(Command::MouseAbsolute));
        assert_eq!(Command::from_u8(0x03), None);
    }

    #[test]
    fn test_to_hex_formats_every_byte() {
        assert_eq!(
            frame_release().to_hex(),
            "57 AB 00 02 08 00 00 00 00 00 00 00 00 0C"
        );
    }
}
