//! Mouse payloads: absolute moves, relative moves, button clicks and wheel.
//!
//! Absolute payloads (command `0x04`, 7 bytes):
//! ```text
//! [0x02][buttons:1][x:2 LE][y:2 LE][pad:1]
//! ```
//! Relative payloads (command `0x05`, 5 bytes) start with mode byte `0x01`.
//! Coordinates are scaled to the chip's 0..4096 range per axis.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::protocol::packet::{frame_fixed, Command, Packet};

/// Device units spanning one screen axis.
pub const ABSOLUTE_RANGE: i64 = 4096;

/// Mode byte leading every absolute payload.
pub const MODE_ABSOLUTE: u8 = 0x02;

/// Mode byte leading every relative payload.
pub const MODE_RELATIVE: u8 = 0x01;

/// Errors produced while encoding a mouse payload.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MouseError {
    /// A screen dimension of zero cannot be scaled against.
    #[error("invalid screen size {width}x{height}")]
    InvalidScreenSize { width: u32, height: u32 },

    /// The scaled coordinate does not fit the 16-bit wire field.
    #[error("scaled coordinate {value} does not fit in 16 bits")]
    CoordinateOutOfRange { value: i64 },
}

/// A mouse button and its bit in the button-state byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    pub fn bit(self) -> u8 {
        match self {
            MouseButton::Left => 0x01,
            MouseButton::Right => 0x02,
            MouseButton::Middle => 0x04,
        }
    }
}

/// Pixel size of the remote screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// An encoded mouse payload and the command that carries it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MousePayload {
    pub command: Command,
    pub data: Vec<u8>,
}

impl MousePayload {
    fn relative(data: Vec<u8>) -> Self {
        Self {
            command: Command::MouseRelative,
            data,
        }
    }

    /// Mode byte (`0x02` absolute, `0x01` relative).
    pub fn mode(&self) -> u8 {
        self.data.first().copied().unwrap_or_default()
    }

    /// Button-state byte for absolute, click and relative-move payloads.
    pub fn buttons(&self) -> u8 {
        self.data.get(1).copied().unwrap_or_default()
    }

    /// Frames the payload, padded or truncated to the command's length.
    pub fn to_packet(&self) -> Packet {
        frame_fixed(self.command, &self.data)
    }
}

fn scale_axis(coordinate: i32, dimension: u32) -> Result<u16, MouseError> {
    let mut scaled = (ABSOLUTE_RANGE * coordinate as i64).div_euclid(dimension as i64);
    if scaled < 0 {
        scaled = (ABSOLUTE_RANGE + scaled).abs();
    }
    u16::try_from(scaled).map_err(|_| MouseError::CoordinateOutOfRange { value: scaled })
}

/// Absolute move to pixel `(x, y)` on a screen of `screen` size.
///
/// Each axis is scaled as `floor(4096 * coordinate / dimension)`. Negative
/// results (pointers on a monitor left of or above the primary) fold to
/// `abs(4096 + scaled)`.
///
/// # Errors
///
/// [`MouseError::InvalidScreenSize`] if either dimension is zero,
/// [`MouseError::CoordinateOutOfRange`] if a scaled axis exceeds `u16`.
///
/// # Examples
///
/// ```rust
/// use ch9329_core::protocol::mouse::{encode_absolute, ScreenSize};
///
/// let payload = encode_absolute(1919, 0, ScreenSize::new(1920, 1080)).unwrap();
/// assert_eq!(&payload.data[2..4], &4093u16.to_le_bytes());
/// ```
pub fn encode_absolute(x: i32, y: i32, screen: ScreenSize) -> Result<MousePayload, MouseError> {
    if screen.width == 0 || screen.height == 0 {
        return Err(MouseError::InvalidScreenSize {
            width: screen.width,
            height: screen.height,
        });
    }
    let sx = scale_axis(x, screen.width)?;
    let sy = scale_axis(y, screen.height)?;

    let mut data = Vec::with_capacity(Command::MouseAbsolute.fixed_len());
    data.push(MODE_ABSOLUTE);
    data.push(0x00);
    data.extend_from_slice(&sx.to_le_bytes());
    data.extend_from_slice(&sy.to_le_bytes());
    data.push(0x00);
    Ok(MousePayload {
        command: Command::MouseAbsolute,
        data,
    })
}

/// Button press (`is_down`) or release. Deltas are zero.
pub fn encode_click(button: MouseButton, is_down: bool) -> MousePayload {
    let state = if is_down { button.bit() } else { 0 };
    MousePayload::relative(vec![MODE_RELATIVE, state, 0, 0, 0])
}

/// Wheel movement as signed big-endian 16-bit `dx` then `dy`.
pub fn encode_scroll(dx: i16, dy: i16) -> MousePayload {
    let mut data = Vec::with_capacity(Command::MouseRelative.fixed_len());
    data.push(MODE_RELATIVE);
    data.extend_from_slice(&dx.to_be_bytes());
    data.extend_from_slice(&dy.to_be_bytes());
    MousePayload::relative(data)
}

/// Relative pointer move with `buttons` (OR of [`MouseButton::bit`]) held.
pub fn encode_relative_move(dx: i8, dy: i8, buttons: u8) -> MousePayload {
    MousePayload::relative(vec![MODE_RELATIVE, buttons, dx as u8, dy as u8, 0])
}

#[cfg(test)]
mod tests {
    use super::*;

    const HD: ScreenSize = ScreenSize {
        width: 1920,
        height: 1080,
    };

    fn x_of(payload: &MousePayload) -> u16 {
        u16::from_le_bytes([payload.data[2], payload.data[3]])
    }

    fn y_of(payload: &MousePayload) -> u16 {
        u16::from_le_bytes([payload.data[4], payload.data[5]])
    }

    #[test]
    fn test_absolute_scaling_reference_points() {
        assert_eq!(x_of(&encode_absolute(0, 0, HD).unwrap()), 0);
        assert_eq!(x_of(&encode_absolute(1919, 0, HD).unwrap()), 4093);
        assert_eq!(y_of(&encode_absolute(0, 540, HD).unwrap()), 2048);
    }

    #[test]
    fn test_absolute_payload_layout() {
        // Arrange
        let payload = encode_absolute(960, 1079, HD).unwrap();

        // Assert
        assert_eq!(payload.command, Command::MouseAbsolute);
        assert_eq!(payload.data.len(), 7);
        assert_eq!(payload.mode(), 0x02);
        assert_eq!(payload.buttons(), 0x00);
        assert_eq!(x_of(&payload), 2048);
        // floor(4096 * 1079 / 1080) = 4092
        assert_eq!(y_of(&payload), 4092);
    }

    #[test]
    fn test_absolute_negative_coordinate_folds() {
        // floor(4096 * -10 / 1920) = -22, abs(4096 - 22) = 4074
        let payload = encode_absolute(-10, 0, HD).unwrap();
        assert_eq!(x_of(&payload), 4074);
    }

    #[test]
    fn test_absolute_rejects_zero_dimension() {
        assert_eq!(
            encode_absolute(1, 1, ScreenSize::new(0, 1080)),
            Err(MouseError::InvalidScreenSize {
                width: 0,
                height: 1080
            })
        );
    }

    #[test]
    fn test_absolute_rejects_coordinate_beyond_u16() {
        let result = encode_absolute(100_000, 0, ScreenSize::new(1, 1));
        assert!(matches!(result, Err(MouseError::CoordinateOutOfRange { .. })));
    }

    #[test]
    fn test_click_down_then_up() {
        let down = encode_click(MouseButton::Left, true);
        let up = encode_click(MouseButton::Left, false);

        assert_eq!(down.data, vec![0x01, 0x01, 0, 0, 0]);
        assert_eq!(up.data, vec![0x01, 0x00, 0, 0, 0]);
        assert_eq!(down.mode(), up.mode());
        assert_eq!(encode_click(MouseButton::Middle, true).buttons(), 0x04);
        assert_eq!(encode_click(MouseButton::Right, true).buttons(), 0x02);
    }

    #[test]
    fn test_scroll_is_big_endian_signed() {
        let payload = encode_scroll(0, -1);
        assert_eq!(payload.command, Command::MouseRelative);
        assert_eq!(payload.data, vec![0x01, 0x00, 0x00, 0xFF, 0xFF]);

        let payload = encode_scroll(2, 3);
        assert_eq!(payload.data, vec![0x01, 0x00, 0x02, 0x00, 0x03]);
    }

    #[test]
    fn test_relative_move_carries_signed_deltas() {
        let payload = encode_relative_move(-3, 5, MouseButton::Left.bit());
        assert_eq!(payload.data, vec![0x01, 0x01, 0xFD, 0x05, 0x00]);
    }

    #[test]
    fn test_to_packet_uses_fixed_lengths() {
        let packet = encode_absolute(10, 10, HD).unwrap().to_packet();
        assert_eq!(packet.command(), 0x04);
        assert_eq!(packet.data().len(), 7);

        let packet = encode_scroll(0, 1).to_packet();
        assert_eq!(packet.command(), 0x05);
        assert_eq!(packet.data().len(), 5);
    }
}
