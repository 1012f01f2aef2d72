//! Protocol module: keyboard reports, the character codec, mouse payloads and
//! the CH9329 packet framer.

pub mod codec;
pub mod mouse;
pub mod packet;
pub mod report;

pub use codec::{
    decode_to_char, describe_report, encode_char, encode_control_char, encode_named_key,
    encode_text, encode_typed_char, CodecError, TypingOptions,
};
pub use mouse::{
    encode_absolute, encode_click, encode_relative_move, encode_scroll, MouseButton, MouseError,
    MousePayload, ScreenSize,
};
pub use packet::{
    checksum, decode_packet, frame, frame_fixed, frame_keyboard_report, frame_release, Command,
    FrameError, Packet,
};
pub use report::HidKeyboardReport;
