//! Integration tests for the bytes that reach the CH9329.
//!
//! These drive the public API end to end: logical key events through the
//! held-key merge into framed packets, and mouse events into framed mouse
//! packets, checking the exact bytes on the wire.

use ch9329_core::{
    domain::held_keys::{HeldKeyState, LogicalKeyId, RolloverError},
    keymap::NamedKey,
    protocol::{
        codec::{decode_to_char, encode_char, encode_text, TypingOptions},
        mouse::{encode_absolute, encode_click, encode_scroll, MouseButton, ScreenSize},
        packet::{decode_packet, frame_keyboard_report, frame_release, Command},
    },
    ModifierKey,
};

/// Presses `id` with its table contribution and frames the merged report.
fn press(state: &mut HeldKeyState, id: LogicalKeyId) -> Vec<u8> {
    let contribution = id.default_contribution().expect("key must be mapped");
    let report = state.on_key_down(id, contribution).expect("no overflow");
    frame_keyboard_report(&report).into_bytes()
}

fn release(state: &mut HeldKeyState, id: LogicalKeyId) -> Vec<u8> {
    let report = state.on_key_up(&id).expect("no overflow");
    frame_keyboard_report(&report).into_bytes()
}

#[test]
fn test_shift_a_press_and_release_on_the_wire() {
    let mut state = HeldKeyState::new();

    let shift_down = press(&mut state, LogicalKeyId::Modifier(ModifierKey::LeftShift));
    let a_down = press(&mut state, LogicalKeyId::Char('a'));
    let a_up = release(&mut state, LogicalKeyId::Char('a'));
    let shift_up = release(&mut state, LogicalKeyId::Modifier(ModifierKey::LeftShift));

    assert_eq!(
        shift_down,
        vec![0x57, 0xAB, 0x00, 0x02, 0x08, 0x02, 0, 0, 0, 0, 0, 0, 0, 0x0E]
    );
    assert_eq!(
        a_down,
        vec![0x57, 0xAB, 0x00, 0x02, 0x08, 0x02, 0, 0x04, 0, 0, 0, 0, 0, 0x12]
    );
    assert_eq!(a_up, shift_down);
    assert_eq!(shift_up, frame_release().into_bytes());
}

#[test]
fn test_every_emitted_packet_decodes_cleanly() {
    // Arrange
    let mut state = HeldKeyState::new();
    let mut stream = Vec::new();
    for id in [
        LogicalKeyId::Modifier(ModifierKey::LeftCtrl),
        LogicalKeyId::Named(NamedKey::Home),
        LogicalKeyId::Char('#'),
    ] {
        stream.extend(press(&mut state, id));
    }
    stream.extend(frame_release().into_bytes());

    // Act
    let mut offset = 0;
    let mut packets = Vec::new();
    while offset < stream.len() {
        let (packet, consumed) = decode_packet(&stream[offset..]).expect("valid packet");
        packets.push(packet);
        offset += consumed;
    }

    // Assert
    assert_eq!(packets.len(), 4);
    assert!(packets.iter().all(|p| p.command() == Command::Keyboard.as_u8()));
    assert_eq!(packets[2].data(), &[0x01, 0, 0x4A, 0x32, 0, 0, 0, 0]);
}

#[test]
fn test_overflow_leaves_session_usable() {
    let mut state = HeldKeyState::new();
    for c in "qwerty".chars() {
        press(&mut state, LogicalKeyId::Char(c));
    }

    let id = LogicalKeyId::Char('u');
    let contribution = id.default_contribution().unwrap();
    assert_eq!(
        state.on_key_down(id, contribution),
        Err(RolloverError::Overflow { held: 7 })
    );

    assert_eq!(
        frame_keyboard_report(&state.clear()).into_bytes(),
        frame_release().into_bytes()
    );
}

#[test]
fn test_typed_text_decodes_back_to_text() {
    let text = "Hello, \"World\" £5 ~#\\|";

    let reports = encode_text(
        text,
        TypingOptions {
            key_repeat: 1,
            key_up: 0,
        },
    )
    .unwrap();
    let decoded: String = reports.iter().filter_map(decode_to_char).collect();

    assert_eq!(decoded, text);
}

#[test]
fn test_unknown_character_frames_as_release() {
    assert_eq!(
        frame_keyboard_report(&encode_char('ß')).into_bytes(),
        frame_release().into_bytes()
    );
}

#[test]
fn test_mouse_packets_on_the_wire() {
    let screen = ScreenSize::new(1920, 1080);

    let absolute = encode_absolute(0, 0, screen).unwrap().to_packet();
    assert_eq!(
        absolute.as_bytes(),
        &[0x57, 0xAB, 0x00, 0x04, 0x07, 0x02, 0, 0, 0, 0, 0, 0, 0x0F]
    );

    let click = encode_click(MouseButton::Left, true).to_packet();
    assert_eq!(
        click.as_bytes(),
        &[0x57, 0xAB, 0x00, 0x05, 0x05, 0x01, 0x01, 0, 0, 0, 0x0E]
    );

    let scroll = encode_scroll(0, 1).to_packet();
    assert_eq!(scroll.data(), &[0x01, 0, 0, 0, 0x01]);
    assert!(decode_packet(scroll.as_bytes()).is_ok());
}
