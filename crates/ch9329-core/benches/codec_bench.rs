//! Criterion benchmarks for packet framing and the held-key merge.
//!
//! One packet is built per input event, so these paths run on every key
//! press and every mouse move.
//!
//! Run with:
//! ```bash
//! cargo bench --package ch9329-core --bench codec_bench
//! ```

use ch9329_core::domain::held_keys::{HeldKeyState, LogicalKeyId};
use ch9329_core::keymap::modifier::ModifierKey;
use ch9329_core::protocol::codec::{encode_text, TypingOptions};
use ch9329_core::protocol::mouse::{encode_absolute, ScreenSize};
use ch9329_core::protocol::packet::{decode_packet, frame, frame_keyboard_report, frame_release};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

// ── Benchmarks: framing ───────────────────────────────────────────────────────

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("framing");

    for len in [0usize, 8, 64, 255] {
        let data = vec![0xA5u8; len];
        group.bench_with_input(BenchmarkId::new("frame", len), &data, |b, data| {
            b.iter(|| frame(black_box(0x02), black_box(data)))
        });
    }

    group.bench_function("frame_release", |b| b.iter(frame_release));

    let packet = frame_release().into_bytes();
    group.bench_function("decode_packet_keyboard", |b| {
        b.iter(|| decode_packet(black_box(&packet)))
    });

    let screen = ScreenSize::new(1920, 1080);
    group.bench_function("absolute_move_packet", |b| {
        b.iter(|| encode_absolute(black_box(960), black_box(540), screen).map(|p| p.to_packet()))
    });

    group.finish();
}

// ── Benchmarks: held-key merge ────────────────────────────────────────────────

fn bench_held_keys(c: &mut Criterion) {
    let mut group = c.benchmark_group("held_keys");

    // Ctrl+Shift+six letters down, then everything up: a full rollover cycle.
    group.bench_function("press_release_cycle_8", |b| {
        b.iter(|| {
            let mut state = HeldKeyState::new();
            let mut ids = vec![
                LogicalKeyId::Modifier(ModifierKey::LeftCtrl),
                LogicalKeyId::Modifier(ModifierKey::LeftShift),
            ];
            ids.extend("abcdef".chars().map(LogicalKeyId::Char));
            for id in &ids {
                if let Some(contribution) = id.default_contribution() {
                    let _ = state.on_key_down(*id, contribution).map(|r| frame_keyboard_report(&r));
                }
            }
            for id in &ids {
                let _ = state.on_key_up(black_box(id));
            }
        })
    });

    group.bench_function("encode_text_paragraph", |b| {
        let text = "Lorem ipsum dolor sit amet, consectetur adipiscing elit.\n".repeat(4);
        b.iter(|| encode_text(black_box(&text), TypingOptions::default()))
    });

    group.finish();
}

criterion_group!(benches, bench_frame, bench_held_keys);
criterion_main!(benches);
