//! Wire opcodes and field-level encoding helpers
//!
//! All multi-byte fields are little-endian. Strings are UTF-8 with a `u32`
//! byte-length prefix; nothing else is length-prefixed.

/// Frame header: `f32` width, height, dpr, then background RGBA
pub const OP_BEGIN_FRAME: u8 = 0x01;
/// Solid-filled rectangle
pub const OP_RECT: u8 = 0x02;
/// Path with optional solid fill and stroke
pub const OP_PATH: u8 = 0x03;
/// Text run
pub const OP_TEXT: u8 = 0x04;
/// Frame terminator, no payload
pub const OP_END_FRAME: u8 = 0xFF;

pub(crate) fn push_f32(buf: &mut Vec<u8>, value: f32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

pub(crate) fn push_u32(buf: &mut Vec<u8>, value: u32) {
    buf.extend_from_slice(&value.to_le_bytes());
}

pub(crate) fn push_matrix(buf: &mut Vec<u8>, elements: &[f32; 6]) {
    for &e in elements {
        push_f32(buf, e);
    }
}

pub(crate) fn push_color(buf: &mut Vec<u8>, rgba: [f32; 4]) {
    for c in rgba {
        push_f32(buf, c);
    }
}

pub(crate) fn push_str(buf: &mut Vec<u8>, s: &str) {
    push_u32(buf, s.len() as u32);
    buf.extend_from_slice(s.as_bytes());
}
