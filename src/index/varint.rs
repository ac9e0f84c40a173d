//! Signed variable-length integer codec for stored numeric fields
//!
//! Zig-zag mapping followed by little-endian base-128 groups, so small
//! magnitudes of either sign take few bytes.

/// Longest encoding of an `i64`
pub const MAX_VARINT_LEN: usize = 10;

pub fn encode(value: i64) -> Vec<u8> {
    let mut zigzag = ((value << 1) ^ (value >> 63)) as u64;
    let mut out = Vec::with_capacity(MAX_VARINT_LEN);
    while zigzag >= 0x80 {
        out.push((zigzag as u8) | 0x80);
        zigzag >>= 7;
    }
    out.push(zigzag as u8);
    out
}

/// Decode a value from the front of `buf`.
///
/// Returns the value and the number of bytes consumed. Empty, truncated and
/// overflowing input consume nothing and yield `None`.
pub fn decode(buf: &[u8]) -> Option<(i64, usize)> {
    let mut zigzag: u64 = 0;
    let mut shift = 0u32;
    for (i, &byte) in buf.iter().enumerate() {
        if i == MAX_VARINT_LEN || (i == MAX_VARINT_LEN - 1 && byte > 1) {
            return None;
        }
        if byte < 0x80 {
            zigzag |= (byte as u64) << shift;
            let value = ((zigzag >> 1) as i64) ^ -((zigzag & 1) as i64);
            return Some((value, i + 1));
        }
        zigzag |= ((byte & 0x7f) as u64) << shift;
        shift += 7;
    }
    None
}
