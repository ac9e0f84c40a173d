//! Byte-level builders for small audio files used by tests

/// Bytes per MPEG-1 Layer III frame at 128 kbit/s, 44.1 kHz, no padding
const MPEG_FRAME_LEN: usize = 417;

/// `count` silent MPEG-1 Layer III frames
pub fn mpeg_frames(count: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(count * MPEG_FRAME_LEN);
    for _ in 0..count {
        let mut frame = vec![0u8; MPEG_FRAME_LEN];
        frame[..4].copy_from_slice(&[0xFF, 0xFB, 0x90, 0x00]);
        out.extend_from_slice(&frame);
    }
    out
}

fn syncsafe(len: usize) -> [u8; 4] {
    [
        ((len >> 21) & 0x7f) as u8,
        ((len >> 14) & 0x7f) as u8,
        ((len >> 7) & 0x7f) as u8,
        (len & 0x7f) as u8,
    ]
}

/// ID3v2.4 tag holding UTF-8 text frames such as `("TIT2", "Title")`
pub fn id3v2(frames: &[(&str, &str)]) -> Vec<u8> {
    let mut body = Vec::new();
    for (id, text) in frames {
        body.extend_from_slice(id.as_bytes());
        body.extend_from_slice(&syncsafe(text.len() + 1));
        body.extend_from_slice(&[0, 0, 3]);
        body.extend_from_slice(text.as_bytes());
    }
    let mut out = b"ID3\x04\x00\x00".to_vec();
    out.extend_from_slice(&syncsafe(body.len()));
    out.extend_from_slice(&body);
    out
}

/// ID3v2 header announcing major version 5, which no reader accepts
pub fn unsupported_id3v2() -> Vec<u8> {
    let mut out = b"ID3\x05\x00\x00".to_vec();
    out.extend_from_slice(&syncsafe(16));
    out.extend_from_slice(&[0u8; 16]);
    out
}

/// 128-byte ID3v1 trailer; empty strings leave the field zeroed
pub fn id3v1(title: &str, artist: &str, album: &str) -> Vec<u8> {
    let mut out = vec![0u8; 128];
    out[..3].copy_from_slice(b"TAG");
    for (offset, value) in [(3, title), (33, artist), (63, album)] {
        let bytes = &value.as_bytes()[..value.len().min(30)];
        out[offset..offset + bytes.len()].copy_from_slice(bytes);
    }
    out[127] = 255;
    out
}

/// FLAC stream with a STREAMINFO block and a Vorbis comment block, no audio
pub fn flac(comments: &[(&str, &str)]) -> Vec<u8> {
    let mut out = b"fLaC".to_vec();

    out.extend_from_slice(&[0x00, 0x00, 0x00, 34]);
    out.extend_from_slice(&[0x10, 0x00, 0x10, 0x00]);
    out.extend_from_slice(&[0u8; 6]);
    let packed: u64 = (44_100u64 << 44) | (1u64 << 41) | (15u64 << 36);
    out.extend_from_slice(&packed.to_be_bytes());
    out.extend_from_slice(&[0u8; 16]);

    let vendor = b"filetundra";
    let mut block = Vec::new();
    block.extend_from_slice(&(vendor.len() as u32).to_le_bytes());
    block.extend_from_slice(vendor);
    block.extend_from_slice(&(comments.len() as u32).to_le_bytes());
    for (key, value) in comments {
        let entry = format!("{}={}", key, value);
        block.extend_from_slice(&(entry.len() as u32).to_le_bytes());
        block.extend_from_slice(entry.as_bytes());
    }
    let len = block.len() as u32;
    out.extend_from_slice(&[0x84, (len >> 16) as u8, (len >> 8) as u8, len as u8]);
    out.extend_from_slice(&block);
    out
}
