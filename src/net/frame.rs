//! Binary framing for the outbound command protocol.
//!
//! Each command word is exactly 4 bytes, little-endian. Batches are the
//! words concatenated in order - no header, no checksum, no length
//! prefix. Framing is implicit in the fixed 4-byte stride; the receiver
//! knows the expected word count out of band.

use heapless::Vec;

/// Size of one encoded command word on the wire.
pub const WORD_BYTES: usize = 4;

/// Maximum number of words accepted in a single batch.
pub const MAX_BATCH_WORDS: usize = 16;

/// Maximum encoded batch size.
pub const MAX_BATCH_BYTES: usize = MAX_BATCH_WORDS * WORD_BYTES;

/// Encode a single command word into its 4-byte little-endian frame.
pub fn encode_word(word: u32) -> [u8; WORD_BYTES] {
    word.to_le_bytes()
}

/// Encode a batch of command words into one contiguous frame.
///
/// Returns `None` if the batch exceeds [`MAX_BATCH_WORDS`]. The buffer
/// is transient; callers drop it after the send attempt.
pub fn encode_batch(words: &[u32]) -> Option<Vec<u8, MAX_BATCH_BYTES>> {
    if words.len() > MAX_BATCH_WORDS {
        return None;
    }

    let mut buf: Vec<u8, MAX_BATCH_BYTES> = Vec::new();
    for word in words {
        // Cannot fail: capacity was checked above.
        buf.extend_from_slice(&word.to_le_bytes()).ok()?;
    }
    Some(buf)
}
