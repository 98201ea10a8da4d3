//! Variable-length byte encoding for unsigned integers.
//!
//! Each value is split into 7-bit groups, least significant group first.
//! The high bit marks the *terminal* byte of a number: every byte except the
//! last has the high bit clear, and the last one has it set. This is the
//! opposite polarity of LEB128, and encoder and decoder must stay paired.
//!
//! The format is used for the closed, trusted posting list buffers only.
//! Decoding does not report malformed input: it stops at the end of the
//! buffer and returns whatever has been accumulated.

const TERMINAL_BIT: u8 = 0x80;
const PAYLOAD_MASK: u8 = 0x7f;

/// Appends the encoded form of `value` to `buf`.
#[inline]
pub fn encode(mut value: u32, buf: &mut Vec<u8>) {
    while value >= 0x80 {
        buf.push(value as u8 & PAYLOAD_MASK);
        value >>= 7;
    }
    buf.push(value as u8 | TERMINAL_BIT);
}

/// Decodes one value starting at `*offset` and moves `offset` past it.
///
/// Reaching the end of `buf` before a terminal byte ends the value early.
#[inline]
pub fn decode(buf: &[u8], offset: &mut usize) -> u32 {
    let mut value = 0u32;
    let mut shift = 0u32;
    while let Some(&byte) = buf.get(*offset) {
        *offset += 1;
        value |= u32::from(byte & PAYLOAD_MASK).wrapping_shl(shift);
        if byte & TERMINAL_BIT != 0 {
            break;
        }
        shift += 7;
    }
    value
}

/// Decodes one value like [`decode`], but returns `None` if the buffer ends
/// before the value's terminal byte. Used when validating persisted buffers.
#[inline]
pub fn decode_exact(buf: &[u8], offset: &mut usize) -> Option<u32> {
    let mut value = 0u32;
    let mut shift = 0u32;
    while let Some(&byte) = buf.get(*offset) {
        *offset += 1;
        value |= u32::from(byte & PAYLOAD_MASK).checked_shl(shift)?;
        if byte & TERMINAL_BIT != 0 {
            return Some(value);
        }
        shift += 7;
    }
    None
}

/// Number of bytes `encode` emits for `value`.
#[inline]
pub fn encoded_len(value: u32) -> usize {
    let bits = 32 - value.leading_zeros() as usize;
    bits.div_ceil(7).max(1)
}
