//! Incremental UTF-8 decoding helpers for byte sources.
//!
//! Multi-byte characters split across chunks are carried over to the next
//! call. Invalid sequences are replaced with U+FFFD and reported through the
//! `on_invalid` callback with the byte offset of the replacement character in
//! the decoded text, so callers can turn it into a line/column diagnostic.

/// Append a byte chunk to `text`, using `carry` to handle UTF-8 sequences split
/// across chunk boundaries.
///
/// - `carry` stores an incomplete UTF-8 suffix from the previous call.
/// - Invalid UTF-8 sequences are replaced with U+FFFD and decoding continues.
pub fn push_utf8_chunk(
    text: &mut String,
    carry: &mut Vec<u8>,
    bytes: &[u8],
    on_invalid: &mut dyn FnMut(usize),
) {
    if bytes.is_empty() {
        return;
    }

    if carry.is_empty() {
        decode_bytes(text, carry, bytes, on_invalid);
        return;
    }

    // `carry` only ever holds an incomplete suffix (at most 3 bytes), so it is
    // resolved by borrowing just enough prefix bytes from this chunk.
    let mut remaining = bytes;

    while !carry.is_empty() && !remaining.is_empty() {
        let expected_len = utf8_seq_len(carry[0]);
        if expected_len == 0 {
            on_invalid(text.len());
            text.push('\u{FFFD}');
            carry.clear();
            break;
        }

        let needed = expected_len.saturating_sub(carry.len());
        if needed == 0 {
            let tmp = std::mem::take(carry);
            decode_bytes(text, carry, &tmp, on_invalid);
            continue;
        }

        if remaining.len() < needed {
            carry.extend_from_slice(remaining);
            return;
        }

        let mut scratch = [0u8; 8];
        let carry_len = carry.len();
        scratch[..carry_len].copy_from_slice(carry);
        scratch[carry_len..carry_len + needed].copy_from_slice(&remaining[..needed]);
        carry.clear();

        decode_bytes(text, carry, &scratch[..carry_len + needed], on_invalid);

        remaining = &remaining[needed..];
    }

    if !remaining.is_empty() {
        decode_bytes(text, carry, remaining, on_invalid);
    }
}

/// Flush any remaining carried bytes into `text`, so a truncated final
/// sequence still yields a replacement character.
pub fn finish_utf8(text: &mut String, carry: &mut Vec<u8>, on_invalid: &mut dyn FnMut(usize)) {
    if carry.is_empty() {
        return;
    }
    on_invalid(text.len());
    text.push('\u{FFFD}');
    carry.clear();
}

/// Decode a complete byte slice in one call.
pub fn decode_utf8(bytes: &[u8], on_invalid: &mut dyn FnMut(usize)) -> String {
    let mut text = String::with_capacity(bytes.len());
    let mut carry = Vec::new();
    push_utf8_chunk(&mut text, &mut carry, bytes, on_invalid);
    finish_utf8(&mut text, &mut carry, on_invalid);
    text
}

fn utf8_seq_len(first: u8) -> usize {
    match first {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => 0,
    }
}

fn decode_bytes(
    text: &mut String,
    carry: &mut Vec<u8>,
    mut bytes: &[u8],
    on_invalid: &mut dyn FnMut(usize),
) {
    while !bytes.is_empty() {
        match std::str::from_utf8(bytes) {
            Ok(s) => {
                text.push_str(s);
                break;
            }
            Err(e) => {
                let valid_up_to = e.valid_up_to();
                if let Ok(valid) = std::str::from_utf8(&bytes[..valid_up_to]) {
                    text.push_str(valid);
                }

                match e.error_len() {
                    Some(len) => {
                        on_invalid(text.len());
                        text.push('\u{FFFD}');
                        bytes = &bytes[valid_up_to + len..];
                    }
                    None => {
                        carry.extend_from_slice(&bytes[valid_up_to..]);
                        break;
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ignore(_: usize) {}

    #[test]
    fn split_multibyte_across_chunks() {
        let mut text = String::new();
        let mut carry = Vec::new();

        push_utf8_chunk(&mut text, &mut carry, &[0xC3], &mut ignore);
        assert_eq!(text, "");
        assert_eq!(carry, vec![0xC3]);

        push_utf8_chunk(&mut text, &mut carry, &[0xA9], &mut ignore);
        assert_eq!(text, "\u{e9}");
        assert!(carry.is_empty());
    }

    #[test]
    fn resolves_carry_and_decodes_remaining_bytes() {
        let mut text = String::new();
        let mut carry = Vec::new();

        // First two bytes of U+1F600 (F0 9F 98 80).
        push_utf8_chunk(&mut text, &mut carry, &[0xF0, 0x9F], &mut ignore);
        assert_eq!(text, "");

        push_utf8_chunk(&mut text, &mut carry, &[0x98, 0x80, b'!'], &mut ignore);
        assert_eq!(text, "\u{1F600}!");
        assert!(carry.is_empty());
    }

    #[test]
    fn invalid_bytes_are_reported_at_replacement_offset() {
        let mut offsets = Vec::new();
        let text = decode_utf8(b"ab\xFFcd", &mut |offset| offsets.push(offset));
        assert_eq!(text, "ab\u{FFFD}cd");
        assert_eq!(offsets, vec![2]);
    }

    #[test]
    fn truncated_suffix_is_flushed_and_reported() {
        let mut offsets = Vec::new();
        // First 2 bytes of U+20AC (E2 82 AC).
        let text = decode_utf8(&[b'x', 0xE2, 0x82], &mut |offset| offsets.push(offset));
        assert_eq!(text, "x\u{FFFD}");
        assert_eq!(offsets, vec![1]);
    }
}
