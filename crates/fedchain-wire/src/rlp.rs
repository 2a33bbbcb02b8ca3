//! Minimal canonical RLP codec.
//!
//! Only the subset needed by cross-chain payloads is implemented: byte
//! strings, lists and unsigned integers. Integers are minimal big-endian
//! with zero encoding as the empty string.
//!
//! Decoding enforces canonical form:
//! - a single byte below `0x80` must encode as itself
//! - long-form lengths are only legal for payloads of 56 bytes or more
//! - length bytes and integer payloads may not carry leading zeros

use crate::error::WireError;

/// Offset of the short-string header (`0x80 + len`).
const STR_SHORT: u8 = 0x80;
/// Offset of the long-string header (`0xb7 + len_of_len`).
const STR_LONG: u8 = 0xb7;
/// Offset of the short-list header (`0xc0 + len`).
const LIST_SHORT: u8 = 0xc0;
/// Offset of the long-list header (`0xf7 + len_of_len`).
const LIST_LONG: u8 = 0xf7;

/// Payload length below which the short header form is used.
const SHORT_FORM_MAX: usize = 55;

// ============================================================================
// Encoding
// ============================================================================

/// Append the RLP encoding of a byte string.
pub fn put_bytes(out: &mut Vec<u8>, bytes: &[u8]) {
    if bytes.len() == 1 && bytes[0] < STR_SHORT {
        out.push(bytes[0]);
        return;
    }
    put_length(out, bytes.len(), STR_SHORT, STR_LONG);
    out.extend_from_slice(bytes);
}

/// Append the RLP encoding of an unsigned integer (minimal big-endian,
/// zero encodes as the empty string).
pub fn put_uint(out: &mut Vec<u8>, v: u64) {
    let be = v.to_be_bytes();
    let first = be.iter().position(|&b| b != 0).unwrap_or(be.len());
    put_bytes(out, &be[first..]);
}

/// Append a list header for a payload of `payload_len` bytes. The payload
/// itself must follow.
pub fn put_list_header(out: &mut Vec<u8>, payload_len: usize) {
    put_length(out, payload_len, LIST_SHORT, LIST_LONG);
}

/// Wrap an already-encoded payload into a single RLP list.
pub fn wrap_list(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(payload.len() + 9);
    put_list_header(&mut out, payload.len());
    out.extend_from_slice(payload);
    out
}

fn put_length(out: &mut Vec<u8>, len: usize, short_offset: u8, long_offset: u8) {
    if len <= SHORT_FORM_MAX {
        out.push(short_offset + len as u8);
        return;
    }
    let be = (len as u64).to_be_bytes();
    let first = be.iter().position(|&b| b != 0).unwrap_or(be.len());
    let len_bytes = &be[first..];
    out.push(long_offset + len_bytes.len() as u8);
    out.extend_from_slice(len_bytes);
}

// ============================================================================
// Decoding
// ============================================================================

/// A decoded RLP item: either a byte string or the raw payload of a list.
#[derive(Debug, PartialEq, Eq)]
pub enum Item<'a> {
    Str(&'a [u8]),
    List(&'a [u8]),
}

/// Consume one item from the front of `input`.
pub fn take_item<'a>(input: &mut &'a [u8]) -> Result<Item<'a>, WireError> {
    let buf = *input;
    let b0 = *buf.first().ok_or(WireError::UnexpectedEof)?;

    let (header_len, payload_len, is_list) = if b0 < STR_SHORT {
        (0usize, 1usize, false)
    } else if b0 <= STR_LONG {
        (1, (b0 - STR_SHORT) as usize, false)
    } else if b0 < LIST_SHORT {
        let len_of_len = (b0 - STR_LONG) as usize;
        let len = read_length(buf, len_of_len)?;
        (1 + len_of_len, len, false)
    } else if b0 <= LIST_LONG {
        (1, (b0 - LIST_SHORT) as usize, true)
    } else {
        let len_of_len = (b0 - LIST_LONG) as usize;
        let len = read_length(buf, len_of_len)?;
        (1 + len_of_len, len, true)
    };

    let end = header_len
        .checked_add(payload_len)
        .ok_or(WireError::LengthOverflow)?;
    if buf.len() < end {
        return Err(WireError::UnexpectedEof);
    }
    let payload = &buf[header_len..end];

    if !is_list && header_len == 1 && payload_len == 1 && payload[0] < STR_SHORT {
        return Err(WireError::NonCanonical(
            "single byte below 0x80 must encode as itself",
        ));
    }

    *input = &buf[end..];
    Ok(if is_list {
        Item::List(payload)
    } else {
        Item::Str(payload)
    })
}

fn read_length(buf: &[u8], len_of_len: usize) -> Result<usize, WireError> {
    let bytes = buf
        .get(1..1 + len_of_len)
        .ok_or(WireError::UnexpectedEof)?;
    if bytes.first() == Some(&0) {
        return Err(WireError::NonCanonical("length bytes carry a leading zero"));
    }
    if bytes.len() > std::mem::size_of::<usize>() {
        return Err(WireError::LengthOverflow);
    }
    let mut len = 0usize;
    for &b in bytes {
        len = (len << 8) | b as usize;
    }
    if len <= SHORT_FORM_MAX {
        return Err(WireError::NonCanonical(
            "long-form length used for a short payload",
        ));
    }
    Ok(len)
}

/// Consume a byte string item.
pub fn get_bytes<'a>(input: &mut &'a [u8]) -> Result<&'a [u8], WireError> {
    match take_item(input)? {
        Item::Str(payload) => Ok(payload),
        Item::List(_) => Err(WireError::InvalidValue("expected bytes, found list")),
    }
}

/// Consume an unsigned integer item.
pub fn get_uint(input: &mut &[u8]) -> Result<u64, WireError> {
    let payload = get_bytes(input)?;
    if payload.len() > 8 {
        return Err(WireError::InvalidValue("integer wider than 64 bits"));
    }
    if payload.first() == Some(&0) {
        return Err(WireError::NonCanonical("integer carries a leading zero"));
    }
    let mut v = 0u64;
    for &b in payload {
        v = (v << 8) | b as u64;
    }
    Ok(v)
}

/// Consume a list item, returning its raw payload for field-wise decoding.
pub fn enter_list<'a>(input: &mut &'a [u8]) -> Result<&'a [u8], WireError> {
    match take_item(input)? {
        Item::List(payload) => Ok(payload),
        Item::Str(_) => Err(WireError::InvalidValue("expected list, found bytes")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_bytes(bytes: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        put_bytes(&mut out, bytes);
        out
    }

    fn encode_uint(v: u64) -> Vec<u8> {
        let mut out = Vec::new();
        put_uint(&mut out, v);
        out
    }

    #[test]
    fn test_known_string_vectors() {
        assert_eq!(encode_bytes(b""), vec![0x80]);
        assert_eq!(encode_bytes(b"\x00"), vec![0x00]);
        assert_eq!(encode_bytes(b"\x7f"), vec![0x7f]);
        assert_eq!(encode_bytes(b"\x80"), vec![0x81, 0x80]);
        assert_eq!(encode_bytes(b"dog"), vec![0x83, b'd', b'o', b'g']);
        // 56-byte string takes the long form
        let long = vec![0xaa; 56];
        let mut expected = vec![0xb8, 56];
        expected.extend_from_slice(&long);
        assert_eq!(encode_bytes(&long), expected);
    }

    #[test]
    fn test_known_uint_vectors() {
        assert_eq!(encode_uint(0), vec![0x80]);
        assert_eq!(encode_uint(15), vec![0x0f]);
        assert_eq!(encode_uint(0x80), vec![0x81, 0x80]);
        assert_eq!(encode_uint(1024), vec![0x82, 0x04, 0x00]);
        assert_eq!(
            encode_uint(u64::MAX),
            vec![0x88, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
        );
    }

    #[test]
    fn test_uint_roundtrip() {
        for v in [0u64, 1, 127, 128, 255, 256, 1024, 0xdead_beef, u64::MAX] {
            let enc = encode_uint(v);
            let mut input = enc.as_slice();
            assert_eq!(get_uint(&mut input), Ok(v));
            assert!(input.is_empty());
        }
    }

    #[test]
    fn test_list_roundtrip() {
        let mut payload = Vec::new();
        put_uint(&mut payload, 56);
        put_bytes(&mut payload, b"cat");
        let enc = wrap_list(&payload);

        let mut input = enc.as_slice();
        let mut items = enter_list(&mut input).unwrap();
        assert!(input.is_empty());
        assert_eq!(get_uint(&mut items), Ok(56));
        assert_eq!(get_bytes(&mut items), Ok(&b"cat"[..]));
        assert!(items.is_empty());
    }

    #[test]
    fn test_reject_non_canonical_single_byte() {
        // 0x05 wrapped in a string header instead of encoding as itself
        let mut input: &[u8] = &[0x81, 0x05];
        assert_eq!(
            take_item(&mut input),
            Err(WireError::NonCanonical(
                "single byte below 0x80 must encode as itself"
            ))
        );
    }

    #[test]
    fn test_reject_leading_zero_integer() {
        let mut input: &[u8] = &[0x82, 0x00, 0x01];
        assert!(matches!(
            get_uint(&mut input),
            Err(WireError::NonCanonical(_))
        ));
    }

    #[test]
    fn test_reject_long_form_for_short_payload() {
        // 3-byte payload with a long-form header
        let mut input: &[u8] = &[0xb8, 0x03, b'd', b'o', b'g'];
        assert!(matches!(
            take_item(&mut input),
            Err(WireError::NonCanonical(_))
        ));
    }

    #[test]
    fn test_reject_truncated_payload() {
        let mut input: &[u8] = &[0x83, b'd', b'o'];
        assert_eq!(take_item(&mut input), Err(WireError::UnexpectedEof));
    }

    #[test]
    fn test_reject_oversized_integer() {
        let mut input: &[u8] = &[0x89, 1, 2, 3, 4, 5, 6, 7, 8, 9];
        assert_eq!(
            get_uint(&mut input),
            Err(WireError::InvalidValue("integer wider than 64 bits"))
        );
    }
}
