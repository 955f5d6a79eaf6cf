use std::collections::BTreeMap;

use bytes::Bytes;

use super::error::DecodeError;
use super::value::Value;

const MAX_DEPTH: usize = 64;

/// Decodes the leading bencode value from a byte slice.
///
/// Returns the decoded value together with the unconsumed tail of the
/// input. Use [`decode_exact`] when trailing bytes should be rejected.
///
/// Integers are read leniently: leading zeros and `-0` are accepted here
/// even though a canonical encoder never produces them.
///
/// # Errors
///
/// Returns an error if:
/// - The input ends before a value is complete ([`DecodeError::Truncated`])
/// - A value starts with an unrecognized byte ([`DecodeError::Format`])
/// - A string length header is not followed by `:` ([`DecodeError::StringFormat`])
/// - An integer body does not parse as a signed 64-bit number
///   ([`DecodeError::IntegerFormat`])
/// - Nesting exceeds 64 levels ([`DecodeError::NestingTooDeep`])
///
/// # Examples
///
/// ```
/// use bitcheck::bencode::decode;
///
/// let (value, rest) = decode(b"i2008eXY").unwrap();
/// assert_eq!(value.as_integer(), Some(2008));
/// assert_eq!(rest, b"XY");
/// ```
pub fn decode(data: &[u8]) -> Result<(Value, &[u8]), DecodeError> {
    let mut pos = 0;
    let value = decode_value(data, &mut pos, 0)?;
    Ok((value, &data[pos..]))
}

/// Decodes a byte slice that must contain exactly one bencode value.
///
/// # Errors
///
/// Everything [`decode`] rejects, plus [`DecodeError::TrailingBytes`]
/// when data remains after the value.
///
/// # Examples
///
/// ```
/// use bitcheck::bencode::{decode_exact, DecodeError};
///
/// assert!(decode_exact(b"le").is_ok());
/// assert!(matches!(
///     decode_exact(b"leX"),
///     Err(DecodeError::TrailingBytes(1))
/// ));
/// ```
pub fn decode_exact(data: &[u8]) -> Result<Value, DecodeError> {
    let (value, rest) = decode(data)?;
    if !rest.is_empty() {
        return Err(DecodeError::TrailingBytes(rest.len()));
    }
    Ok(value)
}

fn decode_value(data: &[u8], pos: &mut usize, depth: usize) -> Result<Value, DecodeError> {
    if depth > MAX_DEPTH {
        return Err(DecodeError::NestingTooDeep);
    }

    match *data.get(*pos).ok_or(DecodeError::Truncated)? {
        b'i' => decode_integer(data, pos),
        b'l' => decode_list(data, pos, depth),
        b'd' => decode_dict(data, pos, depth),
        b'0'..=b'9' => Ok(Value::Text(decode_string(data, pos)?)),
        c => Err(DecodeError::Format(c)),
    }
}

fn decode_integer(data: &[u8], pos: &mut usize) -> Result<Value, DecodeError> {
    *pos += 1;

    let start = *pos;
    while *pos < data.len() && data[*pos] != b'e' {
        *pos += 1;
    }

    if *pos >= data.len() {
        return Err(DecodeError::Truncated);
    }

    let body = std::str::from_utf8(&data[start..*pos])
        .map_err(|_| DecodeError::IntegerFormat("not ascii".into()))?;

    let value: i64 = body
        .parse()
        .map_err(|_| DecodeError::IntegerFormat(body.into()))?;

    *pos += 1;
    Ok(Value::Integer(value))
}

// <decimal length>:<bytes>, shared by string values and dictionary keys.
fn decode_string(data: &[u8], pos: &mut usize) -> Result<Bytes, DecodeError> {
    let start = *pos;
    while *pos < data.len() && data[*pos].is_ascii_digit() {
        *pos += 1;
    }

    if *pos >= data.len() {
        return Err(DecodeError::Truncated);
    }
    if data[*pos] != b':' {
        return Err(DecodeError::StringFormat);
    }

    let len: usize = std::str::from_utf8(&data[start..*pos])
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(DecodeError::StringFormat)?;

    *pos += 1;

    if *pos + len > data.len() {
        return Err(DecodeError::Truncated);
    }

    let bytes = Bytes::copy_from_slice(&data[*pos..*pos + len]);
    *pos += len;

    Ok(bytes)
}

fn decode_list(data: &[u8], pos: &mut usize, depth: usize) -> Result<Value, DecodeError> {
    *pos += 1;
    let mut list = Vec::new();

    while *pos < data.len() && data[*pos] != b'e' {
        list.push(decode_value(data, pos, depth + 1)?);
    }

    if *pos >= data.len() {
        return Err(DecodeError::Truncated);
    }

    *pos += 1;
    Ok(Value::List(list))
}

fn decode_dict(data: &[u8], pos: &mut usize, depth: usize) -> Result<Value, DecodeError> {
    *pos += 1;
    let mut dict = BTreeMap::new();

    while *pos < data.len() && data[*pos] != b'e' {
        if !data[*pos].is_ascii_digit() {
            return Err(DecodeError::Format(data[*pos]));
        }
        let key = decode_string(data, pos)?;
        let key =
            String::from_utf8(key.to_vec()).map_err(|_| DecodeError::StringFormat)?;

        // The pieces blob is raw digests; never let it decode as text.
        let value = if key == "pieces" {
            match data.get(*pos) {
                None => return Err(DecodeError::Truncated),
                Some(b) if !b.is_ascii_digit() => return Err(DecodeError::StringFormat),
                Some(_) => Value::Binary(decode_string(data, pos)?),
            }
        } else {
            decode_value(data, pos, depth + 1)?
        };

        // Duplicate keys take the last occurrence.
        dict.insert(key, value);
    }

    if *pos >= data.len() {
        return Err(DecodeError::Truncated);
    }

    *pos += 1;
    Ok(Value::Dict(dict))
}
