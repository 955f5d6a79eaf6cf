use super::error::DecodeError;
use super::value::Value;
use std::io::Write;

/// Encodes a value to canonical bencode bytes.
///
/// Dictionary keys are emitted in sorted order (the `BTreeMap` iteration
/// order), and integers never carry redundant zeros, so decoding a
/// canonical document and re-encoding it reproduces the input bytes.
pub fn encode(value: &Value) -> Result<Vec<u8>, DecodeError> {
    let mut buf = Vec::new();
    encode_value(value, &mut buf)?;
    Ok(buf)
}

fn encode_value<W: Write>(value: &Value, writer: &mut W) -> Result<(), DecodeError> {
    match value {
        Value::Integer(i) => {
            write!(writer, "i{}e", i)?;
        }
        Value::Text(b) | Value::Binary(b) => {
            write!(writer, "{}:", b.len())?;
            writer.write_all(b)?;
        }
        Value::List(l) => {
            writer.write_all(b"l")?;
            for item in l {
                encode_value(item, writer)?;
            }
            writer.write_all(b"e")?;
        }
        Value::Dict(d) => {
            writer.write_all(b"d")?;
            for (key, val) in d {
                write!(writer, "{}:", key.len())?;
                writer.write_all(key.as_bytes())?;
                encode_value(val, writer)?;
            }
            writer.write_all(b"e")?;
        }
    }
    Ok(())
}
