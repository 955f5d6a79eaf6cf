//! Bencode decoding and encoding (BEP-3)
//!
//! Bencode is the serialization used by BitTorrent metainfo files. The
//! decoder keeps one torrent-specific wrinkle: the value of any dictionary
//! key named `pieces` holds a concatenation of raw SHA-1 digests and is
//! decoded as [`Value::Binary`], so it can never be coerced to text.

mod decode;
mod encode;
mod error;
mod value;

pub use decode::{decode, decode_exact};
pub use encode::encode;
pub use error::DecodeError;
pub use value::Value;
