use crate::bencode::DecodeError;
use thiserror::Error;

/// Errors raised while projecting a decoded tree into a [`Metainfo`].
///
/// [`Metainfo`]: super::Metainfo
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("bencode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid field: {0}")]
    InvalidField(&'static str),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
