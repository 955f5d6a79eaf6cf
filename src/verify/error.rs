use crate::metainfo::SchemaError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerifyError {
    /// The target file matches no record in the descriptor.
    #[error("file not included in descriptor: {0}")]
    FileNotIncluded(String),

    /// The target is shorter than one piece; its only piece cannot be
    /// reconstructed from the target alone.
    #[error("file is shorter than the piece length")]
    ShorterThanPiece,

    /// More than one head or tail piece was flagged, which the piece
    /// arithmetic rules out for an intact descriptor.
    #[error("more than one {0} boundary piece flagged")]
    TooManyBoundaries(&'static str),

    #[error("metainfo error: {0}")]
    Schema(#[from] SchemaError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
