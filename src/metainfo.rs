//! Torrent metainfo handling (BEP-3)
//!
//! This module projects a decoded bencode tree into the semantic queries
//! the verifier needs: piece geometry, the piece digest table, and the
//! ordered file list that defines the virtual stream.

mod error;
mod torrent;

pub use error::SchemaError;
pub use torrent::{FileRecord, HashAlgo, Metainfo, DIGEST_LEN};

#[cfg(test)]
mod tests;
