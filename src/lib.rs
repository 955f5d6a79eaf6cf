//! bitcheck - verify local files against BitTorrent metainfo
//!
//! Given a `.torrent` descriptor and a file on disk, this library
//! answers whether the file's bytes produce the SHA-1 piece digests the
//! descriptor records for the region the file occupies inside the
//! torrent's virtual stream. It is strictly a local verifier: no peers,
//! no trackers, no downloads.
//!
//! # Modules
//!
//! - [`bencode`] - BEP-3 bencode decoding/encoding with binary-safe
//!   handling of the `pieces` digest blob
//! - [`metainfo`] - typed view over a decoded descriptor
//! - [`verify`] - parallel piece verification and boundary-piece
//!   reconstruction across neighbouring files
//!
//! # Quick start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let outcome = bitcheck::verify_file("example.torrent", "dir/file.bin")?;
//! println!("passed: {}", outcome.passed);
//! # Ok(())
//! # }
//! ```

pub mod bencode;
pub mod metainfo;
pub mod verify;

pub use bencode::{decode, decode_exact, encode, DecodeError, Value};
pub use metainfo::{FileRecord, HashAlgo, Metainfo, SchemaError};
pub use verify::{
    locate, verify_file, FileIndex, FileVerification, Located, PieceReport, Verifier, VerifyConfig,
    VerifyError,
};
