//! Piece verification of local files.
//!
//! This module answers whether a single on-disk file matches the bytes
//! the descriptor expects at that file's position inside the virtual
//! stream. The work splits across:
//!
//! - [`locate`] - find the descriptor record for an on-disk file and its
//!   virtual offset
//! - [`FileIndex`] - one-shot scan of a working directory, used to find
//!   neighbour files by suffix or extension plus exact size
//! - a parallel piece scan over the target's piece range
//! - boundary reconstruction of the head and tail pieces, which straddle
//!   adjacent files and cannot be verified from the target alone
//! - [`Verifier`] - the orchestrator tying the stages together
//!
//! # Examples
//!
//! ```no_run
//! use bitcheck::metainfo::Metainfo;
//! use bitcheck::verify::{FileIndex, Verifier};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("example.torrent")?;
//! let verifier = Verifier::new(Metainfo::from_bytes(&data)?);
//!
//! let index = FileIndex::scan(".")?;
//! let outcome = verifier.verify_file("dir/file.bin", &index)?;
//!
//! println!("passed: {} ({:?})", outcome.passed, outcome.report);
//! # Ok(())
//! # }
//! ```

mod boundary;
mod error;
mod index;
mod locate;
mod report;
mod scan;
mod verifier;

pub use error::VerifyError;
pub use index::FileIndex;
pub use locate::{locate, Located};
pub use report::PieceReport;
pub use verifier::{verify_file, FileVerification, Verifier, VerifyConfig};
