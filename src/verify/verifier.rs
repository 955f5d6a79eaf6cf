use std::path::Path;

use md5::Md5;
use sha1::{Digest, Sha1};
use sha2::Sha256;

use super::boundary::repair_boundaries;
use super::error::VerifyError;
use super::index::FileIndex;
use super::locate::locate;
use super::report::PieceReport;
use super::scan::{scan, ScanInput};
use crate::metainfo::{HashAlgo, Metainfo};

/// Knobs for a verification run.
///
/// This replaces any process-wide toggles: every run states its own
/// behaviour.
#[derive(Debug, Clone)]
pub struct VerifyConfig {
    /// Worker threads for the piece scan. `0` selects the hardware
    /// thread count; `1` forces a single-threaded scan.
    pub workers: usize,
    /// Try the record's whole-file digest before scanning pieces. A
    /// match returns success immediately; a mismatch never fails the
    /// run on its own, the piece scan still decides.
    pub filehash_shortcut: bool,
}

impl Default for VerifyConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            filehash_shortcut: true,
        }
    }
}

/// Outcome of verifying one file.
#[derive(Debug, Clone)]
pub struct FileVerification {
    /// True when the file's bytes produce the descriptor's digests.
    pub passed: bool,
    /// Per-piece counters. All zero when the whole-file digest shortcut
    /// settled the run before any piece was scanned.
    pub report: PieceReport,
}

/// Verifies local files against one parsed descriptor.
///
/// # Examples
///
/// ```no_run
/// use bitcheck::metainfo::Metainfo;
/// use bitcheck::verify::{FileIndex, Verifier, VerifyConfig};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let data = std::fs::read("example.torrent")?;
/// let verifier = Verifier::with_config(
///     Metainfo::from_bytes(&data)?,
///     VerifyConfig { workers: 1, ..VerifyConfig::default() },
/// );
///
/// let index = FileIndex::scan(".")?;
/// let outcome = verifier.verify_file("file.bin", &index)?;
/// assert!(outcome.passed);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Verifier {
    metainfo: Metainfo,
    config: VerifyConfig,
}

impl Verifier {
    /// Creates a verifier with the default configuration.
    pub fn new(metainfo: Metainfo) -> Self {
        Self::with_config(metainfo, VerifyConfig::default())
    }

    /// Creates a verifier with an explicit configuration.
    pub fn with_config(metainfo: Metainfo, config: VerifyConfig) -> Self {
        Self { metainfo, config }
    }

    /// The descriptor this verifier checks against.
    pub fn metainfo(&self) -> &Metainfo {
        &self.metainfo
    }

    /// Verifies one on-disk file against the descriptor.
    ///
    /// Sequence: stat and locate the file inside the virtual stream,
    /// try the whole-file digest shortcut when the record carries one,
    /// scan the file's piece range in parallel, then reconstruct any
    /// boundary piece from neighbours found through `fs_index`.
    ///
    /// # Errors
    ///
    /// - [`VerifyError::FileNotIncluded`] when no record matches.
    /// - [`VerifyError::ShorterThanPiece`] when the file does not span a
    ///   full piece.
    /// - [`VerifyError::TooManyBoundaries`] when the scan flags more
    ///   boundary pieces than the geometry allows.
    /// - [`VerifyError::Io`] when the target cannot be statted or
    ///   opened.
    pub fn verify_file(
        &self,
        target: impl AsRef<Path>,
        fs_index: &FileIndex,
    ) -> Result<FileVerification, VerifyError> {
        let target = target.as_ref();
        let size = std::fs::metadata(target)?.len() as i64;

        let located = locate(&self.metainfo, target, size)
            .ok_or_else(|| VerifyError::FileNotIncluded(target.display().to_string()))?;
        let record = self
            .metainfo
            .files()
            .get(located.index)
            .ok_or_else(|| VerifyError::FileNotIncluded(target.display().to_string()))?;

        if self.config.filehash_shortcut {
            if let Some(expected) = record.filehash() {
                if filehash_matches(target, expected)? {
                    tracing::debug!("{} verified by whole-file digest", target.display());
                    return Ok(FileVerification {
                        passed: true,
                        report: PieceReport::default(),
                    });
                }
                tracing::debug!("whole-file digest mismatch, scanning pieces");
            }
        }

        if record.length() < self.metainfo.piece_length() {
            return Err(VerifyError::ShorterThanPiece);
        }

        let workers = match self.config.workers {
            0 => num_cpus::get().max(1),
            n => n,
        };

        let mut report = scan(&ScanInput {
            target,
            piece_length: self.metainfo.piece_length(),
            pieces: self.metainfo.pieces(),
            virtual_offset: located.offset,
            file_length: record.length(),
            workers,
        })?;

        repair_boundaries(
            &self.metainfo,
            fs_index,
            target,
            record,
            located.index,
            &mut report,
        )?;

        tracing::debug!(
            "{}: passed:{} head-missing:{} tail-missing:{} failed:{} ({} in all)",
            target.display(),
            report.passed,
            report.head_missing,
            report.tail_missing,
            report.failed,
            report.total,
        );

        Ok(FileVerification {
            passed: report.all_passed(),
            report,
        })
    }
}

/// Verifies `target_path` against the descriptor at `metainfo_path`.
///
/// Convenience wrapper: parses the descriptor, indexes the current
/// directory for neighbour lookups, and runs with the default
/// configuration.
pub fn verify_file(
    metainfo_path: impl AsRef<Path>,
    target_path: impl AsRef<Path>,
) -> Result<FileVerification, VerifyError> {
    let data = std::fs::read(metainfo_path)?;
    let metainfo = Metainfo::from_bytes(&data)?;
    let fs_index = FileIndex::scan(".")?;
    Verifier::new(metainfo).verify_file(target_path, &fs_index)
}

/// Tests the target's whole contents against a descriptor digest whose
/// width names the algorithm. Unknown widths never match.
fn filehash_matches(target: &Path, expected: &[u8]) -> Result<bool, VerifyError> {
    let Some(algo) = HashAlgo::from_digest_len(expected.len()) else {
        tracing::debug!("filehash of unknown width {}", expected.len());
        return Ok(false);
    };

    let data = std::fs::read(target)?;
    let matches = match algo {
        HashAlgo::Md5 => Md5::digest(&data).as_slice() == expected,
        HashAlgo::Sha1 => Sha1::digest(&data).as_slice() == expected,
        HashAlgo::Sha256 => Sha256::digest(&data).as_slice() == expected,
    };
    Ok(matches)
}
