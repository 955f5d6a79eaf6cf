use std::fs::File;
use std::path::Path;

use sha1::{Digest, Sha1};

use super::error::VerifyError;
use super::index::FileIndex;
use super::report::PieceReport;
use super::scan::{read_full_at, Layout};
use crate::metainfo::{FileRecord, Metainfo};

/// Rebuilds the head and tail pieces flagged missing by the scan.
///
/// A boundary piece straddles the target and its neighbours in the
/// virtual stream, so the scan alone can never verify it. This pass
/// stitches the missing margins from neighbour files located through the
/// [`FileIndex`] and reclassifies a piece as passed when the assembled
/// digest matches.
///
/// A neighbour that cannot be found (or read) abandons that side's
/// repair; the piece stays missing and the overall verdict stays
/// negative without an error. More than one head or tail flag means the
/// piece arithmetic went wrong and is fatal.
pub(super) fn repair_boundaries(
    metainfo: &Metainfo,
    fs_index: &FileIndex,
    target: &Path,
    record: &FileRecord,
    file_index: usize,
    report: &mut PieceReport,
) -> Result<(), VerifyError> {
    if report.head_missing == 0 && report.tail_missing == 0 {
        return Ok(());
    }
    if report.head_missing > 1 {
        return Err(VerifyError::TooManyBoundaries("head"));
    }
    if report.tail_missing > 1 {
        return Err(VerifyError::TooManyBoundaries("tail"));
    }

    let piece_length = metainfo.piece_length();
    let layout = Layout::new(record.offset(), record.length(), piece_length);

    let p = piece_length as u64;
    let end = (record.offset() + record.length()) as u64;
    let prev_margin = layout.start_offset as u64;
    let post_margin = (p - end % p) % p;

    if report.head_missing == 1 {
        if let Some(piece) = assemble_head(metainfo, fs_index, target, file_index, prev_margin)? {
            if digest_matches(&piece, metainfo, layout.start_block) {
                report.head_missing -= 1;
                report.passed += 1;
                tracing::debug!("head piece {} reconstructed", layout.start_block);
            } else {
                tracing::debug!("head piece {} still mismatching", layout.start_block);
            }
        }
    }

    if report.tail_missing == 1 {
        if let Some(piece) =
            assemble_tail(metainfo, fs_index, target, record, file_index, post_margin)?
        {
            if digest_matches(&piece, metainfo, layout.end_block - 1) {
                report.tail_missing -= 1;
                report.passed += 1;
                tracing::debug!("tail piece {} reconstructed", layout.end_block - 1);
            } else {
                tracing::debug!("tail piece {} still mismatching", layout.end_block - 1);
            }
        }
    }

    Ok(())
}

/// Gathers the head piece: suffixes of earlier files covering
/// `prev_margin` bytes, then the target's leading bytes.
///
/// Earlier records are visited in reverse, each exactly once. Returns
/// `None` when a neighbour is unavailable.
fn assemble_head(
    metainfo: &Metainfo,
    fs_index: &FileIndex,
    target: &Path,
    file_index: usize,
    prev_margin: u64,
) -> Result<Option<Vec<u8>>, VerifyError> {
    let piece_length = metainfo.piece_length() as u64;

    let mut chunks = Vec::new();
    let mut remaining = prev_margin;
    for record in metainfo.files()[..file_index].iter().rev() {
        if remaining == 0 {
            break;
        }
        let length = record.length() as u64;
        // Read the whole neighbour when the margin swallows it, else
        // only its trailing bytes.
        let take = remaining.min(length);
        let Some(chunk) = read_neighbour(fs_index, record, length - take, take)? else {
            return Ok(None);
        };
        chunks.push(chunk);
        remaining -= take;
    }
    if remaining > 0 {
        tracing::debug!("head margin not covered by earlier files");
        return Ok(None);
    }

    let mut piece = Vec::with_capacity(piece_length as usize);
    for chunk in chunks.iter().rev() {
        piece.extend_from_slice(chunk);
    }

    let own = piece_length - prev_margin;
    let file = File::open(target)?;
    let mut head = vec![0u8; own as usize];
    let read = read_full_at(&file, &mut head, 0)?;
    if read as u64 != own {
        return Err(VerifyError::Io(std::io::Error::other(
            "target shorter than its declared length",
        )));
    }
    piece.extend_from_slice(&head);

    Ok(Some(piece))
}

/// Gathers the tail piece: the target's trailing bytes, then prefixes of
/// later files covering `post_margin` bytes.
fn assemble_tail(
    metainfo: &Metainfo,
    fs_index: &FileIndex,
    target: &Path,
    record: &FileRecord,
    file_index: usize,
    post_margin: u64,
) -> Result<Option<Vec<u8>>, VerifyError> {
    let piece_length = metainfo.piece_length() as u64;
    let length = record.length() as u64;

    let own = piece_length - post_margin;
    let file = File::open(target)?;
    let mut piece = vec![0u8; own as usize];
    let read = read_full_at(&file, &mut piece, length - own)?;
    if read as u64 != own {
        return Err(VerifyError::Io(std::io::Error::other(
            "target shorter than its declared length",
        )));
    }
    piece.reserve(post_margin as usize);

    let mut remaining = post_margin;
    for record in metainfo.files()[file_index + 1..].iter() {
        if remaining == 0 {
            break;
        }
        let take = remaining.min(record.length() as u64);
        let Some(chunk) = read_neighbour(fs_index, record, 0, take)? else {
            return Ok(None);
        };
        piece.extend_from_slice(&chunk);
        remaining -= take;
    }
    if remaining > 0 {
        tracing::debug!("tail margin not covered by later files");
        return Ok(None);
    }

    Ok(Some(piece))
}

/// Reads `take` bytes of a neighbour record starting at `pos`, locating
/// it through the index. A lookup miss or read problem yields `None` so
/// the caller can abandon the repair gracefully.
fn read_neighbour(
    fs_index: &FileIndex,
    record: &FileRecord,
    pos: u64,
    take: u64,
) -> Result<Option<Vec<u8>>, VerifyError> {
    let name = record.path_joined();
    let Some(path) = fs_index.find(&name, record.length() as u64) else {
        tracing::debug!("neighbour {} not found on disk", name);
        return Ok(None);
    };

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) => {
            tracing::warn!("neighbour {}: open failed: {}", path.display(), e);
            return Ok(None);
        }
    };

    let mut chunk = vec![0u8; take as usize];
    match read_full_at(&file, &mut chunk, pos) {
        Ok(read) if read as u64 == take => Ok(Some(chunk)),
        Ok(_) => {
            tracing::warn!("neighbour {}: short read", path.display());
            Ok(None)
        }
        Err(e) => {
            tracing::warn!("neighbour {}: read failed: {}", path.display(), e);
            Ok(None)
        }
    }
}

fn digest_matches(piece: &[u8], metainfo: &Metainfo, block: usize) -> bool {
    metainfo
        .piece_digest(block)
        .is_some_and(|expected| Sha1::digest(piece).as_slice() == expected)
}
