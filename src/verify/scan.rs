use std::fs::File;
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};

use sha1::{Digest, Sha1};

use super::report::PieceReport;
use crate::metainfo::DIGEST_LEN;

/// Piece-aligned geometry of one file inside the virtual stream.
///
/// `start_offset` counts the leading bytes of `start_block` that belong
/// to earlier files; when it is non-zero the head piece cannot be fully
/// read from the target.
#[derive(Debug, Clone, Copy)]
pub(super) struct Layout {
    /// First piece index touching the file.
    pub start_block: usize,
    /// One past the last piece index touching the file.
    pub end_block: usize,
    /// `virtual_offset % piece_length`.
    pub start_offset: usize,
}

impl Layout {
    pub(super) fn new(virtual_offset: i64, file_length: i64, piece_length: i64) -> Self {
        let v = virtual_offset as u64;
        let l = file_length as u64;
        let p = piece_length as u64;
        Self {
            start_block: (v / p) as usize,
            end_block: (v + l).div_ceil(p) as usize,
            start_offset: (v % p) as usize,
        }
    }
}

pub(super) struct ScanInput<'a> {
    pub target: &'a Path,
    pub piece_length: i64,
    pub pieces: &'a [u8],
    pub virtual_offset: i64,
    pub file_length: i64,
    /// Resolved worker count, at least 1.
    pub workers: usize,
}

/// Scans the target's piece range in parallel and classifies each piece.
///
/// Pieces `[start_block, end_block)` are partitioned across workers by
/// stride so reads stay roughly evenly spread over the file. Each worker
/// owns its read handle and one reused piece buffer; coordination is
/// limited to the shared counters flushed once per worker.
///
/// Failing to open the target is fatal. A read error on one piece is
/// logged and counted as a failure, leaving the rest of the scan intact.
pub(super) fn scan(input: &ScanInput<'_>) -> io::Result<PieceReport> {
    let layout = Layout::new(input.virtual_offset, input.file_length, input.piece_length);

    let passed = AtomicU32::new(0);
    let head_missing = AtomicU32::new(0);
    let tail_missing = AtomicU32::new(0);
    let failed = AtomicU32::new(0);
    let total = AtomicU32::new(0);

    std::thread::scope(|scope| {
        let handles: Vec<_> = (0..input.workers)
            .map(|task| {
                let counters = (&passed, &head_missing, &tail_missing, &failed, &total);
                scope.spawn(move || scan_worker(input, layout, task, counters))
            })
            .collect();

        for handle in handles {
            handle
                .join()
                .map_err(|_| io::Error::other("scan worker panicked"))??;
        }
        Ok::<(), io::Error>(())
    })?;

    Ok(PieceReport {
        passed: passed.load(Ordering::Acquire),
        head_missing: head_missing.load(Ordering::Acquire),
        tail_missing: tail_missing.load(Ordering::Acquire),
        failed: failed.load(Ordering::Acquire),
        total: total.load(Ordering::Acquire),
    })
}

type Counters<'a> = (
    &'a AtomicU32,
    &'a AtomicU32,
    &'a AtomicU32,
    &'a AtomicU32,
    &'a AtomicU32,
);

fn scan_worker(
    input: &ScanInput<'_>,
    layout: Layout,
    task: usize,
    counters: Counters<'_>,
) -> io::Result<()> {
    let piece_length = input.piece_length as usize;
    let virtual_offset = input.virtual_offset as u64;

    let file = File::open(input.target)?;
    let mut buffer = vec![0u8; piece_length];
    let mut local = PieceReport::default();

    for block in (layout.start_block + task..layout.end_block).step_by(input.workers) {
        local.total += 1;

        // The head piece reads into the back of the buffer; the leading
        // start_offset bytes belong to the previous file and are unknown
        // here.
        let (buffer_offset, read_pos) = if block == layout.start_block {
            (layout.start_offset, 0)
        } else {
            (0, block as u64 * piece_length as u64 - virtual_offset)
        };

        let read = match read_full_at(&file, &mut buffer[buffer_offset..], read_pos) {
            Ok(n) => n,
            Err(e) => {
                tracing::warn!("piece {}: read failed: {}", block, e);
                local.failed += 1;
                continue;
            }
        };

        // Unread tail bytes stand in for the stream's zero padding and
        // for bytes owned by later files.
        buffer[buffer_offset + read..].fill(0);

        let Some(expected) = input
            .pieces
            .get(block * DIGEST_LEN..(block + 1) * DIGEST_LEN)
        else {
            tracing::warn!("piece {}: no digest in table", block);
            local.failed += 1;
            continue;
        };

        let digest = Sha1::digest(&buffer);
        if digest.as_slice() == expected {
            local.passed += 1;
        } else if buffer_offset > 0 {
            local.head_missing += 1;
        } else if read < piece_length {
            // The descriptor may have digested only the bytes that
            // exist; retry over the read prefix before calling the
            // tail piece missing.
            let prefix = Sha1::digest(&buffer[..read]);
            if prefix.as_slice() == expected {
                local.passed += 1;
            } else {
                local.tail_missing += 1;
            }
        } else {
            tracing::warn!("piece {}: digest mismatch", block);
            local.failed += 1;
        }
    }

    let (passed, head_missing, tail_missing, failed, total) = counters;
    passed.fetch_add(local.passed, Ordering::AcqRel);
    head_missing.fetch_add(local.head_missing, Ordering::AcqRel);
    tail_missing.fetch_add(local.tail_missing, Ordering::AcqRel);
    failed.fetch_add(local.failed, Ordering::AcqRel);
    total.fetch_add(local.total, Ordering::AcqRel);

    Ok(())
}

#[cfg(unix)]
fn read_at(file: &File, buf: &mut [u8], pos: u64) -> io::Result<usize> {
    use std::os::unix::fs::FileExt;
    file.read_at(buf, pos)
}

#[cfg(windows)]
fn read_at(file: &File, buf: &mut [u8], pos: u64) -> io::Result<usize> {
    use std::os::windows::fs::FileExt;
    file.seek_read(buf, pos)
}

/// Positional read that fills as much of `buf` as the file allows.
///
/// EOF is not an error; the short count drives the tail-piece
/// classification.
pub(super) fn read_full_at(file: &File, mut buf: &mut [u8], mut pos: u64) -> io::Result<usize> {
    let mut filled = 0;
    while !buf.is_empty() {
        match read_at(file, buf, pos) {
            Ok(0) => break,
            Ok(n) => {
                filled += n;
                pos += n as u64;
                let rest = buf;
                buf = &mut rest[n..];
            }
            Err(ref e) if e.kind() == io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
