use std::io;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// A one-shot index of the regular files under a working directory.
///
/// Verification is typically run from a directory whose layout no longer
/// matches the descriptor exactly: files get moved into subdirectories or
/// renamed. The index records every regular file once and answers
/// lookups by path suffix, falling back to extension, always filtered by
/// exact size. Size plus extension is a weak identifier, but as a last
/// resort it tolerates renames that keep the content intact.
///
/// Enumeration order is unspecified but stable for the lifetime of one
/// index, so repeated lookups resolve identically.
#[derive(Debug)]
pub struct FileIndex {
    entries: Vec<IndexEntry>,
}

#[derive(Debug)]
struct IndexEntry {
    path: PathBuf,
    /// Absolute path with `/` separators, for suffix matching.
    normalized: String,
    size: u64,
}

impl FileIndex {
    /// Walks `root` once and records every regular file below it.
    ///
    /// Symlinks are not followed. Entries that cannot be read are
    /// skipped rather than failing the whole scan.
    ///
    /// # Errors
    ///
    /// Returns an error only when `root` itself cannot be resolved.
    pub fn scan(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref().canonicalize()?;

        let mut entries = Vec::new();
        for entry in WalkDir::new(&root).follow_links(false) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::debug!("skipping unreadable entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let size = match entry.metadata() {
                Ok(meta) => meta.len(),
                Err(e) => {
                    tracing::debug!("skipping unstattable entry: {}", e);
                    continue;
                }
            };
            let path = entry.into_path();
            let normalized = normalize(&path);
            entries.push(IndexEntry {
                path,
                normalized,
                size,
            });
        }

        tracing::debug!("indexed {} file(s) under {}", entries.len(), root.display());
        Ok(Self { entries })
    }

    /// Number of indexed files.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the index holds no files.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds the first indexed file of exactly `size` bytes matching
    /// `target`.
    ///
    /// When `strict`, the indexed path must end with `target` (compared
    /// on `/`-normalized strings). Otherwise only the file extension has
    /// to match.
    pub fn lookup(&self, target: &str, size: u64, strict: bool) -> Option<&Path> {
        let target = target.replace('\\', "/");
        let target_ext = Path::new(&target).extension();

        self.entries
            .iter()
            .filter(|e| e.size == size)
            .find(|e| {
                if strict {
                    e.normalized.ends_with(target.as_str())
                } else {
                    e.path.extension() == target_ext
                }
            })
            .map(|e| e.path.as_path())
    }

    /// Strict suffix lookup first, then the extension fallback.
    pub fn find(&self, target: &str, size: u64) -> Option<&Path> {
        if let Some(path) = self.lookup(target, size, true) {
            return Some(path);
        }
        tracing::debug!("no suffix match for {}, trying extension", target);
        self.lookup(target, size, false)
    }
}

fn normalize(path: &Path) -> String {
    let s = path.to_string_lossy();
    if s.contains('\\') {
        s.replace('\\', "/")
    } else {
        s.into_owned()
    }
}
