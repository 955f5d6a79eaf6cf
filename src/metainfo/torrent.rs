use bytes::Bytes;

use super::error::SchemaError;
use crate::bencode::{decode_exact, Value};

/// Width of one SHA-1 digest in the `pieces` blob.
pub const DIGEST_LEN: usize = 20;

/// A parsed metainfo descriptor.
///
/// Holds the fields the verifier cares about: the piece geometry, the
/// raw piece digest table, and the file list in virtual-stream order.
/// Validation happens once in [`Metainfo::from_bytes`]; the accessors
/// afterwards are infallible.
///
/// # Examples
///
/// ```no_run
/// use bitcheck::metainfo::Metainfo;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let data = std::fs::read("example.torrent")?;
/// let metainfo = Metainfo::from_bytes(&data)?;
///
/// println!("piece length: {}", metainfo.piece_length());
/// println!("pieces:       {}", metainfo.piece_count());
/// println!("total bytes:  {}", metainfo.total_length());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Metainfo {
    piece_length: i64,
    pieces: Bytes,
    files: Vec<FileRecord>,
    total_length: i64,
    single_file: bool,
}

/// A file within a descriptor.
///
/// For single-file descriptors there is one synthesized record named by
/// the `name` field. `offset` is the byte position at which this file's
/// data begins inside the virtual stream.
#[derive(Debug, Clone)]
pub struct FileRecord {
    path: Vec<String>,
    length: i64,
    offset: i64,
    filehash: Option<Bytes>,
}

/// Whole-file digest algorithm, identified by digest width.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgo {
    Md5,
    Sha1,
    Sha256,
}

impl HashAlgo {
    /// Maps a digest width in bytes to the algorithm that produces it.
    pub fn from_digest_len(len: usize) -> Option<Self> {
        match len {
            16 => Some(HashAlgo::Md5),
            20 => Some(HashAlgo::Sha1),
            32 => Some(HashAlgo::Sha256),
            _ => None,
        }
    }
}

impl Metainfo {
    /// Parses a metainfo descriptor from raw bencode bytes.
    ///
    /// The descriptor may be the conventional root dictionary nesting the
    /// data under `info`, or a bare info dictionary.
    ///
    /// # Errors
    ///
    /// Returns an error if the data is not valid bencode, if a required
    /// field (`piece length`, `pieces`, `length`/`files`) is missing or
    /// ill-typed, or if the `pieces` blob length is not a multiple of 20.
    pub fn from_bytes(data: &[u8]) -> Result<Self, SchemaError> {
        let value = decode_exact(data)?;
        Self::from_value(&value)
    }

    /// Parses a metainfo descriptor from an already decoded tree.
    pub fn from_value(value: &Value) -> Result<Self, SchemaError> {
        let root = value.as_dict().ok_or(SchemaError::InvalidField("root"))?;

        let info = match root.get("info") {
            Some(info) => info.as_dict().ok_or(SchemaError::InvalidField("info"))?,
            None => root,
        };

        let piece_length = info
            .get("piece length")
            .ok_or(SchemaError::MissingField("piece length"))?
            .as_integer()
            .ok_or(SchemaError::InvalidField("piece length"))?;
        if piece_length <= 0 {
            return Err(SchemaError::InvalidField("piece length"));
        }

        let pieces = info
            .get("pieces")
            .ok_or(SchemaError::MissingField("pieces"))?
            .as_binary()
            .ok_or(SchemaError::InvalidField("pieces"))?
            .clone();
        if pieces.len() % DIGEST_LEN != 0 {
            return Err(SchemaError::InvalidField("pieces"));
        }

        let name = info.get("name").and_then(|v| v.as_str());

        let (files, single_file) = match info.get("files") {
            Some(list) => (parse_files(list)?, false),
            None => {
                let length = info
                    .get("length")
                    .ok_or(SchemaError::MissingField("length or files"))?
                    .as_integer()
                    .ok_or(SchemaError::InvalidField("length"))?;
                if length < 0 {
                    return Err(SchemaError::InvalidField("length"));
                }
                let record = FileRecord {
                    path: name.map(|n| vec![n.to_string()]).unwrap_or_default(),
                    length,
                    offset: 0,
                    filehash: None,
                };
                (vec![record], true)
            }
        };

        let total_length = files.iter().map(|f| f.length).sum();

        Ok(Self {
            piece_length,
            pieces,
            files,
            total_length,
            single_file,
        })
    }

    /// Size in bytes of every piece except possibly the last.
    pub fn piece_length(&self) -> i64 {
        self.piece_length
    }

    /// The raw digest table: 20 bytes per piece, concatenated.
    pub fn pieces(&self) -> &[u8] {
        &self.pieces
    }

    /// Number of pieces in the descriptor.
    pub fn piece_count(&self) -> usize {
        self.pieces.len() / DIGEST_LEN
    }

    /// The SHA-1 digest recorded for piece `index`.
    pub fn piece_digest(&self, index: usize) -> Option<&[u8; DIGEST_LEN]> {
        let start = index.checked_mul(DIGEST_LEN)?;
        let slice = self.pieces.get(start..start + DIGEST_LEN)?;
        slice.try_into().ok()
    }

    /// The file records in virtual-stream order.
    ///
    /// A single-file descriptor yields one synthesized record.
    pub fn files(&self) -> &[FileRecord] {
        &self.files
    }

    /// The record at `index`, if any.
    pub fn file_at(&self, index: usize) -> Option<&FileRecord> {
        self.files.get(index)
    }

    /// Sum of all record lengths.
    pub fn total_length(&self) -> i64 {
        self.total_length
    }

    /// True when the descriptor declared a top-level `length` instead of
    /// a `files` list.
    pub fn is_single_file(&self) -> bool {
        self.single_file
    }
}

impl FileRecord {
    /// Size of the file in bytes.
    pub fn length(&self) -> i64 {
        self.length
    }

    /// Byte position of this file inside the virtual stream.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Path components as declared in the descriptor.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Path components joined with `/`.
    pub fn path_joined(&self) -> String {
        self.path.join("/")
    }

    /// The last path component, or an empty string for a nameless
    /// single-file record.
    pub fn file_name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or("")
    }

    /// The whole-file digest, when the descriptor carries one.
    pub fn filehash(&self) -> Option<&[u8]> {
        self.filehash.as_deref()
    }
}

fn parse_files(list: &Value) -> Result<Vec<FileRecord>, SchemaError> {
    let list = list.as_list().ok_or(SchemaError::InvalidField("files"))?;

    let mut files = Vec::with_capacity(list.len());
    let mut offset = 0i64;

    for entry in list {
        let dict = entry.as_dict().ok_or(SchemaError::InvalidField("files"))?;

        let length = dict
            .get("length")
            .ok_or(SchemaError::MissingField("file length"))?
            .as_integer()
            .ok_or(SchemaError::InvalidField("file length"))?;
        if length < 0 {
            return Err(SchemaError::InvalidField("file length"));
        }

        let components = dict
            .get("path")
            .ok_or(SchemaError::MissingField("file path"))?
            .as_list()
            .ok_or(SchemaError::InvalidField("file path"))?;
        let path = components
            .iter()
            .map(|c| c.as_str().map(String::from))
            .collect::<Option<Vec<_>>>()
            .ok_or(SchemaError::InvalidField("file path"))?;

        // Binary-valued string; width identifies the algorithm.
        let filehash = dict.get("filehash").and_then(|v| v.as_text()).cloned();

        files.push(FileRecord {
            path,
            length,
            offset,
            filehash,
        });

        offset += length;
    }

    Ok(files)
}
