use std::path::Path;

use crate::metainfo::Metainfo;

/// A target file's position in the descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Located {
    /// Index into [`Metainfo::files`].
    pub index: usize,
    /// Byte offset at which the record starts inside the virtual stream.
    pub offset: i64,
}

/// Finds the descriptor record corresponding to an on-disk file.
///
/// Candidates are the records whose declared length equals `size`; among
/// those the first whose last path component equals the target's
/// basename wins, otherwise the first whose extension matches. The
/// basename pass removes false positives when many same-size files
/// exist; the extension fallback tolerates renames.
///
/// Single-file descriptors match iff the sizes agree.
///
/// # Examples
///
/// ```
/// use bitcheck::bencode::decode_exact;
/// use bitcheck::metainfo::Metainfo;
/// use bitcheck::verify::locate;
/// use std::path::Path;
///
/// let data = b"d5:filesl\
///              d6:lengthi300e4:pathl5:a.bine\
///              ed6:lengthi500e4:pathl5:b.bine\
///              ee12:piece lengthi256e6:pieces20:AAAAAAAAAAAAAAAAAAAAe";
/// let meta = Metainfo::from_value(&decode_exact(data).unwrap()).unwrap();
///
/// let located = locate(&meta, Path::new("b.bin"), 500).unwrap();
/// assert_eq!(located.index, 1);
/// assert_eq!(located.offset, 300);
/// ```
pub fn locate(metainfo: &Metainfo, path: &Path, size: i64) -> Option<Located> {
    if metainfo.is_single_file() {
        let record = metainfo.file_at(0)?;
        return (record.length() == size).then_some(Located {
            index: 0,
            offset: 0,
        });
    }

    let basename = path.file_name().and_then(|n| n.to_str());
    let extension = path.extension();

    let mut by_extension = None;
    for (index, record) in metainfo.files().iter().enumerate() {
        if record.length() != size {
            continue;
        }
        if basename == Some(record.file_name()) {
            return Some(Located {
                index,
                offset: record.offset(),
            });
        }
        if by_extension.is_none() && Path::new(record.file_name()).extension() == extension {
            by_extension = Some(Located {
                index,
                offset: record.offset(),
            });
        }
    }

    by_extension
}
