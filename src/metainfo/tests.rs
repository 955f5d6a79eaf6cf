use std::collections::BTreeMap;

use bytes::Bytes;

use super::*;
use crate::bencode::Value;

fn file_entry(components: &[&str], length: i64, filehash: Option<&[u8]>) -> Value {
    let mut dict = BTreeMap::new();
    dict.insert("length".to_string(), Value::Integer(length));
    dict.insert(
        "path".to_string(),
        Value::List(components.iter().map(|c| Value::text(c)).collect()),
    );
    if let Some(digest) = filehash {
        dict.insert(
            "filehash".to_string(),
            Value::Text(Bytes::copy_from_slice(digest)),
        );
    }
    Value::Dict(dict)
}

fn multi_file_info(piece_length: i64, pieces: &[u8], files: Vec<Value>) -> Value {
    let mut info = BTreeMap::new();
    info.insert("piece length".to_string(), Value::Integer(piece_length));
    info.insert(
        "pieces".to_string(),
        Value::Binary(Bytes::copy_from_slice(pieces)),
    );
    info.insert("files".to_string(), Value::List(files));
    Value::Dict(info)
}

#[test]
fn test_parse_multi_file() {
    let info = multi_file_info(
        256,
        &[0u8; 60],
        vec![
            file_entry(&["dir", "a.bin"], 300, None),
            file_entry(&["b.bin"], 500, None),
        ],
    );

    let meta = Metainfo::from_value(&info).unwrap();
    assert_eq!(meta.piece_length(), 256);
    assert_eq!(meta.piece_count(), 3);
    assert_eq!(meta.total_length(), 800);
    assert!(!meta.is_single_file());

    let files = meta.files();
    assert_eq!(files.len(), 2);
    assert_eq!(files[0].path_joined(), "dir/a.bin");
    assert_eq!(files[0].file_name(), "a.bin");
    assert_eq!(files[0].offset(), 0);
    assert_eq!(files[1].offset(), 300);
    assert_eq!(files[1].length(), 500);
}

#[test]
fn test_parse_nested_under_info() {
    let info = multi_file_info(256, &[0u8; 20], vec![file_entry(&["a"], 100, None)]);
    let mut root = BTreeMap::new();
    root.insert("announce".to_string(), Value::text("http://example"));
    root.insert("info".to_string(), info);

    let meta = Metainfo::from_value(&Value::Dict(root)).unwrap();
    assert_eq!(meta.piece_length(), 256);
    assert_eq!(meta.files().len(), 1);
}

#[test]
fn test_parse_from_bytes() {
    let info = multi_file_info(256, &[7u8; 20], vec![file_entry(&["a"], 100, None)]);
    let bytes = crate::bencode::encode(&info).unwrap();

    let meta = Metainfo::from_bytes(&bytes).unwrap();
    assert_eq!(meta.pieces(), &[7u8; 20]);
}

#[test]
fn test_single_file_synthesis() {
    let mut info = BTreeMap::new();
    info.insert("name".to_string(), Value::text("movie.mp4"));
    info.insert("piece length".to_string(), Value::Integer(256));
    info.insert(
        "pieces".to_string(),
        Value::Binary(Bytes::copy_from_slice(&[0u8; 80])),
    );
    info.insert("length".to_string(), Value::Integer(1024));

    let meta = Metainfo::from_value(&Value::Dict(info)).unwrap();
    assert!(meta.is_single_file());
    assert_eq!(meta.files().len(), 1);
    assert_eq!(meta.files()[0].length(), 1024);
    assert_eq!(meta.files()[0].file_name(), "movie.mp4");
    assert_eq!(meta.total_length(), 1024);
}

#[test]
fn test_missing_required_fields() {
    let mut info = BTreeMap::new();
    info.insert(
        "pieces".to_string(),
        Value::Binary(Bytes::copy_from_slice(&[0u8; 20])),
    );
    info.insert("length".to_string(), Value::Integer(10));
    assert!(matches!(
        Metainfo::from_value(&Value::Dict(info)),
        Err(SchemaError::MissingField("piece length"))
    ));

    let mut info = BTreeMap::new();
    info.insert("piece length".to_string(), Value::Integer(256));
    info.insert("length".to_string(), Value::Integer(10));
    assert!(matches!(
        Metainfo::from_value(&Value::Dict(info)),
        Err(SchemaError::MissingField("pieces"))
    ));

    let mut info = BTreeMap::new();
    info.insert("piece length".to_string(), Value::Integer(256));
    info.insert(
        "pieces".to_string(),
        Value::Binary(Bytes::copy_from_slice(&[0u8; 20])),
    );
    assert!(matches!(
        Metainfo::from_value(&Value::Dict(info)),
        Err(SchemaError::MissingField("length or files"))
    ));
}

#[test]
fn test_invalid_piece_length() {
    let info = multi_file_info(0, &[0u8; 20], vec![file_entry(&["a"], 10, None)]);
    assert!(matches!(
        Metainfo::from_value(&info),
        Err(SchemaError::InvalidField("piece length"))
    ));
}

#[test]
fn test_pieces_not_multiple_of_digest() {
    let info = multi_file_info(256, &[0u8; 21], vec![file_entry(&["a"], 10, None)]);
    assert!(matches!(
        Metainfo::from_value(&info),
        Err(SchemaError::InvalidField("pieces"))
    ));
}

#[test]
fn test_filehash_exposed() {
    let digest = [0xabu8; 16];
    let info = multi_file_info(
        256,
        &[0u8; 20],
        vec![file_entry(&["a"], 10, Some(&digest))],
    );

    let meta = Metainfo::from_value(&info).unwrap();
    assert_eq!(meta.files()[0].filehash(), Some(digest.as_slice()));
}

#[test]
fn test_filehash_absent() {
    let info = multi_file_info(256, &[0u8; 20], vec![file_entry(&["a"], 10, None)]);
    let meta = Metainfo::from_value(&info).unwrap();
    assert_eq!(meta.files()[0].filehash(), None);
}

#[test]
fn test_piece_digest_indexing() {
    let mut blob = vec![0u8; 40];
    blob[20..].fill(0x11);
    let info = multi_file_info(256, &blob, vec![file_entry(&["a"], 512, None)]);

    let meta = Metainfo::from_value(&info).unwrap();
    assert_eq!(meta.piece_digest(0), Some(&[0u8; 20]));
    assert_eq!(meta.piece_digest(1), Some(&[0x11u8; 20]));
    assert_eq!(meta.piece_digest(2), None);
}

#[test]
fn test_hash_algo_from_digest_len() {
    assert_eq!(HashAlgo::from_digest_len(16), Some(HashAlgo::Md5));
    assert_eq!(HashAlgo::from_digest_len(20), Some(HashAlgo::Sha1));
    assert_eq!(HashAlgo::from_digest_len(32), Some(HashAlgo::Sha256));
    assert_eq!(HashAlgo::from_digest_len(24), None);
}
