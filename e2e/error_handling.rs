//! E2E Test Suite 05: Error Handling
//!
//! Every error a caller can hit through the public API: bad configuration,
//! misuse of a finished stream, empty output buffers, and I/O failures
//! surfacing through the file layer.

use std::fs;
use std::io::{self, Write};

use gzr::io::prefs::{set_notification_level, Prefs};
use gzr::io::compress_filename;
use gzr::{
    compress, Config, DeflateError, DeflateStream, ErrorKind, FlushMode, GzHeader, GzWriteFile, Status,
    StreamState,
};
use tempfile::TempDir;

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: configuration errors name the offending value
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_config_errors() {
    let cases = [
        (Config::default().with_level(11), DeflateError::LevelInvalid(11)),
        (Config::default().with_level(-2), DeflateError::LevelInvalid(-2)),
        (Config::default().with_window_bits(7), DeflateError::WindowBitsInvalid(7)),
        (Config::default().with_window_bits(-7), DeflateError::WindowBitsInvalid(-7)),
        (Config::default().with_mem_level(10), DeflateError::MemLevelInvalid(10)),
        (Config::default().with_dictionary(b"dict".to_vec()), DeflateError::DictionaryUnsupported),
    ];
    for (cfg, expected) in cases {
        let err = DeflateStream::open(cfg).err().expect("open should fail");
        assert_eq!(err, expected);
        assert_eq!(err.kind(), ErrorKind::Config);
        assert!(!err.is_fatal());
    }

    let err = DeflateStream::open(Config::default().with_level(42)).err().unwrap();
    assert!(err.to_string().contains("42"), "message: {}", err);
    assert!(err.to_string().starts_with("ERROR_levelInvalid"));
}

#[test]
fn test_header_field_errors() {
    let bad_name = Config::default().with_header(GzHeader::default().with_name(b"a\0b".to_vec()));
    assert!(matches!(
        compress(b"x", &bad_name),
        Err(DeflateError::HeaderFieldInvalid(_))
    ));

    let huge_extra = Config::default().with_header(GzHeader::default().with_extra(vec![0u8; 70_000]));
    assert!(matches!(
        compress(b"x", &huge_extra),
        Err(DeflateError::HeaderFieldInvalid(_))
    ));

    // Header fields mean nothing outside gzip framing.
    assert!(compress(b"x", &bad_name.gzip(false)).is_ok());
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: state errors leave the stream usable or closed, never corrupted
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_empty_output_buffer() {
    let mut stream = DeflateStream::open(Config::default()).unwrap();
    let err = stream.compress(b"data", &mut [], FlushMode::None).unwrap_err();
    assert_eq!(err, DeflateError::NoProgress);
    assert_eq!(err.kind(), ErrorKind::State);

    // The stream carries on as if the call never happened.
    let mut out = stream.push(b"data", FlushMode::None).unwrap();
    out.extend(stream.finish().unwrap());
    assert_eq!(stream.state(), StreamState::Done);
}

#[test]
fn test_repeated_flush_is_buf_error() {
    let mut stream = DeflateStream::open(Config::default()).unwrap();
    let mut buf = vec![0u8; 1024];
    let p = stream.compress(b"abc", &mut buf, FlushMode::Sync).unwrap();
    assert_eq!(p.status, Status::Ok);
    let p = stream.compress(b"", &mut buf, FlushMode::Sync).unwrap();
    assert_eq!(p.status, Status::BufError);
    assert_eq!(p.written, 0);
    let p = stream.compress(b"", &mut buf, FlushMode::Finish).unwrap();
    assert_eq!(p.status, Status::StreamEnd);
}

#[test]
fn test_finished_stream_rejects_everything() {
    let mut stream = DeflateStream::open(Config::default()).unwrap();
    stream.finish().unwrap();
    assert_eq!(stream.push(b"x", FlushMode::None), Err(DeflateError::StreamFinished));
    assert_eq!(stream.set_params(1, gzr::Strategy::Default), Err(DeflateError::StreamFinished));
    let mut buf = [0u8; 16];
    assert_eq!(
        stream.compress(b"", &mut buf, FlushMode::Finish),
        Err(DeflateError::StreamFinished)
    );

    // reset reopens it.
    stream.reset();
    assert!(stream.push(b"x", FlushMode::Finish).is_ok());
}

#[test]
fn test_invalid_set_params_level() {
    let mut stream = DeflateStream::open(Config::default()).unwrap();
    assert_eq!(stream.set_params(12, gzr::Strategy::Default), Err(DeflateError::LevelInvalid(12)));
    assert_eq!(stream.state(), StreamState::Busy);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: I/O failures propagate out of the writer
// ─────────────────────────────────────────────────────────────────────────────

struct BrokenPipe;

impl Write for BrokenPipe {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "reader went away"))
    }
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_writer_error_propagates() {
    let mut gz = GzWriteFile::open(BrokenPipe, Config::default()).unwrap();
    // The header alone is enough to hit the sink on the first flush.
    let err = gz.flush().unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
    assert!(gz.finish().is_err());
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: file layer errors carry the file name
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_missing_source_names_file() {
    set_notification_level(0);
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.txt");
    let dst = dir.path().join("nope.txt.gz");
    let err = compress_filename(missing.to_str().unwrap(), dst.to_str().unwrap(), &Prefs::default()).unwrap_err();
    assert!(format!("{:#}", err).contains("nope.txt"));
    assert!(!dst.exists());
}

#[test]
fn test_directory_source_rejected() {
    set_notification_level(0);
    let dir = TempDir::new().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    let dst = dir.path().join("sub.gz");
    assert!(compress_filename(sub.to_str().unwrap(), dst.to_str().unwrap(), &Prefs::default()).is_err());
    assert!(sub.is_dir());
    assert!(!dst.exists());
}
