//! E2E Test Suite 02: Streaming API
//!
//! Drives `DeflateStream` the way an application would:
//! - push / finish with explicit flush points
//! - bounded `compress` calls with tiny output buffers
//! - set_params between chunks
//! - reset and reuse of one stream for several messages

use std::io::Read;

use gzr::{Config, DeflateStream, FlushMode, Format, Status, StreamState, Strategy};

fn gunzip(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    flate2::read::GzDecoder::new(data)
        .read_to_end(&mut out)
        .expect("gzip stream should decode");
    out
}

fn unzlib(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    flate2::read::ZlibDecoder::new(data)
        .read_to_end(&mut out)
        .expect("zlib stream should decode");
    out
}

/// Decode whatever a raw deflate prefix yields so far.
fn inflate_available(data: &[u8]) -> Vec<u8> {
    let mut d = flate2::Decompress::new(false);
    let mut out = Vec::with_capacity(1 << 20);
    d.decompress_vec(data, &mut out, flate2::FlushDecompress::Sync)
        .expect("prefix should decode");
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: two pushes separated by a sync flush, then finish
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_two_pushes_with_sync_then_finish() {
    let mut stream = DeflateStream::open(Config::default()).unwrap();
    let mut out = stream.push(b"first chunk of text, ", FlushMode::Sync).unwrap();
    // A sync flush ends on an empty stored block.
    assert_eq!(&out[out.len() - 4..], &[0x00, 0x00, 0xFF, 0xFF]);

    out.extend(stream.push(b"second chunk of text.", FlushMode::Sync).unwrap());
    out.extend(stream.finish().unwrap());
    assert_eq!(stream.state(), StreamState::Done);
    assert_eq!(gunzip(&out), b"first chunk of text, second chunk of text.");
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: each sync point makes everything so far decodable
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_sync_points_are_decodable_prefixes() {
    let mut stream = DeflateStream::open(Config::default().with_format(Format::Raw)).unwrap();
    let mut out = Vec::new();
    let mut expected = Vec::new();
    for i in 0..10 {
        let line = format!("message number {} with a little payload\n", i);
        expected.extend_from_slice(line.as_bytes());
        out.extend(stream.push(line.as_bytes(), FlushMode::Sync).unwrap());
        assert_eq!(inflate_available(&out), expected, "after message {}", i);
    }
    out.extend(stream.finish().unwrap());
    assert_eq!(inflate_available(&out), expected);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: many small pushes without flushing
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_many_small_pushes() {
    let original: Vec<u8> = (0..200_000u32).map(|i| ((i * 31) ^ (i >> 7)) as u8).collect();
    let mut stream = DeflateStream::open(Config::default().gzip(false)).unwrap();
    let mut out = Vec::new();
    for chunk in original.chunks(1000) {
        out.extend(stream.push(chunk, FlushMode::None).unwrap());
    }
    out.extend(stream.finish().unwrap());
    assert_eq!(stream.total_in(), original.len() as u64);
    assert_eq!(stream.total_out(), out.len() as u64);
    assert_eq!(unzlib(&out), original);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: bounded compress with a 7-byte output window
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_bounded_compress_tiny_output() {
    let original = b"bounded output buffers must still yield a valid stream. ".repeat(100);
    let mut stream = DeflateStream::open(Config::default()).unwrap();
    let mut out = Vec::new();
    let mut input: &[u8] = &original;
    let mut buf = [0u8; 7];

    loop {
        let p = stream.compress(input, &mut buf, FlushMode::Finish).unwrap();
        input = &input[p.consumed..];
        out.extend_from_slice(&buf[..p.written]);
        if p.status == Status::StreamEnd {
            break;
        }
        assert_eq!(p.status, Status::Ok);
    }
    assert!(input.is_empty());
    assert_eq!(gunzip(&out), original);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 5: bounded and unbounded paths produce the same bytes
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_bounded_matches_unbounded() {
    let original: Vec<u8> = b"0123456789abcdef".iter().cycle().take(100_000).cloned().collect();
    let expected = gzr::compress(&original, &Config::default()).unwrap();

    let mut stream = DeflateStream::open(Config::default()).unwrap();
    let mut out = Vec::new();
    let mut buf = vec![0u8; 333];
    let mut input: &[u8] = &original;
    loop {
        let p = stream.compress(input, &mut buf, FlushMode::Finish).unwrap();
        input = &input[p.consumed..];
        out.extend_from_slice(&buf[..p.written]);
        if p.status == Status::StreamEnd {
            break;
        }
    }
    assert_eq!(out, expected);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 6: switching level and strategy between chunks
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_set_params_between_chunks() {
    let part1 = b"first part compressed at level 1. ".repeat(50);
    let part2 = b"second part stored as is. ".repeat(50);
    let part3 = b"third part with run-length only: zzzzzzzzzzzzzzzz".repeat(50);

    let mut stream = DeflateStream::open(Config::default().with_level(1)).unwrap();
    let mut out = stream.push(&part1, FlushMode::None).unwrap();
    out.extend(stream.set_params(0, Strategy::Default).unwrap());
    out.extend(stream.push(&part2, FlushMode::None).unwrap());
    out.extend(stream.set_params(9, Strategy::Rle).unwrap());
    out.extend(stream.push(&part3, FlushMode::None).unwrap());
    out.extend(stream.finish().unwrap());

    let mut expected = part1.clone();
    expected.extend(&part2);
    expected.extend(&part3);
    assert_eq!(gunzip(&out), expected);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 7: one stream reused for several messages
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_reset_reuses_stream() {
    let zeros = vec![0u8; 70_000];
    let messages: [&[u8]; 4] = [b"alpha alpha alpha", b"", b"beta", &zeros];
    let mut stream = DeflateStream::open(Config::default()).unwrap();
    for msg in messages {
        let mut out = stream.push(msg, FlushMode::None).unwrap();
        out.extend(stream.finish().unwrap());
        assert_eq!(gunzip(&out), msg);
        assert_eq!(stream.total_in(), msg.len() as u64);
        stream.reset();
        assert_eq!(stream.state(), StreamState::Busy);
        assert_eq!(stream.total_in(), 0);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 8: the stream is closed after finish
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_push_after_finish_is_rejected() {
    let mut stream = DeflateStream::open(Config::default()).unwrap();
    let _ = stream.push_str("done", FlushMode::Finish).unwrap();
    assert_eq!(stream.state(), StreamState::Done);
    let err = stream.push(b"more", FlushMode::None).unwrap_err();
    assert_eq!(err, gzr::DeflateError::StreamFinished);
    assert!(stream.finish().is_err());
}
