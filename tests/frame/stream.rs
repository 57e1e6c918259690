// DeflateStream: flush modes, bounded output and lifecycle
// (src/frame/compress.rs).

use std::io::Read;

use flate2::{Decompress, FlushDecompress};
use gzr::deflate::block::BlockKind;
use gzr::{
    adler32, crc32, Config, DataType, DeflateError, DeflateStream, FlushMode, Format, Status,
    StreamState, Strategy,
};

fn gunzip(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    flate2::read::GzDecoder::new(data).read_to_end(&mut out).unwrap();
    out
}

fn unzlib(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    flate2::read::ZlibDecoder::new(data).read_to_end(&mut out).unwrap();
    out
}

/// Inflate a raw prefix that has not been finished; returns what a decoder
/// can produce from it.
fn inflate_prefix(raw: &[u8]) -> Vec<u8> {
    let mut d = Decompress::new(false);
    let mut out = Vec::with_capacity(1 << 20);
    d.decompress_vec(raw, &mut out, FlushDecompress::Sync).unwrap();
    out
}

fn text(len: usize) -> Vec<u8> {
    b"Streams are flushed at points the caller picks. "
        .iter()
        .cycle()
        .take(len)
        .cloned()
        .collect()
}

fn raw_stream(level: i32) -> DeflateStream {
    DeflateStream::open(Config::default().with_format(Format::Raw).with_level(level)).unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Flush modes
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn partial_flush_makes_prefix_decodable() {
    let data = text(3000);
    let mut s = raw_stream(6);
    let out = s.push(&data, FlushMode::Partial).unwrap();
    assert_eq!(inflate_prefix(&out), data);
}

#[test]
fn sync_flush_is_byte_aligned_marker() {
    let data = text(3000);
    let mut s = raw_stream(6);
    let out = s.push(&data, FlushMode::Sync).unwrap();
    assert_eq!(&out[out.len() - 4..], &[0, 0, 0xFF, 0xFF]);
    assert_eq!(inflate_prefix(&out), data);
}

#[test]
fn full_flush_allows_restart_from_that_point() {
    let first = text(5000);
    let second = text(7000);
    let mut s = raw_stream(9);
    let head = s.push(&first, FlushMode::Full).unwrap();
    assert_eq!(&head[head.len() - 4..], &[0, 0, 0xFF, 0xFF]);
    let mut tail = s.push(&second, FlushMode::None).unwrap();
    tail.extend(s.finish().unwrap());

    // The tail must not reach back before the flush point.
    let mut alone = Vec::new();
    flate2::read::DeflateDecoder::new(&tail[..]).read_to_end(&mut alone).unwrap();
    assert_eq!(alone, second);
}

#[test]
fn block_flush_closes_a_block_without_marker() {
    let data = text(4000);
    let mut s = raw_stream(6);
    let out = s.push(&data, FlushMode::Block).unwrap();
    assert!(!out.is_empty());
    assert!(s.last_block_plan().is_some());
    assert!(!out.ends_with(&[0, 0, 0xFF, 0xFF]));

    let mut rest = s.push(b"", FlushMode::Finish).unwrap();
    let mut all = out;
    all.append(&mut rest);
    let mut dec = Vec::new();
    flate2::read::DeflateDecoder::new(&all[..]).read_to_end(&mut dec).unwrap();
    assert_eq!(dec, data);
}

#[test]
fn weaker_flush_after_stronger_is_buf_error() {
    let mut s = raw_stream(6);
    s.push(b"abc", FlushMode::Full).unwrap();
    let mut buf = [0u8; 64];
    let p = s.compress(&[], &mut buf, FlushMode::Sync).unwrap();
    assert_eq!(p.status, Status::BufError);
    let p = s.compress(&[], &mut buf, FlushMode::Finish).unwrap();
    assert_eq!(p.status, Status::StreamEnd);
}

#[test]
fn stronger_flush_after_weaker_makes_progress() {
    let mut s = raw_stream(6);
    s.push(b"abc", FlushMode::Partial).unwrap();
    let out = s.push(&[], FlushMode::Sync).unwrap();
    assert_eq!(out.last(), Some(&0xFF));
}

// ─────────────────────────────────────────────────────────────────────────────
// Bounded output
// ─────────────────────────────────────────────────────────────────────────────

fn drive_bounded(cfg: Config, data: &[u8], in_chunk: usize, out_chunk: usize) -> Vec<u8> {
    let mut s = DeflateStream::open(cfg).unwrap();
    let mut out = Vec::new();
    let mut buf = vec![0u8; out_chunk];
    for chunk in data.chunks(in_chunk) {
        let mut rest = chunk;
        while !rest.is_empty() {
            let p = s.compress(rest, &mut buf, FlushMode::None).unwrap();
            rest = &rest[p.consumed..];
            out.extend_from_slice(&buf[..p.written]);
        }
    }
    loop {
        let p = s.compress(&[], &mut buf, FlushMode::Finish).unwrap();
        out.extend_from_slice(&buf[..p.written]);
        if p.status == Status::StreamEnd {
            break;
        }
    }
    assert_eq!(s.total_out(), out.len() as u64);
    assert_eq!(s.total_in(), data.len() as u64);
    out
}

#[test]
fn bounded_output_sizes() {
    let data: Vec<u8> = (0..120_000u32).map(|i| ((i / 7) ^ (i % 13)) as u8).collect();
    for (in_chunk, out_chunk) in [(1000, 7), (4096, 64), (50_000, 1000), (120_000, 65_536)] {
        let gz = drive_bounded(Config::default(), &data, in_chunk, out_chunk);
        assert_eq!(gunzip(&gz), data, "in {} out {}", in_chunk, out_chunk);
    }
}

#[test]
fn bounded_matches_unbounded() {
    let data = text(80_000);
    let cfg = Config::default().with_format(Format::Zlib).with_level(9);
    let bounded = drive_bounded(cfg.clone(), &data, 80_000, 13);
    let unbounded = gzr::compress(&data, &cfg).unwrap();
    assert_eq!(bounded, unbounded);
}

#[test]
fn progress_reports_consumption() {
    let mut s = DeflateStream::open(Config::default()).unwrap();
    let mut buf = [0u8; 4];
    // Queued header bytes go first; no input is taken while they block.
    let p = s.compress(b"hello", &mut buf, FlushMode::None).unwrap();
    assert_eq!(p.consumed, 0);
    assert_eq!(p.written, 4);
    assert_eq!(p.status, Status::Ok);
    assert_eq!(&buf, &[0x1F, 0x8B, 0x08, 0x00]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Checksums and accessors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn checksum_follows_format() {
    let data = text(10_000);
    let mut gz = DeflateStream::open(Config::default()).unwrap();
    let out = gz.push(&data, FlushMode::Finish).unwrap();
    assert_eq!(gz.checksum(), crc32(&data));
    assert_eq!(&out[out.len() - 8..out.len() - 4], &crc32(&data).to_le_bytes());
    assert_eq!(&out[out.len() - 4..], &(data.len() as u32).to_le_bytes());

    let mut zl = DeflateStream::open(Config::default().with_format(Format::Zlib)).unwrap();
    let out = zl.push(&data, FlushMode::Finish).unwrap();
    assert_eq!(zl.checksum(), adler32(&data));
    assert_eq!(&out[out.len() - 4..], &adler32(&data).to_be_bytes());
    assert_eq!(unzlib(&out), data);

    let mut raw = raw_stream(6);
    raw.push(&data, FlushMode::Finish).unwrap();
    assert_eq!(raw.checksum(), 0);
}

#[test]
fn data_type_guess() {
    let mut s = DeflateStream::open(Config::default()).unwrap();
    assert_eq!(s.data_type(), DataType::Unknown);
    s.push(&text(2000), FlushMode::Finish).unwrap();
    assert_eq!(s.data_type(), DataType::Text);

    let mut b = DeflateStream::open(Config::default()).unwrap();
    b.push(&[0u8, 1, 2, 3, 0, 0, 0, 7], FlushMode::Finish).unwrap();
    assert_eq!(b.data_type(), DataType::Binary);
}

#[test]
fn accessors() {
    let s = DeflateStream::open(Config::default().with_window_bits(-15)).unwrap();
    assert_eq!(s.format(), Format::Raw);
    assert_eq!(s.compress_bound(1000), gzr::compress_bound(1000, &Config::default().with_window_bits(-15)));
    assert_eq!(s.last_block_plan(), None);
}

#[test]
fn final_plan_is_last() {
    let mut s = DeflateStream::open(Config::default().with_level(0)).unwrap();
    s.push(b"stored", FlushMode::Finish).unwrap();
    let plan = s.last_block_plan().unwrap();
    assert!(plan.last);
    assert_eq!(plan.kind, BlockKind::Stored);
    assert_eq!(plan.stored_len, 6);
}

#[test]
fn push_str_is_push() {
    let mut a = DeflateStream::open(Config::default()).unwrap();
    let mut b = DeflateStream::open(Config::default()).unwrap();
    assert_eq!(
        a.push_str("text", FlushMode::Finish).unwrap(),
        b.push(b"text", FlushMode::Finish).unwrap()
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Lifecycle
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn state_transitions() {
    let mut s = DeflateStream::open(Config::default()).unwrap();
    assert_eq!(s.state(), StreamState::Busy);
    s.push(b"data", FlushMode::None).unwrap();
    assert_eq!(s.state(), StreamState::Busy);
    s.finish().unwrap();
    assert_eq!(s.state(), StreamState::Done);
    s.reset();
    assert_eq!(s.state(), StreamState::Busy);
    assert_eq!(s.total_in(), 0);
    assert_eq!(s.total_out(), 0);
}

#[test]
fn finishing_completes_with_empty_finish_calls() {
    let data = text(50_000);
    let mut s = DeflateStream::open(Config::default()).unwrap();
    let mut buf = [0u8; 100];
    let mut out = Vec::new();
    let p = s.compress(&data, &mut buf, FlushMode::Finish).unwrap();
    out.extend_from_slice(&buf[..p.written]);
    let mut rest = &data[p.consumed..];
    loop {
        let p = s.compress(rest, &mut buf, FlushMode::Finish).unwrap();
        rest = &rest[p.consumed..];
        out.extend_from_slice(&buf[..p.written]);
        if p.status == Status::StreamEnd {
            break;
        }
    }
    assert_eq!(gunzip(&out), data);
    assert_eq!(s.compress(&[], &mut buf, FlushMode::Finish), Err(DeflateError::StreamFinished));
}

#[test]
fn set_params_changes_output() {
    let data = text(20_000);
    let mut s = DeflateStream::open(Config::default().with_level(9)).unwrap();
    let mut out = s.push(&data, FlushMode::None).unwrap();
    let closed = s.set_params(1, Strategy::HuffmanOnly).unwrap();
    assert!(!closed.is_empty());
    out.extend(closed);
    out.extend(s.push(&data, FlushMode::Finish).unwrap());
    let mut both = data.clone();
    both.extend_from_slice(&data);
    assert_eq!(gunzip(&out), both);
}

#[test]
fn set_params_before_input_needs_no_flush() {
    let mut s = DeflateStream::open(Config::default()).unwrap();
    assert!(s.set_params(2, Strategy::Rle).unwrap().is_empty());
    let out = s.push(&text(1000), FlushMode::Finish).unwrap();
    assert_eq!(gunzip(&out), text(1000));
}

#[test]
fn set_params_after_finish_fails() {
    let mut s = DeflateStream::open(Config::default()).unwrap();
    s.finish().unwrap();
    assert_eq!(s.set_params(1, Strategy::Default), Err(DeflateError::StreamFinished));
}
