// Parsing drivers (src/deflate/compress.rs), run directly without any
// container framing. Output is checked with flate2's raw inflater.

use std::io::Read;

use gzr::checksum::{adler32, crc32, Adler32, Crc32, RunningChecksum};
use gzr::deflate::bits::{Output, VecOutput};
use gzr::deflate::block::BlockKind;
use gzr::deflate::compress::Compressor;
use gzr::deflate::types::{BlockState, FlushMode, Strategy};

fn inflate(raw: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    flate2::read::DeflateDecoder::new(raw).read_to_end(&mut out).unwrap();
    out
}

fn sample(len: usize) -> Vec<u8> {
    let words: &[&[u8]] = &[b"deflate ", b"window ", b"lazy ", b"match ", b"\x00\x01\x02", b"tree "];
    let mut out = Vec::with_capacity(len);
    let mut i = 0usize;
    while out.len() < len {
        out.extend_from_slice(words[(i * 7 + i / 3) % words.len()]);
        i += 1;
    }
    out.truncate(len);
    out
}

/// Compress `data` in one call and return the raw deflate bytes.
fn run(c: &mut Compressor, data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    let mut input = data;
    let mut sink = VecOutput::new(&mut out);
    let state = c.deflate(&mut input, &mut sink, FlushMode::Finish).unwrap();
    assert_eq!(state, BlockState::FinishDone);
    assert!(input.is_empty());
    sink.drain_from(&mut c.bits);
    out
}

fn compressor(level: i32, strategy: Strategy) -> Compressor {
    Compressor::new(15, 8, level, strategy, RunningChecksum::None).unwrap()
}

#[test]
fn every_level_round_trips() {
    let data = sample(100_000);
    for level in 0..=9 {
        let mut c = compressor(level, Strategy::Default);
        let raw = run(&mut c, &data);
        assert_eq!(inflate(&raw), data, "level {}", level);
        assert_eq!(c.total_in, data.len() as u64);
    }
}

#[test]
fn every_strategy_round_trips() {
    let data = sample(70_000);
    for strategy in [
        Strategy::Default,
        Strategy::Filtered,
        Strategy::HuffmanOnly,
        Strategy::Rle,
        Strategy::Fixed,
    ] {
        let mut c = compressor(6, strategy);
        let raw = run(&mut c, &data);
        assert_eq!(inflate(&raw), data, "{:?}", strategy);
    }
}

#[test]
fn higher_levels_do_not_grow_output() {
    let data = sample(200_000);
    let l1 = run(&mut compressor(1, Strategy::Default), &data).len();
    let l9 = run(&mut compressor(9, Strategy::Default), &data).len();
    assert!(l9 <= l1, "level 9 {} > level 1 {}", l9, l1);
}

#[test]
fn huffman_only_ignores_repeats() {
    let data = vec![b'r'; 50_000];
    let huff = run(&mut compressor(6, Strategy::HuffmanOnly), &data).len();
    let rle = run(&mut compressor(6, Strategy::Rle), &data).len();
    // One bit per literal at best versus a handful of long matches.
    assert!(huff > 50_000 / 8);
    assert!(rle < 1000);
}

#[test]
fn level_zero_emits_stored_blocks() {
    let data = sample(1000);
    let mut c = compressor(0, Strategy::Default);
    let raw = run(&mut c, &data);
    assert_eq!(raw[0] & 0x07, 0x01);
    assert_eq!(u16::from_le_bytes([raw[1], raw[2]]) as usize, data.len());
    assert_eq!(raw.len(), data.len() + 5);
    assert_eq!(c.last_plan().map(|p| p.kind), Some(BlockKind::Stored));
}

#[test]
fn fixed_strategy_uses_static_trees() {
    let data = sample(20_000);
    let mut c = compressor(6, Strategy::Fixed);
    let raw = run(&mut c, &data);
    // BTYPE 01 in the first block header.
    assert_eq!((raw[0] >> 1) & 0x03, 0x01);
    assert_eq!(inflate(&raw), data);
}

#[test]
fn empty_input_finishes_with_one_block() {
    let mut c = compressor(6, Strategy::Default);
    let raw = run(&mut c, b"");
    assert_eq!(raw, vec![0x03, 0x00]);
    assert!(inflate(&raw).is_empty());
}

#[test]
fn no_flush_keeps_data_buffered() {
    let mut c = compressor(6, Strategy::Default);
    let data = sample(1000);
    let mut out = Vec::new();
    let mut input = &data[..];
    let state = c
        .deflate(&mut input, &mut VecOutput::new(&mut out), FlushMode::None)
        .unwrap();
    assert_eq!(state, BlockState::NeedMore);
    assert!(input.is_empty());
    assert!(out.is_empty());
    assert_eq!(c.total_in, 1000);
}

#[test]
fn checksum_tracks_consumed_input() {
    let data = sample(40_000);
    let mut c = Compressor::new(15, 8, 6, Strategy::Default, RunningChecksum::Crc32(Crc32::new())).unwrap();
    run(&mut c, &data);
    assert_eq!(c.checksum.value(), crc32(&data));

    let mut c = Compressor::new(15, 8, 6, Strategy::Default, RunningChecksum::Adler32(Adler32::new())).unwrap();
    run(&mut c, &data);
    assert_eq!(c.checksum.value(), adler32(&data));
}

#[test]
fn small_window_and_memory_round_trip() {
    let data = sample(30_000);
    for (w_bits, mem_level) in [(9, 1), (10, 2), (12, 9)] {
        let mut c = Compressor::new(w_bits, mem_level, 9, Strategy::Default, RunningChecksum::None).unwrap();
        assert_eq!(inflate(&run(&mut c, &data)), data, "w_bits {} mem {}", w_bits, mem_level);
    }
}

#[test]
fn set_params_between_blocks() {
    let data = sample(60_000);
    let mut c = compressor(1, Strategy::Default);
    let mut out = Vec::new();
    let mut input = &data[..30_000];
    let state = c
        .deflate(&mut input, &mut VecOutput::new(&mut out), FlushMode::Block)
        .unwrap();
    assert_eq!(state, BlockState::BlockDone);

    c.set_params(9, Strategy::Filtered);
    assert_eq!(c.level(), 9);
    assert_eq!(c.strategy(), Strategy::Filtered);
    let mut input = &data[30_000..];
    let mut sink = VecOutput::new(&mut out);
    c.deflate(&mut input, &mut sink, FlushMode::Finish).unwrap();
    sink.drain_from(&mut c.bits);
    assert_eq!(inflate(&out), data);
}

#[test]
fn dictionary_enables_back_references() {
    let dict = b"the quick brown fox jumps over the lazy dog";
    let data = b"the lazy dog jumps over the quick brown fox";
    let plain = run(&mut compressor(9, Strategy::Default), data).len();
    let mut c = compressor(9, Strategy::Default);
    c.set_dictionary(dict);
    let primed = run(&mut c, data);
    assert!(primed.len() < plain);
    assert_eq!(c.total_in, data.len() as u64);
}

#[test]
fn reset_reproduces_output() {
    let data = sample(25_000);
    let mut c = compressor(6, Strategy::Default);
    let first = run(&mut c, &data);
    c.reset();
    assert_eq!(c.total_in, 0);
    let second = run(&mut c, &data);
    assert_eq!(first, second);
}
