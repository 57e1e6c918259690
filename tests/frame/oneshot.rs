// One-shot helpers: compress / gzip / zlib / deflate_raw.

use std::io::Read;

use gzr::{compress, deflate_raw, gzip, zlib, Config, DeflateError, Format, Strategy};

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

fn inflate(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    flate2::read::DeflateDecoder::new(data).read_to_end(&mut out).unwrap();
    out
}

#[test]
fn gzip_roundtrip_small() {
    let data = b"hello world, this is a one-shot gzip test!";
    let out = gzip(data, 6).unwrap();
    assert_eq!(&out[..3], &[0x1F, 0x8B, 0x08]);
    assert_eq!(gunzip(&out), data);
}

#[test]
fn gzip_roundtrip_empty() {
    let out = gzip(b"", 6).unwrap();
    // Header, empty fixed block, trailer.
    assert_eq!(out.len(), 10 + 2 + 8);
    assert!(gunzip(&out).is_empty());
}

#[test]
fn zlib_default_header() {
    let out = zlib(b"abc", 6).unwrap();
    assert_eq!(&out[..2], &[0x78, 0x9C]);
    assert_eq!(unzlib(&out), b"abc");
}

#[test]
fn zlib_matches_reference_for_empty_input() {
    // Same bytes zlib itself produces for compress2("", level 6).
    assert_eq!(zlib(b"", 6).unwrap(), vec![0x78, 0x9C, 0x03, 0x00, 0x00, 0x00, 0x00, 0x01]);
}

#[test]
fn raw_has_no_framing() {
    let data = vec![b'x'; 10_000];
    let raw = deflate_raw(&data, 9).unwrap();
    assert_ne!(raw[0], 0x1F);
    assert_eq!(inflate(&raw), data);
}

#[test]
fn large_input_every_level() {
    let data: Vec<u8> = (0..300_000u32).map(|i| ((i % 251) ^ (i >> 10)) as u8).collect();
    for level in 0..=9 {
        assert_eq!(gunzip(&gzip(&data, level).unwrap()), data, "level {}", level);
    }
}

#[test]
fn compressible_input_shrinks() {
    let data = b"abcdefgh".repeat(10_000);
    let out = gzip(&data, 6).unwrap();
    assert!(out.len() < data.len() / 50);
}

#[test]
fn level_zero_never_compresses() {
    let data = b"abcdefgh".repeat(1000);
    let out = gzip(&data, 0).unwrap();
    assert!(out.len() > data.len());
    assert_eq!(gunzip(&out), data);
}

#[test]
fn invalid_level_is_an_error() {
    assert_eq!(gzip(b"x", 12), Err(DeflateError::LevelInvalid(12)));
    assert_eq!(zlib(b"x", -3), Err(DeflateError::LevelInvalid(-3)));
}

#[test]
fn config_variants_decode() {
    let data: Vec<u8> = b"variant ".iter().cycle().take(40_000).cloned().collect();
    let configs = [
        Config::default().with_window_bits(9),
        Config::default().with_window_bits(8).with_format(Format::Zlib),
        Config::default().with_mem_level(1),
        Config::default().with_mem_level(9).with_level(9),
        Config::default().with_strategy(Strategy::Filtered),
        Config::default().with_strategy(Strategy::HuffmanOnly),
        Config::default().with_strategy(Strategy::Rle),
        Config::default().with_strategy(Strategy::Fixed),
    ];
    for cfg in configs {
        let out = compress(&data, &cfg).unwrap();
        let back = match cfg.format {
            Format::Gzip => gunzip(&out),
            Format::Zlib => unzlib(&out),
            Format::Raw => inflate(&out),
        };
        assert_eq!(back, data, "{:?}", cfg);
    }
}

#[test]
fn output_is_deterministic() {
    let data: Vec<u8> = (0..50_000u32).map(|i| (i * 13 % 256) as u8).collect();
    assert_eq!(gzip(&data, 7).unwrap(), gzip(&data, 7).unwrap());
}
