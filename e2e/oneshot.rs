//! E2E Test Suite 01: One-Shot API
//!
//! Validates the buffer-in, buffer-out helpers exported from the crate root:
//! - compress (any Config)
//! - gzip / zlib / deflate_raw
//! - compress_bound
//!
//! Every output is decoded with flate2, which shares no code with gzr.

use std::io::Read;

use gzr::{compress, compress_bound, deflate_raw, gzip, zlib, Config, Format, Strategy};

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

fn inflate(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    flate2::read::DeflateDecoder::new(data)
        .read_to_end(&mut out)
        .expect("raw deflate stream should decode");
    out
}

/// Deterministic pseudo-random bytes (xorshift32).
fn noise(len: usize, mut seed: u32) -> Vec<u8> {
    (0..len)
        .map(|_| {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            seed as u8
        })
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: twenty identical bytes collapse into one back-reference
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_run_of_twenty_bytes_level_6() {
    let original = b"aaaaaaaaaaaaaaaaaaaa";
    let compressed = gzip(original, 6).expect("compression should succeed");

    assert_eq!(gunzip(&compressed), original);
    // 10-byte header + 8-byte trailer around the deflate body.
    let body = compressed.len() - 18;
    assert!(body < original.len(), "deflate body {} should be < 20", body);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: five random bytes survive at every level
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_five_random_bytes_every_level() {
    let original = noise(5, 0x1234_5678);
    for level in 0..=9 {
        let compressed = gzip(&original, level).expect("compression should succeed");
        assert_eq!(gunzip(&compressed), original, "level {}", level);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: typical text at every level and in every framing
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_text_every_level_every_format() {
    let original = b"The quick brown fox jumps over the lazy dog. ".repeat(500);
    for level in 0..=9 {
        assert_eq!(gunzip(&gzip(&original, level).unwrap()), original, "gzip level {}", level);
        assert_eq!(unzlib(&zlib(&original, level).unwrap()), original, "zlib level {}", level);
        assert_eq!(inflate(&deflate_raw(&original, level).unwrap()), original, "raw level {}", level);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: every strategy on mixed data
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_every_strategy_round_trips() {
    let mut original = b"header line\n".repeat(200);
    original.extend(noise(10_000, 99));
    original.extend(std::iter::repeat(0u8).take(5000));

    for strategy in [
        Strategy::Default,
        Strategy::Filtered,
        Strategy::HuffmanOnly,
        Strategy::Rle,
        Strategy::Fixed,
    ] {
        let cfg = Config::default().with_strategy(strategy);
        let compressed = compress(&original, &cfg).expect("compression should succeed");
        assert_eq!(gunzip(&compressed), original, "{:?}", strategy);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 5: output never exceeds compress_bound
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_output_within_bound() {
    for (len, seed) in [(0, 1), (1, 2), (100, 3), (70_000, 4), (300_000, 5)] {
        let original = noise(len, seed);
        for format in [Format::Gzip, Format::Zlib, Format::Raw] {
            for level in [0, 1, 6, 9] {
                let cfg = Config::default().with_format(format).with_level(level);
                let compressed = compress(&original, &cfg).unwrap();
                let bound = compress_bound(original.len(), &cfg);
                assert!(
                    compressed.len() <= bound,
                    "{:?} level {} len {}: {} > {}",
                    format,
                    level,
                    len,
                    compressed.len(),
                    bound
                );
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 6: large compressible input shrinks a lot
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_large_input_ratio() {
    let original: Vec<u8> = b"abcdefghijklmnopqrstuvwxyz0123456789"
        .iter()
        .cycle()
        .take(1 << 20)
        .cloned()
        .collect();
    let compressed = gzip(&original, 9).unwrap();
    assert!(
        compressed.len() < original.len() / 100,
        "1 MiB of a 36-byte cycle compressed to {} bytes",
        compressed.len()
    );
    assert_eq!(gunzip(&compressed), original);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 7: preset dictionary (zlib framing)
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_dictionary_sets_fdict_and_shrinks_output() {
    let dict = b"common prefix shared by every message: ".to_vec();
    let message = b"common prefix shared by every message: hello".to_vec();

    let plain = compress(&message, &Config::default().gzip(false)).unwrap();
    let with_dict = compress(&message, &Config::default().gzip(false).with_dictionary(dict.clone())).unwrap();

    // FDICT bit in FLG, then the dictionary's Adler-32 in big-endian order.
    assert_ne!(with_dict[1] & 0x20, 0);
    assert_eq!(&with_dict[2..6], &gzr::adler32(&dict).to_be_bytes());
    assert!(with_dict.len() < plain.len() + 4);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 8: invalid configuration is rejected up front
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_invalid_config_rejected() {
    assert!(gzip(b"x", 10).is_err());
    assert!(compress(b"x", &Config::default().with_window_bits(16)).is_err());
    assert!(compress(b"x", &Config::default().with_mem_level(0)).is_err());
    assert!(compress(b"x", &Config::default().with_dictionary(b"d".to_vec())).is_err());
}
