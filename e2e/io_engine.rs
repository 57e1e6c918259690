//! E2E Test Suite 04: IO Engine
//!
//! Validates the `gzr::io` file-level functions on real temp files:
//! single and multiple inputs, recursive lists, attribute copying and the
//! overwrite policy.

use std::fs;
use std::io::Read;
use std::path::Path;

use gzr::io::prefs::{set_notification_level, Prefs};
use gzr::io::{compress_filename, compress_multiple_filenames, NUL_MARK};
use gzr::util::create_file_list;
use gzr::{Format, Strategy};
use tempfile::TempDir;

// Silence progress output in all tests.
fn silent_prefs() -> Prefs {
    set_notification_level(0);
    Prefs::default()
}

fn gunzip_file(path: &Path) -> Vec<u8> {
    let data = fs::read(path).unwrap();
    let mut out = Vec::new();
    flate2::read::GzDecoder::new(&data[..]).read_to_end(&mut out).unwrap();
    out
}

fn s(p: &Path) -> &str {
    p.to_str().unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: compress one file, source replaced by <name>.gz
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_compress_replaces_source() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("input.txt");
    let dst = dir.path().join("input.txt.gz");

    let original: Vec<u8> = b"abcdefghijklmnopqrstuvwxyz0123456789"
        .iter()
        .cycle()
        .take(64 * 1024)
        .cloned()
        .collect();
    fs::write(&src, &original).unwrap();

    let stats = compress_filename(s(&src), s(&dst), &silent_prefs()).unwrap();
    assert_eq!(stats.bytes_in, original.len() as u64);
    assert_eq!(stats.bytes_out, fs::metadata(&dst).unwrap().len());
    assert!(!src.exists(), "source should be removed");
    assert_eq!(gunzip_file(&dst), original);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: the level changes output size, not content
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_levels_and_strategies() {
    let dir = TempDir::new().unwrap();
    let original: Vec<u8> = (0..300_000u32).map(|i| b"the cat sat on the mat "[(i % 23) as usize] ^ (i / 5000) as u8).collect();

    let mut sizes = Vec::new();
    for (level, strategy) in [(0, Strategy::Default), (1, Strategy::Default), (9, Strategy::Default), (6, Strategy::HuffmanOnly)] {
        let src = dir.path().join(format!("in_{}_{:?}", level, strategy));
        fs::write(&src, &original).unwrap();
        let dst = dir.path().join(format!("in_{}_{:?}.gz", level, strategy));
        let mut prefs = silent_prefs();
        prefs.set_level(level);
        prefs.set_strategy(strategy);
        let stats = compress_filename(s(&src), s(&dst), &prefs).unwrap();
        assert_eq!(gunzip_file(&dst), original, "level {} {:?}", level, strategy);
        sizes.push(stats.bytes_out);
    }
    assert!(sizes[0] > original.len() as u64, "stored output carries block overhead");
    assert!(sizes[2] <= sizes[1]);
    assert!(sizes[1] < sizes[3]);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: zlib output from the file layer
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_zlib_file_output() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("data.bin");
    let dst = dir.path().join("data.bin.zz");
    fs::write(&src, vec![42u8; 10_000]).unwrap();

    let mut prefs = silent_prefs();
    prefs.set_format(Format::Zlib);
    prefs.set_keep_source(true);
    compress_filename(s(&src), s(&dst), &prefs).unwrap();

    let data = fs::read(&dst).unwrap();
    assert_eq!(data[0], 0x78);
    let mut out = Vec::new();
    flate2::read::ZlibDecoder::new(&data[..]).read_to_end(&mut out).unwrap();
    assert_eq!(out, vec![42u8; 10_000]);
    assert!(src.exists());
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: recursive list + multiple files
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_recursive_tree_compression() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("tree");
    fs::create_dir_all(root.join("a/b")).unwrap();
    fs::write(root.join("top.txt"), b"top level").unwrap();
    fs::write(root.join("a/mid.txt"), b"middle level").unwrap();
    fs::write(root.join("a/b/deep.txt"), b"deepest level").unwrap();

    let files = create_file_list(&[root.as_path()]).unwrap();
    assert_eq!(files.len(), 3);
    let names: Vec<&str> = files.iter().map(|p| p.to_str().unwrap()).collect();

    let missed = compress_multiple_filenames(&names, ".gz", &silent_prefs()).unwrap();
    assert_eq!(missed, 0);
    assert_eq!(gunzip_file(&root.join("top.txt.gz")), b"top level");
    assert_eq!(gunzip_file(&root.join("a/mid.txt.gz")), b"middle level");
    assert_eq!(gunzip_file(&root.join("a/b/deep.txt.gz")), b"deepest level");
    assert!(!root.join("a/b/deep.txt").exists());
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 5: an existing output is kept unless overwrite is set
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_overwrite_policy() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("f.txt");
    let dst = dir.path().join("f.txt.gz");
    fs::write(&src, b"new content").unwrap();
    fs::write(&dst, b"old output").unwrap();

    let mut prefs = silent_prefs();
    assert!(compress_filename(s(&src), s(&dst), &prefs).is_err());
    assert_eq!(fs::read(&dst).unwrap(), b"old output");
    assert!(src.exists());

    prefs.set_overwrite(true);
    compress_filename(s(&src), s(&dst), &prefs).unwrap();
    assert_eq!(gunzip_file(&dst), b"new content");
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 6: custom suffix and the null device
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_custom_suffix_and_null_device() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("log");
    fs::write(&src, b"log line\n".repeat(100)).unwrap();

    let mut prefs = silent_prefs();
    prefs.set_keep_source(true);
    prefs.set_suffix(".z");
    let missed = compress_multiple_filenames(&[s(&src)], ".z", &prefs).unwrap();
    assert_eq!(missed, 0);
    assert_eq!(gunzip_file(&dir.path().join("log.z")), b"log line\n".repeat(100));

    let stats = compress_filename(s(&src), NUL_MARK, &prefs).unwrap();
    assert_eq!(stats.bytes_in, 900);
    assert!(src.exists());
}
