//! E2E Test Suite 03: File API
//!
//! Validates `GzWriteFile` and `gz_write_frame` as ordinary `std::io::Write`
//! sinks: composed with `io::copy`, `BufWriter` and in-memory cursors, and
//! concatenated into multi-member gzip files.

use std::io::{self, BufWriter, Cursor, Read, Write};

use gzr::{gz_write_frame, Config, Format, GzHeader, GzWriteFile};

fn gunzip_all(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    flate2::read::MultiGzDecoder::new(data)
        .read_to_end(&mut out)
        .expect("gzip members should decode");
    out
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 1: io::copy from a reader into the compressor
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_io_copy_into_writer() {
    let original: Vec<u8> = b"gzip file test data! ".iter().cycle().take(256 * 1024).cloned().collect();
    let mut gz = GzWriteFile::open(Cursor::new(Vec::new()), Config::default()).unwrap();
    let copied = io::copy(&mut Cursor::new(&original), &mut gz).unwrap();
    assert_eq!(copied, original.len() as u64);
    let compressed = gz.finish().unwrap().into_inner();
    assert_eq!(gunzip_all(&compressed), original);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 2: BufWriter in front of the compressor
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_bufwriter_stack() {
    let gz = GzWriteFile::open(Vec::new(), Config::default().with_level(9)).unwrap();
    let mut w = BufWriter::with_capacity(100, gz);
    for i in 0..5000 {
        writeln!(w, "line {:05}", i).unwrap();
    }
    let gz = w.into_inner().map_err(|e| e.into_error()).unwrap();
    let compressed = gz.finish().unwrap();

    let text = String::from_utf8(gunzip_all(&compressed)).unwrap();
    assert_eq!(text.lines().count(), 5000);
    assert_eq!(text.lines().last(), Some("line 04999"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 3: concatenated members form one multi-member file
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_multi_member_concatenation() {
    let mut file = Vec::new();
    file = gz_write_frame(file, b"member one\n", &Config::default()).unwrap();
    file = gz_write_frame(file, b"member two\n", &Config::default().with_level(1)).unwrap();
    file = gz_write_frame(file, b"", &Config::default()).unwrap();
    assert_eq!(gunzip_all(&file), b"member one\nmember two\n");
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 4: header metadata survives a file round trip
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_header_metadata_visible_to_decoder() {
    let header = GzHeader::default()
        .with_name("report.csv")
        .with_comment("nightly export")
        .with_mtime(1_234_567_890)
        .with_os(3);
    let compressed = gz_write_frame(Vec::new(), b"a,b,c\n1,2,3\n", &Config::default().with_header(header)).unwrap();

    let mut d = flate2::read::GzDecoder::new(&compressed[..]);
    let mut body = Vec::new();
    d.read_to_end(&mut body).unwrap();
    assert_eq!(body, b"a,b,c\n1,2,3\n");
    let h = d.header().expect("header should be parsed");
    assert_eq!(h.filename(), Some(&b"report.csv"[..]));
    assert_eq!(h.comment(), Some(&b"nightly export"[..]));
    assert_eq!(h.mtime(), 1_234_567_890);
    assert_eq!(h.operating_system(), 3);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 5: flush gives a decodable prefix at every step
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_flush_after_each_record() {
    let mut gz = GzWriteFile::open(Vec::new(), Config::default().gzip(false)).unwrap();
    let mut expected = Vec::new();
    for i in 0..20 {
        let rec = format!("record {} ", i);
        expected.extend_from_slice(rec.as_bytes());
        gz.write_all(rec.as_bytes()).unwrap();
        gz.flush().unwrap();

        let so_far = gz.get_ref().unwrap();
        let mut d = flate2::Decompress::new(true);
        let mut out = Vec::with_capacity(4096);
        d.decompress_vec(so_far, &mut out, flate2::FlushDecompress::Sync).unwrap();
        assert_eq!(out, expected);
    }
    let compressed = gz.finish().unwrap();
    let mut out = Vec::new();
    flate2::read::ZlibDecoder::new(&compressed[..]).read_to_end(&mut out).unwrap();
    assert_eq!(out, expected);
}

// ─────────────────────────────────────────────────────────────────────────────
// Test 6: raw framing through the writer
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_raw_writer() {
    let original = vec![7u8; 100_000];
    let compressed = gz_write_frame(Vec::new(), &original, &Config::default().with_format(Format::Raw)).unwrap();
    assert!(compressed.len() < 1000);
    let mut out = Vec::new();
    flate2::read::DeflateDecoder::new(&compressed[..]).read_to_end(&mut out).unwrap();
    assert_eq!(out, original);
}
