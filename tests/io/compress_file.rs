// File-to-file compression (src/io/compress_file.rs).

use std::fs;
use std::io::{Cursor, Read};

use gzr::io::{
    compress_filename, compress_multiple_filenames, compress_stream, dst_filename, set_notification_level,
    CompressStats, Prefs, NUL_MARK,
};
use gzr::{Config, DeflateStream, Format};
use tempfile::TempDir;

fn gunzip(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    flate2::read::GzDecoder::new(data).read_to_end(&mut out).unwrap();
    out
}

fn quiet() {
    set_notification_level(1);
}

#[test]
fn ratio_of_empty_input() {
    assert_eq!(CompressStats::default().ratio_percent(), 100.0);
    let s = CompressStats { bytes_in: 200, bytes_out: 50 };
    assert_eq!(s.ratio_percent(), 25.0);
}

#[test]
fn stream_to_zlib() {
    let data: Vec<u8> = b"zlib through the file layer ".iter().cycle().take(30_000).cloned().collect();
    let mut stream = DeflateStream::open(Config::default().with_format(Format::Zlib)).unwrap();
    let mut out = Vec::new();
    let stats = compress_stream(&mut Cursor::new(&data), &mut out, &mut stream, 4096).unwrap();
    assert_eq!(stats.bytes_in, 30_000);
    let mut back = Vec::new();
    flate2::read::ZlibDecoder::new(&out[..]).read_to_end(&mut back).unwrap();
    assert_eq!(back, data);
}

#[test]
fn stream_empty_reader() {
    let mut stream = DeflateStream::open(Config::default()).unwrap();
    let mut out = Vec::new();
    let stats = compress_stream(&mut Cursor::new(Vec::new()), &mut out, &mut stream, 1024).unwrap();
    assert_eq!(stats.bytes_in, 0);
    assert_eq!(stats.bytes_out, out.len() as u64);
    assert!(gunzip(&out).is_empty());
}

#[test]
fn suffix_is_appended() {
    let mut prefs = Prefs::default();
    assert_eq!(dst_filename("dir/file", ".z", &prefs), "dir/file.z");
    prefs.set_to_stdout(true);
    assert_eq!(dst_filename("dir/file", ".z", &prefs), "-");
}

#[test]
fn output_stores_name_and_mtime() {
    quiet();
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("named.txt");
    fs::write(&src, b"named content").unwrap();
    let mtime = filetime::FileTime::from_unix_time(1_600_000_000, 0);
    filetime::set_file_mtime(&src, mtime).unwrap();

    let src_s = src.to_str().unwrap();
    let dst = format!("{}.gz", src_s);
    let mut prefs = Prefs::default();
    prefs.set_keep_source(true);
    compress_filename(src_s, &dst, &prefs).unwrap();

    let gz = fs::read(&dst).unwrap();
    let mut d = flate2::read::GzDecoder::new(&gz[..]);
    let mut out = Vec::new();
    d.read_to_end(&mut out).unwrap();
    assert_eq!(out, b"named content");
    let h = d.header().unwrap();
    assert_eq!(h.filename(), Some(&b"named.txt"[..]));
    assert_eq!(h.mtime(), 1_600_000_000);

    // The output inherits the source mtime.
    let meta = fs::metadata(&dst).unwrap();
    assert_eq!(filetime::FileTime::from_last_modification_time(&meta).unix_seconds(), 1_600_000_000);
}

#[test]
fn force_allows_existing_suffix_and_overwrite() {
    quiet();
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("already.gz");
    fs::write(&src, b"not really gzip").unwrap();
    let dst = dir.path().join("already.gz.gz");
    fs::write(&dst, b"stale").unwrap();

    let mut prefs = Prefs::default();
    prefs.set_overwrite(true);
    prefs.set_keep_source(true);
    compress_filename(src.to_str().unwrap(), dst.to_str().unwrap(), &prefs).unwrap();
    assert_eq!(gunzip(&fs::read(&dst).unwrap()), b"not really gzip");
}

#[test]
fn refusal_keeps_existing_output() {
    quiet();
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("a.txt");
    fs::write(&src, b"fresh").unwrap();
    let dst = dir.path().join("a.txt.gz");
    fs::write(&dst, b"stale").unwrap();

    assert!(compress_filename(src.to_str().unwrap(), dst.to_str().unwrap(), &Prefs::default()).is_err());
    assert_eq!(fs::read(&dst).unwrap(), b"stale");
    assert!(src.exists());
}

#[test]
fn nul_destination_keeps_source() {
    quiet();
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("bench.bin");
    fs::write(&src, vec![5u8; 10_000]).unwrap();
    let stats = compress_filename(src.to_str().unwrap(), NUL_MARK, &Prefs::default()).unwrap();
    assert_eq!(stats.bytes_in, 10_000);
    assert!(stats.bytes_out > 0);
    assert!(src.exists());
}

#[test]
fn directory_source_fails_cleanly() {
    quiet();
    let dir = TempDir::new().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir(&sub).unwrap();
    let dst = format!("{}.gz", sub.to_str().unwrap());
    assert!(compress_filename(sub.to_str().unwrap(), &dst, &Prefs::default()).is_err());
    assert!(!std::path::Path::new(&dst).exists());
}

#[test]
fn multiple_files_all_succeed() {
    quiet();
    let dir = TempDir::new().unwrap();
    let names = ["one", "two", "three"];
    for n in names {
        fs::write(dir.path().join(n), n.repeat(100)).unwrap();
    }
    let paths: Vec<String> = names
        .iter()
        .map(|n| dir.path().join(n).to_str().unwrap().to_owned())
        .collect();
    let refs: Vec<&str> = paths.iter().map(String::as_str).collect();
    let missed = compress_multiple_filenames(&refs, ".gz", &Prefs::default()).unwrap();
    assert_eq!(missed, 0);
    for n in names {
        assert!(!dir.path().join(n).exists());
        let gz = fs::read(dir.path().join(format!("{}.gz", n))).unwrap();
        assert_eq!(gunzip(&gz), n.repeat(100).as_bytes());
    }
}

#[test]
fn multiple_files_reject_empty_suffix() {
    assert!(compress_multiple_filenames(&["x"], "", &Prefs::default()).is_err());
}
