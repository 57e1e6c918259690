// e2e/cli_integration.rs - CLI integration tests
//
// Tests the `gzr` binary as a black-box CLI tool using std::process::Command.
// Covers argument parsing, file naming, stdin/stdout handling, exit codes and
// the overwrite policy. Outputs are decoded with flate2.

use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

/// Locate the `gzr` binary produced by Cargo.
fn gzr_bin() -> PathBuf {
    if let Some(p) = option_env!("CARGO_BIN_EXE_gzr") {
        return PathBuf::from(p);
    }
    let mut p = std::env::current_exe().unwrap();
    p.pop(); // remove test binary filename
    if p.ends_with("deps") {
        p.pop();
    }
    p.push("gzr");
    p
}

fn gzr() -> Command {
    let mut cmd = Command::new(gzr_bin());
    cmd.env_remove("GZR_CLEVEL");
    cmd
}

/// Create a TempDir containing a text file with ~4 KB of content.
fn make_temp_input() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let input_path = dir.path().join("input.txt");
    let content = "Hello, gzip!\n".repeat(315); // ~4 KB
    fs::write(&input_path, content).unwrap();
    (dir, input_path)
}

fn gunzip(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    flate2::read::GzDecoder::new(data)
        .read_to_end(&mut out)
        .expect("output should be a valid gzip stream");
    out
}

fn gunzip_file(path: &Path) -> Vec<u8> {
    gunzip(&fs::read(path).unwrap())
}

// ── 1. Compress in place ─────────────────────────────────────────────────────

#[test]
fn test_cli_compress_replaces_input() {
    let (dir, input) = make_temp_input();
    let original = fs::read(&input).unwrap();

    let status = gzr()
        .args(["-q", input.to_str().unwrap()])
        .current_dir(dir.path())
        .status()
        .expect("failed to run gzr");
    assert!(status.success(), "compress should exit 0");

    let gz = dir.path().join("input.txt.gz");
    assert!(gz.exists(), "input.txt.gz should exist");
    assert!(!input.exists(), "input should be removed");
    assert_eq!(gunzip_file(&gz), original);
}

// ── 2. -k keeps the input ────────────────────────────────────────────────────

#[test]
fn test_cli_keep() {
    let (dir, input) = make_temp_input();
    let status = gzr()
        .args(["-q", "-k", input.to_str().unwrap()])
        .status()
        .unwrap();
    assert!(status.success());
    assert!(input.exists());
    assert!(dir.path().join("input.txt.gz").exists());
}

// ── 3. -c writes to stdout ───────────────────────────────────────────────────

#[test]
fn test_cli_stdout() {
    let (dir, input) = make_temp_input();
    let original = fs::read(&input).unwrap();

    let output = gzr().args(["-c", input.to_str().unwrap()]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(gunzip(&output.stdout), original);
    assert!(input.exists(), "-c implies keep");
    assert!(!dir.path().join("input.txt.gz").exists());
}

// ── 4. stdin to stdout ───────────────────────────────────────────────────────

#[test]
fn test_cli_stdin_to_stdout() {
    let data = b"piped through standard input\n".repeat(200);
    let mut child = gzr()
        .arg("-6")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    {
        let mut stdin = child.stdin.take().unwrap();
        stdin.write_all(&data).unwrap();
    }
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());
    assert_eq!(gunzip(&output.stdout), data);
    // No name is stored for stdin.
    assert_eq!(output.stdout[3] & 0x08, 0);
}

// ── 5. --version ─────────────────────────────────────────────────────────────

#[test]
fn test_cli_version() {
    let output = gzr().arg("--version").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("gzr"), "version output: {}", stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

// ── 6. --help ────────────────────────────────────────────────────────────────

#[test]
fn test_cli_help() {
    let output = gzr().arg("--help").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage"));
    assert!(stdout.contains("--stdout"));
    assert!(stdout.contains("--format"));
}

// ── 7. Bad usage exits 1 ─────────────────────────────────────────────────────

#[test]
fn test_cli_bad_usage() {
    let output = gzr().arg("--no-such-option").output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(!output.stderr.is_empty());

    let output = gzr().args(["-L", "10", "-c"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));

    let output = gzr().args(["--format", "zip", "-c"]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
}

// ── 8. Missing input ─────────────────────────────────────────────────────────

#[test]
fn test_cli_missing_input() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.txt");
    let output = gzr().arg(missing.to_str().unwrap()).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing.txt"), "stderr: {}", stderr);
    assert!(!dir.path().join("missing.txt.gz").exists());
}

// ── 9. Existing output: refused, then forced ─────────────────────────────────

#[test]
fn test_cli_existing_output() {
    let (dir, input) = make_temp_input();
    let original = fs::read(&input).unwrap();
    let gz = dir.path().join("input.txt.gz");
    fs::write(&gz, b"previous").unwrap();

    let output = gzr().arg(input.to_str().unwrap()).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(fs::read(&gz).unwrap(), b"previous");
    assert!(input.exists());

    let status = gzr().args(["-f", "-q", input.to_str().unwrap()]).status().unwrap();
    assert!(status.success());
    assert_eq!(gunzip_file(&gz), original);
}

// ── 10. Input that already has the suffix ────────────────────────────────────

#[test]
fn test_cli_already_suffixed_input() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("data.gz");
    fs::write(&input, b"not really gzip").unwrap();

    let output = gzr().arg(input.to_str().unwrap()).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(!dir.path().join("data.gz.gz").exists());

    let status = gzr().args(["-f", "-q", input.to_str().unwrap()]).status().unwrap();
    assert!(status.success());
    assert_eq!(gunzip_file(&dir.path().join("data.gz.gz")), b"not really gzip");
}

// ── 11. Custom suffix ────────────────────────────────────────────────────────

#[test]
fn test_cli_suffix() {
    let (dir, input) = make_temp_input();
    let status = gzr()
        .args(["-q", "-S", ".z", input.to_str().unwrap()])
        .status()
        .unwrap();
    assert!(status.success());
    assert!(dir.path().join("input.txt.z").exists());
    assert!(!dir.path().join("input.txt.gz").exists());
}

// ── 12. Several files, one missing ───────────────────────────────────────────

#[test]
fn test_cli_multiple_files_partial_failure() {
    let dir = TempDir::new().unwrap();
    let a = dir.path().join("a.txt");
    let b = dir.path().join("b.txt");
    fs::write(&a, b"file a").unwrap();
    fs::write(&b, b"file b").unwrap();
    let missing = dir.path().join("missing.txt");

    let output = gzr()
        .args([a.to_str().unwrap(), missing.to_str().unwrap(), b.to_str().unwrap()])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert_eq!(gunzip_file(&dir.path().join("a.txt.gz")), b"file a");
    assert_eq!(gunzip_file(&dir.path().join("b.txt.gz")), b"file b");
}

// ── 13. Recursive directories ────────────────────────────────────────────────

#[test]
fn test_cli_recursive() {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("tree");
    fs::create_dir_all(root.join("sub")).unwrap();
    fs::write(root.join("one.txt"), b"one").unwrap();
    fs::write(root.join("sub/two.txt"), b"two").unwrap();

    let status = gzr()
        .args(["-q", "-r", root.to_str().unwrap()])
        .status()
        .unwrap();
    assert!(status.success());
    assert_eq!(gunzip_file(&root.join("one.txt.gz")), b"one");
    assert_eq!(gunzip_file(&root.join("sub/two.txt.gz")), b"two");
    assert!(!root.join("sub/two.txt").exists());
}

#[test]
fn test_cli_recursive_empty_directory() {
    let dir = TempDir::new().unwrap();
    let empty = dir.path().join("empty");
    fs::create_dir(&empty).unwrap();

    let output = gzr().args(["-r", empty.to_str().unwrap()]).output().unwrap();
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("no input files"), "stderr: {}", stderr);
    assert!(output.stdout.is_empty());
}

// ── 14. Output framing ───────────────────────────────────────────────────────

#[test]
fn test_cli_zlib_and_raw_formats() {
    let (_dir, input) = make_temp_input();
    let original = fs::read(&input).unwrap();

    let output = gzr()
        .args(["-c", "--format", "zlib", input.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(output.stdout[0], 0x78);
    let mut out = Vec::new();
    flate2::read::ZlibDecoder::new(&output.stdout[..]).read_to_end(&mut out).unwrap();
    assert_eq!(out, original);

    let output = gzr()
        .args(["-c", "--format", "raw", "--strategy", "fixed", input.to_str().unwrap()])
        .output()
        .unwrap();
    assert!(output.status.success());
    let mut out = Vec::new();
    flate2::read::DeflateDecoder::new(&output.stdout[..]).read_to_end(&mut out).unwrap();
    assert_eq!(out, original);
}

// ── 15. Name and timestamp ───────────────────────────────────────────────────

#[test]
fn test_cli_name_and_mtime() {
    let (dir, input) = make_temp_input();
    let mtime = filetime::FileTime::from_unix_time(1_500_000_000, 0);
    filetime::set_file_mtime(&input, mtime).unwrap();

    let status = gzr().args(["-q", "-k", input.to_str().unwrap()]).status().unwrap();
    assert!(status.success());
    let gz_path = dir.path().join("input.txt.gz");
    let gz = fs::read(&gz_path).unwrap();
    assert_ne!(gz[3] & 0x08, 0, "FNAME should be set");
    assert_eq!(u32::from_le_bytes([gz[4], gz[5], gz[6], gz[7]]), 1_500_000_000);
    assert_eq!(&gz[10..20], b"input.txt\0");

    // The output inherits the source timestamp.
    let meta = fs::metadata(&gz_path).unwrap();
    assert_eq!(filetime::FileTime::from_last_modification_time(&meta), mtime);

    // -n drops both.
    let output = gzr().args(["-c", "-n", input.to_str().unwrap()]).output().unwrap();
    assert!(output.status.success());
    assert_eq!(output.stdout[3], 0);
    assert_eq!(&output.stdout[4..8], &[0, 0, 0, 0]);
}

// ── 16. Level selection ──────────────────────────────────────────────────────

#[test]
fn test_cli_levels_and_env() {
    let (_dir, input) = make_temp_input();
    let xfl = |args: &[&str], env: Option<&str>| -> u8 {
        let mut cmd = gzr();
        if let Some(v) = env {
            cmd.env("GZR_CLEVEL", v);
        }
        let output = cmd.args(args).arg("-c").arg(input.to_str().unwrap()).output().unwrap();
        assert!(output.status.success());
        output.stdout[8]
    };
    assert_eq!(xfl(&["-9"], None), 2);
    assert_eq!(xfl(&["--fast"], None), 4);
    assert_eq!(xfl(&[], None), 0);
    assert_eq!(xfl(&[], Some("9")), 2);
    assert_eq!(xfl(&[], Some("1")), 4);
    // Command-line level beats the environment.
    assert_eq!(xfl(&["-9"], Some("1")), 2);
    // Garbage in the environment falls back to the default.
    assert_eq!(xfl(&[], Some("fast")), 0);
}
