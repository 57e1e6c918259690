// File type checks and attribute copying (src/util/file_status.rs).

use std::fs::{self, File};

use filetime::FileTime;
use gzr::util::{is_directory, is_reg_file, set_file_stat, FileStat};
use tempfile::TempDir;

#[test]
fn type_checks() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("f");
    File::create(&file).unwrap();
    assert!(is_reg_file(&file));
    assert!(!is_directory(&file));
    assert!(is_directory(dir.path()));
    assert!(!is_reg_file(dir.path()));
    assert!(!is_reg_file(&dir.path().join("missing")));
}

#[test]
fn stat_captures_mtime() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("f");
    File::create(&file).unwrap();
    filetime::set_file_mtime(&file, FileTime::from_unix_time(1_500_000_000, 0)).unwrap();
    let st = FileStat::of(&file).unwrap();
    assert_eq!(st.mtime_secs(), 1_500_000_000);
}

#[test]
fn pre_epoch_mtime_reads_as_zero() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("old");
    File::create(&file).unwrap();
    filetime::set_file_mtime(&file, FileTime::from_unix_time(-10, 0)).unwrap();
    assert_eq!(FileStat::of(&file).unwrap().mtime_secs(), 0);
}

#[test]
fn copy_times_between_files() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("src");
    let dst = dir.path().join("dst");
    fs::write(&src, b"s").unwrap();
    fs::write(&dst, b"d").unwrap();
    filetime::set_file_times(
        &src,
        FileTime::from_unix_time(1_400_000_000, 0),
        FileTime::from_unix_time(1_450_000_000, 0),
    )
    .unwrap();

    set_file_stat(&dst, &FileStat::of(&src).unwrap()).unwrap();
    let meta = fs::metadata(&dst).unwrap();
    assert_eq!(FileTime::from_last_modification_time(&meta).unix_seconds(), 1_450_000_000);
}

#[cfg(unix)]
#[test]
fn copy_permissions() {
    use std::os::unix::fs::PermissionsExt;
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("src");
    let dst = dir.path().join("dst");
    fs::write(&src, b"s").unwrap();
    fs::write(&dst, b"d").unwrap();
    fs::set_permissions(&src, fs::Permissions::from_mode(0o640)).unwrap();

    set_file_stat(&dst, &FileStat::of(&src).unwrap()).unwrap();
    assert_eq!(fs::metadata(&dst).unwrap().permissions().mode() & 0o777, 0o640);
}

#[test]
fn set_stat_rejects_directories() {
    let dir = TempDir::new().unwrap();
    let file = dir.path().join("f");
    File::create(&file).unwrap();
    let st = FileStat::of(&file).unwrap();
    assert!(set_file_stat(dir.path(), &st).is_err());
}
