//! File status helpers: regular-file and directory checks, and copying
//! times, ownership and permissions from a source file onto its output.
//!
//! Times go through the `filetime` crate; ownership uses `nix` on POSIX.

use std::fs;
use std::io;
use std::path::Path;

use filetime::FileTime;

/// Times, owner and mode captured from a source file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FileStat {
    pub atime: FileTime,
    pub mtime: FileTime,
    pub uid: u32,
    pub gid: u32,
    pub mode: u32,
}

impl FileStat {
    /// Capture the attributes of `path`.
    pub fn of(path: &Path) -> io::Result<Self> {
        let m = fs::metadata(path)?;
        #[cfg(unix)]
        let (uid, gid, mode) = {
            use std::os::unix::fs::MetadataExt;
            (m.uid(), m.gid(), m.mode())
        };
        #[cfg(not(unix))]
        let (uid, gid, mode) = (0u32, 0u32, 0o644u32);

        Ok(FileStat {
            atime: FileTime::from_last_access_time(&m),
            mtime: FileTime::from_last_modification_time(&m),
            uid,
            gid,
            mode,
        })
    }

    /// Modification time as gzip's MTIME field: seconds since the epoch,
    /// or 0 when it does not fit.
    pub fn mtime_secs(&self) -> u32 {
        u32::try_from(self.mtime.unix_seconds()).unwrap_or(0)
    }
}

/// Apply `stat` to the regular file at `path`.
///
/// Times are applied first and are the only hard failure; a failed `chown`
/// (typically: not running as root) is ignored, as is a failed `chmod` after
/// a successful time update.
pub fn set_file_stat(path: &Path, stat: &FileStat) -> io::Result<()> {
    if !is_reg_file(path) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "set_file_stat: not a regular file",
        ));
    }

    filetime::set_file_times(path, stat.atime, stat.mtime)?;

    #[cfg(unix)]
    {
        use nix::unistd::{chown, Gid, Uid};
        use std::os::unix::fs::PermissionsExt;
        let _ = chown(path, Some(Uid::from_raw(stat.uid)), Some(Gid::from_raw(stat.gid)));
        let _ = fs::set_permissions(path, fs::Permissions::from_mode(stat.mode & 0o7777));
    }

    Ok(())
}

/// Returns `true` if `path` refers to a regular file.
pub fn is_reg_file(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.file_type().is_file())
        .unwrap_or(false)
}

/// Returns `true` if `path` refers to a directory.
pub fn is_directory(path: &Path) -> bool {
    fs::metadata(path)
        .map(|m| m.file_type().is_dir())
        .unwrap_or(false)
}

// ─── Tests ────────────────────────────────────────────────────────────────────
