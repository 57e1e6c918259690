//! File I/O primitives for the compression pipeline.
//!
//! - [`open_src_file`] - resolves a path string to a `Box<dyn Read>`,
//!   handling the `"-"` stdin sentinel and rejecting directories.
//! - [`open_dst_file`] - resolves a path string to a [`DstFile`], handling
//!   the `"-"` stdout sentinel and [`NUL_MARK`], and enforcing the
//!   overwrite policy from [`Prefs`].

use std::fs::{File, OpenOptions};
use std::io::{self, BufReader, IsTerminal, Read, Write};
use std::path::Path;

use crate::io::prefs::{notification_level, Prefs};
use crate::util::is_directory;

// ---------------------------------------------------------------------------
// Sentinel strings
// ---------------------------------------------------------------------------

/// Sentinel: read from standard input.
pub const STDIN_MARK: &str = "-";

/// Sentinel: write to standard output.
pub const STDOUT_MARK: &str = "-";

/// Sentinel: discard output.
#[cfg(windows)]
pub const NUL_MARK: &str = "nul";
#[cfg(not(windows))]
pub const NUL_MARK: &str = "/dev/null";

// ---------------------------------------------------------------------------
// Source file
// ---------------------------------------------------------------------------

/// Opens a source for reading.
///
/// - `"-"` returns standard input.
/// - A directory is an [`io::ErrorKind::InvalidInput`] error.
/// - Anything else is opened and wrapped in a [`BufReader`].
pub fn open_src_file(path: &str) -> io::Result<Box<dyn Read>> {
    if path == STDIN_MARK {
        crate::displaylevel!(4, "Using stdin for input\n");
        return Ok(Box::new(io::stdin()));
    }

    if is_directory(Path::new(path)) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{}: is a directory", path),
        ));
    }

    let f = File::open(path)?;
    Ok(Box::new(BufReader::new(f)))
}

// ---------------------------------------------------------------------------
// Destination file
// ---------------------------------------------------------------------------

/// A write-capable destination produced by [`open_dst_file`].
pub struct DstFile {
    inner: Box<dyn Write>,
    pub is_stdout: bool,
    /// `true` when the destination is a file this call created.
    pub is_regular: bool,
}

impl Write for DstFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.write(buf)
    }
    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Opens a destination for writing.
///
/// - `"-"` → stdout.
/// - [`NUL_MARK`] → [`io::sink`].
///
/// An existing regular file is replaced only when `prefs.overwrite` is set,
/// or after an interactive confirmation when stdin is a terminal and the
/// notification level is above 1.
pub fn open_dst_file(path: &str, prefs: &Prefs) -> io::Result<DstFile> {
    if path == STDOUT_MARK {
        crate::displaylevel!(4, "Using stdout for output\n");
        return Ok(DstFile {
            inner: Box::new(io::stdout()),
            is_stdout: true,
            is_regular: false,
        });
    }

    if path == NUL_MARK {
        return Ok(DstFile {
            inner: Box::new(io::sink()),
            is_stdout: false,
            is_regular: false,
        });
    }

    if !prefs.overwrite && Path::new(path).exists() {
        if notification_level() <= 1 || !io::stdin().is_terminal() {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{}: already exists; not overwritten", path),
            ));
        }
        eprint!("{} already exists; do you want to overwrite (y/N) ? ", path);
        let _ = io::stderr().flush();
        let mut line = String::new();
        io::stdin().read_line(&mut line)?;
        let first = line.trim_start().chars().next().unwrap_or('\0');
        if first != 'y' && first != 'Y' {
            return Err(io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{}: not overwritten", path),
            ));
        }
    }

    let f = OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;

    Ok(DstFile {
        inner: Box::new(io::BufWriter::new(f)),
        is_stdout: false,
        is_regular: true,
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
