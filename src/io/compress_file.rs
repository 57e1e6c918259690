//! File-to-file compression.
//!
//! [`compress_filename`] compresses one input into one output; the
//! multi-file entry point derives each output name from a suffix. Both read
//! the source in `prefs.block_size` chunks, push each chunk through one
//! [`DeflateStream`] and write whatever the stream returns.
//!
//! After a successful run the output receives the source's times, owner and
//! permissions, and the source is removed unless `keep_source` (or stdout
//! output) says otherwise. A failed run removes its partial output.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use anyhow::{bail, Context};

use crate::frame::compress::DeflateStream;
use crate::frame::types::FlushMode;
use crate::io::file_io::{open_dst_file, open_src_file, NUL_MARK, STDIN_MARK, STDOUT_MARK};
use crate::io::prefs::Prefs;
use crate::util::{set_file_stat, FileStat};

/// Byte counts for one compressed input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompressStats {
    pub bytes_in: u64,
    pub bytes_out: u64,
}

impl CompressStats {
    /// Output size as a percentage of the input (100 for empty input).
    pub fn ratio_percent(&self) -> f64 {
        if self.bytes_in == 0 {
            100.0
        } else {
            self.bytes_out as f64 / self.bytes_in as f64 * 100.0
        }
    }
}

fn read_to_capacity(reader: &mut dyn Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}

/// Compress everything `reader` yields into `writer` as one stream.
pub fn compress_stream(
    reader: &mut dyn Read,
    writer: &mut dyn Write,
    stream: &mut DeflateStream,
    block_size: usize,
) -> anyhow::Result<CompressStats> {
    let mut buf = vec![0u8; block_size.max(1)];
    let mut stats = CompressStats::default();

    loop {
        let n = read_to_capacity(reader, &mut buf).context("read error")?;
        if n == 0 {
            break;
        }
        stats.bytes_in += n as u64;
        let out = stream.push(&buf[..n], FlushMode::None)?;
        writer.write_all(&out).context("write error")?;
        stats.bytes_out += out.len() as u64;
        crate::displaylevel!(
            3,
            "\rRead : {} MiB   ==> {:.2}%   ",
            stats.bytes_in >> 20,
            stats.ratio_percent()
        );
        if n < buf.len() {
            break;
        }
    }

    let tail = stream.finish()?;
    writer.write_all(&tail).context("write error")?;
    writer.flush().context("write error")?;
    stats.bytes_out += tail.len() as u64;
    Ok(stats)
}

/// Output name for `src` under `prefs`.
pub fn dst_filename(src: &str, suffix: &str, prefs: &Prefs) -> String {
    if prefs.to_stdout || src == STDIN_MARK {
        STDOUT_MARK.to_owned()
    } else {
        format!("{}{}", src, suffix)
    }
}

fn compress_file_inner(src: &str, dst: &str, prefs: &Prefs) -> anyhow::Result<CompressStats> {
    let from_stdin = src == STDIN_MARK;
    let src_stat = if from_stdin {
        None
    } else {
        Some(FileStat::of(Path::new(src)).with_context(|| format!("{}: cannot stat", src))?)
    };

    let name = if from_stdin {
        None
    } else {
        Path::new(src).file_name().and_then(|n| n.to_str())
    };
    let mtime = src_stat.as_ref().map_or(0, FileStat::mtime_secs);
    let mut stream = DeflateStream::open(prefs.stream_config(name, mtime))?;

    let mut reader = open_src_file(src).with_context(|| format!("{}: cannot open", src))?;
    let mut dst_file = open_dst_file(dst, prefs).with_context(|| format!("{}: cannot create", dst))?;
    let result = compress_stream(&mut *reader, &mut dst_file, &mut stream, prefs.block_size);
    let dst_is_regular = dst_file.is_regular;
    drop(dst_file);

    let stats = match result {
        Ok(stats) => stats,
        Err(e) => {
            if dst_is_regular {
                let _ = fs::remove_file(dst);
            }
            return Err(e.context(format!("{}: compression failed", src)));
        }
    };

    if dst_is_regular {
        if let Some(stat) = &src_stat {
            if let Err(e) = set_file_stat(Path::new(dst), stat) {
                crate::displaylevel!(2, "{}: cannot copy file attributes: {}\n", dst, e);
            }
        }
    }

    if !prefs.keep_source && !prefs.to_stdout && !from_stdin && dst != NUL_MARK {
        fs::remove_file(src).with_context(|| format!("{}: cannot remove source", src))?;
    }

    crate::displaylevel!(2, "\r{:79}\r", "");
    crate::displaylevel!(
        2,
        "{:<30} : {:6.2}% ({} => {} bytes, {})\n",
        if from_stdin { "stdin" } else { src },
        stats.ratio_percent(),
        stats.bytes_in,
        stats.bytes_out,
        if dst == STDOUT_MARK { "stdout" } else { dst }
    );
    Ok(stats)
}

/// Compress `src` into `dst`.
///
/// `src` may be `"-"` for stdin and `dst` may be `"-"` for stdout.
/// A source that already carries `prefs.suffix` is refused unless
/// `prefs.overwrite` is set.
pub fn compress_filename(src: &str, dst: &str, prefs: &Prefs) -> anyhow::Result<CompressStats> {
    if src != STDIN_MARK && !prefs.suffix.is_empty() && src.ends_with(&prefs.suffix) && !prefs.overwrite {
        bail!("{} already has {} suffix -- unchanged", src, prefs.suffix);
    }
    compress_file_inner(src, dst, prefs)
}

/// Compress every file in `srcs`, naming each output `<src><suffix>` (or
/// stdout when `prefs.to_stdout`). Keeps going after a failure and returns
/// the number of inputs that failed; each failure is reported at level 1.
pub fn compress_multiple_filenames(srcs: &[&str], suffix: &str, prefs: &Prefs) -> anyhow::Result<usize> {
    if suffix.is_empty() && !prefs.to_stdout {
        bail!("empty suffix would overwrite the input files");
    }
    let mut missed_files = 0usize;
    let mut total = CompressStats::default();

    for &src in srcs {
        let dst = dst_filename(src, suffix, prefs);
        match compress_filename(src, &dst, prefs) {
            Ok(stats) => {
                total.bytes_in += stats.bytes_in;
                total.bytes_out += stats.bytes_out;
            }
            Err(e) => {
                crate::displaylevel!(1, "gzr: {:#}\n", e);
                missed_files += 1;
            }
        }
    }

    if srcs.len() > 1 {
        crate::displaylevel!(
            3,
            "{} files compressed : {} => {} bytes ({:.2}%)\n",
            srcs.len() - missed_files,
            total.bytes_in,
            total.bytes_out,
            total.ratio_percent()
        );
    }
    Ok(missed_files)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
