//! File-level streaming compression over any `W: Write`.
//!
//! # Public API
//! - [`GzWriteFile`] - streaming compressor implementing [`std::io::Write`]
//! - [`gz_write_frame`] - convenience: compress a buffer as one complete stream

use std::io::{self, Write};

use crate::error::DeflateError;
use crate::frame::compress::DeflateStream;
use crate::frame::types::{Config, FlushMode};

fn to_io(e: DeflateError) -> io::Error {
    io::Error::other(e)
}

// ─────────────────────────────────────────────────────────────────────────────
// GzWriteFile<W>
// ─────────────────────────────────────────────────────────────────────────────

/// Streaming compressor backed by any `W: Write`.
///
/// `write` feeds the stream without forcing output, `flush` emits a sync
/// point so everything written so far can be decoded, and [`finish`]
/// closes the stream and hands back the writer. Dropping an unfinished
/// writer finishes it on a best-effort basis.
///
/// [`finish`]: GzWriteFile::finish
pub struct GzWriteFile<W: Write> {
    stream: DeflateStream,
    /// `None` once `finish` has handed the writer back.
    inner: Option<W>,
    /// Set after any failure; suppresses the trailer on drop.
    errored: bool,
}

impl<W: Write> GzWriteFile<W> {
    /// Open a compressing writer with `config`. Nothing is written until the
    /// first `write`, `flush` or `finish`.
    pub fn open(writer: W, config: Config) -> Result<Self, DeflateError> {
        Ok(GzWriteFile {
            stream: DeflateStream::open(config)?,
            inner: Some(writer),
            errored: false,
        })
    }

    /// The underlying stream, for totals and checksums.
    pub fn stream(&self) -> &DeflateStream {
        &self.stream
    }

    pub fn get_ref(&self) -> Option<&W> {
        self.inner.as_ref()
    }

    fn emit(&mut self, input: &[u8], flush: FlushMode) -> io::Result<()> {
        let compressed = self.stream.push(input, flush).map_err(|e| {
            self.errored = true;
            to_io(e)
        })?;
        if compressed.is_empty() {
            return Ok(());
        }
        let writer = self
            .inner
            .as_mut()
            .ok_or_else(|| to_io(DeflateError::StreamFinished))?;
        writer.write_all(&compressed).map_err(|e| {
            self.errored = true;
            e
        })
    }

    /// Write the final block and trailer, and return the inner writer.
    pub fn finish(mut self) -> io::Result<W> {
        if self.errored {
            return Err(to_io(DeflateError::StreamFailed));
        }
        self.emit(&[], FlushMode::Finish)?;
        let mut writer = self
            .inner
            .take()
            .ok_or_else(|| to_io(DeflateError::StreamFinished))?;
        writer.flush()?;
        Ok(writer)
    }
}

impl<W: Write> Write for GzWriteFile<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.emit(buf, FlushMode::None)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.emit(&[], FlushMode::Sync)?;
        match self.inner.as_mut() {
            Some(w) => w.flush(),
            None => Ok(()),
        }
    }
}

impl<W: Write> Drop for GzWriteFile<W> {
    fn drop(&mut self) {
        if self.inner.is_none() || self.errored {
            return;
        }
        let _ = self.emit(&[], FlushMode::Finish);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Convenience
// ─────────────────────────────────────────────────────────────────────────────

/// Compress `data` as one complete stream and write it to `writer`.
///
/// Returns the writer on success.
pub fn gz_write_frame<W: Write>(writer: W, data: &[u8], config: &Config) -> io::Result<W> {
    let mut gz = GzWriteFile::open(writer, config.clone()).map_err(to_io)?;
    gz.write_all(data)?;
    gz.finish()
}
