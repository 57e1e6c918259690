//! Streaming compression.
//!
//! # Coverage
//! - Stream lifecycle: [`DeflateStream::open`], [`DeflateStream::reset`]
//! - Bounded-output driver: [`DeflateStream::compress`]
//! - Growable-output helpers: [`DeflateStream::push`],
//!   [`DeflateStream::push_str`], [`DeflateStream::finish`]
//! - Mid-stream tuning: [`DeflateStream::set_params`]
//! - One-shot: [`compress`], [`gzip`], [`zlib`], [`deflate_raw`]
//!
//! Every byte the stream produces (header, blocks, trailer) goes through the
//! compressor's pending buffer, so a caller with a small output buffer can
//! pick up where the previous call stopped.

use crate::checksum::{adler32, Adler32, Crc32, RunningChecksum};
use crate::deflate::bits::{Output, SliceOutput, VecOutput};
use crate::deflate::block::{write_stored, BlockPlan};
use crate::deflate::compress::Compressor;
use crate::deflate::types::{BlockState, DataType, FlushMode, Strategy};
use crate::error::DeflateError;
use crate::frame::header::{compress_bound, write_gzip_header, write_trailer, write_zlib_header};
use crate::frame::types::{Config, Format, Progress, ResolvedConfig, Status, StreamState};

// ─────────────────────────────────────────────────────────────────────────────
// DeflateStream
// ─────────────────────────────────────────────────────────────────────────────

/// A compression stream producing raw, zlib or gzip output.
///
/// ```
/// use gzr::{Config, DeflateStream, FlushMode};
///
/// let mut stream = DeflateStream::open(Config::default()).unwrap();
/// let mut out = stream.push(b"hello ", FlushMode::None).unwrap();
/// out.extend(stream.push(b"world", FlushMode::Sync).unwrap());
/// out.extend(stream.finish().unwrap());
/// assert_eq!(&out[..3], &[0x1F, 0x8B, 0x08]);
/// ```
pub struct DeflateStream {
    core: Box<Compressor>,
    config: Config,
    resolved: ResolvedConfig,
    /// Adler-32 of the preset dictionary, announced in a zlib header.
    dict_id: Option<u32>,
    state: StreamState,
    /// `None` until the first call, and again after a call that filled the
    /// caller's buffer.
    last_flush: Option<FlushMode>,
    /// Flush whose marker is still sitting in the pending buffer.
    queued_marker: Option<FlushMode>,
    trailer_written: bool,
    total_out: u64,
}

impl DeflateStream {
    /// Validate `config`, allocate the stream and queue the header.
    pub fn open(config: Config) -> Result<Self, DeflateError> {
        let resolved = config.resolve()?;
        let checksum = match resolved.format {
            Format::Gzip => RunningChecksum::Crc32(Crc32::new()),
            Format::Zlib => RunningChecksum::Adler32(Adler32::new()),
            Format::Raw => RunningChecksum::None,
        };
        let core = Box::new(Compressor::new(
            resolved.w_bits,
            resolved.mem_level,
            resolved.level,
            resolved.strategy,
            checksum,
        )?);
        let dict_id = config.dictionary.as_deref().map(adler32);

        let mut stream = DeflateStream {
            core,
            config,
            resolved,
            dict_id,
            state: StreamState::Init,
            last_flush: None,
            queued_marker: None,
            trailer_written: false,
            total_out: 0,
        };
        stream.start();
        Ok(stream)
    }

    /// Load the dictionary and queue the header; `Init` -> `Busy`.
    fn start(&mut self) {
        if let Some(dict) = &self.config.dictionary {
            self.core.set_dictionary(dict);
        }
        let r = &self.resolved;
        match r.format {
            Format::Gzip => write_gzip_header(&mut self.core.bits, &self.config.header, r.level, r.strategy),
            Format::Zlib => write_zlib_header(&mut self.core.bits, r.header_w_bits, r.level, r.strategy, self.dict_id),
            Format::Raw => {}
        }
        self.state = StreamState::Busy;
    }

    /// Start a new stream with the same configuration, keeping every buffer.
    pub fn reset(&mut self) {
        self.core.reset();
        self.core.set_params(self.resolved.level, self.resolved.strategy);
        self.last_flush = None;
        self.queued_marker = None;
        self.trailer_written = false;
        self.total_out = 0;
        self.state = StreamState::Init;
        self.start();
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Uncompressed bytes consumed so far.
    pub fn total_in(&self) -> u64 {
        self.core.total_in
    }

    /// Compressed bytes handed to the caller so far.
    pub fn total_out(&self) -> u64 {
        self.total_out
    }

    /// Running CRC-32 (gzip), Adler-32 (zlib) or 0 (raw).
    pub fn checksum(&self) -> u32 {
        self.core.checksum.value()
    }

    /// Guess made on the first block flushed.
    pub fn data_type(&self) -> DataType {
        self.core.block.data_type
    }

    /// Cost estimate behind the last block written.
    pub fn last_block_plan(&self) -> Option<BlockPlan> {
        self.core.last_plan()
    }

    pub fn format(&self) -> Format {
        self.resolved.format
    }

    /// Worst-case output for compressing `source_len` bytes with this
    /// stream's configuration in one call.
    pub fn compress_bound(&self, source_len: usize) -> usize {
        compress_bound(source_len, &self.config)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Driving
    // ─────────────────────────────────────────────────────────────────────

    /// Compress as much of `input` as fits into `output`.
    ///
    /// Returns how many bytes were taken and written. With
    /// [`FlushMode::Finish`], keep calling with the unconsumed input until
    /// the status is [`Status::StreamEnd`].
    ///
    /// A call that fills `output` must be repeated with the same flush mode.
    /// Once a flush marker has been queued, those repeats only drain it; no
    /// second marker is written. A flush is complete when a call returns
    /// with room left in `output`.
    ///
    /// [`Status::BufError`] means nothing could be done: `input` is empty,
    /// no output was pending, and `flush` is no stronger than the flush of
    /// the previous call (see [`FlushMode::rank`]). It is not an error; the
    /// stream is unchanged and a loop driving it can stop.
    pub fn compress(&mut self, input: &[u8], output: &mut [u8], flush: FlushMode) -> Result<Progress, DeflateError> {
        if output.is_empty() {
            return Err(DeflateError::NoProgress);
        }
        let mut rest = input;
        let mut out = SliceOutput::new(output);
        let status = self.run(&mut rest, &mut out, flush)?;
        Ok(Progress {
            consumed: input.len() - rest.len(),
            written: out.written(),
            status,
        })
    }

    /// Compress `input` and return whatever output is ready.
    pub fn push(&mut self, input: &[u8], flush: FlushMode) -> Result<Vec<u8>, DeflateError> {
        let mut rest = input;
        let mut buf = Vec::new();
        let mut out = VecOutput::new(&mut buf);
        self.run(&mut rest, &mut out, flush)?;
        Ok(buf)
    }

    pub fn push_str(&mut self, input: &str, flush: FlushMode) -> Result<Vec<u8>, DeflateError> {
        self.push(input.as_bytes(), flush)
    }

    /// Close the stream: final block plus trailer.
    pub fn finish(&mut self) -> Result<Vec<u8>, DeflateError> {
        self.push(&[], FlushMode::Finish)
    }

    /// Change level and strategy mid-stream. Data buffered under the old
    /// parameters is closed off in its own block, which is returned.
    pub fn set_params(&mut self, level: i32, strategy: Strategy) -> Result<Vec<u8>, DeflateError> {
        let level = Config::default().with_level(level).resolve()?.level;
        self.check_writable()?;
        let mut flushed = Vec::new();
        if (level, strategy) != (self.core.level(), self.core.strategy()) && self.core.total_in != 0 {
            flushed = self.push(&[], FlushMode::Block)?;
        }
        self.core.set_params(level, strategy);
        Ok(flushed)
    }

    fn check_writable(&self) -> Result<(), DeflateError> {
        match self.state {
            StreamState::Error(_) => Err(DeflateError::StreamFailed),
            StreamState::Done => Err(DeflateError::StreamFinished),
            _ => Ok(()),
        }
    }

    fn run<O: Output>(&mut self, input: &mut &[u8], out: &mut O, flush: FlushMode) -> Result<Status, DeflateError> {
        self.check_writable()?;
        let finishing = self.state == StreamState::Finishing;
        if finishing && (flush != FlushMode::Finish || !input.is_empty()) {
            return Err(DeflateError::StreamFinished);
        }

        let status = self.drive(input, out, flush);
        self.total_out += out.written() as u64;
        match status {
            Err(e) if e.is_fatal() => {
                self.state = StreamState::Error(e.kind());
                Err(e)
            }
            other => other,
        }
    }

    fn drive<O: Output>(&mut self, input: &mut &[u8], out: &mut O, flush: FlushMode) -> Result<Status, DeflateError> {
        let old_rank = self.last_flush.map_or(-1, FlushMode::rank);
        self.last_flush = Some(flush);

        // Whatever is left over from the previous call goes first.
        let had_pending = self.core.bits.pending_len() != 0;
        if had_pending {
            out.drain_from(&mut self.core.bits);
            if out.is_full() {
                // Let the next call repeat the same flush.
                self.last_flush = None;
                return Ok(Status::Ok);
            }
        }
        let queued = self.queued_marker.take();
        if input.is_empty() && flush != FlushMode::Finish {
            // The marker for this flush already went out.
            if queued.is_some_and(|m| flush.rank() <= m.rank()) {
                return Ok(Status::Ok);
            }
            if !had_pending && flush.rank() <= old_rank {
                return Ok(Status::BufError);
            }
        }

        let finishing = self.state == StreamState::Finishing;
        if !input.is_empty() || self.core.window.lookahead != 0 || (flush != FlushMode::None && !finishing) {
            let bstate = self.core.deflate(input, out, flush)?;
            if matches!(bstate, BlockState::FinishStarted | BlockState::FinishDone) {
                self.state = StreamState::Finishing;
            }
            match bstate {
                BlockState::NeedMore | BlockState::FinishStarted => {
                    if out.is_full() {
                        self.last_flush = None;
                    }
                    return Ok(Status::Ok);
                }
                BlockState::BlockDone => {
                    match flush {
                        FlushMode::Partial => self.core.block.align(&mut self.core.bits),
                        FlushMode::Sync | FlushMode::Full => {
                            write_stored(&mut self.core.bits, &[], false);
                            if flush == FlushMode::Full {
                                self.core.full_flush();
                            }
                        }
                        _ => {}
                    }
                    out.drain_from(&mut self.core.bits);
                    if out.is_full() {
                        self.last_flush = None;
                        if flush != FlushMode::None {
                            self.queued_marker = Some(flush);
                        }
                        return Ok(Status::Ok);
                    }
                }
                BlockState::FinishDone => {}
            }
        }

        if flush != FlushMode::Finish {
            return Ok(Status::Ok);
        }

        if !self.trailer_written {
            write_trailer(
                &mut self.core.bits,
                self.resolved.format,
                self.core.checksum.value(),
                self.core.total_in,
            );
            self.trailer_written = true;
        }
        out.drain_from(&mut self.core.bits);
        if self.core.bits.pending_len() == 0 {
            self.state = StreamState::Done;
            Ok(Status::StreamEnd)
        } else {
            self.state = StreamState::Finishing;
            Ok(Status::Ok)
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// One-shot helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Compress `data` in one call with `config`.
pub fn compress(data: &[u8], config: &Config) -> Result<Vec<u8>, DeflateError> {
    let mut stream = DeflateStream::open(config.clone())?;
    stream.push(data, FlushMode::Finish)
}

/// Gzip-framed one-shot compression at `level`.
pub fn gzip(data: &[u8], level: i32) -> Result<Vec<u8>, DeflateError> {
    compress(data, &Config::default().with_level(level))
}

/// Zlib-framed one-shot compression at `level`.
pub fn zlib(data: &[u8], level: i32) -> Result<Vec<u8>, DeflateError> {
    compress(data, &Config::default().with_format(Format::Zlib).with_level(level))
}

/// Unframed DEFLATE at `level`.
pub fn deflate_raw(data: &[u8], level: i32) -> Result<Vec<u8>, DeflateError> {
    compress(data, &Config::default().with_format(Format::Raw).with_level(level))
}
