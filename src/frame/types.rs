//! Public configuration and status types for the stream controller.
//!
//! Covers:
//! - `Format` (raw deflate, zlib, gzip framing)
//! - `GzHeader`, the optional gzip metadata
//! - `Config` with its validation into `ResolvedConfig`
//! - `StreamState`, `Status` and `Progress`

use crate::config::{
    CLEVEL_DEFAULT, CLEVEL_MAX, MEM_LEVEL_DEFAULT, MEM_LEVEL_MAX, WINDOW_BITS_DEFAULT,
    WINDOW_BITS_MAX, WINDOW_BITS_MIN,
};
use crate::error::{DeflateError, ErrorKind};

pub use crate::deflate::types::{DataType, FlushMode, Strategy};

// ─────────────────────────────────────────────────────────────────────────────
// Container constants (RFC 1950 / RFC 1952)
// ─────────────────────────────────────────────────────────────────────────────

pub const GZIP_ID1: u8 = 0x1F;
pub const GZIP_ID2: u8 = 0x8B;
/// Compression method "deflate", shared by gzip and zlib.
pub const CM_DEFLATE: u8 = 8;

pub const FTEXT: u8 = 0x01;
pub const FHCRC: u8 = 0x02;
pub const FEXTRA: u8 = 0x04;
pub const FNAME: u8 = 0x08;
pub const FCOMMENT: u8 = 0x10;

pub const OS_UNIX: u8 = 3;
pub const OS_UNKNOWN: u8 = 255;

/// Fixed part of a gzip header.
pub const GZIP_HEADER_SIZE: usize = 10;
pub const GZIP_TRAILER_SIZE: usize = 8;
pub const ZLIB_HEADER_SIZE: usize = 2;
pub const ZLIB_TRAILER_SIZE: usize = 4;

/// Zlib FLG bit announcing a preset dictionary.
pub const PRESET_DICT: u16 = 0x20;

// ─────────────────────────────────────────────────────────────────────────────
// Format / header
// ─────────────────────────────────────────────────────────────────────────────

/// Framing around the deflate stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum Format {
    /// Bare RFC 1951 data, no checksum.
    Raw,
    /// RFC 1950: 2-byte header, Adler-32 trailer.
    Zlib,
    /// RFC 1952: gzip member with CRC-32 and size trailer.
    #[default]
    Gzip,
}

/// Optional gzip header fields. Strings are raw bytes (ISO 8859-1 on the
/// wire) and must not contain NUL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GzHeader {
    /// Sets FTEXT: the payload is probably text.
    pub text: bool,
    /// Modification time, seconds since the epoch; 0 = unavailable.
    pub mtime: u32,
    pub os: u8,
    pub extra: Option<Vec<u8>>,
    pub name: Option<Vec<u8>>,
    pub comment: Option<Vec<u8>>,
    /// Append a CRC-16 of the header.
    pub hcrc: bool,
}

impl Default for GzHeader {
    fn default() -> Self {
        GzHeader {
            text: false,
            mtime: 0,
            os: OS_UNKNOWN,
            extra: None,
            name: None,
            comment: None,
            hcrc: false,
        }
    }
}

impl GzHeader {
    pub fn with_text(mut self, text: bool) -> Self {
        self.text = text;
        self
    }

    pub fn with_mtime(mut self, mtime: u32) -> Self {
        self.mtime = mtime;
        self
    }

    pub fn with_os(mut self, os: u8) -> Self {
        self.os = os;
        self
    }

    pub fn with_extra(mut self, extra: impl Into<Vec<u8>>) -> Self {
        self.extra = Some(extra.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<Vec<u8>>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<Vec<u8>>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_hcrc(mut self, hcrc: bool) -> Self {
        self.hcrc = hcrc;
        self
    }

    /// FLG byte for this header.
    pub fn flags(&self) -> u8 {
        let mut flg = 0;
        if self.text {
            flg |= FTEXT;
        }
        if self.hcrc {
            flg |= FHCRC;
        }
        if self.extra.is_some() {
            flg |= FEXTRA;
        }
        if self.name.is_some() {
            flg |= FNAME;
        }
        if self.comment.is_some() {
            flg |= FCOMMENT;
        }
        flg
    }

    /// Encoded size of the header in bytes.
    pub fn encoded_len(&self) -> usize {
        GZIP_HEADER_SIZE
            + self.extra.as_ref().map_or(0, |e| 2 + e.len())
            + self.name.as_ref().map_or(0, |n| n.len() + 1)
            + self.comment.as_ref().map_or(0, |c| c.len() + 1)
            + if self.hcrc { 2 } else { 0 }
    }

    fn validate(&self) -> Result<(), DeflateError> {
        if self.extra.as_ref().is_some_and(|e| e.len() > u16::MAX as usize) {
            return Err(DeflateError::HeaderFieldInvalid("extra"));
        }
        if self.name.as_ref().is_some_and(|n| n.contains(&0)) {
            return Err(DeflateError::HeaderFieldInvalid("name"));
        }
        if self.comment.as_ref().is_some_and(|c| c.contains(&0)) {
            return Err(DeflateError::HeaderFieldInvalid("comment"));
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Config
// ─────────────────────────────────────────────────────────────────────────────

/// Stream configuration. Start from `Config::default()` and adjust with the
/// `with_*` setters; `DeflateStream::open` validates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// 0 (store) ..= 9 (best); -1 selects the default level.
    pub level: i32,
    /// Base-two log of the window, 8..=15. Negative values request raw
    /// framing with a window of `-window_bits`.
    pub window_bits: i32,
    /// 1..=9: memory for the hash table and the symbol buffer.
    pub mem_level: i32,
    pub strategy: Strategy,
    pub format: Format,
    /// Preset dictionary (raw and zlib framing only).
    pub dictionary: Option<Vec<u8>>,
    /// Gzip header fields; ignored for other formats.
    pub header: GzHeader,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            level: CLEVEL_DEFAULT,
            window_bits: WINDOW_BITS_DEFAULT,
            mem_level: MEM_LEVEL_DEFAULT,
            strategy: Strategy::Default,
            format: Format::Gzip,
            dictionary: None,
            header: GzHeader::default(),
        }
    }
}

impl Config {
    pub fn with_level(mut self, level: i32) -> Self {
        self.level = level;
        self
    }

    pub fn with_window_bits(mut self, window_bits: i32) -> Self {
        self.window_bits = window_bits;
        self
    }

    pub fn with_mem_level(mut self, mem_level: i32) -> Self {
        self.mem_level = mem_level;
        self
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// `true` selects gzip framing, `false` zlib framing.
    pub fn gzip(self, gzip: bool) -> Self {
        self.with_format(if gzip { Format::Gzip } else { Format::Zlib })
    }

    pub fn with_dictionary(mut self, dict: impl Into<Vec<u8>>) -> Self {
        self.dictionary = Some(dict.into());
        self
    }

    pub fn with_header(mut self, header: GzHeader) -> Self {
        self.header = header;
        self
    }

    /// Check every field and derive the engine parameters.
    pub fn resolve(&self) -> Result<ResolvedConfig, DeflateError> {
        let level = match self.level {
            -1 => CLEVEL_DEFAULT,
            l if (0..=CLEVEL_MAX).contains(&l) => l,
            l => return Err(DeflateError::LevelInvalid(l)),
        };

        let (format, requested_bits) = if self.window_bits < 0 {
            (Format::Raw, -self.window_bits)
        } else {
            (self.format, self.window_bits)
        };
        if !(WINDOW_BITS_MIN..=WINDOW_BITS_MAX).contains(&requested_bits) {
            return Err(DeflateError::WindowBitsInvalid(self.window_bits));
        }
        if !(1..=MEM_LEVEL_MAX).contains(&self.mem_level) {
            return Err(DeflateError::MemLevelInvalid(self.mem_level));
        }
        if format == Format::Gzip {
            if self.dictionary.is_some() {
                return Err(DeflateError::DictionaryUnsupported);
            }
            self.header.validate()?;
        }

        Ok(ResolvedConfig {
            level,
            // A 256-byte window is run as 512 bytes; matches still stay
            // within 256 bytes because of MIN_LOOKAHEAD.
            w_bits: requested_bits.max(9) as u32,
            header_w_bits: requested_bits as u32,
            mem_level: self.mem_level as u32,
            strategy: self.strategy,
            format,
        })
    }
}

/// Validated engine parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub level: i32,
    /// Window size actually allocated.
    pub w_bits: u32,
    /// Window size announced in a zlib header.
    pub header_w_bits: u32,
    pub mem_level: u32,
    pub strategy: Strategy,
    pub format: Format,
}

// ─────────────────────────────────────────────────────────────────────────────
// Stream state / results
// ─────────────────────────────────────────────────────────────────────────────

/// Lifecycle of a `DeflateStream`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    Init,
    Busy,
    /// The final block is out but trailer bytes are still pending.
    Finishing,
    Done,
    Error(ErrorKind),
}

/// Outcome of a bounded `compress` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Progress was made; call again as needed.
    Ok,
    /// The trailer has been fully written.
    StreamEnd,
    /// Nothing to do: no input and no new flush request.
    BufError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Input bytes taken from the caller.
    pub consumed: usize,
    /// Output bytes written to the caller's buffer.
    pub written: usize,
    pub status: Status,
}
