// gzr - streaming DEFLATE compressor with gzip and zlib framing

pub mod checksum;
pub mod cli;
pub mod config;
pub mod deflate;
pub mod error;
pub mod file;
pub mod frame;
pub mod io;
pub mod util;

// ── Version constants ─────────────────────────────────────────────────────────
pub const GZR_VERSION_MAJOR: u32 = 0;
pub const GZR_VERSION_MINOR: u32 = 4;
pub const GZR_VERSION_RELEASE: u32 = 0;
pub const GZR_VERSION_NUMBER: u32 =
    GZR_VERSION_MAJOR * 100 * 100 + GZR_VERSION_MINOR * 100 + GZR_VERSION_RELEASE;
pub const GZR_VERSION_STRING: &str = env!("CARGO_PKG_VERSION");

pub fn version_number() -> u32 {
    GZR_VERSION_NUMBER
}

pub fn version_string() -> &'static str {
    GZR_VERSION_STRING
}

// ── Top-level re-exports ──────────────────────────────────────────────────────
pub use checksum::{adler32, crc32};
pub use error::{DeflateError, ErrorKind};
pub use file::{gz_write_frame, GzWriteFile};
pub use frame::{
    compress, compress_bound, deflate_raw, gzip, zlib, Config, DataType, DeflateStream, FlushMode,
    Format, GzHeader, Progress, Status, StreamState, Strategy,
};
