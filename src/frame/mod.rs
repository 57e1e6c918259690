//! Gzip / zlib framing and the streaming compression API.

pub mod compress;
pub mod header;
pub mod types;

pub use compress::{compress, deflate_raw, gzip, zlib, DeflateStream};
pub use header::compress_bound;
pub use types::{
    Config, DataType, FlushMode, Format, GzHeader, Progress, ResolvedConfig, Status, StreamState,
    Strategy,
};
