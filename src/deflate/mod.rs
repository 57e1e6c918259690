//! The DEFLATE engine (RFC 1951): window and match finder, Huffman codes,
//! block encoding, and the parsing drivers that tie them together.
//!
//! The container formats and the public streaming API live in `crate::frame`.

pub mod bits;
pub mod block;
pub mod compress;
pub mod huffman;
pub mod types;
pub mod window;

use crate::error::DeflateError;

/// Zero-filled buffer of `n` elements, reporting allocation failure instead
/// of aborting.
pub(crate) fn alloc_zeroed<T: Clone + Default>(n: usize) -> Result<Vec<T>, DeflateError> {
    let mut v = Vec::new();
    v.try_reserve_exact(n)?;
    v.resize(n, T::default());
    Ok(v)
}
