//! LSB-first bit packing and the pending-output buffer.
//!
//! Every byte the compressor produces (container header, blocks, trailer)
//! goes through a [`BitWriter`]. Completed bytes accumulate in a growable
//! pending buffer; at most seven bits wait in the accumulator between calls.
//! An [`Output`] sink drains the pending bytes, either into a caller-owned
//! slice (bounded) or a `Vec` (unbounded).

use crate::error::DeflateError;

#[derive(Debug, Default)]
pub struct BitWriter {
    pending: Vec<u8>,
    /// Index of the first pending byte not yet handed out.
    out: usize,
    bit_buf: u64,
    bit_count: u32,
}

impl BitWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(cap: usize) -> Result<Self, DeflateError> {
        let mut pending = Vec::new();
        pending.try_reserve_exact(cap)?;
        Ok(BitWriter { pending, ..Self::default() })
    }

    /// Append the low `count` bits of `value`, least significant first.
    #[inline]
    pub fn write_bits(&mut self, value: u32, count: u32) {
        debug_assert!(count <= 32);
        let masked = value as u64 & ((1u64 << count) - 1);
        self.bit_buf |= masked << self.bit_count;
        self.bit_count += count;
        while self.bit_count >= 8 {
            self.pending.push(self.bit_buf as u8);
            self.bit_buf >>= 8;
            self.bit_count -= 8;
        }
    }

    /// Pad with zero bits up to the next byte boundary.
    pub fn align_to_byte(&mut self) {
        if self.bit_count > 0 {
            self.pending.push(self.bit_buf as u8);
        }
        self.bit_buf = 0;
        self.bit_count = 0;
    }

    /// Append raw bytes; the writer must be byte aligned.
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        debug_assert_eq!(self.bit_count, 0, "write_bytes on unaligned writer");
        self.pending.extend_from_slice(bytes);
    }

    pub fn write_u16_le(&mut self, v: u16) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub fn write_u32_le(&mut self, v: u32) {
        self.write_bytes(&v.to_le_bytes());
    }

    pub fn write_u16_be(&mut self, v: u16) {
        self.write_bytes(&v.to_be_bytes());
    }

    pub fn write_u32_be(&mut self, v: u32) {
        self.write_bytes(&v.to_be_bytes());
    }

    /// Bits waiting in the accumulator (always 0..=7).
    #[inline]
    pub fn bit_count(&self) -> u32 {
        self.bit_count
    }

    /// Completed bytes not yet handed out.
    #[inline]
    pub fn pending(&self) -> &[u8] {
        &self.pending[self.out..]
    }

    #[inline]
    pub fn pending_len(&self) -> usize {
        self.pending.len() - self.out
    }

    /// Mark `n` pending bytes as handed out.
    pub fn drain(&mut self, n: usize) {
        self.out += n.min(self.pending_len());
        if self.out == self.pending.len() {
            self.pending.clear();
            self.out = 0;
        }
    }

    /// Copy as many pending bytes as fit into `dst`; returns the count.
    pub fn drain_into(&mut self, dst: &mut [u8]) -> usize {
        let n = self.pending_len().min(dst.len());
        dst[..n].copy_from_slice(&self.pending[self.out..self.out + n]);
        self.drain(n);
        n
    }

    /// Remove and return every pending byte.
    pub fn take(&mut self) -> Vec<u8> {
        if self.out == 0 {
            return std::mem::take(&mut self.pending);
        }
        let rest = self.pending.split_off(self.out);
        self.pending.clear();
        self.out = 0;
        rest
    }

    /// Drop all pending bytes and accumulated bits.
    pub fn reset(&mut self) {
        self.pending.clear();
        self.out = 0;
        self.bit_buf = 0;
        self.bit_count = 0;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Output sinks
// ─────────────────────────────────────────────────────────────────────────────

/// Destination for pending bytes.
pub trait Output {
    /// Move pending bytes out of `bits`, as many as the sink accepts.
    fn drain_from(&mut self, bits: &mut BitWriter);
    /// True when the sink cannot accept another byte.
    fn is_full(&self) -> bool;
    /// Bytes accepted so far.
    fn written(&self) -> usize;
}

/// Caller-owned, fixed-size output.
pub struct SliceOutput<'a> {
    buf: &'a mut [u8],
    written: usize,
}

impl<'a> SliceOutput<'a> {
    pub fn new(buf: &'a mut [u8]) -> Self {
        SliceOutput { buf, written: 0 }
    }
}

impl Output for SliceOutput<'_> {
    fn drain_from(&mut self, bits: &mut BitWriter) {
        self.written += bits.drain_into(&mut self.buf[self.written..]);
    }

    fn is_full(&self) -> bool {
        self.written == self.buf.len()
    }

    fn written(&self) -> usize {
        self.written
    }
}

/// Growable output; never full.
pub struct VecOutput<'a> {
    buf: &'a mut Vec<u8>,
    start: usize,
}

impl<'a> VecOutput<'a> {
    pub fn new(buf: &'a mut Vec<u8>) -> Self {
        let start = buf.len();
        VecOutput { buf, start }
    }
}

impl Output for VecOutput<'_> {
    fn drain_from(&mut self, bits: &mut BitWriter) {
        if self.buf.is_empty() {
            *self.buf = bits.take();
        } else {
            self.buf.extend_from_slice(bits.pending());
            bits.drain(usize::MAX);
        }
    }

    fn is_full(&self) -> bool {
        false
    }

    fn written(&self) -> usize {
        self.buf.len() - self.start
    }
}
