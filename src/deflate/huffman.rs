//! Length-limited Huffman codes.
//!
//! [`build_tree`] turns symbol frequencies into code lengths no longer than a
//! given limit and then into canonical codes stored bit-reversed, so they
//! can go straight into the LSB-first [`BitWriter`](super::bits::BitWriter).
//! Ties in the priority queue break on subtree depth and then node index,
//! which makes the result a pure function of the frequencies.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::sync::LazyLock;

use super::types::*;
use crate::error::DeflateError;

/// One entry of a code table. `code` is already bit-reversed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HuffmanCode {
    pub code: u16,
    pub len: u8,
}

/// Reverse the low `len` bits of `code`.
#[inline]
pub fn reverse_bits(code: u16, len: u8) -> u16 {
    debug_assert!(len >= 1 && len <= 16);
    code.reverse_bits() >> (16 - len as u32)
}

/// Assign canonical codes to `lengths` (RFC 1951 §3.2.2).
pub fn gen_codes(lengths: &[u8], codes: &mut [HuffmanCode]) {
    let mut bl_count = [0u16; MAX_BITS as usize + 1];
    for &len in lengths {
        if len != 0 {
            bl_count[len as usize] += 1;
        }
    }
    let mut next_code = [0u16; MAX_BITS as usize + 1];
    let mut code = 0u16;
    for bits in 1..=MAX_BITS as usize {
        code = (code + bl_count[bits - 1]) << 1;
        next_code[bits] = code;
    }
    for (slot, &len) in codes.iter_mut().zip(lengths) {
        if len == 0 {
            *slot = HuffmanCode::default();
            continue;
        }
        let c = next_code[len as usize];
        next_code[len as usize] += 1;
        *slot = HuffmanCode { code: reverse_bits(c, len), len };
    }
}

/// Check that used lengths lie in `1..=max_len` and satisfy Kraft.
pub fn verify_lengths(lengths: &[u8], max_len: u8) -> Result<(), DeflateError> {
    let mut kraft: u64 = 0;
    for &len in lengths {
        if len == 0 {
            continue;
        }
        if len > max_len {
            return Err(DeflateError::CodeLengthOverflow { len, max: max_len });
        }
        kraft += 1u64 << (max_len - len);
    }
    if kraft > 1u64 << max_len {
        return Err(DeflateError::KraftViolated);
    }
    Ok(())
}

/// Build a code for `freqs` with no code longer than `max_len`.
///
/// Writes one entry per symbol into `codes` (unused symbols get length 0)
/// and returns the largest symbol with a non-zero length. A code always has
/// at least two symbols: if fewer are used, symbols 0 or 1 are added with
/// a notional frequency of one.
pub fn build_tree(
    freqs: &[u32],
    max_len: u8,
    codes: &mut [HuffmanCode],
) -> Result<usize, DeflateError> {
    let mut lengths = vec![0u8; freqs.len()];
    let max_code = build_lengths(freqs, max_len, &mut lengths)?;
    verify_lengths(&lengths, max_len)?;
    gen_codes(&lengths, &mut codes[..freqs.len()]);
    Ok(max_code)
}

/// Optimal code lengths, then the overflow fix-up.
fn build_lengths(freqs: &[u32], max_len: u8, lengths: &mut [u8]) -> Result<usize, DeflateError> {
    let elems = freqs.len();
    let node_cap = 2 * elems + 1;
    let mut freq = vec![0u32; node_cap];
    freq[..elems].copy_from_slice(freqs);
    let mut depth = vec![0u16; node_cap];
    let mut dad = vec![0usize; node_cap];

    let mut heap: BinaryHeap<Reverse<(u32, u16, usize)>> = BinaryHeap::with_capacity(elems);
    let mut max_code: isize = -1;
    for (n, &f) in freqs.iter().enumerate() {
        if f != 0 {
            heap.push(Reverse((f, 0, n)));
            max_code = n as isize;
        }
    }
    while heap.len() < 2 {
        let node = if max_code < 2 {
            max_code += 1;
            max_code as usize
        } else {
            0
        };
        freq[node] = 1;
        heap.push(Reverse((1, 0, node)));
    }

    // Pop order: smallest first, the root last.
    let mut order: Vec<usize> = Vec::with_capacity(node_cap);
    let mut next = elems;
    let root = loop {
        let Some(Reverse((fa, da, a))) = heap.pop() else {
            return Err(DeflateError::KraftViolated);
        };
        let Some(Reverse((fb, db, b))) = heap.pop() else {
            break a;
        };
        order.push(a);
        order.push(b);
        let node = next;
        next += 1;
        freq[node] = fa + fb;
        depth[node] = da.max(db) + 1;
        dad[a] = node;
        dad[b] = node;
        heap.push(Reverse((freq[node], depth[node], node)));
    };

    // Depths, parents before children, clamped at max_len.
    let max = max_len as usize;
    let mut node_len = vec![0usize; node_cap];
    let mut bl_count = [0u32; MAX_BITS as usize + 1];
    let mut overflow: i32 = 0;
    node_len[root] = 0;
    for &n in order.iter().rev() {
        let mut bits = node_len[dad[n]] + 1;
        if bits > max {
            bits = max;
            overflow += 1;
        }
        node_len[n] = bits;
        if n < elems {
            bl_count[bits] += 1;
            lengths[n] = bits as u8;
        }
    }
    if overflow == 0 {
        return Ok(max_code as usize);
    }

    // Move overflowing leaves up to max_len, pushing one shallower leaf down
    // per pair to restore the Kraft sum.
    while overflow > 0 {
        let mut bits = max - 1;
        while bl_count[bits] == 0 {
            if bits == 1 {
                return Err(DeflateError::CodeLengthOverflow { len: max_len + 1, max: max_len });
            }
            bits -= 1;
        }
        bl_count[bits] -= 1;
        bl_count[bits + 1] += 2;
        bl_count[max] -= 1;
        overflow -= 2;
    }

    // Hand the adjusted lengths out again, longest to the rarest leaves.
    let mut leaves = order.iter().copied().filter(|&n| n < elems);
    for bits in (1..=max).rev() {
        for _ in 0..bl_count[bits] {
            match leaves.next() {
                Some(m) => lengths[m] = bits as u8,
                None => return Err(DeflateError::KraftViolated),
            }
        }
    }
    Ok(max_code as usize)
}

// ─────────────────────────────────────────────────────────────────────────────
// Fixed codes (RFC 1951 §3.2.6)
// ─────────────────────────────────────────────────────────────────────────────

pub static STATIC_LTREE: LazyLock<[HuffmanCode; L_CODES_FIXED]> = LazyLock::new(|| {
    let mut lengths = [0u8; L_CODES_FIXED];
    for (n, len) in lengths.iter_mut().enumerate() {
        *len = match n {
            0..=143 => 8,
            144..=255 => 9,
            256..=279 => 7,
            _ => 8,
        };
    }
    let mut codes = [HuffmanCode::default(); L_CODES_FIXED];
    gen_codes(&lengths, &mut codes);
    codes
});

pub static STATIC_DTREE: LazyLock<[HuffmanCode; D_CODES]> = LazyLock::new(|| {
    let mut codes = [HuffmanCode::default(); D_CODES];
    for (n, slot) in codes.iter_mut().enumerate() {
        *slot = HuffmanCode { code: reverse_bits(n as u16, 5), len: 5 };
    }
    codes
});

// ─────────────────────────────────────────────────────────────────────────────
// Code-length run-length coding
// ─────────────────────────────────────────────────────────────────────────────

/// Walk `lengths[..=max_code]` as the bit-length alphabet sees it, calling
/// `emit(symbol, extra_value)` per emitted symbol. Symbols 16, 17 and 18
/// carry a repeat count in `extra_value`; literal lengths carry 0.
pub fn rle_code_lengths(lengths: &[u8], max_code: usize, mut emit: impl FnMut(usize, u32)) {
    let mut prevlen: i32 = -1;
    let mut nextlen = lengths[0] as i32;
    let mut count: u32 = 0;
    let (mut max_count, mut min_count) = if nextlen == 0 { (138, 3) } else { (7, 4) };

    for n in 0..=max_code {
        let curlen = nextlen;
        nextlen = if n < max_code { lengths[n + 1] as i32 } else { -1 };
        count += 1;
        if count < max_count && curlen == nextlen {
            continue;
        }
        if count < min_count {
            for _ in 0..count {
                emit(curlen as usize, 0);
            }
        } else if curlen != 0 {
            if curlen != prevlen {
                emit(curlen as usize, 0);
                count -= 1;
            }
            emit(REP_3_6, count - 3);
        } else if count <= 10 {
            emit(REPZ_3_10, count - 3);
        } else {
            emit(REPZ_11_138, count - 11);
        }
        count = 0;
        prevlen = curlen;
        (max_count, min_count) = if nextlen == 0 {
            (138, 3)
        } else if curlen == nextlen {
            (6, 3)
        } else {
            (7, 4)
        };
    }
}
