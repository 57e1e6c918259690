//! Per-block symbol buffer, frequency tallies and block emission.
//!
//! Symbols are buffered as `(dist, lc)` pairs until the buffer fills or the
//! caller flushes. At flush time both dynamic trees are built and the block
//! goes out in whichever of stored / fixed / dynamic form is estimated
//! smallest.

use super::bits::BitWriter;
use super::huffman::{build_tree, rle_code_lengths, HuffmanCode, STATIC_DTREE, STATIC_LTREE};
use super::types::*;
use crate::error::DeflateError;

/// Encoding chosen for a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    Stored,
    Fixed,
    Dynamic,
}

/// Cost estimate behind a block decision. Sizes are in bytes and include
/// the 3-bit block header.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockPlan {
    pub kind: BlockKind,
    pub last: bool,
    /// Raw bytes the block covers.
    pub stored_len: usize,
    /// Whether those raw bytes were still in the window.
    pub stored_available: bool,
    pub static_bytes: usize,
    pub dynamic_bytes: usize,
}

/// `dist == 0` marks a literal `lc`; otherwise a match of length
/// `lc + MIN_MATCH` at distance `dist`.
#[derive(Clone, Copy, Debug)]
struct Symbol {
    dist: u16,
    lc: u8,
}

pub struct BlockController {
    lit_freq: [u32; L_CODES],
    dist_freq: [u32; D_CODES],
    bl_freq: [u32; BL_CODES],
    lit_codes: [HuffmanCode; L_CODES],
    dist_codes: [HuffmanCode; D_CODES],
    bl_codes: [HuffmanCode; BL_CODES],
    lit_max: usize,
    dist_max: usize,
    max_blindex: usize,
    syms: Vec<Symbol>,
    sym_limit: usize,
    pub level: i32,
    pub strategy: Strategy,
    pub data_type: DataType,
    /// Matches tallied in the current block.
    pub matches: u32,
    last_plan: Option<BlockPlan>,
}

impl BlockController {
    pub fn new(mem_level: u32, level: i32, strategy: Strategy) -> Result<Self, DeflateError> {
        let lit_bufsize = 1usize << (mem_level + 6);
        let mut syms = Vec::new();
        syms.try_reserve_exact(lit_bufsize)?;
        let mut bc = BlockController {
            lit_freq: [0; L_CODES],
            dist_freq: [0; D_CODES],
            bl_freq: [0; BL_CODES],
            lit_codes: [HuffmanCode::default(); L_CODES],
            dist_codes: [HuffmanCode::default(); D_CODES],
            bl_codes: [HuffmanCode::default(); BL_CODES],
            lit_max: 0,
            dist_max: 0,
            max_blindex: 0,
            syms,
            sym_limit: lit_bufsize - 1,
            level,
            strategy,
            data_type: DataType::Unknown,
            matches: 0,
            last_plan: None,
        };
        bc.init_block();
        Ok(bc)
    }

    /// Start a new block: clear tallies, count the end-of-block code once.
    pub fn init_block(&mut self) {
        self.lit_freq.fill(0);
        self.dist_freq.fill(0);
        self.bl_freq.fill(0);
        self.lit_freq[END_BLOCK] = 1;
        self.syms.clear();
        self.matches = 0;
    }

    /// Back to a fresh stream.
    pub fn reset(&mut self) {
        self.init_block();
        self.data_type = DataType::Unknown;
        self.last_plan = None;
    }

    /// Buffer a literal; true when the block should be flushed.
    #[inline]
    pub fn tally_literal(&mut self, c: u8) -> bool {
        self.syms.push(Symbol { dist: 0, lc: c });
        self.lit_freq[c as usize] += 1;
        self.syms.len() == self.sym_limit
    }

    /// Buffer a match of `len` bytes (3..=258) at `dist` (>= 1).
    #[inline]
    pub fn tally_match(&mut self, dist: usize, len: usize) -> bool {
        debug_assert!((MIN_MATCH..=MAX_MATCH).contains(&len) && dist >= 1);
        let lc = len - MIN_MATCH;
        self.syms.push(Symbol { dist: dist as u16, lc: lc as u8 });
        self.matches += 1;
        self.lit_freq[LENGTH_CODE[lc] as usize + LITERALS + 1] += 1;
        self.dist_freq[d_code(dist - 1)] += 1;
        self.syms.len() == self.sym_limit
    }

    pub fn sym_count(&self) -> usize {
        self.syms.len()
    }

    /// Plan of the most recently emitted block.
    pub fn last_plan(&self) -> Option<BlockPlan> {
        self.last_plan
    }

    /// Build the trees for the buffered symbols and pick an encoding.
    pub fn plan(&mut self, stored_len: usize, stored_available: bool, last: bool) -> Result<BlockPlan, DeflateError> {
        let (opt_lenb, static_lenb, dynamic_bytes);
        if self.level > 0 {
            if self.data_type == DataType::Unknown {
                self.data_type = self.detect_data_type();
            }
            self.lit_max = build_tree(&self.lit_freq, MAX_BITS, &mut self.lit_codes)?;
            self.dist_max = build_tree(&self.dist_freq, MAX_BITS, &mut self.dist_codes)?;
            self.build_bl_tree()?;

            let opt_len = tree_cost(&self.lit_freq, &self.lit_codes, lit_extra)
                + tree_cost(&self.dist_freq, &self.dist_codes, |n| EXTRA_DBITS[n])
                + tree_cost(&self.bl_freq, &self.bl_codes, |n| EXTRA_BLBITS[n])
                + 3 * (self.max_blindex as u64 + 1)
                + 5
                + 5
                + 4;
            let static_len = tree_cost(&self.lit_freq, &STATIC_LTREE[..L_CODES], lit_extra)
                + tree_cost(&self.dist_freq, &STATIC_DTREE[..], |n| EXTRA_DBITS[n]);

            dynamic_bytes = ((opt_len + 3 + 7) >> 3) as usize;
            static_lenb = ((static_len + 3 + 7) >> 3) as usize;
            opt_lenb = if static_lenb <= dynamic_bytes || self.strategy == Strategy::Fixed {
                static_lenb
            } else {
                dynamic_bytes
            };
        } else {
            // Level 0: make stored the only affordable choice.
            dynamic_bytes = stored_len + 5;
            static_lenb = stored_len + 5;
            opt_lenb = stored_len + 5;
        }

        let kind = if stored_len + 4 <= opt_lenb && stored_available {
            BlockKind::Stored
        } else if static_lenb == opt_lenb {
            BlockKind::Fixed
        } else {
            BlockKind::Dynamic
        };
        Ok(BlockPlan {
            kind,
            last,
            stored_len,
            stored_available,
            static_bytes: static_lenb,
            dynamic_bytes,
        })
    }

    /// Emit the buffered symbols as one block and start the next one.
    /// `stored` is the raw data the block covers, if still available.
    pub fn flush_block(
        &mut self,
        bits: &mut BitWriter,
        stored: Option<&[u8]>,
        stored_len: usize,
        last: bool,
    ) -> Result<BlockPlan, DeflateError> {
        let plan = self.plan(stored_len, stored.is_some(), last)?;
        match (plan.kind, stored) {
            (BlockKind::Stored, Some(data)) => write_stored(bits, data, last),
            (BlockKind::Dynamic, _) => {
                bits.write_bits((DYN_TREES << 1) | last as u32, 3);
                self.send_all_trees(bits);
                self.compress_block(bits, &self.lit_codes, &self.dist_codes);
            }
            _ => {
                bits.write_bits((STATIC_TREES << 1) | last as u32, 3);
                self.compress_block(bits, &STATIC_LTREE[..], &STATIC_DTREE[..]);
            }
        }
        self.init_block();
        if last {
            bits.align_to_byte();
        }
        self.last_plan = Some(plan);
        Ok(plan)
    }

    /// Empty fixed block: ten bits that let a decoder see everything so far.
    pub fn align(&self, bits: &mut BitWriter) {
        bits.write_bits(STATIC_TREES << 1, 3);
        send_code(bits, STATIC_LTREE[END_BLOCK]);
    }

    fn build_bl_tree(&mut self) -> Result<(), DeflateError> {
        let lit_lens = lengths(&self.lit_codes);
        let dist_lens = lengths(&self.dist_codes);
        self.bl_freq.fill(0);
        let bl_freq = &mut self.bl_freq;
        rle_code_lengths(&lit_lens, self.lit_max, |s, _| bl_freq[s] += 1);
        rle_code_lengths(&dist_lens, self.dist_max, |s, _| bl_freq[s] += 1);
        build_tree(&self.bl_freq, MAX_BL_BITS, &mut self.bl_codes)?;

        // At least four bit-length codes are always sent.
        self.max_blindex = (3..BL_CODES)
            .rev()
            .find(|&i| self.bl_codes[BL_ORDER[i] as usize].len != 0)
            .unwrap_or(3);
        Ok(())
    }

    fn send_all_trees(&self, bits: &mut BitWriter) {
        let lcodes = self.lit_max + 1;
        let dcodes = self.dist_max + 1;
        let blcodes = self.max_blindex + 1;
        bits.write_bits((lcodes - 257) as u32, 5);
        bits.write_bits((dcodes - 1) as u32, 5);
        bits.write_bits((blcodes - 4) as u32, 4);
        for &sym in &BL_ORDER[..blcodes] {
            bits.write_bits(self.bl_codes[sym as usize].len as u32, 3);
        }
        self.send_tree(bits, &lengths(&self.lit_codes), self.lit_max);
        self.send_tree(bits, &lengths(&self.dist_codes), self.dist_max);
    }

    fn send_tree(&self, bits: &mut BitWriter, lens: &[u8], max_code: usize) {
        rle_code_lengths(lens, max_code, |sym, extra| {
            send_code(bits, self.bl_codes[sym]);
            let xbits = EXTRA_BLBITS[sym];
            if xbits > 0 {
                bits.write_bits(extra, xbits as u32);
            }
        });
    }

    fn compress_block(&self, bits: &mut BitWriter, ltree: &[HuffmanCode], dtree: &[HuffmanCode]) {
        for sym in &self.syms {
            if sym.dist == 0 {
                send_code(bits, ltree[sym.lc as usize]);
                continue;
            }
            let lc = sym.lc as usize;
            let code = LENGTH_CODE[lc] as usize;
            send_code(bits, ltree[code + LITERALS + 1]);
            let extra = EXTRA_LBITS[code];
            if extra != 0 {
                bits.write_bits((lc - BASE_LENGTH[code] as usize) as u32, extra as u32);
            }
            let dist = sym.dist as usize - 1;
            let code = d_code(dist);
            send_code(bits, dtree[code]);
            let extra = EXTRA_DBITS[code];
            if extra != 0 {
                bits.write_bits((dist - BASE_DIST[code] as usize) as u32, extra as u32);
            }
        }
        send_code(bits, ltree[END_BLOCK]);
    }

    /// Text if the literals contain only allow-listed control bytes and at
    /// least one printable byte; binary otherwise.
    fn detect_data_type(&self) -> DataType {
        // Bit n set: byte n is a control byte that marks binary data.
        let mut block_mask: u32 = 0xf3ff_c07f;
        for n in 0..32 {
            if block_mask & 1 != 0 && self.lit_freq[n] != 0 {
                return DataType::Binary;
            }
            block_mask >>= 1;
        }
        if self.lit_freq[9] != 0 || self.lit_freq[10] != 0 || self.lit_freq[13] != 0 {
            return DataType::Text;
        }
        if self.lit_freq[32..LITERALS].iter().any(|&f| f != 0) {
            return DataType::Text;
        }
        DataType::Binary
    }
}

/// Emit `data` as stored blocks (split at 65535 bytes), BFINAL on the last
/// piece when `last`.
pub fn write_stored(bits: &mut BitWriter, data: &[u8], last: bool) {
    let mut rest = data;
    loop {
        let n = rest.len().min(u16::MAX as usize);
        let final_piece = n == rest.len();
        bits.write_bits((STORED_BLOCK << 1) | (last && final_piece) as u32, 3);
        bits.align_to_byte();
        bits.write_u16_le(n as u16);
        bits.write_u16_le(!(n as u16));
        bits.write_bytes(&rest[..n]);
        rest = &rest[n..];
        if final_piece {
            break;
        }
    }
}

#[inline]
fn send_code(bits: &mut BitWriter, c: HuffmanCode) {
    bits.write_bits(c.code as u32, c.len as u32);
}

#[inline]
fn lit_extra(n: usize) -> u8 {
    if n > LITERALS {
        EXTRA_LBITS[n - LITERALS - 1]
    } else {
        0
    }
}

fn lengths<const N: usize>(codes: &[HuffmanCode; N]) -> [u8; N] {
    let mut out = [0u8; N];
    for (l, c) in out.iter_mut().zip(codes) {
        *l = c.len;
    }
    out
}

/// Bits needed to send every tallied symbol with `codes`, extra bits included.
fn tree_cost(freqs: &[u32], codes: &[HuffmanCode], extra: impl Fn(usize) -> u8) -> u64 {
    freqs
        .iter()
        .zip(codes)
        .enumerate()
        .map(|(n, (&f, c))| f as u64 * (c.len as u64 + extra(n) as u64))
        .sum()
}
