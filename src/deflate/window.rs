//! Sliding window, hash chains and longest-match search.
//!
//! The window holds `2 * w_size` bytes. New input lands after
//! `strstart + lookahead`; once `strstart` runs into the upper half far
//! enough that a full match could not fit, the upper half is copied down
//! and every chain entry is rebased by `w_size`.
//!
//! Chains index positions by a rolling hash of the next three bytes:
//! `head[h]` is the most recent position, `prev[pos & w_mask]` links to the
//! one before. Positions are `u16` and 0 doubles as the end-of-chain marker,
//! so position 0 is never found as a match candidate.

use super::alloc_zeroed;
use super::types::{LevelParams, MAX_MATCH, MIN_LOOKAHEAD, MIN_MATCH, NIL};
use crate::checksum::RunningChecksum;
use crate::error::DeflateError;

#[derive(Debug)]
pub struct Window {
    pub w_size: usize,
    w_mask: usize,
    window_size: usize,
    pub buf: Vec<u8>,
    pub prev: Vec<u16>,
    pub head: Vec<u16>,
    hash_mask: u32,
    hash_shift: u32,
    ins_h: u32,
    /// Start of the string to match.
    pub strstart: usize,
    /// Start of the last match found by `longest_match`.
    pub match_start: usize,
    /// Valid bytes from `strstart` onwards.
    pub lookahead: usize,
    /// Window offset of the first byte of the current block; negative once
    /// that byte has slid out.
    pub block_start: isize,
    /// Positions before `strstart` still owed a hash insertion.
    pub insert: usize,
}

impl Window {
    pub fn new(w_bits: u32, mem_level: u32) -> Result<Self, DeflateError> {
        let w_size = 1usize << w_bits;
        let hash_bits = mem_level + 7;
        let hash_size = 1usize << hash_bits;
        Ok(Window {
            w_size,
            w_mask: w_size - 1,
            window_size: 2 * w_size,
            buf: alloc_zeroed(2 * w_size)?,
            prev: alloc_zeroed(w_size)?,
            head: alloc_zeroed(hash_size)?,
            hash_mask: (hash_size - 1) as u32,
            hash_shift: (hash_bits + MIN_MATCH as u32 - 1) / MIN_MATCH as u32,
            ins_h: 0,
            strstart: 0,
            match_start: 0,
            lookahead: 0,
            block_start: 0,
            insert: 0,
        })
    }

    /// Farthest distance a match may reach back.
    #[inline]
    pub fn max_dist(&self) -> usize {
        self.w_size - MIN_LOOKAHEAD
    }

    #[inline]
    fn update_hash(&self, h: u32, c: u8) -> u32 {
        ((h << self.hash_shift) ^ c as u32) & self.hash_mask
    }

    /// Link `pos` into its chain and return the previous chain head.
    #[inline]
    pub fn insert_string(&mut self, pos: usize) -> usize {
        self.ins_h = self.update_hash(self.ins_h, self.buf[pos + MIN_MATCH - 1]);
        let h = self.ins_h as usize;
        let match_head = self.head[h];
        self.prev[pos & self.w_mask] = match_head;
        self.head[h] = pos as u16;
        match_head as usize
    }

    /// Prime the rolling hash with the two bytes at `pos`.
    #[inline]
    pub fn rehash_at(&mut self, pos: usize) {
        self.ins_h = self.buf[pos] as u32;
        self.ins_h = self.update_hash(self.ins_h, self.buf[pos + 1]);
    }

    /// Copy input into the window until the lookahead reaches
    /// `MIN_LOOKAHEAD` or `input` runs dry, sliding first when needed.
    /// Consumed bytes are removed from `input` and fed to `checksum`.
    pub fn fill(&mut self, input: &mut &[u8], mut checksum: Option<&mut RunningChecksum>) -> usize {
        let mut consumed = 0;
        loop {
            let mut more = self.window_size - self.lookahead - self.strstart;
            if self.strstart >= self.w_size + self.max_dist() {
                self.slide();
                more += self.w_size;
            }
            if input.is_empty() {
                break;
            }

            let n = more.min(input.len());
            let (taken, rest) = input.split_at(n);
            let dst = self.strstart + self.lookahead;
            self.buf[dst..dst + n].copy_from_slice(taken);
            if let Some(c) = checksum.as_deref_mut() {
                c.update(taken);
            }
            *input = rest;
            consumed += n;
            self.lookahead += n;

            // Catch up on positions whose three bytes are now all present.
            if self.lookahead + self.insert >= MIN_MATCH {
                let mut s = self.strstart - self.insert;
                self.rehash_at(s);
                while self.insert > 0 {
                    self.insert_string(s);
                    s += 1;
                    self.insert -= 1;
                    if self.lookahead + self.insert < MIN_MATCH {
                        break;
                    }
                }
            }

            if self.lookahead >= MIN_LOOKAHEAD || input.is_empty() {
                break;
            }
        }
        consumed
    }

    /// Move the upper half down by `w_size` and rebase every position.
    pub fn slide(&mut self) {
        let w = self.w_size;
        self.buf.copy_within(w..self.window_size, 0);
        self.match_start = self.match_start.saturating_sub(w);
        self.strstart -= w;
        self.block_start -= w as isize;
        if self.insert > self.strstart {
            self.insert = self.strstart;
        }
        self.slide_hash();
    }

    /// Rebase chain entries after a slide; anything that fell out becomes NIL.
    pub fn slide_hash(&mut self) {
        let w = self.w_size as u16;
        for p in self.head.iter_mut().chain(self.prev.iter_mut()) {
            *p = if *p >= w { *p - w } else { NIL };
        }
    }

    /// Forget all match history.
    pub fn clear_history(&mut self) {
        self.head.fill(NIL);
    }

    /// Length of the longest match at `strstart`, walking the chain from
    /// `cur_match`. Sets `match_start` when it beats `prev_length`.
    pub fn longest_match(&mut self, mut cur_match: usize, prev_length: usize, params: &LevelParams) -> usize {
        let scan = self.strstart;
        let mut chain_length = params.max_chain as usize;
        let mut nice_match = params.nice_length as usize;
        let mut best_len = prev_length.max(MIN_MATCH - 1);
        let limit = self.strstart.saturating_sub(self.max_dist());
        let mut match_start = self.match_start;

        if prev_length >= params.good_length as usize {
            chain_length >>= 2;
        }
        if nice_match > self.lookahead {
            nice_match = self.lookahead;
        }

        let buf = &self.buf;
        let mut scan_end1 = buf[scan + best_len - 1];
        let mut scan_end = buf[scan + best_len];
        loop {
            let m = cur_match;
            // Cheap rejects first: the byte that would extend the best match,
            // the one before it, then the first two bytes.
            if buf[m + best_len] == scan_end
                && buf[m + best_len - 1] == scan_end1
                && buf[m] == buf[scan]
                && buf[m + 1] == buf[scan + 1]
            {
                let len = common_prefix(&buf[scan..scan + MAX_MATCH], &buf[m..m + MAX_MATCH]);
                if len > best_len {
                    match_start = m;
                    best_len = len;
                    if len >= nice_match {
                        break;
                    }
                    scan_end1 = buf[scan + best_len - 1];
                    scan_end = buf[scan + best_len];
                }
            }

            cur_match = self.prev[cur_match & self.w_mask] as usize;
            if cur_match <= limit || chain_length <= 1 {
                break;
            }
            chain_length -= 1;
        }

        self.match_start = match_start;
        best_len.min(self.lookahead)
    }

    /// Seed the window with the tail of `dict` and index every position.
    pub fn set_dictionary(&mut self, dict: &[u8]) {
        let mut dict = if dict.len() > self.w_size {
            &dict[dict.len() - self.w_size..]
        } else {
            dict
        };
        self.fill(&mut dict, None);
        while self.lookahead >= MIN_MATCH {
            let mut s = self.strstart;
            for _ in 0..self.lookahead - (MIN_MATCH - 1) {
                self.insert_string(s);
                s += 1;
            }
            self.strstart = s;
            self.lookahead = MIN_MATCH - 1;
            self.fill(&mut dict, None);
        }
        self.strstart += self.lookahead;
        self.block_start = self.strstart as isize;
        self.insert = self.lookahead;
        self.lookahead = 0;
    }

    /// Back to an empty window, keeping the allocations.
    pub fn reset(&mut self) {
        self.clear_history();
        self.ins_h = 0;
        self.strstart = 0;
        self.match_start = 0;
        self.lookahead = 0;
        self.block_start = 0;
        self.insert = 0;
    }
}

/// Number of leading bytes `a` and `b` share.
#[inline]
fn common_prefix(a: &[u8], b: &[u8]) -> usize {
    let mut n = 0;
    for (ca, cb) in a.chunks_exact(8).zip(b.chunks_exact(8)) {
        if let (Ok(wa), Ok(wb)) = (<[u8; 8]>::try_from(ca), <[u8; 8]>::try_from(cb)) {
            let diff = u64::from_le_bytes(wa) ^ u64::from_le_bytes(wb);
            if diff != 0 {
                return n + (diff.trailing_zeros() >> 3) as usize;
            }
        }
        n += 8;
    }
    n + a[n..].iter().zip(&b[n..]).take_while(|(x, y)| x == y).count()
}
