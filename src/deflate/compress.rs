//! Parsing drivers.
//!
//! A [`Compressor`] owns the window, the block controller and the bit
//! writer. Each call to [`Compressor::deflate`] runs the driver selected by
//! the level and strategy until input runs out, the output sink fills up,
//! or the flush request is satisfied:
//!
//!   - `deflate_stored`: level 0, raw bytes in stored blocks
//!   - `deflate_fast`:   levels 1-3, greedy matching
//!   - `deflate_slow`:   levels 4-9, lazy matching
//!   - `deflate_rle`:    `Strategy::Rle`, distance-1 runs only
//!   - `deflate_huff`:   `Strategy::HuffmanOnly`, literals only

use super::bits::{BitWriter, Output};
use super::block::{BlockController, BlockPlan};
use super::types::*;
use super::window::Window;
use crate::checksum::RunningChecksum;
use crate::error::DeflateError;

/// Flush the current block; bail out of the driver if the sink is full.
macro_rules! flush_block {
    ($self:ident, $out:ident, $last:expr) => {
        $self.flush_block_only($out, $last)?;
        if $out.is_full() {
            return Ok(if $last { BlockState::FinishStarted } else { BlockState::NeedMore });
        }
    };
}

pub struct Compressor {
    pub window: Window,
    pub block: BlockController,
    pub bits: BitWriter,
    pub checksum: RunningChecksum,
    /// Input bytes consumed (dictionary excluded).
    pub total_in: u64,
    level: i32,
    strategy: Strategy,
    params: LevelParams,
    match_length: usize,
    prev_length: usize,
    prev_match: usize,
    match_available: bool,
}

impl Compressor {
    pub fn new(
        w_bits: u32,
        mem_level: u32,
        level: i32,
        strategy: Strategy,
        checksum: RunningChecksum,
    ) -> Result<Self, DeflateError> {
        let lit_bufsize = 1usize << (mem_level + 6);
        Ok(Compressor {
            window: Window::new(w_bits, mem_level)?,
            block: BlockController::new(mem_level, level, strategy)?,
            bits: BitWriter::with_capacity(lit_bufsize * 4)?,
            checksum,
            total_in: 0,
            level,
            strategy,
            params: level_params(level),
            match_length: MIN_MATCH - 1,
            prev_length: MIN_MATCH - 1,
            prev_match: 0,
            match_available: false,
        })
    }

    pub fn level(&self) -> i32 {
        self.level
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    /// Switch level and strategy. The caller closes the current block first.
    pub fn set_params(&mut self, level: i32, strategy: Strategy) {
        if self.level == 0 && level != 0 {
            // Level 0 does not maintain the chains.
            self.window.clear_history();
        }
        self.level = level;
        self.strategy = strategy;
        self.params = level_params(level);
        self.block.level = level;
        self.block.strategy = strategy;
    }

    pub fn set_dictionary(&mut self, dict: &[u8]) {
        self.window.set_dictionary(dict);
        self.reset_match_state();
    }

    /// Forget match history after a full flush.
    pub fn full_flush(&mut self) {
        self.window.clear_history();
        if self.window.lookahead == 0 {
            self.window.strstart = 0;
            self.window.block_start = 0;
            self.window.insert = 0;
        }
    }

    /// Reuse every buffer for a new stream.
    pub fn reset(&mut self) {
        self.window.reset();
        self.block.reset();
        self.bits.reset();
        self.checksum = self.checksum.restarted();
        self.total_in = 0;
        self.reset_match_state();
    }

    /// Plan of the most recently emitted block.
    pub fn last_plan(&self) -> Option<BlockPlan> {
        self.block.last_plan()
    }

    fn reset_match_state(&mut self) {
        self.match_length = MIN_MATCH - 1;
        self.prev_length = MIN_MATCH - 1;
        self.prev_match = 0;
        self.match_available = false;
    }

    /// Run the selected driver.
    pub fn deflate<O: Output>(
        &mut self,
        input: &mut &[u8],
        out: &mut O,
        flush: FlushMode,
    ) -> Result<BlockState, DeflateError> {
        if self.level == 0 {
            return self.deflate_stored(input, out, flush);
        }
        match self.strategy {
            Strategy::HuffmanOnly => self.deflate_huff(input, out, flush),
            Strategy::Rle => self.deflate_rle(input, out, flush),
            _ => match self.params.func {
                CompressFunc::Stored => self.deflate_stored(input, out, flush),
                CompressFunc::Fast => self.deflate_fast(input, out, flush),
                CompressFunc::Slow => self.deflate_slow(input, out, flush),
            },
        }
    }

    fn fill(&mut self, input: &mut &[u8]) {
        let n = self.window.fill(input, Some(&mut self.checksum));
        self.total_in += n as u64;
    }

    fn flush_block_only<O: Output>(&mut self, out: &mut O, last: bool) -> Result<(), DeflateError> {
        let w = &self.window;
        let stored_len = (w.strstart as isize - w.block_start) as usize;
        let stored = if w.block_start >= 0 {
            Some(&w.buf[w.block_start as usize..w.strstart])
        } else {
            None
        };
        self.block.flush_block(&mut self.bits, stored, stored_len, last)?;
        self.window.block_start = self.window.strstart as isize;
        out.drain_from(&mut self.bits);
        Ok(())
    }

    /// Common tail of every driver once input is exhausted.
    fn finish_drive<O: Output>(&mut self, out: &mut O, flush: FlushMode) -> Result<BlockState, DeflateError> {
        if flush == FlushMode::Finish {
            flush_block!(self, out, true);
            return Ok(BlockState::FinishDone);
        }
        if self.block.sym_count() != 0 {
            flush_block!(self, out, false);
        }
        Ok(BlockState::BlockDone)
    }

    // ─────────────────────────────────────────────────────────────────────
    // Drivers
    // ─────────────────────────────────────────────────────────────────────

    fn deflate_stored<O: Output>(
        &mut self,
        input: &mut &[u8],
        out: &mut O,
        flush: FlushMode,
    ) -> Result<BlockState, DeflateError> {
        loop {
            if self.window.lookahead == 0 {
                self.fill(input);
                if self.window.lookahead == 0 {
                    if flush == FlushMode::None {
                        return Ok(BlockState::NeedMore);
                    }
                    break;
                }
            }
            self.window.strstart += self.window.lookahead;
            self.window.lookahead = 0;

            // Flush before the block start slides out of the window.
            let w = &self.window;
            if (w.strstart as isize - w.block_start) as usize >= w.max_dist() {
                flush_block!(self, out, false);
            }
        }
        self.window.insert = 0;
        if flush == FlushMode::Finish {
            flush_block!(self, out, true);
            return Ok(BlockState::FinishDone);
        }
        if self.window.strstart as isize > self.window.block_start {
            flush_block!(self, out, false);
        }
        Ok(BlockState::BlockDone)
    }

    fn deflate_fast<O: Output>(
        &mut self,
        input: &mut &[u8],
        out: &mut O,
        flush: FlushMode,
    ) -> Result<BlockState, DeflateError> {
        loop {
            if self.window.lookahead < MIN_LOOKAHEAD {
                self.fill(input);
                if self.window.lookahead < MIN_LOOKAHEAD && flush == FlushMode::None {
                    return Ok(BlockState::NeedMore);
                }
                if self.window.lookahead == 0 {
                    break;
                }
            }

            let mut hash_head = NIL as usize;
            if self.window.lookahead >= MIN_MATCH {
                hash_head = self.window.insert_string(self.window.strstart);
            }
            if hash_head != NIL as usize && self.window.strstart - hash_head <= self.window.max_dist() {
                self.match_length = self.window.longest_match(hash_head, MIN_MATCH - 1, &self.params);
            }

            let bflush;
            if self.match_length >= MIN_MATCH {
                let w = &mut self.window;
                bflush = self.block.tally_match(w.strstart - w.match_start, self.match_length);
                w.lookahead -= self.match_length;
                // Index the matched strings only for short matches.
                if self.match_length <= self.params.max_lazy as usize && w.lookahead >= MIN_MATCH {
                    for _ in 1..self.match_length {
                        w.strstart += 1;
                        w.insert_string(w.strstart);
                    }
                    w.strstart += 1;
                } else {
                    w.strstart += self.match_length;
                    w.rehash_at(w.strstart);
                }
                self.match_length = 0;
            } else {
                let w = &mut self.window;
                bflush = self.block.tally_literal(w.buf[w.strstart]);
                w.lookahead -= 1;
                w.strstart += 1;
            }
            if bflush {
                flush_block!(self, out, false);
            }
        }
        self.window.insert = self.window.strstart.min(MIN_MATCH - 1);
        self.finish_drive(out, flush)
    }

    fn deflate_slow<O: Output>(
        &mut self,
        input: &mut &[u8],
        out: &mut O,
        flush: FlushMode,
    ) -> Result<BlockState, DeflateError> {
        loop {
            if self.window.lookahead < MIN_LOOKAHEAD {
                self.fill(input);
                if self.window.lookahead < MIN_LOOKAHEAD && flush == FlushMode::None {
                    return Ok(BlockState::NeedMore);
                }
                if self.window.lookahead == 0 {
                    break;
                }
            }

            let mut hash_head = NIL as usize;
            if self.window.lookahead >= MIN_MATCH {
                hash_head = self.window.insert_string(self.window.strstart);
            }

            self.prev_length = self.match_length;
            self.prev_match = self.window.match_start;
            self.match_length = MIN_MATCH - 1;

            if hash_head != NIL as usize
                && self.prev_length < self.params.max_lazy as usize
                && self.window.strstart - hash_head <= self.window.max_dist()
            {
                self.match_length = self.window.longest_match(hash_head, self.prev_length, &self.params);
                if self.match_length <= 5
                    && (self.strategy == Strategy::Filtered
                        || (self.match_length == MIN_MATCH
                            && self.window.strstart - self.window.match_start > TOO_FAR))
                {
                    // Not worth a back-reference.
                    self.match_length = MIN_MATCH - 1;
                }
            }

            if self.prev_length >= MIN_MATCH && self.match_length <= self.prev_length {
                // The previous match wins; emit it and skip past it.
                let w = &mut self.window;
                let max_insert = w.strstart + w.lookahead - MIN_MATCH;
                let bflush = self.block.tally_match(w.strstart - 1 - self.prev_match, self.prev_length);
                w.lookahead -= self.prev_length - 1;
                for _ in 0..self.prev_length - 2 {
                    w.strstart += 1;
                    if w.strstart <= max_insert {
                        w.insert_string(w.strstart);
                    }
                }
                self.match_available = false;
                self.match_length = MIN_MATCH - 1;
                w.strstart += 1;
                if bflush {
                    flush_block!(self, out, false);
                }
            } else if self.match_available {
                // The match at strstart is better; the previous byte goes out
                // as a literal.
                let w = &mut self.window;
                let bflush = self.block.tally_literal(w.buf[w.strstart - 1]);
                if bflush {
                    self.flush_block_only(out, false)?;
                }
                self.window.strstart += 1;
                self.window.lookahead -= 1;
                if out.is_full() {
                    return Ok(BlockState::NeedMore);
                }
            } else {
                self.match_available = true;
                self.window.strstart += 1;
                self.window.lookahead -= 1;
            }
        }

        if self.match_available {
            let w = &self.window;
            self.block.tally_literal(w.buf[w.strstart - 1]);
            self.match_available = false;
        }
        self.window.insert = self.window.strstart.min(MIN_MATCH - 1);
        self.finish_drive(out, flush)
    }

    fn deflate_rle<O: Output>(
        &mut self,
        input: &mut &[u8],
        out: &mut O,
        flush: FlushMode,
    ) -> Result<BlockState, DeflateError> {
        loop {
            // Keep enough lookahead for the longest run.
            if self.window.lookahead <= MAX_MATCH {
                self.fill(input);
                if self.window.lookahead <= MAX_MATCH && flush == FlushMode::None {
                    return Ok(BlockState::NeedMore);
                }
                if self.window.lookahead == 0 {
                    break;
                }
            }

            let w = &mut self.window;
            let mut run = 0;
            if w.lookahead >= MIN_MATCH && w.strstart > 0 {
                let s = w.strstart;
                let prev = w.buf[s - 1];
                run = w.buf[s..s + MAX_MATCH].iter().take_while(|&&b| b == prev).count();
                run = run.min(w.lookahead);
            }

            let bflush = if run >= MIN_MATCH {
                w.lookahead -= run;
                w.strstart += run;
                self.block.tally_match(1, run)
            } else {
                let c = w.buf[w.strstart];
                w.lookahead -= 1;
                w.strstart += 1;
                self.block.tally_literal(c)
            };
            if bflush {
                flush_block!(self, out, false);
            }
        }
        self.window.insert = 0;
        self.finish_drive(out, flush)
    }

    fn deflate_huff<O: Output>(
        &mut self,
        input: &mut &[u8],
        out: &mut O,
        flush: FlushMode,
    ) -> Result<BlockState, DeflateError> {
        loop {
            if self.window.lookahead == 0 {
                self.fill(input);
                if self.window.lookahead == 0 {
                    if flush == FlushMode::None {
                        return Ok(BlockState::NeedMore);
                    }
                    break;
                }
            }
            let w = &mut self.window;
            let c = w.buf[w.strstart];
            w.lookahead -= 1;
            w.strstart += 1;
            if self.block.tally_literal(c) {
                flush_block!(self, out, false);
            }
        }
        self.window.insert = 0;
        self.finish_drive(out, flush)
    }
}
