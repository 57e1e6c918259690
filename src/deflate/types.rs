//! Deflate constants, code tables, level table and small shared enums.
//!
//!   - alphabet sizes and match bounds (RFC 1951 §3.2.5)
//!   - extra-bit tables, base lengths/distances and the symbol lookup tables
//!     (`LENGTH_CODE`, `DIST_CODE`), all built at compile time
//!   - the level → search-parameter table (`CONFIG_TABLE`)
//!   - `Strategy`, `FlushMode`, `DataType` and the per-call `BlockState`

// ─────────────────────────────────────────────────────────────────────────────
// Match bounds
// ─────────────────────────────────────────────────────────────────────────────

pub const MIN_MATCH: usize = 3;
pub const MAX_MATCH: usize = 258;

/// Minimum lookahead kept before a match search, except at end of input.
pub const MIN_LOOKAHEAD: usize = MAX_MATCH + MIN_MATCH + 1;

/// Length-3 matches farther than this cost more than three literals.
pub const TOO_FAR: usize = 4096;

/// Hash chain sentinel.
pub const NIL: u16 = 0;

// ─────────────────────────────────────────────────────────────────────────────
// Alphabets
// ─────────────────────────────────────────────────────────────────────────────

pub const LENGTH_CODES: usize = 29;
pub const LITERALS: usize = 256;
/// Literal/length codes actually used (286 of the 288 defined).
pub const L_CODES: usize = LITERALS + 1 + LENGTH_CODES;
/// Size of the fixed literal/length table (includes the two unused codes).
pub const L_CODES_FIXED: usize = L_CODES + 2;
pub const D_CODES: usize = 30;
pub const BL_CODES: usize = 19;

pub const MAX_BITS: u8 = 15;
pub const MAX_BL_BITS: u8 = 7;

pub const END_BLOCK: usize = 256;

/// Repeat previous length 3-6 times (2 extra bits).
pub const REP_3_6: usize = 16;
/// Repeat a zero length 3-10 times (3 extra bits).
pub const REPZ_3_10: usize = 17;
/// Repeat a zero length 11-138 times (7 extra bits).
pub const REPZ_11_138: usize = 18;

/// Block type field values.
pub const STORED_BLOCK: u32 = 0;
pub const STATIC_TREES: u32 = 1;
pub const DYN_TREES: u32 = 2;

pub const EXTRA_LBITS: [u8; LENGTH_CODES] = [
    0, 0, 0, 0, 0, 0, 0, 0, 1, 1, 1, 1, 2, 2, 2, 2, 3, 3, 3, 3, 4, 4, 4, 4, 5, 5, 5, 5, 0,
];

pub const EXTRA_DBITS: [u8; D_CODES] = [
    0, 0, 0, 0, 1, 1, 2, 2, 3, 3, 4, 4, 5, 5, 6, 6, 7, 7, 8, 8, 9, 9, 10, 10, 11, 11, 12, 12, 13,
    13,
];

pub const EXTRA_BLBITS: [u8; BL_CODES] = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 2, 3, 7];

/// Transmission order of the bit-length code lengths.
pub const BL_ORDER: [u8; BL_CODES] = [16, 17, 18, 0, 8, 7, 9, 6, 10, 5, 11, 4, 12, 3, 13, 2, 14, 1, 15];

// ─────────────────────────────────────────────────────────────────────────────
// Derived lookup tables
// ─────────────────────────────────────────────────────────────────────────────

const fn build_length_code() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut length = 0usize;
    let mut code = 0usize;
    while code < LENGTH_CODES - 1 {
        let mut n = 0;
        while n < (1 << EXTRA_LBITS[code]) {
            table[length] = code as u8;
            length += 1;
            n += 1;
        }
        code += 1;
    }
    // Length 258 has its own code with no extra bits.
    table[length - 1] = code as u8;
    table
}

const fn build_base_length() -> [u8; LENGTH_CODES] {
    let mut table = [0u8; LENGTH_CODES];
    let mut length = 0usize;
    let mut code = 0usize;
    while code < LENGTH_CODES - 1 {
        table[code] = length as u8;
        length += 1 << EXTRA_LBITS[code];
        code += 1;
    }
    table
}

const fn build_base_dist() -> [u16; D_CODES] {
    let mut table = [0u16; D_CODES];
    let mut dist = 0usize;
    let mut code = 0usize;
    while code < D_CODES {
        table[code] = dist as u16;
        dist += 1 << EXTRA_DBITS[code];
        code += 1;
    }
    table
}

/// First 256 entries index distances 0..255 directly; the upper half indexes
/// `256 + (dist >> 7)`.
const fn build_dist_code() -> [u8; 512] {
    let mut table = [0u8; 512];
    let mut dist = 0usize;
    let mut code = 0usize;
    while code < 16 {
        let mut n = 0;
        while n < (1 << EXTRA_DBITS[code]) {
            table[dist] = code as u8;
            dist += 1;
            n += 1;
        }
        code += 1;
    }
    dist >>= 7;
    while code < D_CODES {
        let mut n = 0;
        while n < (1 << (EXTRA_DBITS[code] - 7)) {
            table[256 + dist] = code as u8;
            dist += 1;
            n += 1;
        }
        code += 1;
    }
    table
}

/// Match length minus `MIN_MATCH` → length code (0..28).
pub static LENGTH_CODE: [u8; 256] = build_length_code();
/// Length code → first `length - MIN_MATCH` it covers.
pub static BASE_LENGTH: [u8; LENGTH_CODES] = build_base_length();
/// Distance code → first `distance - 1` it covers.
pub static BASE_DIST: [u16; D_CODES] = build_base_dist();
pub static DIST_CODE: [u8; 512] = build_dist_code();

/// Distance code for `dist = distance - 1`.
#[inline]
pub fn d_code(dist: usize) -> usize {
    if dist < 256 {
        DIST_CODE[dist] as usize
    } else {
        DIST_CODE[256 + (dist >> 7)] as usize
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Level table
// ─────────────────────────────────────────────────────────────────────────────

/// Parsing driver selected by a level.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CompressFunc {
    Stored,
    /// Greedy matching; `max_lazy` doubles as the max insert length.
    Fast,
    /// Lazy matching.
    Slow,
}

/// Search parameters for one level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelParams {
    /// Quarter the chain budget once the previous match reaches this length.
    pub good_length: u16,
    /// Do not look for a lazy match beyond this length.
    pub max_lazy: u16,
    /// Stop searching when a match this long is found.
    pub nice_length: u16,
    pub max_chain: u16,
    pub func: CompressFunc,
}

const fn lp(good: u16, lazy: u16, nice: u16, chain: u16, func: CompressFunc) -> LevelParams {
    LevelParams { good_length: good, max_lazy: lazy, nice_length: nice, max_chain: chain, func }
}

/// Index is the compression level (0-9).
pub static CONFIG_TABLE: [LevelParams; 10] = [
    lp(0, 0, 0, 0, CompressFunc::Stored),          /* 0 store only */
    lp(4, 4, 8, 4, CompressFunc::Fast),            /* 1 max speed, no lazy matches */
    lp(4, 5, 16, 8, CompressFunc::Fast),           /* 2 */
    lp(4, 6, 32, 32, CompressFunc::Fast),          /* 3 */
    lp(4, 4, 16, 16, CompressFunc::Slow),          /* 4 lazy matches */
    lp(8, 16, 32, 32, CompressFunc::Slow),         /* 5 */
    lp(8, 16, 128, 128, CompressFunc::Slow),       /* 6 */
    lp(8, 32, 128, 256, CompressFunc::Slow),       /* 7 */
    lp(32, 128, 258, 1024, CompressFunc::Slow),    /* 8 */
    lp(32, 258, 258, 4096, CompressFunc::Slow),    /* 9 max compression */
];

/// Parameters for `level`, clamped to 0..=9.
#[inline]
pub fn level_params(level: i32) -> LevelParams {
    CONFIG_TABLE[level.clamp(0, 9) as usize]
}

// ─────────────────────────────────────────────────────────────────────────────
// Enums
// ─────────────────────────────────────────────────────────────────────────────

/// Match-finding strategy.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub enum Strategy {
    #[default]
    Default,
    /// Drop matches of length 5 or less; suits data produced by a filter.
    Filtered,
    /// No match search at all.
    HuffmanOnly,
    /// Distance-1 matches only.
    Rle,
    /// Never emit dynamic trees.
    Fixed,
}

/// Flush request attached to each push.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Hash)]
pub enum FlushMode {
    /// Buffer freely.
    #[default]
    None,
    /// Emit pending symbols followed by an empty fixed block.
    Partial,
    /// Emit pending symbols followed by an empty stored block (byte aligned).
    Sync,
    /// As `Sync`, and forget the match history.
    Full,
    /// Emit the final block and the trailer.
    Finish,
    /// Close the current block without any marker.
    Block,
}

impl FlushMode {
    /// Ordering used to detect a repeated flush that cannot make progress.
    /// `Block` ranks just above `None`.
    pub fn rank(self) -> i32 {
        match self {
            FlushMode::None => 0,
            FlushMode::Block => 1,
            FlushMode::Partial => 2,
            FlushMode::Sync => 4,
            FlushMode::Full => 6,
            FlushMode::Finish => 8,
        }
    }
}

/// Best guess at the kind of input, from the first block's literals.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum DataType {
    Binary,
    Text,
    #[default]
    Unknown,
}

/// Outcome of one run of a parsing driver.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum BlockState {
    /// Input or output exhausted; call again.
    NeedMore,
    /// A flush request was completed.
    BlockDone,
    /// The final block is written but output space ran out.
    FinishStarted,
    /// The final block is written.
    FinishDone,
}
