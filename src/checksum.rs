//! CRC-32 (gzip) and Adler-32 (zlib) running checksums.
//!
//! Both expose the same shape as a hashing state: `new`, `update`, `value`,
//! plus a one-shot helper. The CRC table is computed at compile time.

/// Reflected CRC-32 polynomial (IEEE 802.3).
const CRC32_POLY: u32 = 0xEDB8_8320;

const fn make_crc_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;
        while k < 8 {
            c = if c & 1 != 0 { CRC32_POLY ^ (c >> 1) } else { c >> 1 };
            k += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
}

static CRC_TABLE: [u32; 256] = make_crc_table();

/// Incremental CRC-32 state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crc32 {
    crc: u32,
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Crc32 {
    pub const fn new() -> Self {
        Crc32 { crc: 0xFFFF_FFFF }
    }

    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        let mut c = self.crc;
        for &b in data {
            c = CRC_TABLE[((c ^ b as u32) & 0xFF) as usize] ^ (c >> 8);
        }
        self.crc = c;
    }

    /// Checksum of everything fed so far. The state stays usable.
    #[inline]
    pub fn value(&self) -> u32 {
        self.crc ^ 0xFFFF_FFFF
    }
}

/// One-shot CRC-32.
pub fn crc32(data: &[u8]) -> u32 {
    let mut c = Crc32::new();
    c.update(data);
    c.value()
}

const ADLER_MOD: u32 = 65_521;
/// Largest n such that 255n(n+1)/2 + (n+1)(ADLER_MOD-1) fits in u32.
const ADLER_NMAX: usize = 5552;

/// Incremental Adler-32 state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adler32 {
    a: u32,
    b: u32,
}

impl Default for Adler32 {
    fn default() -> Self {
        Self::new()
    }
}

impl Adler32 {
    pub const fn new() -> Self {
        Adler32 { a: 1, b: 0 }
    }

    pub fn update(&mut self, data: &[u8]) {
        let (mut a, mut b) = (self.a, self.b);
        for chunk in data.chunks(ADLER_NMAX) {
            for &byte in chunk {
                a += byte as u32;
                b += a;
            }
            a %= ADLER_MOD;
            b %= ADLER_MOD;
        }
        self.a = a;
        self.b = b;
    }

    #[inline]
    pub fn value(&self) -> u32 {
        (self.b << 16) | self.a
    }
}

/// One-shot Adler-32.
pub fn adler32(data: &[u8]) -> u32 {
    let mut a = Adler32::new();
    a.update(data);
    a.value()
}

/// The checksum a stream maintains over its uncompressed input, chosen by
/// the output framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunningChecksum {
    None,
    Crc32(Crc32),
    Adler32(Adler32),
}

impl RunningChecksum {
    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        match self {
            RunningChecksum::None => {}
            RunningChecksum::Crc32(c) => c.update(data),
            RunningChecksum::Adler32(a) => a.update(data),
        }
    }

    /// Current value; raw streams report 0.
    pub fn value(&self) -> u32 {
        match self {
            RunningChecksum::None => 0,
            RunningChecksum::Crc32(c) => c.value(),
            RunningChecksum::Adler32(a) => a.value(),
        }
    }

    /// Fresh state of the same flavour.
    pub fn restarted(&self) -> Self {
        match self {
            RunningChecksum::None => RunningChecksum::None,
            RunningChecksum::Crc32(_) => RunningChecksum::Crc32(Crc32::new()),
            RunningChecksum::Adler32(_) => RunningChecksum::Adler32(Adler32::new()),
        }
    }
}
