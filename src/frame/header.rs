//! Container headers, trailers and output-size bounds.
//!
//! Covers:
//! - `write_gzip_header` - RFC 1952 member header with optional fields
//! - `write_zlib_header` - RFC 1950 CMF/FLG pair (+ DICTID)
//! - `write_trailer` - CRC-32 + ISIZE (gzip) or Adler-32 (zlib)
//! - `compress_bound` - worst-case output size for a one-shot call

use crate::checksum::crc32;
use crate::deflate::bits::BitWriter;
use crate::deflate::types::Strategy;
use crate::frame::types::*;

/// XFL byte: 2 = slowest/best, 4 = fastest.
pub fn gzip_xfl(level: i32, strategy: Strategy) -> u8 {
    if level == 9 {
        2
    } else if level < 2 || matches!(strategy, Strategy::HuffmanOnly | Strategy::Rle | Strategy::Fixed) {
        4
    } else {
        0
    }
}

/// Serialize a gzip header into `bits` (which must be byte aligned).
pub fn write_gzip_header(bits: &mut BitWriter, header: &GzHeader, level: i32, strategy: Strategy) {
    let mut h = Vec::with_capacity(header.encoded_len());
    h.extend_from_slice(&[GZIP_ID1, GZIP_ID2, CM_DEFLATE, header.flags()]);
    h.extend_from_slice(&header.mtime.to_le_bytes());
    h.push(gzip_xfl(level, strategy));
    h.push(header.os);
    if let Some(extra) = &header.extra {
        h.extend_from_slice(&(extra.len() as u16).to_le_bytes());
        h.extend_from_slice(extra);
    }
    if let Some(name) = &header.name {
        h.extend_from_slice(name);
        h.push(0);
    }
    if let Some(comment) = &header.comment {
        h.extend_from_slice(comment);
        h.push(0);
    }
    if header.hcrc {
        let crc16 = (crc32(&h) & 0xFFFF) as u16;
        h.extend_from_slice(&crc16.to_le_bytes());
    }
    bits.write_bytes(&h);
}

/// CMF/FLG pair for a zlib stream, FCHECK included.
pub fn zlib_header(w_bits: u32, level: i32, strategy: Strategy, has_dict: bool) -> u16 {
    let cmf = (CM_DEFLATE as u16 | ((w_bits as u16 - 8) << 4)) << 8;
    let level_flags: u16 = if matches!(strategy, Strategy::HuffmanOnly | Strategy::Rle | Strategy::Fixed) || level < 2 {
        0
    } else if level < 6 {
        1
    } else if level == 6 {
        2
    } else {
        3
    };
    let mut header = cmf | (level_flags << 6);
    if has_dict {
        header |= PRESET_DICT;
    }
    header + (31 - header % 31)
}

/// Serialize a zlib header, followed by the dictionary's Adler-32 if any.
pub fn write_zlib_header(bits: &mut BitWriter, w_bits: u32, level: i32, strategy: Strategy, dict_id: Option<u32>) {
    bits.write_u16_be(zlib_header(w_bits, level, strategy, dict_id.is_some()));
    if let Some(id) = dict_id {
        bits.write_u32_be(id);
    }
}

/// Stream trailer for `format`; raw streams have none.
pub fn write_trailer(bits: &mut BitWriter, format: Format, checksum: u32, total_in: u64) {
    match format {
        Format::Gzip => {
            bits.write_u32_le(checksum);
            bits.write_u32_le(total_in as u32);
        }
        Format::Zlib => bits.write_u32_be(checksum),
        Format::Raw => {}
    }
}

/// Header plus trailer size for `config`.
pub fn wrapper_len(config: &Config, format: Format) -> usize {
    match format {
        Format::Raw => 0,
        Format::Zlib => {
            ZLIB_HEADER_SIZE + ZLIB_TRAILER_SIZE + if config.dictionary.is_some() { 4 } else { 0 }
        }
        Format::Gzip => config.header.encoded_len() + GZIP_TRAILER_SIZE,
    }
}

/// Upper bound on the output of compressing `source_len` bytes in one call
/// with `config`. Invalid configurations get the conservative bound.
pub fn compress_bound(source_len: usize, config: &Config) -> usize {
    let conservative = source_len + ((source_len + 7) >> 3) + ((source_len + 63) >> 6) + 5;
    let Ok(r) = config.resolve() else {
        return conservative + wrapper_len(config, Format::Gzip);
    };
    let wrap = wrapper_len(config, r.format);
    if r.w_bits != 15 || r.mem_level != 8 {
        return conservative + wrap;
    }
    source_len + (source_len >> 12) + (source_len >> 14) + (source_len >> 25) + 7 + wrap
}
