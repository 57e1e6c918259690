// Length-limited Huffman construction (src/deflate/huffman.rs).

use gzr::deflate::huffman::{
    build_tree, gen_codes, reverse_bits, rle_code_lengths, verify_lengths, HuffmanCode, STATIC_DTREE,
    STATIC_LTREE,
};
use gzr::deflate::types::{L_CODES, MAX_BITS, MAX_BL_BITS, REPZ_3_10};
use gzr::DeflateError;

fn kraft_sum(codes: &[HuffmanCode], max_len: u8) -> u64 {
    codes
        .iter()
        .filter(|c| c.len != 0)
        .map(|c| 1u64 << (max_len - c.len))
        .sum()
}

#[test]
fn reverse_bits_examples() {
    assert_eq!(reverse_bits(0b1, 1), 0b1);
    assert_eq!(reverse_bits(0b110, 3), 0b011);
    assert_eq!(reverse_bits(0b1000_0000, 8), 0b0000_0001);
    assert_eq!(reverse_bits(0x7FFF, 15), 0x7FFF);
}

#[test]
fn uniform_frequencies_give_equal_lengths() {
    let freqs = [5u32; 16];
    let mut codes = [HuffmanCode::default(); 16];
    let max_code = build_tree(&freqs, MAX_BITS, &mut codes).unwrap();
    assert_eq!(max_code, 15);
    assert!(codes.iter().all(|c| c.len == 4));
}

#[test]
fn fibonacci_frequencies_are_capped() {
    // Fibonacci weights want a code as deep as the alphabet; cap at 7.
    let mut freqs = vec![0u32; 19];
    let (mut a, mut b) = (1u32, 1u32);
    for f in freqs.iter_mut() {
        *f = a;
        (a, b) = (b, a + b);
    }
    let mut codes = [HuffmanCode::default(); 19];
    build_tree(&freqs, MAX_BL_BITS, &mut codes).unwrap();
    assert!(codes.iter().all(|c| (1..=MAX_BL_BITS).contains(&c.len)));
    assert!(kraft_sum(&codes, MAX_BL_BITS) <= 1 << MAX_BL_BITS);
}

#[test]
fn literal_alphabet_is_complete_and_prefix_free() {
    let mut freqs = vec![0u32; L_CODES];
    for (i, f) in freqs.iter_mut().enumerate().take(200) {
        *f = (i as u32 % 13) + 1;
    }
    freqs[256] = 1;
    let mut codes = vec![HuffmanCode::default(); L_CODES];
    let max_code = build_tree(&freqs, MAX_BITS, &mut codes).unwrap();
    assert_eq!(max_code, 256);
    assert_eq!(kraft_sum(&codes, MAX_BITS), 1 << MAX_BITS);

    // No used code is a prefix of another (compare in MSB-first order).
    let used: Vec<(u16, u8)> = codes
        .iter()
        .filter(|c| c.len != 0)
        .map(|c| (reverse_bits(c.code, c.len), c.len))
        .collect();
    for (i, &(ca, la)) in used.iter().enumerate() {
        for &(cb, lb) in &used[i + 1..] {
            let l = la.min(lb);
            assert_ne!(ca >> (la - l), cb >> (lb - l));
        }
    }
}

#[test]
fn gen_codes_matches_rfc1951_example() {
    // RFC 1951 3.2.2: lengths (3, 3, 3, 3, 3, 2, 4, 4) for A..H.
    let lengths = [3u8, 3, 3, 3, 3, 2, 4, 4];
    let mut codes = [HuffmanCode::default(); 8];
    gen_codes(&lengths, &mut codes);
    let msb_first: Vec<u16> = codes.iter().map(|c| reverse_bits(c.code, c.len)).collect();
    assert_eq!(msb_first, vec![0b010, 0b011, 0b100, 0b101, 0b110, 0b00, 0b1110, 0b1111]);
}

#[test]
fn verify_lengths_errors() {
    assert_eq!(
        verify_lengths(&[16, 1], MAX_BITS),
        Err(DeflateError::CodeLengthOverflow { len: 16, max: MAX_BITS })
    );
    assert_eq!(verify_lengths(&[1, 1, 1], MAX_BITS), Err(DeflateError::KraftViolated));
    assert_eq!(verify_lengths(&[1, 2, 2, 0], MAX_BITS), Ok(()));
}

#[test]
fn static_trees_follow_rfc1951() {
    assert!(STATIC_LTREE[..144].iter().all(|c| c.len == 8));
    assert!(STATIC_LTREE[144..256].iter().all(|c| c.len == 9));
    assert!(STATIC_LTREE[256..280].iter().all(|c| c.len == 7));
    assert!(STATIC_LTREE[280..].iter().all(|c| c.len == 8));
    assert!(STATIC_DTREE.iter().all(|c| c.len == 5));
}

#[test]
fn rle_short_zero_run() {
    let lengths = [4u8, 0, 0, 0, 0, 4];
    let mut out = Vec::new();
    rle_code_lengths(&lengths, 5, |s, x| out.push((s, x)));
    assert_eq!(out, vec![(4, 0), (REPZ_3_10, 1), (4, 0)]);
}
