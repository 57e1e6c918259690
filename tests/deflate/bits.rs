// BitWriter and the output sinks (src/deflate/bits.rs).

use gzr::deflate::bits::{BitWriter, Output, SliceOutput, VecOutput};

#[test]
fn bits_pack_lsb_first() {
    let mut bw = BitWriter::new();
    bw.write_bits(0b1, 1);
    bw.write_bits(0b10, 2);
    bw.write_bits(0b11111, 5);
    assert_eq!(bw.pending(), &[0b1111_1101]);
    assert_eq!(bw.bit_count(), 0);
}

#[test]
fn align_pads_with_zero_bits() {
    let mut bw = BitWriter::new();
    bw.write_bits(0b101, 3);
    assert_eq!(bw.pending_len(), 0);
    bw.align_to_byte();
    assert_eq!(bw.pending(), &[0b101]);
    bw.align_to_byte();
    assert_eq!(bw.pending_len(), 1);
}

#[test]
fn multi_byte_helpers() {
    let mut bw = BitWriter::new();
    bw.write_u16_le(0x1234);
    bw.write_u32_le(0xA1B2_C3D4);
    bw.write_u16_be(0x789C);
    bw.write_u32_be(0x0102_0304);
    assert_eq!(
        bw.pending(),
        &[0x34, 0x12, 0xD4, 0xC3, 0xB2, 0xA1, 0x78, 0x9C, 1, 2, 3, 4]
    );
}

#[test]
fn slice_output_stops_when_full() {
    let mut bw = BitWriter::new();
    bw.write_bytes(b"abcdefgh");
    let mut buf = [0u8; 3];
    let mut out = SliceOutput::new(&mut buf);
    out.drain_from(&mut bw);
    assert!(out.is_full());
    assert_eq!(out.written(), 3);
    assert_eq!(bw.pending(), b"defgh");
    assert_eq!(&buf, b"abc");
}

#[test]
fn slice_output_resumes_across_calls() {
    let mut bw = BitWriter::new();
    bw.write_bytes(b"0123456789");
    let mut collected = Vec::new();
    while bw.pending_len() > 0 {
        let mut buf = [0u8; 4];
        let mut out = SliceOutput::new(&mut buf);
        out.drain_from(&mut bw);
        let n = out.written();
        collected.extend_from_slice(&buf[..n]);
    }
    assert_eq!(collected, b"0123456789");
}

#[test]
fn vec_output_appends_everything() {
    let mut bw = BitWriter::new();
    let mut sink = b"prefix:".to_vec();
    let mut out = VecOutput::new(&mut sink);
    bw.write_bytes(b"one");
    out.drain_from(&mut bw);
    bw.write_bytes(b"two");
    out.drain_from(&mut bw);
    assert!(!out.is_full());
    assert_eq!(out.written(), 6);
    assert_eq!(sink, b"prefix:onetwo");
    assert_eq!(bw.pending_len(), 0);
}

#[test]
fn take_and_reset() {
    let mut bw = BitWriter::new();
    bw.write_bytes(b"xyz");
    bw.drain(1);
    assert_eq!(bw.take(), b"yz");
    assert_eq!(bw.pending_len(), 0);
    bw.write_bits(0x7, 3);
    bw.reset();
    assert_eq!(bw.bit_count(), 0);
    bw.align_to_byte();
    assert_eq!(bw.pending_len(), 0);
}
