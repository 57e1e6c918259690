#![no_main]
use std::io::Read;

use libfuzzer_sys::fuzz_target;

// Splits the input into chunks and feeds them with fuzzer-chosen flush modes
// and output buffer sizes. The zlib stream must decode to the concatenation.
fuzz_target!(|data: &[u8]| {
    let mut stream = gzr::DeflateStream::open(gzr::Config::default().gzip(false).with_level(-1))
        .expect("default config");
    let mut out = Vec::new();
    let mut expected = Vec::new();
    let mut buf = [0u8; 64];

    let mut rest = data;
    while let Some((&ctl, tail)) = rest.split_first() {
        let len = ((ctl & 0x0F) as usize * 7).min(tail.len());
        let (chunk, tail) = tail.split_at(len);
        rest = tail;
        expected.extend_from_slice(chunk);

        let flush = match ctl >> 5 {
            0 | 1 | 2 => gzr::FlushMode::None,
            3 => gzr::FlushMode::Partial,
            4 => gzr::FlushMode::Sync,
            5 => gzr::FlushMode::Full,
            _ => gzr::FlushMode::Block,
        };

        if ctl & 0x10 == 0 {
            out.extend(stream.push(chunk, flush).expect("push"));
        } else {
            // Bounded path: repeat until the input is taken and the output
            // buffer is not filled to the brim.
            let out_len = 1 + (ctl as usize % buf.len());
            let mut input = chunk;
            loop {
                let p = stream.compress(input, &mut buf[..out_len], flush).expect("compress");
                input = &input[p.consumed..];
                out.extend_from_slice(&buf[..p.written]);
                if input.is_empty() && p.written < out_len {
                    break;
                }
            }
        }
    }
    out.extend(stream.finish().expect("finish"));

    let mut recovered = Vec::with_capacity(expected.len());
    flate2::read::ZlibDecoder::new(&out[..])
        .read_to_end(&mut recovered)
        .expect("stream must decode");
    assert_eq!(recovered, expected);
});
