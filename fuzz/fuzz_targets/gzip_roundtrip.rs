#![no_main]
use std::io::Read;

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First byte picks level and strategy; the rest is the payload.
    let Some((&selector, payload)) = data.split_first() else {
        return;
    };
    let level = (selector % 10) as i32;
    let strategy = match (selector / 10) % 5 {
        0 => gzr::Strategy::Default,
        1 => gzr::Strategy::Filtered,
        2 => gzr::Strategy::HuffmanOnly,
        3 => gzr::Strategy::Rle,
        _ => gzr::Strategy::Fixed,
    };
    let cfg = gzr::Config::default().with_level(level).with_strategy(strategy);

    let compressed = gzr::compress(payload, &cfg).expect("valid config must compress");
    assert!(
        compressed.len() <= gzr::compress_bound(payload.len(), &cfg),
        "output {} bytes exceeds bound for {} input bytes",
        compressed.len(),
        payload.len()
    );

    let mut recovered = Vec::with_capacity(payload.len());
    flate2::read::GzDecoder::new(&compressed[..])
        .read_to_end(&mut recovered)
        .expect("self-compressed data must decode");
    assert_eq!(
        recovered, payload,
        "round-trip mismatch: {} bytes in, {} bytes back",
        payload.len(),
        recovered.len()
    );
});
