#![no_main]

use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;
use line_protocol::core::codec::LineCodec;
use tokio_util::codec::Decoder;

fuzz_target!(|data: &[u8]| {
    // Every decoded line must fit the bound and contain no LF
    let mut codec = LineCodec::new(512);
    let mut buf = BytesMut::from(data);
    while let Ok(Some(line)) = codec.decode(&mut buf) {
        assert!(line.len() < 512);
        assert!(!line.contains(&b'\n'));
    }
});
