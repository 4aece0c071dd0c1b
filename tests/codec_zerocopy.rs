//! Integration tests for buffer handling in the line codec
//!
//! Decoded lines are split off the input buffer rather than copied, and each
//! one stays valid however the buffer is reused afterwards.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use bytes::BytesMut;
use line_protocol::core::codec::LineCodec;
use tokio_util::codec::Decoder;

#[test]
fn test_decoded_line_outlives_buffer_reuse() {
    let mut codec = LineCodec::new(512);
    let mut buffer = BytesMut::with_capacity(64);
    buffer.extend_from_slice(b"RCPT TO:<one@example.com>\r\n");

    let first = codec.decode(&mut buffer).unwrap().unwrap();
    assert!(buffer.is_empty());

    // Refill the same buffer; the earlier line must not change.
    buffer.extend_from_slice(b"RCPT TO:<two@example.com>\r\n");
    let second = codec.decode(&mut buffer).unwrap().unwrap();

    assert_eq!(&first[..], b"RCPT TO:<one@example.com>");
    assert_eq!(&second[..], b"RCPT TO:<two@example.com>");
}

#[test]
fn test_partial_decode_preserves_buffer() {
    let mut codec = LineCodec::new(512);
    let mut buffer = BytesMut::from(&b"DATA\r"[..]);

    let result = codec.decode(&mut buffer).expect("Decode should not error");

    assert!(result.is_none());
    assert_eq!(&buffer[..], b"DATA\r");
}

#[test]
fn test_decode_leaves_following_bytes_in_place() {
    let mut codec = LineCodec::new(512);
    let mut buffer = BytesMut::from(&b"HELO a\r\nMAIL FR"[..]);

    let line = codec.decode(&mut buffer).unwrap().unwrap();
    assert_eq!(&line[..], b"HELO a");
    assert_eq!(&buffer[..], b"MAIL FR");
    assert!(codec.decode(&mut buffer).unwrap().is_none());

    buffer.extend_from_slice(b"OM:<>\r\n");
    assert_eq!(&codec.decode(&mut buffer).unwrap().unwrap()[..], b"MAIL FROM:<>");
}

#[test]
fn test_many_lines_from_one_fill() {
    let mut codec = LineCodec::new(512);
    let mut buffer = BytesMut::new();
    for i in 0..100 {
        buffer.extend_from_slice(format!("NOOP {i}\r\n").as_bytes());
    }

    let mut count = 0;
    while let Some(line) = codec.decode(&mut buffer).unwrap() {
        assert_eq!(line, format!("NOOP {count}").as_bytes());
        count += 1;
    }
    assert_eq!(count, 100);
    assert!(buffer.is_empty());
}
