// test-only module included via core/mod.rs
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use bytes::BytesMut;
use tokio_util::codec::{Decoder, Encoder};

use crate::core::codec::{LineCodec, ReplyCodec};
use crate::core::command::Command;
use crate::core::reply::Reply;
use crate::error::ProtocolError;

fn encode(reply: Reply) -> Vec<u8> {
    let mut buf = BytesMut::new();
    ReplyCodec.encode(reply, &mut buf).expect("encode should succeed");
    buf.to_vec()
}

#[test]
fn test_decode_strips_crlf() {
    let mut codec = LineCodec::new(512);
    let mut buf = BytesMut::from(&b"HELO example.com\r\nQUIT\r\n"[..]);

    assert_eq!(&codec.decode(&mut buf).unwrap().unwrap()[..], b"HELO example.com");
    assert_eq!(&codec.decode(&mut buf).unwrap().unwrap()[..], b"QUIT");
    assert!(codec.decode(&mut buf).unwrap().is_none());
    assert!(buf.is_empty());
}

#[test]
fn test_decode_waits_for_terminator() {
    let mut codec = LineCodec::new(512);
    let mut buf = BytesMut::from(&b"NOOP"[..]);
    assert!(codec.decode(&mut buf).unwrap().is_none());
    assert_eq!(buf.len(), 4);

    buf.extend_from_slice(b"\r");
    assert!(codec.decode(&mut buf).unwrap().is_none());

    buf.extend_from_slice(b"\n");
    assert_eq!(&codec.decode(&mut buf).unwrap().unwrap()[..], b"NOOP");
}

#[test]
fn test_decode_accepts_bare_lf_by_default() {
    let mut codec = LineCodec::new(512);
    let mut buf = BytesMut::from(&b"RSET\n"[..]);
    assert_eq!(&codec.decode(&mut buf).unwrap().unwrap()[..], b"RSET");
}

#[test]
fn test_strict_decode_rejects_bare_lf() {
    let mut codec = LineCodec::new(512).strict();
    let mut buf = BytesMut::from(&b"RSET\n"[..]);
    assert!(matches!(
        codec.decode(&mut buf),
        Err(ProtocolError::BareLineFeed)
    ));
}

#[test]
fn test_decode_line_exactly_at_limit() {
    // 510 octets + CRLF = 512
    let mut codec = LineCodec::new(512);
    let mut input = vec![b'a'; 510];
    input.extend_from_slice(b"\r\n");
    let mut buf = BytesMut::from(&input[..]);

    let line = codec.decode(&mut buf).unwrap().unwrap();
    assert_eq!(line.len(), 510);
}

#[test]
fn test_decode_line_one_over_limit() {
    let mut codec = LineCodec::new(512);
    let mut input = vec![b'a'; 511];
    input.extend_from_slice(b"\r\n");
    let mut buf = BytesMut::from(&input[..]);

    match codec.decode(&mut buf) {
        Err(ProtocolError::LineTooLong { limit: 512 }) => {}
        other => panic!("Unexpected result: {other:?}"),
    }
}

#[test]
fn test_decode_overrun_detected_without_terminator() {
    let mut codec = LineCodec::new(512);
    let mut buf = BytesMut::from(&vec![b'x'; 600][..]);
    assert!(matches!(
        codec.decode(&mut buf),
        Err(ProtocolError::LineTooLong { .. })
    ));
}

#[test]
fn test_decode_eof_mid_line_is_error() {
    let mut codec = LineCodec::new(512);
    let mut buf = BytesMut::from(&b"DATA"[..]);
    assert!(matches!(
        codec.decode_eof(&mut buf),
        Err(ProtocolError::EndOfStream)
    ));
}

#[test]
fn test_decode_eof_clean() {
    let mut codec = LineCodec::new(512);
    let mut buf = BytesMut::from(&b"QUIT\r\n"[..]);
    assert_eq!(&codec.decode_eof(&mut buf).unwrap().unwrap()[..], b"QUIT");
    assert!(codec.decode_eof(&mut buf).unwrap().is_none());
}

#[test]
fn test_command_with_params() {
    let cmd = Command::parse(b"MAIL FROM:<a@b.com>");
    assert_eq!(cmd.verb, "MAIL");
    assert_eq!(cmd.params, "FROM:<a@b.com>");
}

#[test]
fn test_command_verb_uppercased() {
    let cmd = Command::parse(b"quit");
    assert_eq!(cmd.verb, "QUIT");
    assert_eq!(cmd.params, "");
    assert!(cmd.is("Quit"));
}

#[test]
fn test_command_whitespace_only() {
    let cmd = Command::parse(b"   ");
    assert!(cmd.is_empty());
    assert_eq!(cmd.params, "");
}

#[test]
fn test_command_trims_params_and_keeps_their_case() {
    let cmd = Command::parse(b"  rcpt   TO:<Bob@Example.com>  ");
    assert_eq!(cmd.verb, "RCPT");
    assert_eq!(cmd.params, "TO:<Bob@Example.com>");
    assert_eq!(cmd.to_string(), "RCPT TO:<Bob@Example.com>");
}

#[test]
fn test_command_tab_is_not_a_separator() {
    let cmd = Command::parse(b"HELO\tx");
    assert_eq!(cmd.verb, "HELO\tX");
    assert!(cmd.params.is_empty());
}

#[test]
fn test_encode_single_line() {
    assert_eq!(encode(Reply::line("550 No such user")), b"550 No such user\r\n");
}

#[test]
fn test_encode_multiline_markers() {
    let wire = encode(Reply::multiline(250, ["Hello", "PIPELINING", "8BITMIME"]));
    assert_eq!(wire, b"250-Hello\r\n250-PIPELINING\r\n250 8BITMIME\r\n");
}

#[test]
fn test_encode_multiline_single_entry_is_terminal() {
    assert_eq!(encode(Reply::multiline(221, ["Bye"])), b"221 Bye\r\n");
}

#[test]
fn test_encode_empty_multiline_rejected() {
    let mut buf = BytesMut::new();
    let result = ReplyCodec.encode(Reply::multiline(250, Vec::<String>::new()), &mut buf);
    assert!(matches!(result, Err(ProtocolError::EmptyReply)));
    assert!(buf.is_empty());
}

#[test]
fn test_encoded_len_matches_wire() {
    let reply = Reply::multiline(250, ["mx.example.com", "SIZE 1000000", "HELP"]);
    assert_eq!(reply.encoded_len(), encode(reply.clone()).len());

    let reply = Reply::line("354 End data with <CR><LF>.<CR><LF>");
    assert_eq!(reply.encoded_len(), encode(reply.clone()).len());
}

#[test]
fn test_command_trims_vertical_tab() {
    let cmd = Command::parse(b"quit\x0b");
    assert_eq!(cmd.verb, "QUIT");
    assert!(cmd.is("QUIT"));
    assert_eq!(cmd.params, "");
}

#[test]
fn test_command_trims_unicode_spaces() {
    let cmd = Command::parse("\u{a0}noop\u{85}".as_bytes());
    assert_eq!(cmd.verb, "NOOP");

    let cmd = Command::parse("vrfy \u{a0}postmaster\x0b".as_bytes());
    assert_eq!(cmd.verb, "VRFY");
    assert_eq!(cmd.params, "postmaster");
}

#[test]
fn test_line_bound_raised_to_command_limit() {
    let mut codec = LineCodec::new(0);
    assert_eq!(codec.max_length(), 512);

    // Nothing buffered is not an overrun.
    let mut buf = BytesMut::new();
    assert!(codec.decode_eof(&mut buf).unwrap().is_none());

    let mut buf = BytesMut::from(&b"HELO relay.example\r\n"[..]);
    assert_eq!(&codec.decode(&mut buf).unwrap().unwrap()[..], b"HELO relay.example");
}
