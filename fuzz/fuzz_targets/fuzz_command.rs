#![no_main]

use libfuzzer_sys::fuzz_target;
use line_protocol::Command;

fuzz_target!(|data: &[u8]| {
    let cmd = Command::parse(data);
    assert!(!cmd.verb.contains(' '));
    assert_eq!(cmd.params.trim_matches(|c: char| c.is_ascii_whitespace()), cmd.params);
});
