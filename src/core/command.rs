//! Command line parsing.

use std::fmt;

/// A parsed command line: an uppercased verb and its trimmed parameters.
///
/// Both fields are owned; a `Command` never borrows from the input buffer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Command {
    pub verb: String,
    pub params: String,
}

impl Command {
    /// Parse a line with its terminator already stripped.
    ///
    /// The line is trimmed of whitespace (Unicode `White_Space`, so VT,
    /// NEL and NBSP included) and split at the first space. The verb is
    /// uppercased, the remainder trimmed again. A blank line yields an empty
    /// verb and empty params. Invalid UTF-8 is replaced rather than rejected.
    pub fn parse(line: &[u8]) -> Self {
        let text = String::from_utf8_lossy(line);
        match text.trim().split_once(' ') {
            None => Self {
                verb: text.trim().to_uppercase(),
                params: String::new(),
            },
            Some((verb, params)) => Self {
                verb: verb.to_uppercase(),
                params: params.trim().to_owned(),
            },
        }
    }

    /// Case-insensitive verb comparison.
    pub fn is(&self, verb: &str) -> bool {
        self.verb.eq_ignore_ascii_case(verb)
    }

    pub fn is_empty(&self) -> bool {
        self.verb.is_empty()
    }

    pub fn into_parts(self) -> (String, String) {
        (self.verb, self.params)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            f.write_str(&self.verb)
        } else {
            write!(f, "{} {}", self.verb, self.params)
        }
    }
}
