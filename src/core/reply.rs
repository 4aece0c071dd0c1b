//! Status replies.

use std::fmt;

/// One logical reply, written and flushed as a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// A caller-formatted status line, sent as-is followed by CRLF.
    Line(String),
    /// Several wire lines sharing one status code. All but the last use the
    /// `-` continuation marker, the last uses a space.
    MultiLine { code: u16, lines: Vec<String> },
}

impl Reply {
    pub fn line(content: impl Into<String>) -> Self {
        Self::Line(content.into())
    }

    pub fn multiline<I, S>(code: u16, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::MultiLine {
            code,
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    /// Number of wire lines this reply renders to.
    pub fn line_count(&self) -> usize {
        match self {
            Self::Line(_) => 1,
            Self::MultiLine { lines, .. } => lines.len(),
        }
    }

    /// Exact number of octets the encoded reply occupies.
    pub fn encoded_len(&self) -> usize {
        match self {
            Self::Line(content) => content.len() + 2,
            Self::MultiLine { code, lines } => {
                let prefix = code_width(*code) + 1;
                lines.iter().map(|l| prefix + l.len() + 2).sum()
            }
        }
    }
}

impl fmt::Display for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Line(content) => f.write_str(content),
            Self::MultiLine { code, lines } => {
                for (i, line) in lines.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" / ")?;
                    }
                    let sep = if i + 1 == lines.len() { ' ' } else { '-' };
                    write!(f, "{code}{sep}{line}")?;
                }
                Ok(())
            }
        }
    }
}

fn code_width(code: u16) -> usize {
    match code {
        0..=9 => 1,
        10..=99 => 2,
        100..=999 => 3,
        1000..=9999 => 4,
        _ => 5,
    }
}
