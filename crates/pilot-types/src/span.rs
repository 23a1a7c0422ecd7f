use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Source location of a token or statement.
///
/// Pilot statements never span more than one line, so a span is a line
/// plus a column range. Lines and columns are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    pub line: u32,
    #[serde(rename = "column")]
    pub start_col: u32,
    #[serde(rename = "end_column")]
    pub end_col: u32,
}

impl Span {
    pub fn new(line: u32, start_col: u32, end_col: u32) -> Self {
        Self {
            line,
            start_col,
            end_col,
        }
    }

    /// A one-column span.
    pub fn point(line: u32, col: u32) -> Self {
        Self::new(line, col, col)
    }

    /// Widen this span to cover `other`.
    ///
    /// Spans on different lines keep the earlier line; the column range is
    /// only widened when both sit on the same line.
    pub fn merge(self, other: Span) -> Span {
        match self.line.cmp(&other.line) {
            std::cmp::Ordering::Equal => Span::new(
                self.line,
                self.start_col.min(other.start_col),
                self.end_col.max(other.end_col),
            ),
            std::cmp::Ordering::Less => self,
            std::cmp::Ordering::Greater => other,
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.start_col)
    }
}

/// Learner source text, indexed by line so diagnostics can quote it.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub source: String,
    /// Byte range of each line, excluding the `\n`.
    lines: Vec<Range<usize>>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        let source: String = source.into();
        let mut lines = Vec::new();
        let mut start = 0;
        for (nl, _) in source.match_indices('\n') {
            lines.push(start..nl);
            start = nl + 1;
        }
        lines.push(start..source.len());
        Self {
            name: name.into(),
            source,
            lines,
        }
    }

    /// Text of a 1-based line, without `\r\n` or `\n`.
    pub fn line(&self, number: u32) -> Option<&str> {
        let index = usize::try_from(number).ok()?.checked_sub(1)?;
        let range = self.lines.get(index)?.clone();
        Some(self.source[range].trim_end_matches('\r'))
    }

    /// Number of lines. A trailing newline starts a final empty line.
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }
}
