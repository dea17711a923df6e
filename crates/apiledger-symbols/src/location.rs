//! Source positions shared by symbols and diagnostics.

use serde::{Deserialize, Serialize};

/// A byte range within a text.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema,
)]
pub struct TextSpan {
    pub start: usize,
    pub length: usize,
}

impl TextSpan {
    pub fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    pub fn end(&self) -> usize {
        self.start + self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }
}

/// A 0-indexed line/character position.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    schemars::JsonSchema,
)]
pub struct LinePosition {
    pub line: u32,
    pub character: u32,
}

impl LinePosition {
    pub fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// Start and end positions of a span, in line/character form.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema,
)]
pub struct LinePositionSpan {
    pub start: LinePosition,
    pub end: LinePosition,
}

/// A location inside a file.
///
/// Symbol locations point into source files; `deleted-api` diagnostics point
/// into the baseline file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, schemars::JsonSchema)]
pub struct Location {
    /// File path as given by the producer
    pub file: String,
    #[serde(default)]
    pub span: TextSpan,
    #[serde(default)]
    pub lines: LinePositionSpan,
}

impl Location {
    pub fn new(file: impl Into<String>, span: TextSpan, lines: LinePositionSpan) -> Self {
        Self {
            file: file.into(),
            span,
            lines,
        }
    }

    /// A single-line location starting at `line`/`character` (0-indexed).
    pub fn on_line(file: impl Into<String>, line: u32, character: u32, length: u32) -> Self {
        Self {
            file: file.into(),
            span: TextSpan::default(),
            lines: LinePositionSpan {
                start: LinePosition::new(line, character),
                end: LinePosition::new(line, character + length),
            },
        }
    }

    /// Empty location at the start of `file`.
    ///
    /// Used when nothing better is known; it still names the file.
    pub fn degenerate(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            span: TextSpan::default(),
            lines: LinePositionSpan::default(),
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.span.is_empty() && self.lines == LinePositionSpan::default()
    }

    /// 1-indexed line number for display.
    pub fn display_line(&self) -> u32 {
        self.lines.start.line + 1
    }

    /// 1-indexed column for display.
    pub fn display_column(&self) -> u32 {
        self.lines.start.character + 1
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}",
            self.file,
            self.display_line(),
            self.display_column()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_keeps_file() {
        let loc = Location::degenerate("PublicAPI.txt");
        assert_eq!(loc.file, "PublicAPI.txt");
        assert!(loc.is_degenerate());
        assert_eq!(loc.to_string(), "PublicAPI.txt:1:1");
    }

    #[test]
    fn test_on_line() {
        let loc = Location::on_line("src/C.cs", 4, 2, 3);
        assert!(!loc.is_degenerate());
        assert_eq!(loc.display_line(), 5);
        assert_eq!(loc.lines.end.character, 5);
    }
}
