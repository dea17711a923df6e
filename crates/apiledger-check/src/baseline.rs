//! The checked-in baseline (`PublicAPI.txt`).
//!
//! Format: one signature name per line, blank lines ignored, nothing else.
//! Duplicate lines collapse into one entry.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use apiledger_symbols::{LinePosition, LinePositionSpan, Location, TextSpan};

/// Default baseline file name, matched case-insensitively.
pub const BASELINE_FILE_NAME: &str = "PublicAPI.txt";

/// Error reading a baseline from disk.
#[derive(Debug, thiserror::Error)]
pub enum BaselineError {
    #[error("failed to read baseline {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// An auxiliary input handed to the analysis by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdditionalFile {
    pub path: PathBuf,
    pub text: String,
}

impl AdditionalFile {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    /// Read a file from disk.
    pub fn read(path: &Path) -> Result<Self, BaselineError> {
        let text = std::fs::read_to_string(path).map_err(|source| BaselineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::new(path, text))
    }
}

/// Find the baseline among `files` by exact, case-insensitive file name.
pub fn find_baseline<'a>(files: &'a [AdditionalFile], file_name: &str) -> Option<&'a AdditionalFile> {
    files.iter().find(|f| {
        f.path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.eq_ignore_ascii_case(file_name))
    })
}

/// A parsed baseline: its text plus the set of declared signature names.
#[derive(Debug, Clone)]
pub struct Baseline {
    path: PathBuf,
    text: String,
    declared: HashSet<String>,
}

impl Baseline {
    /// Parse `text`; every non-blank trimmed line becomes a declared name.
    ///
    /// A leading byte order mark is not part of the first line, but the text is
    /// kept as given so located spans are byte offsets into the file.
    pub fn parse(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let text = text.into();
        let declared = lines(&text)
            .map(|line| line.content.trim())
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self {
            path: path.into(),
            text,
            declared,
        }
    }

    pub fn from_file(file: &AdditionalFile) -> Self {
        Self::parse(file.path.clone(), file.text.clone())
    }

    /// Read and parse a baseline from disk.
    pub fn load(path: &Path) -> Result<Self, BaselineError> {
        Ok(Self::from_file(&AdditionalFile::read(path)?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn declared(&self) -> &HashSet<String> {
        &self.declared
    }

    pub fn contains(&self, signature: &str) -> bool {
        self.declared.contains(signature)
    }

    pub fn len(&self) -> usize {
        self.declared.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declared.is_empty()
    }

    /// Location of the first line whose trimmed content equals `signature`.
    ///
    /// The span covers the trimmed text. Returns `None` when no line matches;
    /// callers fall back to [`Location::degenerate`].
    pub fn locate(&self, signature: &str) -> Option<Location> {
        lines(&self.text).find_map(|line| {
            let trimmed = line.content.trim();
            if trimmed != signature {
                return None;
            }
            let leading = line.content.len() - line.content.trim_start().len();
            let start = line.start + leading;
            let character = line.content[..leading].chars().count() as u32;
            let width = trimmed.chars().count() as u32;
            Some(Location::new(
                self.path.to_string_lossy(),
                TextSpan::new(start, trimmed.len()),
                LinePositionSpan {
                    start: LinePosition::new(line.number, character),
                    end: LinePosition::new(line.number, character + width),
                },
            ))
        })
    }

    /// Location of `signature`, or an empty location at the top of the file.
    pub fn locate_or_degenerate(&self, signature: &str) -> Location {
        self.locate(signature)
            .unwrap_or_else(|| Location::degenerate(self.path.to_string_lossy()))
    }
}

struct Line<'a> {
    /// 0-indexed line number
    number: u32,
    /// Byte offset of the line start
    start: usize,
    content: &'a str,
}

/// Split on `\n`, `\r\n` or a lone `\r`, keeping byte offsets. A leading BOM
/// is skipped.
fn lines(text: &str) -> impl Iterator<Item = Line<'_>> {
    let bytes = text.as_bytes();
    let mut start = if text.starts_with('\u{feff}') {
        '\u{feff}'.len_utf8()
    } else {
        0
    };
    let mut number = 0u32;
    let mut done = false;
    std::iter::from_fn(move || {
        if done {
            return None;
        }
        let rest = &bytes[start..];
        let (end, next) = match rest.iter().position(|&b| b == b'\n' || b == b'\r') {
            Some(i) => {
                let break_len = if rest[i] == b'\r' && rest.get(i + 1) == Some(&b'\n') {
                    2
                } else {
                    1
                };
                (start + i, start + i + break_len)
            }
            None => {
                done = true;
                (text.len(), text.len())
            }
        };
        let line = Line {
            number,
            start,
            content: &text[start..end],
        };
        start = next;
        number += 1;
        Some(line)
    })
}
