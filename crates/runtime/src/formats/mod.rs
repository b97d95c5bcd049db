//! Text formats for archived game logs.
//!
//! Two input formats are recognised when scanning: plain KIF text (`.kif`)
//! and KIF embedded in an HTML page (`.html`/`.htm`). Export always produces
//! KIF with a selectable line ending.

pub mod html;
pub mod kif;

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use game_core::GameLog;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unsupported log file: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("line {line}: unparseable date {value:?}")]
    BadDate { line: usize, value: String },

    #[error("no players and no moves found")]
    Empty,
}

impl ParseError {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogFormat {
    Kif,
    Html,
}

impl LogFormat {
    /// Format implied by the file extension, `None` for files to ignore.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "kif" => Some(Self::Kif),
            "html" | "htm" => Some(Self::Html),
            _ => None,
        }
    }

    pub fn parse(self, text: &str) -> Result<GameLog, ParseError> {
        match self {
            Self::Kif => kif::parse(text),
            Self::Html => html::parse(text),
        }
    }
}

/// Parse the log stored at `path`. The returned log carries `path`.
///
/// Files are decoded as UTF-8; invalid sequences are replaced rather than
/// rejected.
pub fn parse_file(path: &Path) -> Result<GameLog, ParseError> {
    let format =
        LogFormat::from_path(path).ok_or_else(|| ParseError::UnsupportedFormat(path.into()))?;
    let bytes = fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(format.parse(&text)?.with_path(path))
}

/// Line terminator used when exporting KIF text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineEnding {
    #[default]
    Dos,
    Unix,
}

impl LineEnding {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dos => "\r\n",
            Self::Unix => "\n",
        }
    }

    /// Configuration name of this convention.
    pub const fn format_name(self) -> &'static str {
        match self {
            Self::Dos => "kif_dos",
            Self::Unix => "kif_unix",
        }
    }
}

impl fmt::Display for LineEnding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.format_name())
    }
}

impl FromStr for LineEnding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "kif_dos" | "dos" | "crlf" => Ok(Self::Dos),
            "kif_unix" | "unix" | "lf" => Ok(Self::Unix),
            other => Err(format!("unknown log save format: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(LogFormat::from_path(Path::new("a/b.KIF")), Some(LogFormat::Kif));
        assert_eq!(LogFormat::from_path(Path::new("b.htm")), Some(LogFormat::Html));
        assert_eq!(LogFormat::from_path(Path::new("b.html")), Some(LogFormat::Html));
        assert_eq!(LogFormat::from_path(Path::new("b.txt")), None);
        assert_eq!(LogFormat::from_path(Path::new("log_summary")), None);
    }

    #[test]
    fn line_ending_names() {
        assert_eq!("kif_dos".parse::<LineEnding>(), Ok(LineEnding::Dos));
        assert_eq!("kif_unix".parse::<LineEnding>(), Ok(LineEnding::Unix));
        assert!("kif_mac".parse::<LineEnding>().is_err());
        assert_eq!(LineEnding::Unix.to_string(), "kif_unix");
    }
}
