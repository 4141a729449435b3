//! The single error taxonomy for a parse invocation.
//!
//! The original engine design calls for non-local unwinding from deep
//! inside the decoders; here every layer returns `Result<_, ZoneError>`
//! and `?` carries the failure back to the top-level entry point. Each
//! variant maps onto a distinct negative result code so embedders that
//! only look at numbers still get a stable contract.

use std::fmt;
use std::io;
use thiserror::Error;

/// Convenience alias used throughout the workspace.
pub type ZoneResult<T> = Result<T, ZoneError>;

/// File/line/column context captured at the point of failure.
///
/// `line` and `column` are 1-based. String sources report `<string>` as
/// the file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcePos {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl SourcePos {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

#[derive(Debug, Error)]
pub enum ZoneError {
    /// Reserved for allocator-contract parity; safe Rust aborts on true
    /// exhaustion, so this is never produced by the engine itself.
    #[error("out of memory")]
    OutOfMemory,

    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    /// Invalid or missing option, detected before any I/O.
    #[error("bad parameter: {0}")]
    BadParameter(String),

    /// Malformed token stream: unterminated quote, bad escape, stray
    /// parenthesis, bad number.
    #[error("{pos}: syntax error: {detail}")]
    Syntax { pos: SourcePos, detail: String },

    /// Well-formed tokens violating record semantics: bad literals,
    /// length caps exceeded, unknown type without generic RDATA.
    #[error("{pos}: {detail}")]
    Semantic { pos: SourcePos, detail: String },

    /// Negative code returned by the sink's accept callback, surfaced
    /// verbatim as the parse result.
    #[error("sink aborted parse with code {0}")]
    Sink(i32),
}

impl ZoneError {
    pub fn syntax(pos: SourcePos, detail: impl Into<String>) -> Self {
        ZoneError::Syntax {
            pos,
            detail: detail.into(),
        }
    }

    pub fn semantic(pos: SourcePos, detail: impl Into<String>) -> Self {
        ZoneError::Semantic {
            pos,
            detail: detail.into(),
        }
    }

    /// Numeric result code. Zero is reserved for success, positive values
    /// for the sink's slot-index channel.
    pub fn code(&self) -> i32 {
        match self {
            ZoneError::OutOfMemory => -1,
            ZoneError::Io(_) => -2,
            ZoneError::BadParameter(_) => -3,
            ZoneError::Syntax { .. } => -4,
            ZoneError::Semantic { .. } => -5,
            ZoneError::Sink(code) => *code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct_and_negative() {
        let io = ZoneError::Io(io::Error::other("x"));
        let errs = [
            ZoneError::OutOfMemory,
            io,
            ZoneError::BadParameter("p".into()),
            ZoneError::syntax(SourcePos::new("f", 1, 1), "s"),
            ZoneError::semantic(SourcePos::new("f", 1, 1), "m"),
        ];
        let codes: Vec<i32> = errs.iter().map(|e| e.code()).collect();
        assert!(codes.iter().all(|&c| c < 0));
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn sink_code_passes_through() {
        assert_eq!(ZoneError::Sink(-42).code(), -42);
    }

    #[test]
    fn position_renders_file_line_column() {
        let pos = SourcePos::new("db.example", 12, 7);
        assert_eq!(pos.to_string(), "db.example:12:7");
        let err = ZoneError::syntax(pos, "unterminated quoted string");
        assert_eq!(
            err.to_string(),
            "db.example:12:7: syntax error: unterminated quoted string"
        );
    }
}
