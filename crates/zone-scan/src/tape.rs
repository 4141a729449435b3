//! The tape: ordered structural positions produced by the indexer.

/// What kind of lexical transition a tape entry marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// First byte of a contiguous field.
    FieldStart,
    /// Delimiter byte terminating a contiguous field.
    FieldEnd,
    /// Unescaped double quote; open/close alternate.
    Quote,
    /// `(` outside quotes and comments.
    GroupOpen,
    /// `)` outside quotes and comments.
    GroupClose,
    /// `;` starting a comment; the body is suppressed, the terminating
    /// newline is the next entry.
    CommentStart,
    /// `\n` outside quotes.
    Newline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TapeEntry {
    pub offset: usize,
    pub kind: EntryKind,
}

/// Append-only during indexing, consumed front-to-back by the lexer.
/// The head never advances past the written tail.
#[derive(Debug, Default)]
pub struct Tape {
    entries: Vec<TapeEntry>,
    head: usize,
}

impl Tape {
    pub fn new() -> Self {
        Tape {
            entries: Vec::with_capacity(256),
            head: 0,
        }
    }

    /// Reset for a fresh scan of the current window.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.head = 0;
    }

    pub fn push(&mut self, offset: usize, kind: EntryKind) {
        self.entries.push(TapeEntry { offset, kind });
    }

    pub fn peek(&self) -> Option<TapeEntry> {
        self.entries.get(self.head).copied()
    }

    pub fn peek_ahead(&self, n: usize) -> Option<TapeEntry> {
        self.entries.get(self.head + n).copied()
    }

    pub fn advance(&mut self, n: usize) {
        self.head += n;
        debug_assert!(self.head <= self.entries.len());
    }

    pub fn is_exhausted(&self) -> bool {
        self.head >= self.entries.len()
    }

    /// Entries written so far (tests and diagnostics).
    pub fn entries(&self) -> &[TapeEntry] {
        &self.entries
    }
}
