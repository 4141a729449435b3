//! The token materializer.
//!
//! Walks the tape one construct at a time: contiguous fields, quoted
//! strings, group parentheses, comments, newlines. Tokens are byte
//! ranges into the current window; contents are only copied when a
//! field carries escapes, in which case [`Lexer::text`] resolves them
//! into a reusable scratch buffer.
//!
//! When the tape runs out mid-construct the lexer refills the window
//! keeping everything from the construct's first byte (plus one guard
//! byte for column-zero detection) and rescans. A construct is thus
//! always indexed in one piece, which is also what keeps escape
//! sequences split across window boundaries intact.

use std::io::Read;

use zone_types::{SourcePos, ZoneError, ZoneResult};

use crate::scanner;
use crate::tape::{EntryKind, Tape};
use crate::target::Driver;
use crate::window::Window;

/// End-of-file progression for one source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EofState {
    /// The reader may still produce bytes.
    HaveData,
    /// The reader is drained; the window holds the final bytes.
    ReadAllData,
    /// The end-of-file token has been handed out.
    EndReached,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Whitespace-delimited field; bytes point into the window.
    Contiguous,
    /// Quoted field, quotes excluded.
    Quoted,
    /// End of a logical line (newlines inside groups never produce one).
    Eol,
    /// End of the source.
    Eof,
}

/// One logical lexeme. `start..end` index the lexer's window at the time
/// the token was produced; fetch bytes before pulling the next token.
#[derive(Debug, Clone, Copy)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    /// Contains a backslash; [`Lexer::text`] materializes.
    pub escaped: bool,
    /// The physical line begins at column 0 with this token.
    pub line_begin: bool,
    pub line: u32,
    pub column: u32,
}

impl Token {
    pub fn is_eol(&self) -> bool {
        matches!(self.kind, TokenKind::Eol | TokenKind::Eof)
    }
}

pub struct Lexer<'s, R: Read = std::fs::File> {
    source_name: String,
    reader: Option<R>,
    window: Window<'s>,
    tape: Tape,
    driver: Driver,
    eof: EofState,
    group_depth: u32,
    line: u32,
    /// Absolute source offset where the current line starts.
    line_start: u64,
    scratch: Vec<u8>,
}

impl<'s, R: Read> Lexer<'s, R> {
    pub fn from_reader(source_name: impl Into<String>, reader: R, driver: Driver) -> Self {
        Lexer {
            source_name: source_name.into(),
            reader: Some(reader),
            window: Window::for_file(),
            tape: Tape::new(),
            driver,
            eof: EofState::HaveData,
            group_depth: 0,
            line: 1,
            line_start: 0,
            scratch: Vec::new(),
        }
    }

    pub fn from_text(source_name: impl Into<String>, text: &'s [u8], driver: Driver) -> Self {
        let window = Window::for_text(text);
        let mut tape = Tape::new();
        scanner::index(driver, window.data(), 0, &mut tape);
        Lexer {
            source_name: source_name.into(),
            reader: None,
            window,
            tape,
            driver,
            eof: EofState::ReadAllData,
            group_depth: 0,
            line: 1,
            line_start: 0,
            scratch: Vec::new(),
        }
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn eof_state(&self) -> EofState {
        self.eof
    }

    pub fn group_depth(&self) -> u32 {
        self.group_depth
    }

    /// Produce the next logical token.
    pub fn next_token(&mut self) -> ZoneResult<Token> {
        loop {
            let Some(head) = self.tape.peek() else {
                if self.advance_window(None)? {
                    continue;
                }
                return self.finish_eof();
            };
            match head.kind {
                EntryKind::Newline => {
                    self.tape.advance(1);
                    let ended_line = self.line;
                    let column = self.column_at(head.offset);
                    self.line += 1;
                    self.line_start = self.window.base() + head.offset as u64 + 1;
                    if self.group_depth > 0 {
                        continue;
                    }
                    return Ok(Token {
                        kind: TokenKind::Eol,
                        start: head.offset,
                        end: head.offset + 1,
                        escaped: false,
                        line_begin: false,
                        line: ended_line,
                        column,
                    });
                }
                EntryKind::GroupOpen => {
                    self.tape.advance(1);
                    self.group_depth += 1;
                }
                EntryKind::GroupClose => {
                    if self.group_depth == 0 {
                        return Err(ZoneError::syntax(
                            self.pos_at(head.offset),
                            "closing parenthesis outside a group",
                        ));
                    }
                    self.tape.advance(1);
                    self.group_depth -= 1;
                }
                EntryKind::CommentStart => {
                    if self.tape.peek_ahead(1).is_some() || self.no_more_data() {
                        // the next entry, if any, is the terminating newline
                        self.tape.advance(1);
                    } else {
                        self.advance_window(Some(head.offset))?;
                    }
                }
                EntryKind::FieldStart => match self.tape.peek_ahead(1) {
                    Some(boundary) => {
                        self.tape.advance(1);
                        if boundary.kind == EntryKind::FieldEnd {
                            self.tape.advance(1);
                        }
                        return Ok(self.token(TokenKind::Contiguous, head.offset, boundary.offset));
                    }
                    None if self.no_more_data() => {
                        self.tape.advance(1);
                        return Ok(self.token(
                            TokenKind::Contiguous,
                            head.offset,
                            self.window.len(),
                        ));
                    }
                    None => {
                        self.advance_window(Some(head.offset))?;
                    }
                },
                EntryKind::Quote => match self.tape.peek_ahead(1) {
                    Some(close) => {
                        debug_assert_eq!(close.kind, EntryKind::Quote);
                        self.tape.advance(2);
                        if self.window.data()[head.offset + 1..close.offset].contains(&b'\n') {
                            return Err(ZoneError::syntax(
                                self.pos_at(head.offset),
                                "newline inside quoted string",
                            ));
                        }
                        let mut token =
                            self.token(TokenKind::Quoted, head.offset + 1, close.offset);
                        token.line_begin = self.line_begin_at(head.offset);
                        return Ok(token);
                    }
                    None if self.no_more_data() => {
                        return Err(ZoneError::syntax(
                            self.pos_at(head.offset),
                            "unterminated quoted string",
                        ));
                    }
                    None => {
                        self.advance_window(Some(head.offset))?;
                    }
                },
                EntryKind::FieldEnd => {
                    // rescans always restart at a construct head
                    debug_assert!(false, "stray FieldEnd on tape");
                    self.tape.advance(1);
                }
            }
        }
    }

    /// Raw token bytes, escapes unresolved. Name fields take this form:
    /// the name compiler must see escaped dots as content.
    pub fn bytes(&self, token: &Token) -> &[u8] {
        &self.window.data()[token.start..token.end]
    }

    /// Token bytes with `\c` and `\DDD` escapes resolved. Zero-copy when
    /// the token carries no backslash; otherwise the scratch buffer is
    /// rewritten (and stays valid until the next escaped token).
    pub fn text(&mut self, token: &Token) -> ZoneResult<&[u8]> {
        self.materialize(token)?;
        Ok(self.token_text(token))
    }

    /// Resolve escapes into the scratch buffer ahead of
    /// [`Lexer::token_text`]. A no-op for tokens without escapes.
    pub fn materialize(&mut self, token: &Token) -> ZoneResult<()> {
        if !token.escaped {
            return Ok(());
        }
        let data = &self.window.data()[token.start..token.end];
        self.scratch.clear();
        let mut i = 0;
        while i < data.len() {
            if data[i] != b'\\' {
                self.scratch.push(data[i]);
                i += 1;
                continue;
            }
            match data.get(i + 1).copied() {
                None => {
                    return Err(ZoneError::syntax(
                        SourcePos::new(self.source_name.clone(), token.line, token.column),
                        "incomplete escape sequence",
                    ));
                }
                Some(d) if d.is_ascii_digit() => {
                    let digits = data
                        .get(i + 1..i + 4)
                        .filter(|d| d.iter().all(|b| b.is_ascii_digit()));
                    let Some(digits) = digits else {
                        return Err(ZoneError::syntax(
                            SourcePos::new(self.source_name.clone(), token.line, token.column),
                            "escape requires three decimal digits",
                        ));
                    };
                    let value = u32::from(digits[0] - b'0') * 100
                        + u32::from(digits[1] - b'0') * 10
                        + u32::from(digits[2] - b'0');
                    if value > 255 {
                        return Err(ZoneError::syntax(
                            SourcePos::new(self.source_name.clone(), token.line, token.column),
                            "escape value exceeds 255",
                        ));
                    }
                    self.scratch.push(value as u8);
                    i += 4;
                }
                Some(c) => {
                    self.scratch.push(c);
                    i += 2;
                }
            }
        }
        Ok(())
    }

    /// Resolved bytes of the most recently materialized token; for
    /// unescaped tokens, the window slice directly.
    pub fn token_text(&self, token: &Token) -> &[u8] {
        if token.escaped {
            &self.scratch
        } else {
            &self.window.data()[token.start..token.end]
        }
    }

    /// Position of a token, for error context.
    pub fn pos(&self, token: &Token) -> SourcePos {
        SourcePos::new(self.source_name.clone(), token.line, token.column)
    }

    /// Position of the current read point (directive-level errors).
    pub fn here(&self) -> SourcePos {
        SourcePos::new(self.source_name.clone(), self.line, 1)
    }

    fn token(&self, kind: TokenKind, start: usize, end: usize) -> Token {
        let escaped = self.window.data()[start..end].contains(&b'\\');
        Token {
            kind,
            start,
            end,
            escaped,
            line_begin: self.line_begin_at(start),
            line: self.line,
            column: self.column_at(start),
        }
    }

    /// Column-zero test for the byte starting a construct. The refill
    /// policy always retains one guard byte ahead of a kept construct,
    /// so looking one byte back is safe whenever the construct is not at
    /// the very start of the source.
    fn line_begin_at(&self, construct_start: usize) -> bool {
        if self.group_depth > 0 {
            return false;
        }
        let abs = self.window.base() + construct_start as u64;
        if abs == 0 {
            return true;
        }
        construct_start > 0 && self.window.data()[construct_start - 1] == b'\n'
    }

    fn column_at(&self, offset: usize) -> u32 {
        let abs = self.window.base() + offset as u64;
        (abs - self.line_start + 1).min(u32::MAX as u64) as u32
    }

    fn pos_at(&self, offset: usize) -> SourcePos {
        SourcePos::new(self.source_name.clone(), self.line, self.column_at(offset))
    }

    fn no_more_data(&self) -> bool {
        !matches!(self.eof, EofState::HaveData)
    }

    /// Refill and rescan. `pending` is the window offset of an
    /// incomplete construct to retain; `None` discards the whole window.
    /// Returns false once the source is fully drained and rescanning
    /// cannot make progress.
    fn advance_window(&mut self, pending: Option<usize>) -> ZoneResult<bool> {
        if self.no_more_data() {
            return Ok(false);
        }
        let keep_from = pending.unwrap_or(self.window.len());
        let keep = keep_from.saturating_sub(1);
        let read = match &mut self.reader {
            Some(reader) => self.window.refill(reader, keep)?,
            None => 0,
        };
        if read == 0 {
            self.eof = EofState::ReadAllData;
        }
        let scan_from = keep_from - keep;
        self.tape.clear();
        scanner::index(self.driver, self.window.data(), scan_from, &mut self.tape);
        Ok(true)
    }

    fn finish_eof(&mut self) -> ZoneResult<Token> {
        if self.group_depth > 0 {
            return Err(ZoneError::syntax(
                self.here(),
                "unbalanced opening parenthesis at end of file",
            ));
        }
        self.eof = EofState::EndReached;
        let at = self.window.len();
        Ok(Token {
            kind: TokenKind::Eof,
            start: at,
            end: at,
            escaped: false,
            line_begin: false,
            line: self.line,
            column: self.column_at(at),
        })
    }
}
