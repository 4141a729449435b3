//! The shared indexing pass: chunk masks in, tape out.
//!
//! Each 64-byte chunk is classified by the selected variant, then a
//! variant-independent combiner applies escape, quote and comment rules
//! and emits structural entries. Keeping everything after classification
//! shared is what makes the three variants bit-identical.
//!
//! Every scan starts in the plain lexical state: the lexer only rescans
//! from the start of a construct (token, quoted string or comment), so
//! no quote/comment state ever needs to survive a window refill.

use crate::tape::{EntryKind, Tape};
use crate::target::Driver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    InQuote,
    InComment,
}

/// Scan `data[from..]` and append structural entries to `tape`.
///
/// Offsets in the tape are window offsets (not relative to `from`).
pub fn index(driver: Driver, data: &[u8], from: usize, tape: &mut Tape) {
    let mut state = State::Normal;
    let mut pending_escape = false;
    let mut in_field = false;

    let mut chunk_start = from;
    while chunk_start < data.len() {
        let remaining = data.len() - chunk_start;
        let (masks, valid) = if remaining >= 64 {
            let chunk: &[u8; 64] = data[chunk_start..chunk_start + 64].try_into().unwrap();
            (driver.classify(chunk), u64::MAX)
        } else {
            // pad the tail with spaces: whitespace generates no events
            let mut chunk = [b' '; 64];
            chunk[..remaining].copy_from_slice(&data[chunk_start..]);
            (driver.classify(&chunk), (1u64 << remaining) - 1)
        };

        let escaped = find_escaped(masks.backslash, &mut pending_escape);

        // escaped bytes lose their structural meaning and become field
        // content; this also removes an escaped backslash's own effect
        let whitespace = masks.whitespace & !escaped;
        let newline = masks.newline & !escaped;
        let quote = masks.quote & !escaped;
        let semicolon = masks.semicolon & !escaped;
        let group_open = masks.group_open & !escaped;
        let group_close = masks.group_close & !escaped;

        let delimiters = whitespace | newline | quote | semicolon | group_open | group_close;
        let field = !delimiters & valid;
        let follows_field = (field << 1) | u64::from(in_field);
        let starts = field & !follows_field;
        // a run ending at a structural byte needs no FieldEnd: that
        // byte's own entry already marks the boundary
        let ends = !field & follows_field & whitespace;
        in_field = field >> 63 != 0;

        // raw newlines participate so comments can terminate even when
        // a backslash precedes the line break
        let mut events =
            (starts | ends | quote | semicolon | group_open | group_close | masks.newline) & valid;

        while events != 0 {
            let i = events.trailing_zeros() as usize;
            events &= events - 1;
            let bit = 1u64 << i;
            let offset = chunk_start + i;
            match state {
                State::Normal => {
                    if quote & bit != 0 {
                        tape.push(offset, EntryKind::Quote);
                        state = State::InQuote;
                    } else if semicolon & bit != 0 {
                        tape.push(offset, EntryKind::CommentStart);
                        state = State::InComment;
                    } else if newline & bit != 0 {
                        tape.push(offset, EntryKind::Newline);
                    } else if group_open & bit != 0 {
                        tape.push(offset, EntryKind::GroupOpen);
                    } else if group_close & bit != 0 {
                        tape.push(offset, EntryKind::GroupClose);
                    } else if ends & bit != 0 {
                        tape.push(offset, EntryKind::FieldEnd);
                    } else if starts & bit != 0 {
                        tape.push(offset, EntryKind::FieldStart);
                    }
                }
                State::InQuote => {
                    if quote & bit != 0 {
                        tape.push(offset, EntryKind::Quote);
                        state = State::Normal;
                    }
                }
                State::InComment => {
                    if masks.newline & bit != 0 {
                        tape.push(offset, EntryKind::Newline);
                        state = State::Normal;
                    }
                }
            }
        }

        chunk_start += 64;
    }
}

/// Mark the bytes escaped by an unescaped backslash. `pending` carries a
/// trailing backslash's effect into the next chunk.
///
/// Backslashes are sparse in real zones, so this walks set bits instead
/// of using the carryless-multiply formulation.
fn find_escaped(backslash: u64, pending: &mut bool) -> u64 {
    let mut escaped = if *pending { 1u64 } else { 0 };
    *pending = false;
    let mut bs = backslash & !escaped;
    while bs != 0 {
        let i = bs.trailing_zeros();
        bs &= bs - 1;
        if i == 63 {
            *pending = true;
        } else {
            escaped |= 1 << (i + 1);
            // an escaped backslash does not escape
            bs &= !(1 << (i + 1));
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tape::TapeEntry;
    use EntryKind::*;

    fn scan(data: &[u8]) -> Vec<TapeEntry> {
        let mut tape = Tape::new();
        index(Driver::Fallback, data, 0, &mut tape);
        tape.entries().to_vec()
    }

    fn entry(offset: usize, kind: EntryKind) -> TapeEntry {
        TapeEntry { offset, kind }
    }

    #[test]
    fn fields_and_newline() {
        assert_eq!(
            scan(b"foo bar\n"),
            vec![
                entry(0, FieldStart),
                entry(3, FieldEnd),
                entry(4, FieldStart),
                entry(7, Newline),
            ]
        );
    }

    #[test]
    fn field_terminated_by_structural_byte_has_no_field_end() {
        assert_eq!(
            scan(b"foo(bar)"),
            vec![
                entry(0, FieldStart),
                entry(3, GroupOpen),
                entry(4, FieldStart),
                entry(7, GroupClose),
            ]
        );
    }

    #[test]
    fn quote_interior_is_suppressed() {
        assert_eq!(
            scan(b"a \"b (c;\" d\n"),
            vec![
                entry(0, FieldStart),
                entry(1, FieldEnd),
                entry(2, Quote),
                entry(8, Quote),
                entry(10, FieldStart),
                entry(11, Newline),
            ]
        );
    }

    #[test]
    fn comment_runs_to_newline() {
        assert_eq!(
            scan(b"a ; x \"y\" (\nb\n"),
            vec![
                entry(0, FieldStart),
                entry(1, FieldEnd),
                entry(2, CommentStart),
                entry(11, Newline),
                entry(12, FieldStart),
                entry(13, Newline),
            ]
        );
    }

    #[test]
    fn escaped_bytes_lose_structural_meaning() {
        // "a\ b" is one field; "\;" and "\(" are content; "\\" is one
        // escaped backslash and the following quote is structural
        assert_eq!(
            scan(b"a\\ b\n"),
            vec![entry(0, FieldStart), entry(4, Newline)]
        );
        assert_eq!(
            scan(b"x\\;y\\( z\n"),
            vec![
                entry(0, FieldStart),
                entry(6, FieldEnd),
                entry(7, FieldStart),
                entry(8, Newline),
            ]
        );
        assert_eq!(
            scan(b"a\\\\\"q\"\n"),
            vec![
                entry(0, FieldStart),
                entry(3, Quote),
                entry(5, Quote),
                entry(6, Newline),
            ]
        );
    }

    #[test]
    fn escaped_quote_inside_string_does_not_close() {
        assert_eq!(
            scan(b"\"a\\\"b\"\n"),
            vec![entry(0, Quote), entry(5, Quote), entry(6, Newline)]
        );
    }

    #[test]
    fn escape_carry_crosses_chunk_boundary() {
        // backslash at byte 63 escapes the quote at byte 64
        let mut data = vec![b'x'; 63];
        data.push(b'\\');
        data.push(b'"');
        data.push(b'\n');
        assert_eq!(
            scan(&data),
            vec![entry(0, FieldStart), entry(65, Newline)]
        );
    }

    #[test]
    fn quote_state_crosses_chunk_boundary() {
        // open quote in the first chunk, close in the second; the
        // interior parenthesis must stay suppressed
        let mut data = b"\"".to_vec();
        data.extend_from_slice(&[b'q'; 70]);
        data.extend_from_slice(b"(\" a\n");
        assert_eq!(
            scan(&data),
            vec![
                entry(0, Quote),
                entry(72, Quote),
                entry(74, FieldStart),
                entry(75, Newline),
            ]
        );
    }

    #[test]
    fn field_run_crosses_chunk_boundary_without_restart() {
        let data = vec![b'a'; 100];
        assert_eq!(scan(&data), vec![entry(0, FieldStart)]);
    }

    #[test]
    fn events_past_data_end_are_masked() {
        // the space padding of the tail chunk must not fabricate entries
        assert_eq!(scan(b"abc"), vec![entry(0, FieldStart)]);
        assert_eq!(scan(b""), vec![]);
    }

    #[test]
    fn scan_from_offset_skips_guard_byte() {
        let mut tape = Tape::new();
        index(Driver::Fallback, b"\nabc\n", 1, &mut tape);
        assert_eq!(
            tape.entries(),
            &[entry(1, FieldStart), entry(4, Newline)]
        );
    }

    #[test]
    fn crlf_is_whitespace_then_newline() {
        assert_eq!(
            scan(b"a\r\nb\n"),
            vec![
                entry(0, FieldStart),
                entry(1, FieldEnd),
                entry(2, Newline),
                entry(3, FieldStart),
                entry(4, Newline),
            ]
        );
    }
}
