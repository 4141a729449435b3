//! RFC 3597 generic RDATA: `\# <length> <hex...>`.
//!
//! The hex stream is logically one run of digits; whitespace between
//! tokens is ignored, so an octet's two nibbles may even land in
//! different tokens. The declared length must match the decoded octet
//! count exactly.

use std::io::Read;

use zone_scan::Lexer;
use zone_types::{Rdata, ZoneError, ZoneResult};

use crate::field::next_field;

/// Decode after the `\#` marker token has been consumed.
pub fn decode<R: Read>(lexer: &mut Lexer<'_, R>, rdata: &mut Rdata) -> ZoneResult<()> {
    let len_tok = next_field(lexer, "generic RDATA length")?;
    lexer.materialize(&len_tok)?;
    let expected = std::str::from_utf8(lexer.token_text(&len_tok))
        .ok()
        .and_then(|s| s.parse::<u32>().ok())
        .filter(|&len| len <= u16::MAX as u32)
        .ok_or_else(|| ZoneError::semantic(lexer.pos(&len_tok), "invalid generic RDATA length"))?
        as usize;

    let mut high_nibble: Option<u8> = None;
    let mut written = 0usize;
    loop {
        let token = lexer.next_token()?;
        if token.is_eol() {
            if high_nibble.is_some() {
                return Err(ZoneError::semantic(
                    lexer.pos(&token),
                    "odd number of hex digits in generic RDATA",
                ));
            }
            if written != expected {
                return Err(ZoneError::semantic(
                    lexer.pos(&token),
                    format!("generic RDATA length mismatch: declared {expected}, got {written}"),
                ));
            }
            return Ok(());
        }

        lexer.materialize(&token)?;
        enum Bad {
            Digit,
            Excess,
        }
        let outcome = {
            let text = lexer.token_text(&token);
            let mut bad = None;
            for &b in text {
                let Some(nibble) = hex_value(b) else {
                    bad = Some(Bad::Digit);
                    break;
                };
                match high_nibble.take() {
                    None => high_nibble = Some(nibble),
                    Some(high) => {
                        if written == expected {
                            bad = Some(Bad::Excess);
                            break;
                        }
                        // capacity is implied by the <= 65535 length check
                        let _ = rdata.write_u8((high << 4) | nibble);
                        written += 1;
                    }
                }
            }
            bad
        };
        match outcome {
            None => {}
            Some(Bad::Digit) => {
                return Err(ZoneError::semantic(
                    lexer.pos(&token),
                    "invalid hex digit in generic RDATA",
                ));
            }
            Some(Bad::Excess) => {
                return Err(ZoneError::semantic(
                    lexer.pos(&token),
                    format!("generic RDATA exceeds declared length {expected}"),
                ));
            }
        }
    }
}

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}
