//! TXT: one or more character-strings, length-prefixed on the wire.

use std::io::Read;

use zone_scan::{Lexer, Token};
use zone_types::{Rdata, ZoneError, ZoneResult};

enum Wrote {
    Ok,
    TooLong,
    Overflow,
}

pub fn decode<R: Read>(
    lexer: &mut Lexer<'_, R>,
    first: Token,
    rdata: &mut Rdata,
) -> ZoneResult<()> {
    let mut token = first;
    loop {
        lexer.materialize(&token)?;
        let wrote = {
            let text = lexer.token_text(&token);
            if text.len() > 255 {
                Wrote::TooLong
            } else if rdata
                .write_u8(text.len() as u8)
                .and_then(|_| rdata.write_all(text))
                .is_err()
            {
                Wrote::Overflow
            } else {
                Wrote::Ok
            }
        };
        match wrote {
            Wrote::Ok => {}
            Wrote::TooLong => {
                return Err(ZoneError::semantic(
                    lexer.pos(&token),
                    "character-string exceeds 255 octets",
                ));
            }
            Wrote::Overflow => {
                return Err(ZoneError::semantic(
                    lexer.pos(&token),
                    "RDATA exceeds 65535 octets",
                ));
            }
        }
        let next = lexer.next_token()?;
        if next.is_eol() {
            return Ok(());
        }
        token = next;
    }
}
