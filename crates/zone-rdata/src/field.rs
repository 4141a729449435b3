//! Shared helpers for pulling and converting RDATA fields.

use std::io::Read;

use zone_scan::{Lexer, Token};
use zone_types::{Name, NameError, Rdata, ZoneError, ZoneResult, parse_u32_field};

/// Read the next token, requiring a field (not end-of-line).
pub fn next_field<R: Read>(lexer: &mut Lexer<'_, R>, what: &str) -> ZoneResult<Token> {
    let token = lexer.next_token()?;
    if token.is_eol() {
        return Err(ZoneError::semantic(
            lexer.pos(&token),
            format!("missing {what}"),
        ));
    }
    Ok(token)
}

/// Require end-of-line (or end-of-file) after the final field.
pub fn expect_eol<R: Read>(lexer: &mut Lexer<'_, R>) -> ZoneResult<()> {
    let token = lexer.next_token()?;
    if !token.is_eol() {
        return Err(ZoneError::semantic(
            lexer.pos(&token),
            "trailing field after RDATA",
        ));
    }
    Ok(())
}

/// Compile a domain-name field against the current origin. A lone
/// unescaped `@` denotes the origin itself.
pub fn compile_name<R: Read>(
    lexer: &Lexer<'_, R>,
    token: &Token,
    origin: &Name,
) -> ZoneResult<Name> {
    let bytes = lexer.bytes(token);
    if bytes == b"@" {
        return Ok(origin.clone());
    }
    Name::from_text(bytes, Some(origin)).map_err(|err| name_error(lexer, token, err))
}

pub fn name_error<R: Read>(lexer: &Lexer<'_, R>, token: &Token, err: NameError) -> ZoneError {
    if err.is_syntax() {
        ZoneError::syntax(lexer.pos(token), err.to_string())
    } else {
        ZoneError::semantic(lexer.pos(token), err.to_string())
    }
}

/// Decimal 16-bit field (MX preference, SRV priority/weight/port).
pub fn parse_u16<R: Read>(
    lexer: &mut Lexer<'_, R>,
    token: &Token,
    what: &str,
) -> ZoneResult<u16> {
    lexer.materialize(token)?;
    let text = lexer.token_text(token);
    let parsed = std::str::from_utf8(text)
        .ok()
        .and_then(|s| s.parse::<u16>().ok());
    parsed.ok_or_else(|| ZoneError::semantic(lexer.pos(token), format!("invalid {what}")))
}

/// 32-bit counter field accepting TTL-style duration syntax (SOA
/// serial/refresh/retry/expire/minimum).
pub fn parse_u32<R: Read>(
    lexer: &mut Lexer<'_, R>,
    token: &Token,
    what: &str,
) -> ZoneResult<u32> {
    lexer.materialize(token)?;
    let parsed = parse_u32_field(lexer.token_text(token));
    parsed.ok_or_else(|| ZoneError::semantic(lexer.pos(token), format!("invalid {what}")))
}

/// Append octets to the active RDATA block, surfacing overflow as the
/// semantic error the taxonomy requires.
pub fn write_rdata<R: Read>(
    lexer: &Lexer<'_, R>,
    token: &Token,
    rdata: &mut Rdata,
    octets: &[u8],
) -> ZoneResult<()> {
    rdata
        .write_all(octets)
        .map_err(|_| ZoneError::semantic(lexer.pos(token), "RDATA exceeds 65535 octets"))
}
