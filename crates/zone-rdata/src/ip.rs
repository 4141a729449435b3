//! Address literals: A and AAAA.

use std::io::Read;
use std::net::{Ipv4Addr, Ipv6Addr};

use zone_scan::{Lexer, Token};
use zone_types::{Rdata, ZoneError, ZoneResult};

use crate::field::{expect_eol, write_rdata};

/// A: one dotted-quad, four octets big-endian.
pub fn decode_a<R: Read>(
    lexer: &mut Lexer<'_, R>,
    first: Token,
    rdata: &mut Rdata,
) -> ZoneResult<()> {
    lexer.materialize(&first)?;
    let addr = std::str::from_utf8(lexer.token_text(&first))
        .ok()
        .and_then(|s| s.parse::<Ipv4Addr>().ok())
        .ok_or_else(|| ZoneError::semantic(lexer.pos(&first), "invalid IPv4 address"))?;
    write_rdata(lexer, &first, rdata, &addr.octets())?;
    expect_eol(lexer)
}

/// AAAA: one IPv6 literal (including `::` compression and an embedded
/// IPv4 tail), sixteen octets.
pub fn decode_aaaa<R: Read>(
    lexer: &mut Lexer<'_, R>,
    first: Token,
    rdata: &mut Rdata,
) -> ZoneResult<()> {
    lexer.materialize(&first)?;
    let text = lexer.token_text(&first);
    // INET6_ADDRSTRLEN: anything longer cannot be an address
    let addr = (text.len() <= 45)
        .then(|| std::str::from_utf8(text).ok())
        .flatten()
        .and_then(|s| s.parse::<Ipv6Addr>().ok())
        .ok_or_else(|| ZoneError::semantic(lexer.pos(&first), "invalid IPv6 address"))?;
    write_rdata(lexer, &first, rdata, &addr.octets())?;
    expect_eol(lexer)
}
