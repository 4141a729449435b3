//! Name-valued RDATA: NS, CNAME, PTR, and the preference+name shapes
//! MX and SRV.

use std::io::Read;

use zone_scan::{Lexer, Token};
use zone_types::{Name, Rdata, ZoneResult};

use crate::field::{compile_name, expect_eol, next_field, parse_u16, write_rdata};

/// NS, CNAME, PTR: a single domain name.
pub fn decode_host<R: Read>(
    lexer: &mut Lexer<'_, R>,
    first: Token,
    origin: &Name,
    rdata: &mut Rdata,
) -> ZoneResult<()> {
    let name = compile_name(lexer, &first, origin)?;
    write_rdata(lexer, &first, rdata, name.as_wire())?;
    expect_eol(lexer)
}

/// MX: 16-bit preference, then the exchange name.
pub fn decode_mx<R: Read>(
    lexer: &mut Lexer<'_, R>,
    first: Token,
    origin: &Name,
    rdata: &mut Rdata,
) -> ZoneResult<()> {
    let preference = parse_u16(lexer, &first, "MX preference")?;
    let exchange = next_field(lexer, "MX exchange")?;
    let name = compile_name(lexer, &exchange, origin)?;
    rdata
        .write_u16(preference)
        .and_then(|_| rdata.write_all(name.as_wire()))
        .map_err(|_| {
            zone_types::ZoneError::semantic(lexer.pos(&exchange), "RDATA exceeds 65535 octets")
        })?;
    expect_eol(lexer)
}

/// SRV: priority, weight, port (16-bit each), then the target name.
pub fn decode_srv<R: Read>(
    lexer: &mut Lexer<'_, R>,
    first: Token,
    origin: &Name,
    rdata: &mut Rdata,
) -> ZoneResult<()> {
    let priority = parse_u16(lexer, &first, "SRV priority")?;
    let weight_tok = next_field(lexer, "SRV weight")?;
    let weight = parse_u16(lexer, &weight_tok, "SRV weight")?;
    let port_tok = next_field(lexer, "SRV port")?;
    let port = parse_u16(lexer, &port_tok, "SRV port")?;
    let target_tok = next_field(lexer, "SRV target")?;
    let target = compile_name(lexer, &target_tok, origin)?;
    rdata
        .write_u16(priority)
        .and_then(|_| rdata.write_u16(weight))
        .and_then(|_| rdata.write_u16(port))
        .and_then(|_| rdata.write_all(target.as_wire()))
        .map_err(|_| {
            zone_types::ZoneError::semantic(lexer.pos(&target_tok), "RDATA exceeds 65535 octets")
        })?;
    expect_eol(lexer)
}
