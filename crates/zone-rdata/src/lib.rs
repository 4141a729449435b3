//! Per-type RDATA decoders.
//!
//! Every decoder implements the same contract: given the first RDATA
//! token, consume the record's remaining tokens through end-of-line and
//! append wire-format octets to the active RDATA block. The RFC 3597
//! `\#` form is accepted for any type, and is mandatory for types
//! without a specific decoder.

use std::io::Read;

use zone_scan::{Lexer, Token, TokenKind};
use zone_types::{Name, Rdata, TypeCode, ZoneError, ZoneResult};

pub mod field;
pub mod generic;
pub mod host;
pub mod ip;
pub mod present;
pub mod soa;
pub mod text;

pub use field::compile_name;
pub use present::present_record;

/// Decode one record's RDATA. `first` is the first RDATA token; the
/// decoder consumes through the record's end-of-line.
pub fn decode<R: Read>(
    rtype: TypeCode,
    first: Token,
    lexer: &mut Lexer<'_, R>,
    origin: &Name,
    rdata: &mut Rdata,
) -> ZoneResult<()> {
    if first.kind == TokenKind::Contiguous && lexer.bytes(&first) == b"\\#" {
        return generic::decode(lexer, rdata);
    }
    match rtype {
        TypeCode::A => ip::decode_a(lexer, first, rdata),
        TypeCode::AAAA => ip::decode_aaaa(lexer, first, rdata),
        TypeCode::NS | TypeCode::CNAME | TypeCode::PTR => {
            host::decode_host(lexer, first, origin, rdata)
        }
        TypeCode::MX => host::decode_mx(lexer, first, origin, rdata),
        TypeCode::SRV => host::decode_srv(lexer, first, origin, rdata),
        TypeCode::SOA => soa::decode(lexer, first, origin, rdata),
        TypeCode::TXT => text::decode(lexer, first, rdata),
        other => Err(ZoneError::semantic(
            lexer.pos(&first),
            format!("type {other} requires \\# generic RDATA"),
        )),
    }
}
