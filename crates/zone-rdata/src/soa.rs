//! SOA: mname, rname, then five 32-bit counters.

use std::io::Read;

use zone_scan::{Lexer, Token};
use zone_types::{Name, Rdata, ZoneResult};

use crate::field::{compile_name, expect_eol, next_field, parse_u32, write_rdata};

const COUNTERS: [&str; 5] = [
    "SOA serial",
    "SOA refresh",
    "SOA retry",
    "SOA expire",
    "SOA minimum",
];

pub fn decode<R: Read>(
    lexer: &mut Lexer<'_, R>,
    first: Token,
    origin: &Name,
    rdata: &mut Rdata,
) -> ZoneResult<()> {
    let mname = compile_name(lexer, &first, origin)?;
    write_rdata(lexer, &first, rdata, mname.as_wire())?;

    let rname_tok = next_field(lexer, "SOA rname")?;
    let rname = compile_name(lexer, &rname_tok, origin)?;
    write_rdata(lexer, &rname_tok, rdata, rname.as_wire())?;

    for what in COUNTERS {
        let token = next_field(lexer, what)?;
        let value = parse_u32(lexer, &token, what)?;
        write_rdata(lexer, &token, rdata, &value.to_be_bytes())?;
    }
    expect_eol(lexer)
}
