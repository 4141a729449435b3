//! Canonical presentation of decoded records.
//!
//! The inverse of the decoders for the supported types; anything else
//! (or RDATA that does not parse as its type's wire layout) renders in
//! the RFC 3597 generic form, which re-parses to the same octets either
//! way.

use std::fmt::Write;
use std::net::{Ipv4Addr, Ipv6Addr};

use zone_types::{ClassCode, Name, TypeCode};

/// Render one record as a canonical master-file line (no trailing
/// newline).
pub fn present_record(
    owner: &Name,
    rtype: TypeCode,
    class: ClassCode,
    ttl: u32,
    rdata: &[u8],
) -> String {
    let mut line = format!("{owner} {ttl} {class} {rtype} ");
    match present_rdata(rtype, rdata) {
        Some(text) => line.push_str(&text),
        None => line.push_str(&generic(rdata)),
    }
    line
}

fn present_rdata(rtype: TypeCode, rdata: &[u8]) -> Option<String> {
    match rtype {
        TypeCode::A => {
            let octets: [u8; 4] = rdata.try_into().ok()?;
            Some(Ipv4Addr::from(octets).to_string())
        }
        TypeCode::AAAA => {
            let octets: [u8; 16] = rdata.try_into().ok()?;
            Some(Ipv6Addr::from(octets).to_string())
        }
        TypeCode::NS | TypeCode::CNAME | TypeCode::PTR => {
            let (name, used) = Name::from_wire(rdata).ok()?;
            (used == rdata.len()).then(|| name.to_string())
        }
        TypeCode::MX => {
            let preference = u16::from_be_bytes(rdata.get(..2)?.try_into().ok()?);
            let (exchange, used) = Name::from_wire(&rdata[2..]).ok()?;
            (2 + used == rdata.len()).then(|| format!("{preference} {exchange}"))
        }
        TypeCode::SRV => {
            if rdata.len() < 6 {
                return None;
            }
            let priority = u16::from_be_bytes(rdata[0..2].try_into().unwrap());
            let weight = u16::from_be_bytes(rdata[2..4].try_into().unwrap());
            let port = u16::from_be_bytes(rdata[4..6].try_into().unwrap());
            let (target, used) = Name::from_wire(&rdata[6..]).ok()?;
            (6 + used == rdata.len()).then(|| format!("{priority} {weight} {port} {target}"))
        }
        TypeCode::SOA => present_soa(rdata),
        TypeCode::TXT => present_txt(rdata),
        _ => None,
    }
}

fn present_soa(rdata: &[u8]) -> Option<String> {
    let (mname, used_m) = Name::from_wire(rdata).ok()?;
    let (rname, used_r) = Name::from_wire(&rdata[used_m..]).ok()?;
    let counters = &rdata[used_m + used_r..];
    if counters.len() != 20 {
        return None;
    }
    let mut text = format!("{mname} {rname}");
    for chunk in counters.chunks_exact(4) {
        let value = u32::from_be_bytes(chunk.try_into().unwrap());
        write!(text, " {value}").unwrap();
    }
    Some(text)
}

fn present_txt(rdata: &[u8]) -> Option<String> {
    let mut strings = Vec::new();
    let mut at = 0;
    while at < rdata.len() {
        let len = rdata[at] as usize;
        let content = rdata.get(at + 1..at + 1 + len)?;
        let mut text = String::from("\"");
        for &b in content {
            match b {
                b'"' | b'\\' => {
                    text.push('\\');
                    text.push(b as char);
                }
                0x20..=0x7E => text.push(b as char),
                _ => write!(text, "\\{b:03}").unwrap(),
            }
        }
        text.push('"');
        strings.push(text);
        at += 1 + len;
    }
    if strings.is_empty() {
        return None;
    }
    Some(strings.join(" "))
}

fn generic(rdata: &[u8]) -> String {
    let mut text = format!("\\# {}", rdata.len());
    if !rdata.is_empty() {
        text.push(' ');
        for b in rdata {
            write!(text, "{b:02X}").unwrap();
        }
    }
    text
}
