//! TTL and duration field parsing.
//!
//! Master files write TTLs either as plain decimal seconds or in the
//! BIND duration shorthand (`1w2d3h4m5s`, units case-insensitive). The
//! same syntax is accepted for the 32-bit counters in SOA RDATA, which
//! span the full unsigned range; TTL positions are additionally capped at
//! `2^31 - 1`.

/// Upper bound for a TTL value (RFC 2181 §8).
pub const MAX_TTL: u32 = i32::MAX as u32;

/// Parse a 32-bit unsigned field accepting duration syntax.
///
/// Returns `None` for empty input, a stray character, a unit without
/// digits, or overflow past `u32::MAX`. A final group of digits without a
/// unit counts as seconds, so both `300` and `5m` parse.
pub fn parse_u32_field(text: &[u8]) -> Option<u32> {
    if text.is_empty() {
        return None;
    }
    let mut total: u32 = 0;
    let mut digits: Option<u32> = None;
    for &b in text {
        match b {
            b'0'..=b'9' => {
                let d = u32::from(b - b'0');
                digits = Some(digits.unwrap_or(0).checked_mul(10)?.checked_add(d)?);
            }
            _ => {
                let unit: u32 = match b.to_ascii_lowercase() {
                    b's' => 1,
                    b'm' => 60,
                    b'h' => 3600,
                    b'd' => 86400,
                    b'w' => 604800,
                    _ => return None,
                };
                let value = digits.take()?;
                total = total.checked_add(value.checked_mul(unit)?)?;
            }
        }
    }
    if let Some(rest) = digits {
        total = total.checked_add(rest)?;
    }
    Some(total)
}

/// Parse a TTL: duration syntax, capped at [`MAX_TTL`].
pub fn parse_ttl(text: &[u8]) -> Option<u32> {
    parse_u32_field(text).filter(|&v| v <= MAX_TTL)
}
