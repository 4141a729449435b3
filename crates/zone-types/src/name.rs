//! The name compiler: presentation text to length-prefixed wire names.
//!
//! A wire name is a run of length-prefixed labels closed by the
//! zero-length root label, at most 255 octets in total with every label
//! at most 63 octets. Text input uses `.` as the label separator with
//! `\c` and `\DDD` escapes; a name without a trailing dot is made
//! absolute by appending the current origin. Case is preserved (DNS
//! names compare case-insensitively but the wire form keeps what was
//! written).

use std::fmt;
use thiserror::Error;

/// Maximum total wire length of a name, root label included.
pub const MAX_NAME: usize = 255;
/// Maximum length of a single label.
pub const MAX_LABEL: usize = 63;

#[derive(Debug, Error, PartialEq, Eq, Clone, Copy)]
pub enum NameError {
    #[error("empty name")]
    Empty,
    #[error("empty label")]
    EmptyLabel,
    #[error("label exceeds {MAX_LABEL} octets")]
    LabelTooLong,
    #[error("name exceeds {MAX_NAME} octets")]
    NameTooLong,
    #[error("invalid escape sequence")]
    BadEscape,
    #[error("relative name without origin")]
    RelativeWithoutOrigin,
}

impl NameError {
    /// Escape failures are lexical; everything else violates record
    /// semantics. Callers use this to pick the error taxonomy bucket.
    pub fn is_syntax(self) -> bool {
        matches!(
            self,
            NameError::BadEscape | NameError::Empty | NameError::EmptyLabel
        )
    }
}

/// An absolute, canonical wire-format domain name.
///
/// Stored inline so caches of owner blocks never allocate per record.
#[derive(Clone)]
pub struct Name {
    octets: [u8; MAX_NAME],
    length: u8,
}

impl Name {
    /// The root name: a single zero-length label.
    pub fn root() -> Self {
        let mut octets = [0u8; MAX_NAME];
        octets[0] = 0;
        Name { octets, length: 1 }
    }

    /// Compile presentation text into a wire name.
    ///
    /// A trailing unescaped dot marks the text absolute; otherwise
    /// `origin` (itself absolute) is appended. `@` is not special here —
    /// resolving it against the origin is the record assembler's job.
    pub fn from_text(text: &[u8], origin: Option<&Name>) -> Result<Self, NameError> {
        if text.is_empty() {
            return Err(NameError::Empty);
        }
        if text == b"." {
            return Ok(Name::root());
        }

        let mut octets = [0u8; MAX_NAME];
        let mut lab = 0usize; // offset of the open label's length byte
        let mut oct = 1usize; // next write offset
        let mut absolute = false;
        let mut i = 0;
        while i < text.len() {
            if text[i] == b'.' {
                let label_len = oct - lab - 1;
                if label_len == 0 {
                    return Err(NameError::EmptyLabel);
                }
                if label_len > MAX_LABEL {
                    return Err(NameError::LabelTooLong);
                }
                octets[lab] = label_len as u8;
                lab = oct;
                if oct >= MAX_NAME {
                    return Err(NameError::NameTooLong);
                }
                octets[lab] = 0;
                oct += 1;
                absolute = i + 1 == text.len();
                i += 1;
            } else {
                let (value, consumed) = if text[i] == b'\\' {
                    decode_escape(&text[i..])?
                } else {
                    (text[i], 1)
                };
                if oct >= MAX_NAME {
                    return Err(NameError::NameTooLong);
                }
                octets[oct] = value;
                oct += 1;
                i += consumed;
            }
        }

        if absolute {
            return Ok(Name {
                octets,
                length: oct as u8,
            });
        }

        // seal the open label, then append the origin
        let label_len = oct - lab - 1;
        if label_len > MAX_LABEL {
            return Err(NameError::LabelTooLong);
        }
        octets[lab] = label_len as u8;
        let origin = origin.ok_or(NameError::RelativeWithoutOrigin)?;
        let suffix = origin.as_wire();
        if oct + suffix.len() > MAX_NAME {
            return Err(NameError::NameTooLong);
        }
        octets[oct..oct + suffix.len()].copy_from_slice(suffix);
        Ok(Name {
            octets,
            length: (oct + suffix.len()) as u8,
        })
    }

    /// Read a wire name from the front of `wire`; returns the name and
    /// the number of octets consumed. Fails on truncated input or label
    /// and total-length violations.
    pub fn from_wire(wire: &[u8]) -> Result<(Self, usize), NameError> {
        let mut octets = [0u8; MAX_NAME];
        let mut at = 0usize;
        loop {
            let len = *wire.get(at).ok_or(NameError::NameTooLong)? as usize;
            if len > MAX_LABEL {
                return Err(NameError::LabelTooLong);
            }
            let next = at + 1 + len;
            if next > wire.len() || next > MAX_NAME {
                return Err(NameError::NameTooLong);
            }
            octets[at..next].copy_from_slice(&wire[at..next]);
            at = next;
            if len == 0 {
                return Ok((
                    Name {
                        octets,
                        length: at as u8,
                    },
                    at,
                ));
            }
        }
    }

    /// The wire form: length-prefixed labels, zero label last.
    pub fn as_wire(&self) -> &[u8] {
        &self.octets[..self.length as usize]
    }

    pub fn len(&self) -> usize {
        self.length as usize
    }

    pub fn is_empty(&self) -> bool {
        false // a name always carries at least the root label
    }

    pub fn is_root(&self) -> bool {
        self.length == 1
    }

    /// Iterate labels, excluding the terminal root label.
    pub fn labels(&self) -> Labels<'_> {
        Labels {
            wire: self.as_wire(),
            at: 0,
        }
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Self) -> bool {
        self.as_wire() == other.as_wire()
    }
}

impl Eq for Name {}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({self})")
    }
}

/// Canonical presentation: labels dot-joined, always with the trailing
/// dot, with `.`/`\` and non-printable octets escaped.
impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_root() {
            return f.write_str(".");
        }
        for label in self.labels() {
            for &b in label {
                match b {
                    b'.' | b'\\' => write!(f, "\\{}", b as char)?,
                    0x21..=0x7E => write!(f, "{}", b as char)?,
                    _ => write!(f, "\\{b:03}")?,
                }
            }
            f.write_str(".")?;
        }
        Ok(())
    }
}

pub struct Labels<'a> {
    wire: &'a [u8],
    at: usize,
}

impl<'a> Iterator for Labels<'a> {
    type Item = &'a [u8];

    fn next(&mut self) -> Option<&'a [u8]> {
        let len = *self.wire.get(self.at)? as usize;
        if len == 0 {
            return None;
        }
        let start = self.at + 1;
        self.at = start + len;
        Some(&self.wire[start..start + len])
    }
}

/// Decode one escape sequence at the start of `text` (which begins with
/// the backslash). Returns the octet and the number of input bytes
/// consumed.
fn decode_escape(text: &[u8]) -> Result<(u8, usize), NameError> {
    match text.get(1).copied() {
        None => Err(NameError::BadEscape),
        Some(d1) if d1.is_ascii_digit() => {
            let (Some(d2), Some(d3)) = (text.get(2).copied(), text.get(3).copied()) else {
                return Err(NameError::BadEscape);
            };
            if !d2.is_ascii_digit() || !d3.is_ascii_digit() {
                return Err(NameError::BadEscape);
            }
            let value =
                u32::from(d1 - b'0') * 100 + u32::from(d2 - b'0') * 10 + u32::from(d3 - b'0');
            if value > 255 {
                return Err(NameError::BadEscape);
            }
            Ok((value as u8, 4))
        }
        Some(c) => Ok((c, 2)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn origin(text: &str) -> Name {
        Name::from_text(text.as_bytes(), None).unwrap()
    }

    #[test]
    fn absolute_name() {
        let name = Name::from_text(b"example.com.", None).unwrap();
        assert_eq!(name.as_wire(), b"\x07example\x03com\x00");
    }

    #[test]
    fn relative_name_gets_origin() {
        let z = origin("z.");
        let name = Name::from_text(b"h", Some(&z)).unwrap();
        assert_eq!(name.as_wire(), b"\x01h\x01z\x00");
    }

    #[test]
    fn multi_label_relative() {
        let z = origin("example.com.");
        let name = Name::from_text(b"a.b", Some(&z)).unwrap();
        assert_eq!(name.as_wire(), b"\x01a\x01b\x07example\x03com\x00");
    }

    #[test]
    fn root_and_empty() {
        assert_eq!(Name::from_text(b".", None).unwrap().as_wire(), b"\x00");
        assert!(Name::root().is_root());
        assert_eq!(Name::from_text(b"", None), Err(NameError::Empty));
    }

    #[test]
    fn escaped_dot_stays_in_label() {
        let z = origin("z.");
        let name = Name::from_text(b"a\\.b", Some(&z)).unwrap();
        assert_eq!(name.as_wire(), b"\x03a.b\x01z\x00");
    }

    #[test]
    fn decimal_escapes() {
        let name = Name::from_text(b"\\097\\255.example.", None).unwrap();
        assert_eq!(name.as_wire(), b"\x02a\xff\x07example\x00");
        assert_eq!(
            Name::from_text(b"\\256.example.", None),
            Err(NameError::BadEscape)
        );
        assert_eq!(Name::from_text(b"a\\", None), Err(NameError::BadEscape));
        assert_eq!(Name::from_text(b"a\\1b.", None), Err(NameError::BadEscape));
    }

    #[test]
    fn empty_labels_rejected() {
        assert_eq!(
            Name::from_text(b".example.", None),
            Err(NameError::EmptyLabel)
        );
        assert_eq!(
            Name::from_text(b"a..example.", None),
            Err(NameError::EmptyLabel)
        );
    }

    #[test]
    fn label_length_cap() {
        let long = [b'a'; 63];
        let mut text = long.to_vec();
        text.push(b'.');
        assert!(Name::from_text(&text, None).is_ok());

        let too_long = [b'a'; 64];
        let mut text = too_long.to_vec();
        text.push(b'.');
        assert_eq!(Name::from_text(&text, None), Err(NameError::LabelTooLong));
    }

    #[test]
    fn name_length_cap() {
        // four 63-octet labels = 4 * 64 + 1 = 257 octets: over the cap
        let label = "a".repeat(63);
        let text = format!("{label}.{label}.{label}.{label}.");
        assert_eq!(
            Name::from_text(text.as_bytes(), None),
            Err(NameError::NameTooLong)
        );
        // three labels plus a short one fits
        let text = format!("{label}.{label}.{label}.ab.");
        assert!(Name::from_text(text.as_bytes(), None).is_ok());
    }

    #[test]
    fn relative_without_origin_rejected() {
        assert_eq!(
            Name::from_text(b"www", None),
            Err(NameError::RelativeWithoutOrigin)
        );
    }

    #[test]
    fn display_is_canonical() {
        let name = Name::from_text(b"a\\.b.example.com.", None).unwrap();
        assert_eq!(name.to_string(), "a\\.b.example.com.");
        assert_eq!(Name::root().to_string(), ".");
        let name = Name::from_text(b"\\001.z.", None).unwrap();
        assert_eq!(name.to_string(), "\\001.z.");
    }

    #[test]
    fn from_wire_round_trips() {
        let name = Name::from_text(b"mail.example.com.", None).unwrap();
        let (parsed, used) = Name::from_wire(name.as_wire()).unwrap();
        assert_eq!(used, name.len());
        assert_eq!(parsed, name);

        // trailing bytes are left alone
        let mut wire = name.as_wire().to_vec();
        wire.extend_from_slice(b"\x00\x14");
        let (_, used) = Name::from_wire(&wire).unwrap();
        assert_eq!(used, name.len());

        assert!(Name::from_wire(b"\x03abc").is_err());
        assert!(Name::from_wire(b"").is_err());
    }

    #[test]
    fn case_is_preserved() {
        let name = Name::from_text(b"WwW.Example.COM.", None).unwrap();
        assert_eq!(name.as_wire(), b"\x03WwW\x07Example\x03COM\x00");
    }
}
