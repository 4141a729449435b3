//! RR type and class codes with their presentation mnemonics.

/// 16-bit RR type code (RFC 1035 §3.2.2, extended registry).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypeCode(pub u16);

impl TypeCode {
    pub const A: TypeCode = TypeCode(1);
    pub const NS: TypeCode = TypeCode(2);
    pub const CNAME: TypeCode = TypeCode(5);
    pub const SOA: TypeCode = TypeCode(6);
    pub const PTR: TypeCode = TypeCode(12);
    pub const MX: TypeCode = TypeCode(15);
    pub const TXT: TypeCode = TypeCode(16);
    pub const AAAA: TypeCode = TypeCode(28);
    pub const SRV: TypeCode = TypeCode(33);

    const MNEMONICS: &'static [(&'static str, TypeCode)] = &[
        ("A", TypeCode::A),
        ("NS", TypeCode::NS),
        ("CNAME", TypeCode::CNAME),
        ("SOA", TypeCode::SOA),
        ("PTR", TypeCode::PTR),
        ("MX", TypeCode::MX),
        ("TXT", TypeCode::TXT),
        ("AAAA", TypeCode::AAAA),
        ("SRV", TypeCode::SRV),
    ];

    /// Match a type token, case-insensitively. Accepts both the mnemonic
    /// form (`MX`) and the RFC 3597 generic form (`TYPE15`); the two are
    /// equivalent on the wire.
    pub fn from_mnemonic(token: &[u8]) -> Option<TypeCode> {
        for (name, code) in Self::MNEMONICS {
            if token.eq_ignore_ascii_case(name.as_bytes()) {
                return Some(*code);
            }
        }
        generic_number(token, b"TYPE").map(TypeCode)
    }

    /// Presentation name, if the code has one; generic codes render as
    /// `TYPEnnn` via [`std::fmt::Display`].
    pub fn mnemonic(self) -> Option<&'static str> {
        Self::MNEMONICS
            .iter()
            .find(|(_, code)| *code == self)
            .map(|(name, _)| *name)
    }
}

impl std::fmt::Display for TypeCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.mnemonic() {
            Some(name) => f.write_str(name),
            None => write!(f, "TYPE{}", self.0),
        }
    }
}

/// 16-bit RR class code. Only the four RFC 1035 classes are recognized
/// in presentation form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClassCode(pub u16);

impl ClassCode {
    pub const IN: ClassCode = ClassCode(1);
    pub const CS: ClassCode = ClassCode(2);
    pub const CH: ClassCode = ClassCode(3);
    pub const HS: ClassCode = ClassCode(4);

    const MNEMONICS: &'static [(&'static str, ClassCode)] = &[
        ("IN", ClassCode::IN),
        ("CS", ClassCode::CS),
        ("CH", ClassCode::CH),
        ("HS", ClassCode::HS),
    ];

    pub fn from_mnemonic(token: &[u8]) -> Option<ClassCode> {
        for (name, code) in Self::MNEMONICS {
            if token.eq_ignore_ascii_case(name.as_bytes()) {
                return Some(*code);
            }
        }
        None
    }

    pub fn mnemonic(self) -> Option<&'static str> {
        Self::MNEMONICS
            .iter()
            .find(|(_, code)| *code == self)
            .map(|(name, _)| *name)
    }

    /// Whether this is one of the four classes an option block may carry.
    pub fn is_recognized(self) -> bool {
        self.mnemonic().is_some()
    }
}

impl std::fmt::Display for ClassCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.mnemonic() {
            Some(name) => f.write_str(name),
            None => write!(f, "CLASS{}", self.0),
        }
    }
}

/// Parse the numeric tail of a `TYPEnnn`-style token. The prefix match is
/// case-insensitive, the number must be decimal with no sign and fit in
/// sixteen bits.
fn generic_number(token: &[u8], prefix: &[u8]) -> Option<u16> {
    if token.len() <= prefix.len() || !token[..prefix.len()].eq_ignore_ascii_case(prefix) {
        return None;
    }
    let digits = &token[prefix.len()..];
    let mut value: u32 = 0;
    for &b in digits {
        if !b.is_ascii_digit() {
            return None;
        }
        value = value * 10 + u32::from(b - b'0');
        if value > u32::from(u16::MAX) {
            return None;
        }
    }
    Some(value as u16)
}
