//! Byte classification: one 64-byte chunk in, category bitmasks out.
//!
//! This is the only seam between the vectorized implementations; escape
//! resolution, quote parity, comment expansion and tape emission all
//! happen in the shared scanner pass, so every variant produces the same
//! tape by construction. Bit `i` of a mask corresponds to chunk byte `i`.

pub mod fallback;
#[cfg(target_arch = "x86_64")]
pub mod haswell;
#[cfg(target_arch = "x86_64")]
pub mod westmere;

/// Per-category bitmasks for one 64-byte chunk.
///
/// Carriage return counts as plain whitespace, so `\r\n` line endings
/// lex as whitespace followed by a newline and a lone CR never ends a
/// record.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BlockMasks {
    pub whitespace: u64,
    pub newline: u64,
    pub quote: u64,
    pub backslash: u64,
    pub semicolon: u64,
    pub group_open: u64,
    pub group_close: u64,
}
