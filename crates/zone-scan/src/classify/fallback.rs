//! Scalar classifier; the reference the vectorized variants must match.

use super::BlockMasks;

pub fn classify(chunk: &[u8; 64]) -> BlockMasks {
    let mut masks = BlockMasks::default();
    for (i, &byte) in chunk.iter().enumerate() {
        let bit = 1u64 << i;
        match byte {
            b' ' | b'\t' | b'\r' => masks.whitespace |= bit,
            b'\n' => masks.newline |= bit,
            b'"' => masks.quote |= bit,
            b'\\' => masks.backslash |= bit,
            b';' => masks.semicolon |= bit,
            b'(' => masks.group_open |= bit,
            b')' => masks.group_close |= bit,
            _ => {}
        }
    }
    masks
}
