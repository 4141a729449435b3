//! AVX2 classifier (Haswell and later): two 256-bit compares per needle.

use core::arch::x86_64::{
    __m256i, _mm256_cmpeq_epi8, _mm256_loadu_si256, _mm256_movemask_epi8, _mm256_set1_epi8,
};

use super::BlockMasks;

#[target_feature(enable = "avx2")]
unsafe fn eq64(lo: __m256i, hi: __m256i, needle: u8) -> u64 {
    // SAFETY: caller guarantees AVX2 via the target_feature contract.
    unsafe {
        let splat = _mm256_set1_epi8(needle as i8);
        let lo_bits = _mm256_movemask_epi8(_mm256_cmpeq_epi8(lo, splat)) as u32 as u64;
        let hi_bits = _mm256_movemask_epi8(_mm256_cmpeq_epi8(hi, splat)) as u32 as u64;
        lo_bits | (hi_bits << 32)
    }
}

/// # Safety
///
/// Requires AVX2; the target dispatcher only selects this variant after
/// probing CPU feature bits.
#[target_feature(enable = "avx2")]
pub unsafe fn classify(chunk: &[u8; 64]) -> BlockMasks {
    // SAFETY: loads stay within the 64-byte chunk; AVX2 per the contract.
    unsafe {
        let lo = _mm256_loadu_si256(chunk.as_ptr().cast());
        let hi = _mm256_loadu_si256(chunk.as_ptr().add(32).cast());
        BlockMasks {
            whitespace: eq64(lo, hi, b' ') | eq64(lo, hi, b'\t') | eq64(lo, hi, b'\r'),
            newline: eq64(lo, hi, b'\n'),
            quote: eq64(lo, hi, b'"'),
            backslash: eq64(lo, hi, b'\\'),
            semicolon: eq64(lo, hi, b';'),
            group_open: eq64(lo, hi, b'('),
            group_close: eq64(lo, hi, b')'),
        }
    }
}
