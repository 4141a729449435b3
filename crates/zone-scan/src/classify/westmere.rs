//! SSE4.2 classifier (Westmere and later): four 128-bit lanes per chunk.

use core::arch::x86_64::{
    __m128i, _mm_cmpeq_epi8, _mm_loadu_si128, _mm_movemask_epi8, _mm_set1_epi8,
};

use super::BlockMasks;

#[target_feature(enable = "sse4.2")]
unsafe fn eq64(lanes: &[__m128i; 4], needle: u8) -> u64 {
    // SAFETY: caller guarantees SSE4.2 via the target_feature contract.
    unsafe {
        let splat = _mm_set1_epi8(needle as i8);
        let mut bits = 0u64;
        for (i, lane) in lanes.iter().enumerate() {
            let lane_bits = _mm_movemask_epi8(_mm_cmpeq_epi8(*lane, splat)) as u32 as u64;
            bits |= lane_bits << (16 * i);
        }
        bits
    }
}

/// # Safety
///
/// Requires SSE4.2; the target dispatcher only selects this variant
/// after probing CPU feature bits.
#[target_feature(enable = "sse4.2")]
pub unsafe fn classify(chunk: &[u8; 64]) -> BlockMasks {
    // SAFETY: loads stay within the 64-byte chunk; SSE4.2 per the contract.
    unsafe {
        let lanes = [
            _mm_loadu_si128(chunk.as_ptr().cast()),
            _mm_loadu_si128(chunk.as_ptr().add(16).cast()),
            _mm_loadu_si128(chunk.as_ptr().add(32).cast()),
            _mm_loadu_si128(chunk.as_ptr().add(48).cast()),
        ];
        BlockMasks {
            whitespace: eq64(&lanes, b' ') | eq64(&lanes, b'\t') | eq64(&lanes, b'\r'),
            newline: eq64(&lanes, b'\n'),
            quote: eq64(&lanes, b'"'),
            backslash: eq64(&lanes, b'\\'),
            semicolon: eq64(&lanes, b';'),
            group_open: eq64(&lanes, b'('),
            group_close: eq64(&lanes, b')'),
        }
    }
}
