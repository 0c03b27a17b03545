//! Hamming comparison of Nilsimsa digests
//!
//! Scores two digests as `128 - popcount(a XOR b)`, so identical digests score
//! 128 and fully complementary ones score -128. Flipping `k` bits of a digest
//! lowers its score against the original by exactly `k`.
//!
//! # Length Mismatch Behavior
//!
//! [`Fingerprint`] values are always 32 bytes, so [`fingerprint_similarity`]
//! cannot fail. Raw byte slices coming from outside go through
//! [`compare_raw`], which returns [`FingerprintError::InvalidLength`] for
//! anything but 32 bytes.
//!
//! # Complexity
//! - Time: O(32) per comparison (one table lookup per byte)
//! - Space: O(1)

use super::nilsimsa::{Fingerprint, FingerprintError, FINGERPRINT_BYTES};

/// Score of two identical digests.
pub const MAX_SCORE: i32 = 128;

/// Score of two complementary digests.
pub const MIN_SCORE: i32 = -128;

/// 8-bit population counts.
static POPC: [u8; 256] = build_popc();

const fn build_popc() -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        let mut n = i;
        let mut count = 0u8;
        while n != 0 {
            count += 1;
            n &= n - 1;
        }
        table[i] = count;
        i += 1;
    }
    table
}

#[inline]
fn differing_bits(a: &[u8; FINGERPRINT_BYTES], b: &[u8; FINGERPRINT_BYTES]) -> i32 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| POPC[(x ^ y) as usize] as i32)
        .sum()
}

/// Similarity of two digests in `[-128, 128]`.
#[inline]
#[must_use]
pub fn fingerprint_similarity(a: &Fingerprint, b: &Fingerprint) -> i32 {
    MAX_SCORE - differing_bits(a.as_bytes(), b.as_bytes())
}

/// Number of bits in which two digests differ, in `[0, 256]`.
#[inline]
#[must_use]
pub fn fingerprint_distance(a: &Fingerprint, b: &Fingerprint) -> u32 {
    differing_bits(a.as_bytes(), b.as_bytes()) as u32
}

/// Compare two raw digests.
/// Fails unless both slices are exactly 32 bytes.
pub fn compare_raw(a: &[u8], b: &[u8]) -> Result<i32, FingerprintError> {
    let a = Fingerprint::from_slice(a)?;
    let b = Fingerprint::from_slice(b)?;
    Ok(fingerprint_similarity(&a, &b))
}

/// Compare two hex-encoded digests.
pub fn compare_hex(a: &str, b: &str) -> Result<i32, FingerprintError> {
    let a = Fingerprint::from_hex(a)?;
    let b = Fingerprint::from_hex(b)?;
    Ok(fingerprint_similarity(&a, &b))
}
