//! Nilsimsa locality-sensitive fingerprints
//!
//! Produces a 256-bit digest from a byte stream such that strings which differ
//! by a few edits produce digests which differ in only a few bits. Digests are
//! compared with [`super::hamming::fingerprint_similarity`].
//!
//! # Algorithm
//!
//! A 4-byte window slides over the input. For every new byte, up to eight
//! trigram "shapes" built from it and the three preceding bytes are mixed
//! through a fixed substitution table and counted in a 256-slot accumulator.
//! Bit `i` of the digest is set when slot `i` holds more than the average
//! count (`total / 256`).
//!
//! The substitution table is a permutation of `0..=255` produced by an
//! xorshift32 shuffle seeded with `0x1234_5678`. It is built at compile time,
//! so digests are bit-for-bit reproducible across processes and builds.
//!
//! # Complexity
//! - Time: O(n) in the byte length
//! - Space: O(1) (a 1 KiB accumulator)

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Size of a digest in bytes.
pub const FINGERPRINT_BYTES: usize = 32;

/// Length of the hexadecimal encoding of a digest.
pub const FINGERPRINT_HEX_LEN: usize = FINGERPRINT_BYTES * 2;

const TRAN_SEED: u32 = 0x1234_5678;

/// Byte substitution table shared by every hasher.
static TRAN: [u8; 256] = build_tran(TRAN_SEED);

const fn build_tran(seed: u32) -> [u8; 256] {
    let mut table = [0u8; 256];
    let mut i = 0;
    while i < 256 {
        table[i] = i as u8;
        i += 1;
    }

    let mut state = seed;
    let mut i = 255usize;
    while i > 0 {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let j = (state & 0xff) as usize % (i + 1);
        let tmp = table[i];
        table[i] = table[j];
        table[j] = tmp;
        i -= 1;
    }
    table
}

/// Errors raised when decoding or comparing digests
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FingerprintError {
    /// Raw digest was not exactly 32 bytes
    #[error("fingerprint must be {FINGERPRINT_BYTES} bytes, got {0}")]
    InvalidLength(usize),

    /// Hex input had an odd number of digits
    #[error("hex string has odd length {0}")]
    OddHexLength(usize),

    /// Hex input contained a non-hex character
    #[error("invalid hex string: {0}")]
    InvalidHex(String),
}

/// A 256-bit Nilsimsa digest.
///
/// Immutable once computed. The empty string and every input shorter than
/// three bytes produce the all-zero digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Fingerprint([u8; FINGERPRINT_BYTES]);

impl Fingerprint {
    /// The all-zero digest.
    pub const ZERO: Fingerprint = Fingerprint([0; FINGERPRINT_BYTES]);

    #[must_use]
    pub const fn from_bytes(bytes: [u8; FINGERPRINT_BYTES]) -> Self {
        Self(bytes)
    }

    /// Build a digest from a slice, failing unless it is exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, FingerprintError> {
        let array: [u8; FINGERPRINT_BYTES] = bytes
            .try_into()
            .map_err(|_| FingerprintError::InvalidLength(bytes.len()))?;
        Ok(Self(array))
    }

    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; FINGERPRINT_BYTES] {
        &self.0
    }

    /// Lowercase, zero-padded hex: always 64 characters.
    #[must_use]
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Decode a 64-character hex digest.
    pub fn from_hex(s: &str) -> Result<Self, FingerprintError> {
        if s.len() % 2 != 0 {
            return Err(FingerprintError::OddHexLength(s.len()));
        }
        let bytes = hex::decode(s).map_err(|e| FingerprintError::InvalidHex(e.to_string()))?;
        Self::from_slice(&bytes)
    }

    /// Number of set bits.
    #[must_use]
    pub fn count_ones(&self) -> u32 {
        self.0.iter().map(|b| b.count_ones()).sum()
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|&b| b == 0)
    }
}

impl AsRef<[u8]> for Fingerprint {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Fingerprint {
    type Err = FingerprintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Serialize for Fingerprint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Hasher
// ============================================================================

/// Streaming Nilsimsa hasher.
///
/// Feeding the input in several [`update`](Self::update) calls yields the same
/// digest as a single call over the concatenated bytes. The accumulator can be
/// reused across inputs with [`reset`](Self::reset).
#[derive(Clone)]
pub struct NilsimsaHasher {
    acc: [u32; 256],
    count: usize,
    window: [Option<u8>; 4],
}

impl Default for NilsimsaHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for NilsimsaHasher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NilsimsaHasher")
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}

#[inline]
fn tran3(a: u8, b: u8, c: u8, n: u8) -> usize {
    let t = |i: u8| TRAN[i as usize] as u32;
    let n32 = n as u32;
    ((t(a.wrapping_add(n)) ^ t(b).wrapping_mul(n32 + n32 + 1) ^ t(c ^ TRAN[n as usize])) & 0xff)
        as usize
}

impl NilsimsaHasher {
    #[must_use]
    pub fn new() -> Self {
        Self {
            acc: [0; 256],
            count: 0,
            window: [None; 4],
        }
    }

    /// Clear all state so the hasher can be reused.
    pub fn reset(&mut self) {
        self.acc = [0; 256];
        self.count = 0;
        self.window = [None; 4];
    }

    /// Number of bytes consumed so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Feed more bytes.
    pub fn update(&mut self, bytes: &[u8]) {
        for &ch in bytes {
            let [w0, w1, w2, w3] = self.window;
            if let (Some(c0), Some(c1)) = (w0, w1) {
                self.acc[tran3(ch, c0, c1, 0)] += 1;
                if let Some(c2) = w2 {
                    self.acc[tran3(ch, c0, c2, 1)] += 1;
                    self.acc[tran3(ch, c1, c2, 2)] += 1;
                    if let Some(c3) = w3 {
                        self.acc[tran3(ch, c0, c3, 3)] += 1;
                        self.acc[tran3(ch, c1, c3, 4)] += 1;
                        self.acc[tran3(ch, c2, c3, 5)] += 1;
                        self.acc[tran3(c3, c0, ch, 6)] += 1;
                        self.acc[tran3(c3, c2, ch, 7)] += 1;
                    }
                }
            }
            self.window = [Some(ch), w0, w1, w2];
            self.count += 1;
        }
    }

    /// Compute the digest of everything fed so far.
    ///
    /// Does not consume the state; more bytes may be fed afterwards.
    #[must_use]
    pub fn finish(&self) -> Fingerprint {
        let mut code = [0u8; FINGERPRINT_BYTES];
        let total = match self.count {
            0..=2 => return Fingerprint(code),
            3 => 1,
            4 => 4,
            n => 8 * n - 28,
        };
        let threshold = total as f64 / 256.0;
        for (i, &slot) in self.acc.iter().enumerate() {
            if slot as f64 > threshold {
                code[i >> 3] |= 1 << (i & 7);
            }
        }
        Fingerprint(code)
    }
}

/// Fingerprint the UTF-8 bytes of `s`.
#[must_use]
pub fn fingerprint(s: &str) -> Fingerprint {
    fingerprint_bytes(s.as_bytes())
}

/// Fingerprint an arbitrary byte sequence.
#[must_use]
pub fn fingerprint_bytes(bytes: &[u8]) -> Fingerprint {
    let mut hasher = NilsimsaHasher::new();
    hasher.update(bytes);
    hasher.finish()
}
