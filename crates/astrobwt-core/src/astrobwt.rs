//! AstroBWT proof-of-work.
//!
//! `pow(input) = SHA3-256(le16(SA(Salsa20(SHA3-256(input)))))` where the
//! Salsa20 keystream is cut to [`STAGE1_LENGTH`] bytes and `SA` is its suffix
//! array. The narrow variant sorts with 16-bit indices, the wide one with
//! 32-bit indices; both produce the same digest.
//!
//! The free functions allocate suffix-sort scratch on every call. Hashing
//! loops hold an [`AstroBwt`] per worker instead.

use core::sync::atomic::{AtomicU64, Ordering};

use salsa20::cipher::{KeyIvInit, StreamCipher};
use salsa20::Salsa20;

use crate::hash::sha3_256;
use crate::sais::{SaError, SaWorkspace, BUCKET_SCRATCH_LEN};

/// Length of the Salsa20-expanded buffer. Prime, below 2^15.
pub const STAGE1_LENGTH: usize = 9973;

/// Length of the little-endian 16-bit suffix array serialization.
pub const SERIALIZED_SA_LENGTH: usize = 2 * STAGE1_LENGTH;

/// Failure while evaluating the proof-of-work.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PowError {
    #[error("suffix array construction failed: {0}")]
    SuffixArray(#[from] SaError),

    #[error("suffix array entry {0} does not fit 16 bits")]
    IndexOverflow(i32),

    #[error("evaluation panicked")]
    Panicked,
}

/// Faults seen while the OS RNG was unavailable.
static FALLBACK_FAULTS: AtomicU64 = AtomicU64::new(0);

/// AstroBWT digest of `input` (narrow engine).
///
/// Total: an internal fault yields a random digest instead of an error.
pub fn pow(input: &[u8]) -> [u8; 32] {
    pow_narrow(input)
}

/// AstroBWT digest using the 16-bit suffix array engine, with fault recovery.
pub fn pow_narrow(input: &[u8]) -> [u8; 32] {
    AstroBwt::new().narrow(input)
}

/// AstroBWT digest using the 32-bit suffix array engine, with fault recovery.
pub fn pow_wide(input: &[u8]) -> [u8; 32] {
    AstroBwt::new().wide(input)
}

/// AstroBWT digest using the 16-bit engine, surfacing faults.
pub fn try_pow_narrow(input: &[u8]) -> Result<[u8; 32], PowError> {
    AstroBwt::new().try_narrow(input)
}

/// AstroBWT digest using the 32-bit engine, surfacing faults.
pub fn try_pow_wide(input: &[u8]) -> Result<[u8; 32], PowError> {
    AstroBwt::new().try_wide(input)
}

/// AstroBWT evaluator that keeps its suffix-sort scratch between calls.
#[derive(Debug, Clone)]
pub struct AstroBwt {
    narrow: SaWorkspace<i16>,
    wide: SaWorkspace<i32>,
}

impl AstroBwt {
    /// Evaluator with scratch sized for the stage-1 buffer.
    pub fn new() -> Self {
        AstroBwt {
            narrow: SaWorkspace::with_capacity(STAGE1_LENGTH),
            wide: SaWorkspace::with_capacity(STAGE1_LENGTH),
        }
    }

    /// Digest with the 16-bit engine; a fault yields a random digest.
    pub fn narrow(&mut self, input: &[u8]) -> [u8; 32] {
        recover(|| self.try_narrow(input), input)
    }

    /// Digest with the 32-bit engine; a fault yields a random digest.
    pub fn wide(&mut self, input: &[u8]) -> [u8; 32] {
        recover(|| self.try_wide(input), input)
    }

    /// Digest with the 16-bit engine, surfacing faults.
    pub fn try_narrow(&mut self, input: &[u8]) -> Result<[u8; 32], PowError> {
        let key = sha3_256(input);

        let mut stage1 = [0u8; STAGE1_LENGTH];
        expand_key(&key, &mut stage1);

        let mut sa = [0i16; STAGE1_LENGTH];
        let mut buckets = [0i16; BUCKET_SCRATCH_LEN];
        self.narrow.sort(&stage1, &mut sa, &mut buckets)?;

        let mut serialized = [0u8; SERIALIZED_SA_LENGTH];
        serialize_suffix_array(sa.iter().map(|&v| v as u16), &mut serialized);
        Ok(sha3_256(&serialized))
    }

    /// Digest with the 32-bit engine, surfacing faults.
    pub fn try_wide(&mut self, input: &[u8]) -> Result<[u8; 32], PowError> {
        let key = sha3_256(input);

        let mut stage1 = [0u8; STAGE1_LENGTH];
        expand_key(&key, &mut stage1);

        let mut sa = [0i32; STAGE1_LENGTH];
        let mut buckets = [0i32; BUCKET_SCRATCH_LEN];
        self.wide.sort(&stage1, &mut sa, &mut buckets)?;

        let mut narrow = [0u16; STAGE1_LENGTH];
        for (dst, &v) in narrow.iter_mut().zip(sa.iter()) {
            *dst = u16::try_from(v).map_err(|_| PowError::IndexOverflow(v))?;
        }

        let mut serialized = [0u8; SERIALIZED_SA_LENGTH];
        serialize_suffix_array(narrow.iter().copied(), &mut serialized);
        Ok(sha3_256(&serialized))
    }
}

impl Default for AstroBwt {
    fn default() -> Self {
        Self::new()
    }
}

/// Fill `out` with the Salsa20 keystream under `key`, zero nonce, counter 0.
pub fn expand_key(key: &[u8; 32], out: &mut [u8]) {
    out.fill(0);
    let nonce = [0u8; 8];
    let mut cipher = Salsa20::new(key.into(), &nonce.into());
    cipher.apply_keystream(out);
}

/// Write each entry as a little-endian `u16`, regardless of host byte order.
pub fn serialize_suffix_array(entries: impl Iterator<Item = u16>, out: &mut [u8]) {
    for (chunk, v) in out.chunks_exact_mut(2).zip(entries) {
        chunk.copy_from_slice(&v.to_le_bytes());
    }
}

/// Evaluate `f`, replacing any fault with the hash of fresh random bytes.
fn recover<F>(f: F, input: &[u8]) -> [u8; 32]
where
    F: FnOnce() -> Result<[u8; 32], PowError>,
{
    // Scratch is rewritten before every read, so a panic leaves nothing stale.
    #[cfg(feature = "std")]
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f))
        .unwrap_or(Err(PowError::Panicked));
    #[cfg(not(feature = "std"))]
    let outcome = f();

    match outcome {
        Ok(digest) => digest,
        Err(e) => {
            tracing::warn!(error = %e, "astrobwt evaluation faulted, returning random digest");
            random_digest(input)
        }
    }
}

fn random_digest(input: &[u8]) -> [u8; 32] {
    let mut seed = [0u8; 16];
    match getrandom::getrandom(&mut seed) {
        Ok(()) => sha3_256(&seed),
        Err(e) => {
            tracing::error!(error = %e, "os rng unavailable for fault digest");
            fallback_digest(input)
        }
    }
}

/// Digest of the input key and a process-wide fault counter. Distinct per
/// fault, but predictable.
fn fallback_digest(input: &[u8]) -> [u8; 32] {
    let count = FALLBACK_FAULTS.fetch_add(1, Ordering::Relaxed);
    let mut seed = [0u8; 40];
    seed[..32].copy_from_slice(&sha3_256(input));
    seed[32..].copy_from_slice(&count.to_le_bytes());
    sha3_256(&seed)
}
