//! Suffix array construction by induced sorting (SA-IS).
//!
//! The engine is generic over the index width of the output array. The
//! 16-bit form ([`suffix_array_u16`]) is the AstroBWT hot path; the 32-bit
//! form ([`suffix_array_u32`]) handles longer texts and serves as a
//! cross-check for the narrow one.
//!
//! Classification bitsets and the buckets of reduced subproblems live in a
//! [`SaWorkspace`]. The free functions build one per call; hashing loops keep
//! one alive so repeated sorts stop allocating once it has grown.
//!
//! Suffixes are ordered with a virtual sentinel after the last byte that
//! compares smaller than every symbol, so a suffix sorts before every longer
//! suffix it is a prefix of.

use alloc::vec;
use alloc::vec::Vec;

/// Bucket scratch needed for byte texts: frequency and bucket pointer per symbol.
pub const BUCKET_SCRATCH_LEN: usize = 2 * ALPHABET_SIZE;

/// Alphabet bound for byte texts.
pub const ALPHABET_SIZE: usize = 256;

/// Maximum number of reduction levels before giving up.
pub const MAX_RECURSION_DEPTH: usize = 32;

/// Suffix array precondition failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SaError {
    /// Output array length differs from the text length.
    #[error("suffix array length {sa} does not match text length {text}")]
    LengthMismatch { text: usize, sa: usize },

    /// Text does not fit the index width.
    #[error("text length {len} exceeds index limit {max}")]
    TextTooLong { len: usize, max: usize },

    /// Bucket or classification scratch too small for the text.
    #[error("scratch holds {got} entries, {needed} required")]
    ScratchTooSmall { needed: usize, got: usize },

    /// Reduction recursed deeper than [`MAX_RECURSION_DEPTH`].
    #[error("reduction depth {depth} exceeds limit")]
    RecursionLimit { depth: usize },
}

/// A symbol of a text being suffix-sorted.
///
/// Byte texts use `u8`; reduced texts produced during recursion are
/// sequences of LMS-substring names stored in the index type itself.
pub trait Symbol: Copy + Ord {
    /// Bucket number of this symbol.
    fn rank(self) -> usize;
}

impl Symbol for u8 {
    #[inline]
    fn rank(self) -> usize {
        self as usize
    }
}

/// An entry type for suffix arrays and bucket counters.
pub trait SaIndex: Symbol + Eq + core::fmt::Debug {
    /// Marker for a free slot.
    const EMPTY: Self;
    /// Largest text length representable.
    const MAX_LEN: usize;

    /// Convert from `usize`. Callers keep `v <= MAX_LEN`.
    fn from_usize(v: usize) -> Self;

    /// Convert a non-empty entry to `usize`.
    fn as_usize(self) -> usize;

    #[inline]
    fn is_empty(self) -> bool {
        self == Self::EMPTY
    }
}

macro_rules! impl_sa_index {
    ($t:ty) => {
        impl Symbol for $t {
            #[inline]
            fn rank(self) -> usize {
                self as usize
            }
        }

        impl SaIndex for $t {
            const EMPTY: Self = -1;
            const MAX_LEN: usize = <$t>::MAX as usize;

            #[inline]
            fn from_usize(v: usize) -> Self {
                debug_assert!(v <= Self::MAX_LEN);
                v as $t
            }

            #[inline]
            fn as_usize(self) -> usize {
                debug_assert!(self >= 0);
                self as usize
            }
        }
    };
}

impl_sa_index!(i16);
impl_sa_index!(i32);

/// Build the suffix array of `text` with 16-bit indices.
///
/// `text.len()` must not exceed 32767 and must equal `sa.len()`. `buckets`
/// is caller-owned scratch that may be reused across calls.
pub fn suffix_array_u16(
    text: &[u8],
    sa: &mut [i16],
    buckets: &mut [i16; BUCKET_SCRATCH_LEN],
) -> Result<(), SaError> {
    SaWorkspace::new().sort(text, sa, buckets)
}

/// Build the suffix array of `text` with 32-bit indices.
pub fn suffix_array_u32(
    text: &[u8],
    sa: &mut [i32],
    buckets: &mut [i32; BUCKET_SCRATCH_LEN],
) -> Result<(), SaError> {
    SaWorkspace::new().sort(text, sa, buckets)
}

/// Allocate and return the suffix array of `text`.
pub fn suffix_array<I: SaIndex>(text: &[u8]) -> Result<Vec<I>, SaError> {
    let mut sa = vec![I::EMPTY; text.len()];
    let mut buckets = [I::EMPTY; BUCKET_SCRATCH_LEN];
    SaWorkspace::new().sort(text, &mut sa, &mut buckets)?;
    Ok(sa)
}

/// Check that `sa` is a permutation of `0..text.len()` listing suffixes in
/// strictly increasing order.
pub fn is_suffix_array<I: SaIndex>(text: &[u8], sa: &[I]) -> bool {
    let n = text.len();
    if sa.len() != n {
        return false;
    }

    let mut seen = vec![false; n];
    for &entry in sa {
        if entry.is_empty() || entry < I::from_usize(0) {
            return false;
        }
        let p = entry.as_usize();
        if p >= n || seen[p] {
            return false;
        }
        seen[p] = true;
    }

    sa.windows(2)
        .all(|w| text[w[0].as_usize()..] < text[w[1].as_usize()..])
}

// ============================================================================
// Workspace
// ============================================================================

/// Reusable scratch for one index width: S/L bitsets for every reduction
/// level and the bucket arrays of reduced subproblems.
#[derive(Debug, Clone)]
pub struct SaWorkspace<I> {
    types: Vec<u64>,
    buckets: Vec<I>,
}

impl<I: SaIndex> SaWorkspace<I> {
    /// Empty workspace; grows on first use.
    pub fn new() -> Self {
        SaWorkspace {
            types: Vec::new(),
            buckets: Vec::new(),
        }
    }

    /// Workspace already sized for texts of up to `len` bytes.
    pub fn with_capacity(len: usize) -> Self {
        let mut workspace = Self::new();
        workspace.reserve(len);
        workspace
    }

    /// Build the suffix array of `text` into `sa`, reusing this workspace.
    pub fn sort(
        &mut self,
        text: &[u8],
        sa: &mut [I],
        buckets: &mut [I; BUCKET_SCRATCH_LEN],
    ) -> Result<(), SaError> {
        if sa.len() != text.len() {
            return Err(SaError::LengthMismatch {
                text: text.len(),
                sa: sa.len(),
            });
        }
        if text.len() > I::MAX_LEN {
            return Err(SaError::TextTooLong {
                len: text.len(),
                max: I::MAX_LEN,
            });
        }
        self.reserve(text.len());
        sais(text, sa, ALPHABET_SIZE, buckets, &mut self.types, &mut self.buckets, 0)
    }

    fn reserve(&mut self, len: usize) {
        let words = type_words(len);
        if self.types.len() < words {
            self.types.resize(words, 0);
        }
        let entries = reduced_bucket_len(len);
        if self.buckets.len() < entries {
            self.buckets.resize(entries, I::EMPTY);
        }
    }
}

impl<I: SaIndex> Default for SaWorkspace<I> {
    fn default() -> Self {
        Self::new()
    }
}

/// Bitset words for every level. A reduced text is at most half as long as
/// its parent, so halving from `len` bounds each level from above.
fn type_words(len: usize) -> usize {
    let mut total = 0;
    let mut len = len;
    while len > 1 {
        total += len.div_ceil(64);
        len /= 2;
    }
    total
}

/// Bucket entries for every reduced subproblem: twice its alphabet, which is
/// below its length.
fn reduced_bucket_len(len: usize) -> usize {
    let mut total = 0;
    let mut len = len / 2;
    while len > 1 {
        total += 2 * len;
        len /= 2;
    }
    total
}

// ============================================================================
// Suffix classification
// ============================================================================

/// S/L type of every position, packed one bit per suffix (set = S-type).
///
/// The last position is always L-type: the virtual sentinel after it is
/// smaller than any symbol.
struct SuffixTypes<'a> {
    bits: &'a [u64],
    len: usize,
}

impl<'a> SuffixTypes<'a> {
    /// Classify `text` into `bits`, which holds exactly `len.div_ceil(64)` words.
    fn classify<T: Symbol>(text: &[T], bits: &'a mut [u64]) -> Self {
        let len = text.len();
        bits.fill(0);

        let mut next_is_s = false;
        for i in (0..len.saturating_sub(1)).rev() {
            let is_s = text[i] < text[i + 1] || (text[i] == text[i + 1] && next_is_s);
            if is_s {
                bits[i / 64] |= 1 << (i % 64);
            }
            next_is_s = is_s;
        }

        SuffixTypes { bits, len }
    }

    #[inline]
    fn is_s(&self, i: usize) -> bool {
        (self.bits[i / 64] >> (i % 64)) & 1 == 1
    }

    /// Left-most S position: S-type with an L-type predecessor.
    #[inline]
    fn is_lms(&self, i: usize) -> bool {
        i > 0 && i < self.len && self.is_s(i) && !self.is_s(i - 1)
    }
}

// ============================================================================
// Buckets
// ============================================================================

fn count_symbols<T: Symbol, I: SaIndex>(text: &[T], freq: &mut [I]) {
    freq.fill(I::from_usize(0));
    for &c in text {
        let r = c.rank();
        freq[r] = I::from_usize(freq[r].as_usize() + 1);
    }
}

/// Point every bucket at its first slot.
fn bucket_heads<I: SaIndex>(freq: &[I], bucket: &mut [I]) {
    let mut total = 0usize;
    for (slot, &count) in bucket.iter_mut().zip(freq) {
        *slot = I::from_usize(total);
        total += count.as_usize();
    }
}

/// Point every bucket one past its last slot.
fn bucket_tails<I: SaIndex>(freq: &[I], bucket: &mut [I]) {
    let mut total = 0usize;
    for (slot, &count) in bucket.iter_mut().zip(freq) {
        total += count.as_usize();
        *slot = I::from_usize(total);
    }
}

#[inline]
fn push_head<I: SaIndex>(sa: &mut [I], bucket: &mut [I], c: usize, p: usize) {
    let head = bucket[c].as_usize();
    sa[head] = I::from_usize(p);
    bucket[c] = I::from_usize(head + 1);
}

#[inline]
fn push_tail<I: SaIndex>(sa: &mut [I], bucket: &mut [I], c: usize, p: usize) {
    let tail = bucket[c].as_usize() - 1;
    sa[tail] = I::from_usize(p);
    bucket[c] = I::from_usize(tail);
}

// ============================================================================
// SA-IS
// ============================================================================

/// Sort `text` over an alphabet of `sigma` symbols. `type_bits` and `spare`
/// hold this level's bitset and everything the deeper levels need.
fn sais<T: Symbol, I: SaIndex>(
    text: &[T],
    sa: &mut [I],
    sigma: usize,
    buckets: &mut [I],
    type_bits: &mut [u64],
    spare: &mut [I],
    depth: usize,
) -> Result<(), SaError> {
    let n = text.len();
    match n {
        0 => return Ok(()),
        1 => {
            sa[0] = I::from_usize(0);
            return Ok(());
        }
        _ => {}
    }
    if depth > MAX_RECURSION_DEPTH {
        return Err(SaError::RecursionLimit { depth });
    }
    if buckets.len() < 2 * sigma {
        return Err(SaError::ScratchTooSmall {
            needed: 2 * sigma,
            got: buckets.len(),
        });
    }

    let words = n.div_ceil(64);
    if type_bits.len() < words {
        return Err(SaError::ScratchTooSmall {
            needed: words,
            got: type_bits.len(),
        });
    }

    let (freq, bucket) = buckets[..2 * sigma].split_at_mut(sigma);
    count_symbols(text, freq);
    let (bits, deeper_bits) = type_bits.split_at_mut(words);
    let types = SuffixTypes::classify(text, bits);

    // Stage 1: induce-sort the LMS substrings.
    sa.fill(I::EMPTY);
    bucket_tails(freq, bucket);
    for i in (1..n).rev() {
        if types.is_lms(i) {
            push_tail(sa, bucket, text[i].rank(), i);
        }
    }
    induce(text, sa, &types, freq, bucket);

    // Gather the sorted LMS positions at the front.
    let mut n1 = 0;
    for i in 0..n {
        let p = sa[i];
        if !p.is_empty() && types.is_lms(p.as_usize()) {
            sa[n1] = p;
            n1 += 1;
        }
    }
    sa[n1..].fill(I::EMPTY);

    // Name each LMS substring by rank. LMS positions are at least two apart,
    // so `p / 2` slots are unique and fit behind the first n1 entries.
    let mut names = 0usize;
    let mut prev: Option<usize> = None;
    for i in 0..n1 {
        let p = sa[i].as_usize();
        let same = prev.is_some_and(|q| lms_substrings_equal(text, &types, p, q));
        if !same {
            names += 1;
            prev = Some(p);
        }
        sa[n1 + p / 2] = I::from_usize(names - 1);
    }

    // Pack the names, in text order, into the tail of `sa`.
    let mut j = n;
    for i in (n1..n).rev() {
        if !sa[i].is_empty() {
            j -= 1;
            sa[j] = sa[i];
        }
    }

    // Stage 2: sort the reduced string.
    {
        let (head, reduced) = sa.split_at_mut(n - n1);
        let reduced_sa = &mut head[..n1];
        if names < n1 {
            if spare.len() < 2 * names {
                return Err(SaError::ScratchTooSmall {
                    needed: 2 * names,
                    got: spare.len(),
                });
            }
            tracing::trace!(depth = depth + 1, len = n1, alphabet = names, "sa-is reduction");
            let (child_buckets, deeper) = spare.split_at_mut(2 * names);
            sais(&*reduced, reduced_sa, names, child_buckets, deeper_bits, deeper, depth + 1)?;
        } else {
            for (i, name) in reduced.iter().enumerate() {
                reduced_sa[name.as_usize()] = I::from_usize(i);
            }
        }

        // Reuse the tail for the LMS positions in text order.
        let mut j = n1;
        for i in (1..n).rev() {
            if types.is_lms(i) {
                j -= 1;
                reduced[j] = I::from_usize(i);
            }
        }
    }

    // Stage 3: map reduced ranks back to positions and induce the full order.
    for i in 0..n1 {
        let rank = sa[i].as_usize();
        sa[i] = sa[n - n1 + rank];
    }
    sa[n1..].fill(I::EMPTY);

    bucket_tails(freq, bucket);
    for i in (0..n1).rev() {
        let p = sa[i];
        sa[i] = I::EMPTY;
        let p = p.as_usize();
        push_tail(sa, bucket, text[p].rank(), p);
    }
    induce(text, sa, &types, freq, bucket);

    Ok(())
}

/// L-type forward scan followed by the S-type backward scan.
fn induce<T: Symbol, I: SaIndex>(
    text: &[T],
    sa: &mut [I],
    types: &SuffixTypes,
    freq: &[I],
    bucket: &mut [I],
) {
    let n = text.len();

    bucket_heads(freq, bucket);
    // The sentinel sorts first; its predecessor is L-type by definition.
    push_head(sa, bucket, text[n - 1].rank(), n - 1);
    for j in 0..n {
        let p = sa[j];
        if p.is_empty() {
            continue;
        }
        let p = p.as_usize();
        if p > 0 && !types.is_s(p - 1) {
            push_head(sa, bucket, text[p - 1].rank(), p - 1);
        }
    }

    bucket_tails(freq, bucket);
    for j in (0..n).rev() {
        let p = sa[j];
        if p.is_empty() {
            continue;
        }
        let p = p.as_usize();
        if p > 0 && types.is_s(p - 1) {
            push_tail(sa, bucket, text[p - 1].rank(), p - 1);
        }
    }
}

/// Compare the LMS substrings starting at `a` and `b`: equal symbols and
/// types up to and including the next LMS position. A substring running into
/// the sentinel is unique.
fn lms_substrings_equal<T: Symbol>(text: &[T], types: &SuffixTypes, a: usize, b: usize) -> bool {
    let n = text.len();
    let mut d = 0;
    loop {
        let (x, y) = (a + d, b + d);
        if x == n || y == n {
            return false;
        }
        if text[x] != text[y] || types.is_s(x) != types.is_s(y) {
            return false;
        }
        if d > 0 && types.is_lms(x) {
            // Types matched at d-1 and d, so `y` is LMS as well.
            return true;
        }
        d += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive<I: SaIndex>(text: &[u8]) -> Vec<I> {
        let mut idx: Vec<usize> = (0..text.len()).collect();
        idx.sort_by(|&a, &b| text[a..].cmp(&text[b..]));
        idx.into_iter().map(I::from_usize).collect()
    }

    #[test]
    fn test_sanity_both_widths() {
        let text = b"abcabxabcd";

        let mut sa16 = [0i16; 10];
        let mut buckets16 = [0i16; BUCKET_SCRATCH_LEN];
        suffix_array_u16(text, &mut sa16, &mut buckets16).unwrap();
        assert_eq!(sa16, [0, 6, 3, 1, 7, 4, 2, 8, 9, 5]);

        let mut sa32 = [0i32; 10];
        let mut buckets32 = [0i32; BUCKET_SCRATCH_LEN];
        suffix_array_u32(text, &mut sa32, &mut buckets32).unwrap();
        assert_eq!(sa32, [0, 6, 3, 1, 7, 4, 2, 8, 9, 5]);
    }

    #[test]
    fn test_corner_cases() {
        assert_eq!(suffix_array::<i16>(b"").unwrap(), Vec::<i16>::new());
        assert_eq!(suffix_array::<i16>(b"a").unwrap(), vec![0]);
        assert_eq!(suffix_array::<i16>(b"aaaa").unwrap(), vec![3, 2, 1, 0]);
        assert_eq!(suffix_array::<i32>(b"aaaa").unwrap(), vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_empty_leaves_sa_untouched() {
        let mut sa: [i16; 0] = [];
        let mut buckets = [7i16; BUCKET_SCRATCH_LEN];
        suffix_array_u16(b"", &mut sa, &mut buckets).unwrap();
    }

    #[test]
    fn test_known_strings() {
        let texts: [&[u8]; 9] = [
            b"banana",
            b"mississippi",
            b"abracadabra",
            b"zyxwvutsrqponm",
            b"abababababababab",
            b"aabbaabbaabbaabb",
            b"\x00\xff\x00\xff\x00",
            b"ba",
            b"ab",
        ];
        for text in texts {
            assert_eq!(suffix_array::<i16>(text).unwrap(), naive::<i16>(text), "{:?}", text);
            assert_eq!(suffix_array::<i32>(text).unwrap(), naive::<i32>(text), "{:?}", text);
        }
    }

    #[test]
    fn test_recursion_on_repetitive_text() {
        // Repeated LMS substrings force at least one reduction level.
        let mut text = Vec::new();
        for i in 0..500u32 {
            text.extend_from_slice(b"cab");
            text.push(b'a' + (i % 3) as u8);
        }
        let sa = suffix_array::<i16>(&text).unwrap();
        assert!(is_suffix_array(&text, &sa));
        assert_eq!(sa, naive::<i16>(&text));
    }

    #[test]
    fn test_deterministic() {
        let text: Vec<u8> = (0..4000u32).map(|i| (i.wrapping_mul(2654435761) >> 24) as u8).collect();
        let a = suffix_array::<i16>(&text).unwrap();
        let b = suffix_array::<i16>(&text).unwrap();
        assert_eq!(a, b);
        assert!(is_suffix_array(&text, &a));
    }

    #[test]
    fn test_scratch_is_reusable() {
        let mut buckets = [0i16; BUCKET_SCRATCH_LEN];
        let texts: [&[u8]; 3] = [b"mississippi", b"banana", b"abcabxabcd"];
        for text in texts {
            let mut sa = vec![0i16; text.len()];
            suffix_array_u16(text, &mut sa, &mut buckets).unwrap();
            assert_eq!(sa, naive::<i16>(text));
        }
    }

    #[test]
    fn test_workspace_reuse_stops_growing() {
        let mut workspace = SaWorkspace::<i16>::with_capacity(4096);
        let (types_len, buckets_len) = (workspace.types.len(), workspace.buckets.len());
        let mut buckets = [0i16; BUCKET_SCRATCH_LEN];

        for seed in 0..8u32 {
            // Small alphabets force several reduction levels.
            let text: Vec<u8> = (0..4096u32)
                .map(|i| b'a' + ((i.wrapping_add(seed).wrapping_mul(2654435761) >> 29) as u8 % 3))
                .collect();
            let mut sa = vec![0i16; text.len()];
            workspace.sort(&text, &mut sa, &mut buckets).unwrap();
            assert_eq!(sa, naive::<i16>(&text));
        }

        assert_eq!(workspace.types.len(), types_len);
        assert_eq!(workspace.buckets.len(), buckets_len);
    }

    #[test]
    fn test_workspace_grows_for_longer_text() {
        let mut workspace = SaWorkspace::<i32>::new();
        let mut buckets = [0i32; BUCKET_SCRATCH_LEN];
        let texts: [&[u8]; 3] = [b"banana", b"", b"abracadabra abracadabra abracadabra"];
        for text in texts {
            let mut sa = vec![0i32; text.len()];
            workspace.sort(text, &mut sa, &mut buckets).unwrap();
            assert_eq!(sa, naive::<i32>(text));
        }
    }

    #[test]
    fn test_workspace_bounds() {
        assert_eq!(type_words(0), 0);
        assert_eq!(type_words(1), 0);
        assert_eq!(type_words(64), 1 + 1 + 1 + 1 + 1 + 1);
        assert_eq!(reduced_bucket_len(3), 0);
        assert_eq!(reduced_bucket_len(8), 8 + 4);
    }

    #[test]
    fn test_length_mismatch() {
        let mut sa = [0i16; 3];
        let mut buckets = [0i16; BUCKET_SCRATCH_LEN];
        let err = suffix_array_u16(b"abcd", &mut sa, &mut buckets).unwrap_err();
        assert_eq!(err, SaError::LengthMismatch { text: 4, sa: 3 });
    }

    #[test]
    fn test_narrow_rejects_long_text() {
        let text = vec![0u8; 32768];
        let mut sa = vec![0i16; 32768];
        let mut buckets = [0i16; BUCKET_SCRATCH_LEN];
        let err = suffix_array_u16(&text, &mut sa, &mut buckets).unwrap_err();
        assert_eq!(err, SaError::TextTooLong { len: 32768, max: 32767 });
    }

    #[test]
    fn test_narrow_accepts_max_text() {
        let text: Vec<u8> = (0..32767u32).map(|i| (i.wrapping_mul(2654435761) >> 24) as u8).collect();
        let sa = suffix_array::<i16>(&text).unwrap();
        assert!(is_suffix_array(&text, &sa));
    }

    #[test]
    fn test_is_suffix_array_rejects_bad_orders() {
        assert!(!is_suffix_array(b"ab", &[1i16, 0]));
        assert!(!is_suffix_array(b"ab", &[0i16, 0]));
        assert!(!is_suffix_array(b"ab", &[0i16]));
        assert!(is_suffix_array(b"ab", &[0i16, 1]));
    }

    #[test]
    fn test_suffix_types() {
        // m i s s i s s i p p i
        let mut bits = [0u64; 1];
        let types = SuffixTypes::classify(b"mississippi", &mut bits);
        let expected = [false, true, false, false, true, false, false, true, false, false, false];
        for (i, &s) in expected.iter().enumerate() {
            assert_eq!(types.is_s(i), s, "position {}", i);
        }
        assert!(types.is_lms(1));
        assert!(types.is_lms(4));
        assert!(types.is_lms(7));
        assert!(!types.is_lms(0));
    }
}
