//! Compressed elliptic-curve points carried inside addresses.

use crate::network::COMPRESSED_POINT_LEN;

/// Compressed encoding of the secp256k1 base point.
const GENERATOR_COMPRESSED: [u8; COMPRESSED_POINT_LEN] = [
    0x02, 0x79, 0xbe, 0x66, 0x7e, 0xf9, 0xdc, 0xbb, 0xac, 0x55, 0xa0, 0x62, 0x95, 0xce, 0x87,
    0x0b, 0x07, 0x02, 0x9b, 0xfc, 0xdb, 0x2d, 0xce, 0x28, 0xd9, 0x59, 0xf2, 0x81, 0x5b, 0x16,
    0xf8, 0x17, 0x98,
];

/// A 33-byte compressed public key.
///
/// The bytes are carried as-is; [`PublicKey::is_valid`] asks the curve
/// library whether they decode to a point.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicKey([u8; COMPRESSED_POINT_LEN]);

impl PublicKey {
    /// Wrap raw compressed bytes without validation.
    pub const fn from_bytes(bytes: [u8; COMPRESSED_POINT_LEN]) -> Self {
        PublicKey(bytes)
    }

    /// Wrap a slice, returning `None` unless it is exactly 33 bytes.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let array: [u8; COMPRESSED_POINT_LEN] = bytes.try_into().ok()?;
        Some(PublicKey(array))
    }

    /// The compressed curve base point.
    pub const fn generator() -> Self {
        PublicKey(GENERATOR_COMPRESSED)
    }

    /// Borrow the raw compressed bytes.
    pub fn as_bytes(&self) -> &[u8; COMPRESSED_POINT_LEN] {
        &self.0
    }

    /// Whether the bytes are a canonical compressed encoding of a curve point.
    ///
    /// SEC1 also defines a 33-byte compact form (tag `0x05`), so the tag is
    /// checked before handing the bytes to the curve library.
    pub fn is_valid(&self) -> bool {
        matches!(self.0[0], 0x02 | 0x03) && k256::PublicKey::from_sec1_bytes(&self.0).is_ok()
    }
}

impl core::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl core::fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "PublicKey({})", hex::encode(self.0))
    }
}
