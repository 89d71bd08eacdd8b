//! SHA3-256 hashing helpers.

use sha3::{Digest, Sha3_256};

/// Single SHA3-256 hash.
///
/// Used both for deriving the Salsa20 key from PoW input and for the final
/// digest over the serialized suffix array.
#[inline]
pub fn sha3_256(data: &[u8]) -> [u8; 32] {
    let hash = Sha3_256::digest(data);
    let mut result = [0u8; 32];
    result.copy_from_slice(&hash);
    result
}

/// Hex rendering of a 32-byte digest.
pub fn to_hex(hash: &[u8; 32]) -> alloc::string::String {
    hex::encode(hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha3_256_empty() {
        let expected = hex::decode(
            "a7ffc6f8bf1ed76651c14756a061d662f580ff4de43b49fa82d80a4b80f8434a"
        ).unwrap();

        assert_eq!(sha3_256(b"").as_slice(), expected.as_slice());
    }

    #[test]
    fn test_sha3_256_abc() {
        let expected = hex::decode(
            "3a985da74fe225b2045c172d6bd390bd855f086e3e9d525b46bfe24511431532"
        ).unwrap();

        assert_eq!(sha3_256(b"abc").as_slice(), expected.as_slice());
    }
}
