//! Address encoding and decoding.
//!
//! An address is a Bech32 string (BIP-173 framing) over the envelope
//! `version (0x01) || compressed point (33) || payment id (0 or 8)`.
//!
//! Supported HRPs:
//! - `dero` / `deto` - plain mainnet / testnet addresses
//! - `deroi` / `detoi` - integrated addresses carrying an 8-byte payment id
//! - `deroproof` - proof marker addresses, always carrying a payment id

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use crate::network::{
    Network, ADDRESS_VERSION, INTEGRATED_AMOUNT_ENVELOPE_LEN, INTEGRATED_ENVELOPE_LEN,
    MAINNET_HRP, MAINNET_INTEGRATED_HRP, PAYMENT_ID_LEN, PLAIN_ENVELOPE_LEN, PROOF_HRP,
    TESTNET_HRP, TESTNET_INTEGRATED_HRP,
};
use crate::point::PublicKey;

/// Address encoding and decoding errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AddressError {
    /// Human-readable part is not one of the known prefixes.
    #[error("invalid human-readable part: {0}")]
    InvalidHrp(String),

    /// Bech32 checksum mismatch, or upper and lower case mixed.
    #[error("invalid checksum")]
    InvalidChecksum,

    /// Character outside the Bech32 alphabet or HRP range.
    #[error("invalid character: {0:?}")]
    InvalidCharacter(char),

    /// Missing separator, empty HRP, or data part shorter than a checksum.
    #[error("invalid separator position")]
    InvalidSeparator,

    /// Non-zero or over-long padding when regrouping 5-bit data.
    #[error("invalid padding")]
    InvalidPadding,

    /// Envelope length does not match the HRP.
    #[error("invalid envelope length {len} for {hrp}")]
    InvalidLength { hrp: String, len: usize },

    /// Envelope version byte is not 1.
    #[error("invalid version byte: {0}")]
    InvalidVersion(u8),

    /// Public key is not a valid compressed curve point.
    #[error("invalid public key point")]
    InvalidPoint,

    /// Payment id neither empty nor 8 bytes.
    #[error("invalid payment id length: {0}")]
    InvalidPaymentId(usize),
}

/// A decoded address.
///
/// Proof addresses carry no network; they are held as mainnet so that
/// decoding an encoded address yields an equal value. Equality and hashing
/// cover the encoded fields only, not the out-of-band amount.
#[derive(Debug, Clone)]
pub struct Address {
    network: Network,
    proof: bool,
    public_key: PublicKey,
    payment_id: Option<[u8; PAYMENT_ID_LEN]>,
    amount: u64,
}

impl Address {
    /// Plain address without payment id.
    pub fn new(network: Network, public_key: PublicKey) -> Self {
        Address {
            network,
            proof: false,
            public_key,
            payment_id: None,
            amount: 0,
        }
    }

    /// Integrated address carrying a payment id.
    pub fn integrated(network: Network, public_key: PublicKey, payment_id: [u8; PAYMENT_ID_LEN]) -> Self {
        Address {
            payment_id: Some(payment_id),
            ..Address::new(network, public_key)
        }
    }

    /// Proof marker address.
    pub fn proof(public_key: PublicKey, payment_id: [u8; PAYMENT_ID_LEN]) -> Self {
        Address {
            proof: true,
            ..Address::integrated(Network::Mainnet, public_key, payment_id)
        }
    }

    /// Plain or integrated address from a payment id slice of length 0 or 8.
    pub fn from_parts(network: Network, public_key: PublicKey, payment_id: &[u8]) -> Result<Self, AddressError> {
        match payment_id.len() {
            0 => Ok(Address::new(network, public_key)),
            PAYMENT_ID_LEN => {
                let mut id = [0u8; PAYMENT_ID_LEN];
                id.copy_from_slice(payment_id);
                Ok(Address::integrated(network, public_key, id))
            }
            len => Err(AddressError::InvalidPaymentId(len)),
        }
    }

    /// Attach an out-of-band amount. Never serialized into the string.
    pub fn with_amount(mut self, amount: u64) -> Self {
        self.amount = amount;
        self
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    pub fn payment_id(&self) -> Option<&[u8; PAYMENT_ID_LEN]> {
        self.payment_id.as_ref()
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn is_proof(&self) -> bool {
        self.proof
    }

    pub fn is_integrated(&self) -> bool {
        self.payment_id.is_some()
    }

    pub fn is_mainnet(&self) -> bool {
        self.network == Network::Mainnet
    }

    /// Same key and network without payment id or amount.
    pub fn base_address(&self) -> Self {
        Address::new(self.network, self.public_key)
    }

    /// Human-readable part this address encodes with.
    pub fn hrp(&self) -> &'static str {
        if self.proof {
            PROOF_HRP
        } else if self.is_integrated() {
            self.network.integrated_hrp()
        } else {
            self.network.hrp()
        }
    }

    /// Envelope bytes before Bech32 regrouping.
    pub fn envelope(&self) -> Vec<u8> {
        let mut envelope = Vec::with_capacity(INTEGRATED_ENVELOPE_LEN);
        envelope.push(ADDRESS_VERSION);
        envelope.extend_from_slice(self.public_key.as_bytes());
        if let Some(id) = &self.payment_id {
            envelope.extend_from_slice(id);
        }
        envelope
    }

    /// Encode to the Bech32 address string.
    pub fn encode(&self) -> String {
        // Byte input always regroups.
        let data = convert_bits(&self.envelope(), 8, 5, true).unwrap_or_default();
        bech32_encode(self.hrp(), &data)
    }

    /// Decode and validate an address string.
    pub fn decode(address: &str) -> Result<Self, AddressError> {
        let (hrp, data) = bech32_decode(address)?;

        let (network, proof, integrated) = match hrp.as_str() {
            MAINNET_HRP => (Network::Mainnet, false, false),
            MAINNET_INTEGRATED_HRP => (Network::Mainnet, false, true),
            TESTNET_HRP => (Network::Testnet, false, false),
            TESTNET_INTEGRATED_HRP => (Network::Testnet, false, true),
            PROOF_HRP => (Network::Mainnet, true, true),
            _ => return Err(AddressError::InvalidHrp(hrp.clone())),
        };

        let envelope = convert_bits(&data, 5, 8, false)?;

        let length_ok = if integrated {
            envelope.len() == INTEGRATED_ENVELOPE_LEN || envelope.len() == INTEGRATED_AMOUNT_ENVELOPE_LEN
        } else {
            envelope.len() == PLAIN_ENVELOPE_LEN
        };
        if !length_ok {
            return Err(AddressError::InvalidLength {
                hrp,
                len: envelope.len(),
            });
        }

        if envelope[0] != ADDRESS_VERSION {
            return Err(AddressError::InvalidVersion(envelope[0]));
        }

        let public_key = PublicKey::from_slice(&envelope[1..PLAIN_ENVELOPE_LEN])
            .ok_or(AddressError::InvalidPoint)?;
        if !public_key.is_valid() {
            return Err(AddressError::InvalidPoint);
        }

        let payment_id = if integrated {
            let mut id = [0u8; PAYMENT_ID_LEN];
            id.copy_from_slice(&envelope[PLAIN_ENVELOPE_LEN..INTEGRATED_ENVELOPE_LEN]);
            Some(id)
        } else {
            None
        };

        Ok(Address {
            network,
            proof,
            public_key,
            payment_id,
            amount: 0,
        })
    }
}

impl PartialEq for Address {
    fn eq(&self, other: &Self) -> bool {
        self.network == other.network
            && self.proof == other.proof
            && self.public_key == other.public_key
            && self.payment_id == other.payment_id
    }
}

impl Eq for Address {}

impl core::hash::Hash for Address {
    fn hash<H: core::hash::Hasher>(&self, state: &mut H) {
        self.network.hash(state);
        self.proof.hash(state);
        self.public_key.hash(state);
        self.payment_id.hash(state);
    }
}

impl core::fmt::Display for Address {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.encode())
    }
}

impl core::str::FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::decode(s)
    }
}

impl serde::Serialize for Address {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> serde::Deserialize<'de> for Address {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Address::decode(&s).map_err(serde::de::Error::custom)
    }
}

// ============================================================================
// Bech32 Implementation
// ============================================================================

const BECH32_CHARSET: &[u8; 32] = b"qpzry9x8gf2tvdw0s3jn54khce6mua7l";

const CHECKSUM_LEN: usize = 6;

/// Encode an HRP and 5-bit data values as a Bech32 string.
pub fn bech32_encode(hrp: &str, data: &[u8]) -> String {
    let mut values = Vec::with_capacity(data.len() + CHECKSUM_LEN);
    values.extend_from_slice(data);
    values.extend_from_slice(&[0u8; CHECKSUM_LEN]);
    let polymod = bech32_polymod(&hrp_expand(hrp), &values) ^ 1;

    let mut result = String::with_capacity(hrp.len() + 1 + data.len() + CHECKSUM_LEN);
    result.push_str(hrp);
    result.push('1');
    for &value in data {
        result.push(BECH32_CHARSET[(value & 31) as usize] as char);
    }
    for i in 0..CHECKSUM_LEN {
        let value = (polymod >> (5 * (5 - i))) & 31;
        result.push(BECH32_CHARSET[value as usize] as char);
    }

    result
}

/// Decode a Bech32 string into its lowercase HRP and 5-bit data values,
/// checksum removed.
pub fn bech32_decode(input: &str) -> Result<(String, Vec<u8>), AddressError> {
    let has_lower = input.bytes().any(|b| b.is_ascii_lowercase());
    let has_upper = input.bytes().any(|b| b.is_ascii_uppercase());
    if has_lower && has_upper {
        return Err(AddressError::InvalidChecksum);
    }

    if let Some(c) = input.chars().find(|c| !(33..=126).contains(&(*c as u32))) {
        return Err(AddressError::InvalidCharacter(c));
    }

    let input_lower = input.to_ascii_lowercase();

    // Find separator
    let sep_pos = input_lower.rfind('1').ok_or(AddressError::InvalidSeparator)?;

    if sep_pos == 0 || sep_pos + 1 + CHECKSUM_LEN > input_lower.len() {
        return Err(AddressError::InvalidSeparator);
    }

    let hrp = &input_lower[..sep_pos];
    let data_part = &input_lower[sep_pos + 1..];

    // Decode data characters
    let mut data = Vec::with_capacity(data_part.len());
    for c in data_part.chars() {
        let idx = BECH32_CHARSET
            .iter()
            .position(|&x| x as char == c)
            .ok_or(AddressError::InvalidCharacter(c))?;
        data.push(idx as u8);
    }

    if bech32_polymod(&hrp_expand(hrp), &data) != 1 {
        return Err(AddressError::InvalidChecksum);
    }

    data.truncate(data.len() - CHECKSUM_LEN);

    Ok((hrp.to_string(), data))
}

fn hrp_expand(hrp: &str) -> Vec<u8> {
    let mut result = Vec::with_capacity(hrp.len() * 2 + 1);

    for c in hrp.bytes() {
        result.push(c >> 5);
    }
    result.push(0);
    for c in hrp.bytes() {
        result.push(c & 31);
    }

    result
}

fn bech32_polymod(hrp: &[u8], data: &[u8]) -> u32 {
    const GEN: [u32; 5] = [0x3b6a57b2, 0x26508e6d, 0x1ea119fa, 0x3d4233dd, 0x2a1462b3];

    let mut chk: u32 = 1;

    for &value in hrp.iter().chain(data.iter()) {
        let top = chk >> 25;
        chk = ((chk & 0x1ffffff) << 5) ^ (value as u32);
        for (i, &g) in GEN.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= g;
            }
        }
    }

    chk
}

/// Regroup `data` from `from_bits`-wide to `to_bits`-wide values, MSB first.
///
/// With `pad`, leftover bits are zero-padded into a final value; without it,
/// leftover bits must be fewer than `from_bits` and all zero.
pub fn convert_bits(data: &[u8], from_bits: u8, to_bits: u8, pad: bool) -> Result<Vec<u8>, AddressError> {
    let mut acc: u32 = 0;
    let mut bits: u8 = 0;
    let mut result = Vec::with_capacity(data.len() * from_bits as usize / to_bits as usize + 1);
    let max_value = (1u32 << to_bits) - 1;

    for &value in data {
        if (value as u32) >> from_bits != 0 {
            return Err(AddressError::InvalidCharacter(value as char));
        }
        acc = (acc << from_bits) | (value as u32);
        bits += from_bits;

        while bits >= to_bits {
            bits -= to_bits;
            result.push(((acc >> bits) & max_value) as u8);
        }
    }

    if pad {
        if bits > 0 {
            result.push(((acc << (to_bits - bits)) & max_value) as u8);
        }
    } else if bits >= from_bits || ((acc << (to_bits - bits)) & max_value) != 0 {
        return Err(AddressError::InvalidPadding);
    }

    Ok(result)
}
