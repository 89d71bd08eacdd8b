//! Serializable state handed to JavaScript.

use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use astrobwt_core::Address;

/// Hashing statistics for a benchmark run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HashStats {
    /// Total digests computed.
    pub total_hashes: u64,
    /// Current hash rate (hashes per second).
    pub hash_rate: f64,
    /// Elapsed time in milliseconds.
    pub elapsed_ms: f64,
    /// Next counter value appended to the seed.
    pub counter: u64,
}

impl HashStats {
    /// Create new empty stats.
    pub fn new() -> Self {
        Self::default()
    }

    /// Update hash rate based on elapsed time.
    pub fn update_hash_rate(&mut self) {
        if self.elapsed_ms > 0.0 {
            self.hash_rate = (self.total_hashes as f64) / (self.elapsed_ms / 1000.0);
        }
    }

    /// Format hash rate for display.
    pub fn format_hash_rate(&self) -> String {
        if self.hash_rate >= 1_000_000.0 {
            format!("{:.2} MH/s", self.hash_rate / 1_000_000.0)
        } else if self.hash_rate >= 1_000.0 {
            format!("{:.2} KH/s", self.hash_rate / 1_000.0)
        } else {
            format!("{:.2} H/s", self.hash_rate)
        }
    }

    /// Convert to JS value.
    pub fn to_js(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {:?}", e)))
    }
}

/// Result of one benchmark batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResultInfo {
    /// Digests computed in this batch.
    pub hashes_computed: u64,
    /// Last counter hashed in the batch.
    pub last_counter: Option<u64>,
    /// Digest of the last counter, as hex, for spot checks against `pow`.
    pub last_hash: Option<String>,
}

impl BatchResultInfo {
    /// Convert to JS value.
    pub fn to_js(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {:?}", e)))
    }
}

/// Decoded address fields for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressInfo {
    /// Canonical address string.
    pub address: String,
    /// Human-readable part.
    pub hrp: String,
    /// Network name.
    pub network: String,
    /// Whether this is a proof marker address.
    pub proof: bool,
    /// Compressed public key as hex.
    pub public_key: String,
    /// Payment id as hex, if integrated.
    pub payment_id: Option<String>,
}

impl AddressInfo {
    /// Collect display fields from a decoded address.
    pub fn from_address(address: &Address) -> Self {
        AddressInfo {
            address: address.encode(),
            hrp: address.hrp().to_string(),
            network: address.network().name().to_string(),
            proof: address.is_proof(),
            public_key: address.public_key().to_string(),
            payment_id: address.payment_id().map(hex::encode),
        }
    }

    /// Convert to JS value.
    pub fn to_js(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(self)
            .map_err(|e| JsValue::from_str(&format!("Serialization error: {:?}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use astrobwt_core::{Network, PublicKey};

    #[test]
    fn test_format_hash_rate() {
        let mut stats = HashStats::new();
        stats.total_hashes = 3_000;
        stats.elapsed_ms = 2_000.0;
        stats.update_hash_rate();
        assert_eq!(stats.format_hash_rate(), "1.50 KH/s");
    }

    #[test]
    fn test_address_info_fields() {
        let address = Address::integrated(Network::Testnet, PublicKey::generator(), [7u8; 8]);
        let info = AddressInfo::from_address(&address);
        assert_eq!(info.hrp, "detoi");
        assert_eq!(info.network, "testnet");
        assert!(!info.proof);
        assert_eq!(info.payment_id.as_deref(), Some("0707070707070707"));
        assert!(info.address.starts_with("detoi1"));
    }
}
