//! Network definitions and address constants.

/// Network an address belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Network {
    /// Production network.
    Mainnet,
    /// Test network.
    Testnet,
}

impl Network {
    /// Get the Bech32 human-readable part for plain addresses on this network.
    pub fn hrp(&self) -> &'static str {
        match self {
            Network::Mainnet => MAINNET_HRP,
            Network::Testnet => TESTNET_HRP,
        }
    }

    /// Get the Bech32 human-readable part for integrated addresses (with payment id).
    pub fn integrated_hrp(&self) -> &'static str {
        match self {
            Network::Mainnet => MAINNET_INTEGRATED_HRP,
            Network::Testnet => TESTNET_INTEGRATED_HRP,
        }
    }

    /// Parse network from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "main" => Some(Network::Mainnet),
            "testnet" | "test" => Some(Network::Testnet),
            _ => None,
        }
    }

    /// Get network name as string.
    pub fn name(&self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Testnet => "testnet",
        }
    }
}

impl core::fmt::Display for Network {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Default for Network {
    fn default() -> Self {
        Network::Mainnet
    }
}

/// HRP of a plain mainnet address.
pub const MAINNET_HRP: &str = "dero";

/// HRP of an integrated mainnet address.
pub const MAINNET_INTEGRATED_HRP: &str = "deroi";

/// HRP of a plain testnet address.
pub const TESTNET_HRP: &str = "deto";

/// HRP of an integrated testnet address.
pub const TESTNET_INTEGRATED_HRP: &str = "detoi";

/// HRP of a proof marker address. Not bound to any network.
pub const PROOF_HRP: &str = "deroproof";

/// Version byte leading every address envelope.
pub const ADDRESS_VERSION: u8 = 1;

/// Length of an integrated-address payment id.
pub const PAYMENT_ID_LEN: usize = 8;

/// Length of a compressed curve point.
pub const COMPRESSED_POINT_LEN: usize = 33;

/// Envelope length of a plain address: version + point.
pub const PLAIN_ENVELOPE_LEN: usize = 1 + COMPRESSED_POINT_LEN;

/// Envelope length of an integrated address: version + point + payment id.
pub const INTEGRATED_ENVELOPE_LEN: usize = PLAIN_ENVELOPE_LEN + PAYMENT_ID_LEN;

/// Integrated envelope with a trailing 8-byte amount field. Accepted on decode,
/// the trailing bytes are ignored and never emitted.
pub const INTEGRATED_AMOUNT_ENVELOPE_LEN: usize = INTEGRATED_ENVELOPE_LEN + 8;
