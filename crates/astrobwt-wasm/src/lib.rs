//! WebAssembly bindings for AstroBWT hashing and dero addresses.
//!
//! This crate provides JavaScript-accessible APIs for:
//! - Evaluating the AstroBWT proof-of-work (narrow and wide engines)
//! - Encoding and decoding addresses
//! - Measuring hash rate in the browser

use wasm_bindgen::prelude::*;

use astrobwt_core::{Address, Network, PublicKey};

pub mod bench;
pub mod state;

// Re-export main types for JS access
pub use bench::PowBench;

use crate::state::AddressInfo;

/// Initialize the WASM module with better panic messages.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Get the library version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// AstroBWT digest of `input` as hex.
#[wasm_bindgen]
pub fn pow(input: &[u8]) -> String {
    hex::encode(astrobwt_core::pow_narrow(input))
}

/// AstroBWT digest of `input` computed with the 32-bit engine, as hex.
#[wasm_bindgen]
pub fn pow_wide(input: &[u8]) -> String {
    hex::encode(astrobwt_core::pow_wide(input))
}

/// Encode an address.
///
/// # Arguments
/// * `network` - "mainnet" or "testnet"
/// * `public_key_hex` - 33-byte compressed point as hex
/// * `payment_id_hex` - empty, or an 8-byte payment id as hex
#[wasm_bindgen]
pub fn encode_address(network: &str, public_key_hex: &str, payment_id_hex: &str) -> Result<String, JsValue> {
    let net = Network::from_str(network)
        .ok_or_else(|| JsValue::from_str("Invalid network"))?;

    let key_bytes = hex::decode(public_key_hex)
        .map_err(|_| JsValue::from_str("Invalid public key hex"))?;
    let public_key = PublicKey::from_slice(&key_bytes)
        .ok_or_else(|| JsValue::from_str("Public key must be 33 bytes"))?;

    let payment_id = hex::decode(payment_id_hex)
        .map_err(|_| JsValue::from_str("Invalid payment id hex"))?;

    let address = Address::from_parts(net, public_key, &payment_id)
        .map_err(|e| JsValue::from_str(&format!("Invalid address: {}", e)))?;

    Ok(address.encode())
}

/// Decode an address into its fields.
#[wasm_bindgen]
pub fn decode_address(address: &str) -> Result<JsValue, JsValue> {
    let decoded = Address::decode(address)
        .map_err(|e| JsValue::from_str(&format!("Invalid address: {}", e)))?;

    AddressInfo::from_address(&decoded).to_js()
}

/// Validate an address string.
#[wasm_bindgen]
pub fn validate_address(address: &str) -> Result<bool, JsValue> {
    match Address::decode(address) {
        Ok(_) => Ok(true),
        Err(e) => Err(JsValue::from_str(&format!("{}", e))),
    }
}

/// Log to the browser console.
#[wasm_bindgen]
pub fn console_log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}
