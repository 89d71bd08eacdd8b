//! AstroBWT proof-of-work and dero address coding.
//!
//! This crate provides pure Rust implementations of:
//! - Suffix array construction by induced sorting (SA-IS), 16- and 32-bit
//! - The AstroBWT proof-of-work digest (SHA3-256, Salsa20, suffix array)
//! - Bech32 address encoding and decoding for `dero`-prefixed addresses

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod address;
pub mod astrobwt;
pub mod hash;
pub mod network;
pub mod point;
pub mod sais;

pub use address::{Address, AddressError};
pub use astrobwt::{
    pow, pow_narrow, pow_wide, try_pow_narrow, try_pow_wide, AstroBwt, PowError, STAGE1_LENGTH,
};
pub use hash::sha3_256;
pub use network::Network;
pub use point::PublicKey;
pub use sais::{
    suffix_array, suffix_array_u16, suffix_array_u32, SaError, SaIndex, SaWorkspace, BUCKET_SCRATCH_LEN,
};
