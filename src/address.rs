//! Ethereum-style account addresses and their EIP-55 mixed-case checksum encoding.
//!
//! See: <https://eips.ethereum.org/EIPS/eip-55>

use crate::{keccak256, EncodeHex};
use bitcoin::secp256k1::PublicKey;
use std::fmt;
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

pub const ADDRESS_SIZE: usize = 20;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AddressError {
    #[error("Address must have 40 hex digits, got {0}")]
    InvalidLength(usize),

    #[error("Invalid address hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// Raw 20-byte account address. Displays as its checksummed form.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Address(pub [u8; ADDRESS_SIZE]);

impl Address {
    /// The last 20 bytes of `keccak256(X || Y)` of the uncompressed public key.
    pub fn from_public_key(public_key: &PublicKey) -> Self {
        // drop the 0x04 SEC1 tag
        let hash = keccak256(&public_key.serialize_uncompressed()[1..]);
        let mut address = [0_u8; ADDRESS_SIZE];
        address.copy_from_slice(&hash[(32 - ADDRESS_SIZE)..]);
        Self(address)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_SIZE] {
        &self.0
    }

    pub fn to_checksum(&self) -> String {
        let lower = self.0.hex();
        let hash = keccak256(lower.as_bytes());

        let mut out = String::with_capacity(2 + ADDRESS_SIZE * 2);
        out.push_str("0x");
        for (i, c) in lower.chars().enumerate() {
            let byte = hash[i / 2];
            let nibble = if i % 2 == 0 { byte >> 4 } else { byte & 0x0f };
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_checksum())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    /// Accepts an optional `0x` prefix and any letter casing. The existing casing is not verified.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let body = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if body.len() != ADDRESS_SIZE * 2 {
            return Err(AddressError::InvalidLength(body.len()));
        }
        let mut address = [0_u8; ADDRESS_SIZE];
        hex::decode_to_slice(body, &mut address)?;
        Ok(Self(address))
    }
}

/// Re-encodes `raw` in canonical checksummed form.
///
/// Idempotent: formatting an already-checksummed address yields the same string.
pub fn to_checksum_address(raw: &str) -> Result<String, AddressError> {
    Ok(raw.parse::<Address>()?.to_checksum())
}
