//! Private key to account address derivation.

use crate::address::Address;
use bitcoin::secp256k1::{PublicKey, Secp256k1, SecretKey};
use log::{log, Level};
use thiserror::Error;

/// Hex digits of a 256-bit private key.
pub const PRIVATE_KEY_HEX_LEN: usize = 64;

#[derive(Error, Debug)]
pub enum KeyDerivationError {
    #[error("Private key {key:?} is not valid hex: {source}")]
    InvalidHex {
        key: String,
        #[source]
        source: hex::FromHexError,
    },

    #[error("Private key {key:?} decodes to {bytes} bytes, expected 32")]
    InvalidLength { key: String, bytes: usize },

    #[error("Private key {key:?} is out of the secp256k1 scalar range: {source}")]
    InvalidScalar {
        key: String,
        #[source]
        source: bitcoin::secp256k1::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedKey {
    pub hex: String,
    pub padded: bool,
}

/// Left-pads keys shorter than 64 digits with `'0'`. Longer keys pass through untouched.
///
/// A `0x`-prefixed key of exactly 66 characters has its prefix stripped first.
pub fn normalize_private_key(key: &str) -> NormalizedKey {
    let key = match key.strip_prefix("0x") {
        Some(stripped) if key.len() == PRIVATE_KEY_HEX_LEN + 2 => stripped,
        _ => key,
    };

    if key.len() < PRIVATE_KEY_HEX_LEN {
        NormalizedKey {
            hex: format!("{key:0>width$}", width = PRIVATE_KEY_HEX_LEN),
            padded: true,
        }
    } else {
        NormalizedKey {
            hex: key.to_string(),
            padded: false,
        }
    }
}

/// The log line reporting how `original` was normalized, if it was not already 64 digits.
pub fn normalization_diagnostic(
    original: &str,
    normalized: &NormalizedKey,
) -> Option<(Level, String)> {
    if normalized.padded {
        Some((
            Level::Debug,
            format!(
                "Private key has {} digits, padded to: {}",
                original.len(),
                normalized.hex
            ),
        ))
    } else if normalized.hex.len() > PRIVATE_KEY_HEX_LEN {
        Some((
            Level::Warn,
            format!(
                "Private key has {} digits, longer than {PRIVATE_KEY_HEX_LEN}, used as: {}",
                normalized.hex.len(),
                normalized.hex
            ),
        ))
    } else {
        None
    }
}

pub fn derive_address(private_key_hex: &str) -> Result<Address, KeyDerivationError> {
    let normalized = normalize_private_key(private_key_hex);
    if let Some((level, message)) = normalization_diagnostic(private_key_hex, &normalized) {
        log!(level, "{message}");
    }
    let key = normalized.hex;

    let bytes = match hex::decode(&key) {
        Ok(b) => b,
        Err(source) => return Err(KeyDerivationError::InvalidHex { key, source }),
    };
    if bytes.len() != 32 {
        let bytes = bytes.len();
        return Err(KeyDerivationError::InvalidLength { key, bytes });
    }
    // 1 <= k < n
    let secret = match SecretKey::from_slice(&bytes) {
        Ok(s) => s,
        Err(source) => return Err(KeyDerivationError::InvalidScalar { key, source }),
    };

    let secp = Secp256k1::signing_only();
    let public_key = PublicKey::from_secret_key(&secp, &secret);
    Ok(Address::from_public_key(&public_key))
}

/// Derives the checksummed address string of `private_key_hex`.
pub fn derive_checksum_address(private_key_hex: &str) -> Result<String, KeyDerivationError> {
    derive_address(private_key_hex).map(|a| a.to_checksum())
}
