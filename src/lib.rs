pub mod address;
pub mod key;
pub mod logging;
pub mod scan;

pub use address::{to_checksum_address, Address, AddressError};
pub use key::{
    derive_address, derive_checksum_address, normalize_private_key, KeyDerivationError,
};
pub use logging::{level_from_env, set_up_logging, IntervalLogger};
pub use scan::{scan, LogObserver, ScanConfig, ScanError, ScanObserver, ScanOutcome};

use digest::Digest;
use sha3::Keccak256;

#[inline]
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Keccak256::new();
    Digest::update(&mut hasher, data);
    hasher.finalize().into()
}

pub trait EncodeHex {
    fn hex(&self) -> String;
}

impl<A> EncodeHex for A
where
    A: AsRef<[u8]>,
{
    fn hex(&self) -> String {
        hex::encode(self)
    }
}
