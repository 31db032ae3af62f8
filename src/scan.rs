//! Sequential search over the 16-bit key prefix space.
//!
//! For every counter in `0x0000..=0xFFFF` the candidate private key is the 4-digit uppercase hex
//! prefix of the counter followed by a fixed suffix. The derived checksummed address is compared
//! with the target, and the scan stops on the first match.

use crate::address::{to_checksum_address, AddressError};
use crate::key::{derive_checksum_address, KeyDerivationError};
use crate::logging::IntervalLogger;
use log::{debug, info};
use thiserror::Error;

pub const DEFAULT_KEY_SUFFIX: &str =
    "a494fb3d7558dc85c332790c585be5dd68aef5488c7790dfa01af576c6cbcdd1";
pub const DEFAULT_TARGET_ADDRESS: &str = "0x3B04710D175fB519F4977eD821d9aC27bdD07508";

/// Number of candidates in a full scan.
pub const KEY_SPACE: u32 = u16::MAX as u32 + 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanConfig {
    pub key_suffix: String,
    pub target_address: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self::new(DEFAULT_KEY_SUFFIX, DEFAULT_TARGET_ADDRESS)
    }
}

impl ScanConfig {
    pub fn new(key_suffix: impl Into<String>, target_address: impl Into<String>) -> Self {
        Self {
            key_suffix: key_suffix.into(),
            target_address: target_address.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Found { counter: u16, address: String },
    Exhausted,
}

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Invalid target address: {0}")]
    Target(#[from] AddressError),

    #[error("Key derivation failed at counter {counter:04X}")]
    Derivation {
        counter: u16,
        #[source]
        source: KeyDerivationError,
    },
}

/// Called before each candidate is derived, then with its address once derivation succeeds.
pub trait ScanObserver {
    fn on_prefix(&mut self, _counter: u16, _prefix: &str) {}

    fn on_candidate(&mut self, _counter: u16, _address: &str) {}

    fn on_match(&mut self, _counter: u16, _address: &str) {}
}

/// Discards all events.
impl ScanObserver for () {}

/// Reports every prefix and address at `debug`, and throttled progress at `info`.
#[derive(Default)]
pub struct LogObserver {
    progress: IntervalLogger,
}

impl LogObserver {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ScanObserver for LogObserver {
    fn on_prefix(&mut self, _counter: u16, prefix: &str) {
        debug!("{prefix}");
    }

    fn on_candidate(&mut self, counter: u16, address: &str) {
        debug!("{address}");
        self.progress.log(|| {
            info!(
                "Progress: {counter:04X} ({}/{KEY_SPACE}), last address: {address}",
                counter as u32 + 1
            )
        });
    }

    fn on_match(&mut self, counter: u16, address: &str) {
        info!("Match at counter {counter:04X}: {address}");
    }
}

#[inline]
pub fn candidate_prefix(counter: u16) -> String {
    format!("{counter:04X}")
}

/// Plain concatenation; the result is not trimmed to 64 digits.
pub fn candidate_key(counter: u16, key_suffix: &str) -> String {
    let mut key = candidate_prefix(counter);
    key.push_str(key_suffix);
    key
}

pub fn scan<O: ScanObserver>(
    config: &ScanConfig,
    observer: &mut O,
) -> Result<ScanOutcome, ScanError> {
    let target = to_checksum_address(&config.target_address)?;

    for counter in 0..=u16::MAX {
        let prefix = candidate_prefix(counter);
        observer.on_prefix(counter, &prefix);
        let key = candidate_key(counter, &config.key_suffix);
        let address = derive_checksum_address(&key)
            .map_err(|source| ScanError::Derivation { counter, source })?;
        observer.on_candidate(counter, &address);

        if address == target {
            observer.on_match(counter, &address);
            return Ok(ScanOutcome::Found { counter, address });
        }
    }
    Ok(ScanOutcome::Exhausted)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// The default suffix without its first four digits, so candidates are exactly 64 digits.
    const SUFFIX_60: &str = "fb3d7558dc85c332790c585be5dd68aef5488c7790dfa01af576c6cbcdd1";

    #[derive(Default)]
    struct Recorder {
        counters: Vec<u16>,
        prefixes: Vec<String>,
        matched: Option<(u16, String)>,
    }

    impl ScanObserver for Recorder {
        fn on_prefix(&mut self, _counter: u16, prefix: &str) {
            self.prefixes.push(prefix.to_string());
        }

        fn on_candidate(&mut self, counter: u16, _address: &str) {
            self.counters.push(counter);
        }

        fn on_match(&mut self, counter: u16, address: &str) {
            self.matched = Some((counter, address.to_string()));
        }
    }

    #[test]
    fn prefix_format() {
        assert_eq!(candidate_prefix(0), "0000");
        assert_eq!(candidate_prefix(255), "00FF");
        assert_eq!(candidate_prefix(0xABC), "0ABC");
        assert_eq!(candidate_prefix(65535), "FFFF");
        for c in [0_u16, 1, 0x1234, 0xA494, u16::MAX] {
            let p = candidate_prefix(c);
            assert_eq!(p.len(), 4);
            assert_eq!(u16::from_str_radix(&p, 16).unwrap(), c);
            assert!(!p.chars().any(|x| x.is_ascii_lowercase()));
        }
    }

    #[test]
    fn candidate_key_concatenates() {
        assert_eq!(candidate_key(0x1234, SUFFIX_60).len(), 64);
        assert_eq!(candidate_key(0x00FF, "ab"), "00FFab");
        assert_eq!(candidate_key(0, DEFAULT_KEY_SUFFIX).len(), 68);
    }

    #[test]
    fn first_candidate_address() {
        let key = candidate_key(0, SUFFIX_60);
        assert_eq!(
            derive_checksum_address(&key).unwrap(),
            "0x4652583Cf81c4eFf9c00d163bdE76391Bb197430"
        );
    }

    #[test]
    fn default_config_aborts_on_first_candidate() {
        let mut recorder = Recorder::default();
        match scan(&ScanConfig::default(), &mut recorder) {
            Err(ScanError::Derivation {
                counter,
                source: KeyDerivationError::InvalidLength { bytes, .. },
            }) => {
                assert_eq!(counter, 0);
                assert_eq!(bytes, 34);
            }
            other => panic!("unexpected result: {other:?}"),
        }
        // the failing prefix is still reported
        assert_eq!(recorder.prefixes, vec!["0000".to_string()]);
        assert!(recorder.counters.is_empty());
    }

    #[test]
    fn invalid_target_is_rejected_before_scanning() {
        let mut recorder = Recorder::default();
        let config = ScanConfig::new(SUFFIX_60, "0x3B04710D");
        assert!(matches!(
            scan(&config, &mut recorder),
            Err(ScanError::Target(AddressError::InvalidLength(8)))
        ));
        assert!(recorder.counters.is_empty());
        assert!(recorder.prefixes.is_empty());
    }

    #[test]
    fn derivation_error_message_omits_cause() {
        let err = scan(&ScanConfig::default(), &mut ()).unwrap_err();
        assert_eq!(err.to_string(), "Key derivation failed at counter 0000");
        let cause = std::error::Error::source(&err).unwrap().to_string();
        assert!(cause.contains("decodes to 34 bytes"));
    }

    #[test]
    fn stops_at_first_match() {
        let mut recorder = Recorder::default();
        // lowercase target is canonicalized before comparison
        let config = ScanConfig::new(SUFFIX_60, "0x93dc7c44e51f438fc514f891ba6e2a4e62c14c54");
        let outcome = scan(&config, &mut recorder).unwrap();
        assert_eq!(
            outcome,
            ScanOutcome::Found {
                counter: 0x1234,
                address: "0x93dc7c44e51f438fc514f891bA6E2A4E62C14c54".into()
            }
        );
        assert_eq!(recorder.counters, (0..=0x1234).collect::<Vec<u16>>());
        assert_eq!(recorder.prefixes.len(), 0x1234 + 1);
        assert_eq!(recorder.prefixes.first().map(String::as_str), Some("0000"));
        assert_eq!(recorder.prefixes.last().map(String::as_str), Some("1234"));
        assert_eq!(
            recorder.matched,
            Some((0x1234, "0x93dc7c44e51f438fc514f891bA6E2A4E62C14c54".into()))
        );
    }

    #[test]
    fn recovers_default_target_with_trimmed_suffix() {
        let mut recorder = Recorder::default();
        let config = ScanConfig::new(SUFFIX_60, DEFAULT_TARGET_ADDRESS);
        assert_eq!(
            scan(&config, &mut recorder).unwrap(),
            ScanOutcome::Found {
                counter: 0xA494,
                address: DEFAULT_TARGET_ADDRESS.into()
            }
        );
        assert_eq!(recorder.counters.len(), 0xA494 + 1);
    }

    #[test]
    fn exhausts_without_match() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut recorder = Recorder::default();
        // address of private key 1, outside this key space
        let config = ScanConfig::new(SUFFIX_60, "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf");
        assert_eq!(scan(&config, &mut recorder).unwrap(), ScanOutcome::Exhausted);
        assert_eq!(recorder.counters.len() as u32, KEY_SPACE);
        assert_eq!(recorder.counters.last(), Some(&u16::MAX));
        assert!(recorder.matched.is_none());
    }

    #[test]
    fn unit_observer_and_log_observer() {
        let config = ScanConfig::new(SUFFIX_60, "0x4652583Cf81c4eFf9c00d163bdE76391Bb197430");
        let expected = ScanOutcome::Found {
            counter: 0,
            address: "0x4652583Cf81c4eFf9c00d163bdE76391Bb197430".into(),
        };
        assert_eq!(scan(&config, &mut ()).unwrap(), expected);
        assert_eq!(scan(&config, &mut LogObserver::new()).unwrap(), expected);
    }
}
