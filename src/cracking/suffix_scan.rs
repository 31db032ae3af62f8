//! Searches the 16-bit prefix space of a private key whose remaining digits are known,
//! looking for the key of a given address.
//!
//! Every prefix and derived address is printed to stdout. `SUFFIX_SCAN_LOG=info` keeps only the
//! progress lines, `SUFFIX_SCAN_LOG_FILE=<path>` also appends the log to a file.

use key_suffix_search::{
    level_from_env, scan, set_up_logging, LogObserver, ScanConfig, ScanOutcome,
};
use log::{info, LevelFilter};
use std::path::PathBuf;
use std::time::{Duration, Instant};

fn main() -> anyhow::Result<()> {
    let log_file = std::env::var_os("SUFFIX_SCAN_LOG_FILE").map(PathBuf::from);
    set_up_logging(
        level_from_env("SUFFIX_SCAN_LOG", LevelFilter::Debug),
        log_file.as_deref(),
    )?;

    let config = ScanConfig::default();
    info!("Key suffix: {}", config.key_suffix);
    info!("Target address: {}", config.target_address);

    let start = Instant::now();
    let outcome = scan(&config, &mut LogObserver::new())?;
    let elapsed = humantime::format_duration(Duration::from_millis(
        start.elapsed().as_millis() as u64,
    ));

    match outcome {
        ScanOutcome::Found { counter, address } => {
            info!("Found! Prefix {counter:04X}, address {address}");
            info!("Private key: {counter:04X}{}", config.key_suffix);
        }
        ScanOutcome::Exhausted => {
            info!("Key space exhausted, no match");
        }
    }
    info!("Elapsed: {elapsed}");
    Ok(())
}
