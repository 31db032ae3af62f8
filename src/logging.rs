use log::LevelFilter;
use std::path::Path;
use std::str::FromStr;
use std::time::{Duration, Instant, SystemTime};

/// Log to stdout, and additionally to `file` when given.
pub fn set_up_logging(level: LevelFilter, file: Option<&Path>) -> anyhow::Result<()> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                humantime::format_rfc3339_seconds(SystemTime::now()),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout());
    if let Some(f) = file {
        dispatch = dispatch.chain(fern::log_file(f)?);
    }
    dispatch.apply()?;
    Ok(())
}

/// Reads a level like `debug` or `WARN` from the environment variable `var`.
pub fn level_from_env(var: &str, default: LevelFilter) -> LevelFilter {
    std::env::var(var)
        .ok()
        .and_then(|x| LevelFilter::from_str(x.trim()).ok())
        .unwrap_or(default)
}

/// Rate-limits log calls in hot loops.
pub struct IntervalLogger {
    interval: Duration,
    last: Option<Instant>,
}

impl Default for IntervalLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl IntervalLogger {
    pub fn new() -> Self {
        Self::with_interval(Duration::from_secs(1))
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Runs `f` if nothing was logged within the interval. The first call always logs.
    pub fn log<F: FnOnce()>(&mut self, f: F) -> bool {
        let now = Instant::now();
        match self.last {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last = Some(now);
                f();
                true
            }
        }
    }
}
