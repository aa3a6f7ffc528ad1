//! Environment-driven settings for the shim.
//!
//! Hosts load the DLL without passing any arguments, so the few knobs it has
//! come from the process environment and are read once.

use std::sync::OnceLock;
use std::time::Duration;

/// Filter directive that turns on shim logging (e.g. `msstore_winrt=debug`).
pub const LOG_ENV: &str = "MSSTORE_WINRT_LOG";

/// Upper bound, in milliseconds, for each wait of the rate-and-review pump.
pub const PUMP_INTERVAL_ENV: &str = "MSSTORE_WINRT_PUMP_INTERVAL_MS";

pub const DEFAULT_PUMP_INTERVAL: Duration = Duration::from_millis(50);

const MIN_PUMP_INTERVAL_MS: u64 = 1;
const MAX_PUMP_INTERVAL_MS: u64 = 1000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShimConfig {
  pub pump_interval: Duration,
  pub log_filter: Option<String>,
}

impl Default for ShimConfig {
  fn default() -> Self {
    Self {
      pump_interval: DEFAULT_PUMP_INTERVAL,
      log_filter: None,
    }
  }
}

impl ShimConfig {
  /// Read the settings from the current environment.
  pub fn from_env() -> Self {
    let log_filter = std::env::var(LOG_ENV)
      .ok()
      .map(|value| value.trim().to_string())
      .filter(|value| !value.is_empty());

    Self {
      pump_interval: parse_pump_interval(std::env::var(PUMP_INTERVAL_ENV).ok().as_deref()),
      log_filter,
    }
  }

  /// Settings for this process, read from the environment on first use.
  pub fn global() -> &'static ShimConfig {
    static CONFIG: OnceLock<ShimConfig> = OnceLock::new();
    CONFIG.get_or_init(ShimConfig::from_env)
  }
}

/// Parse a millisecond count, clamped to 1..=1000. Anything unparsable yields
/// the default.
fn parse_pump_interval(raw: Option<&str>) -> Duration {
  raw
    .and_then(|value| value.trim().parse::<u64>().ok())
    .map(|millis| Duration::from_millis(millis.clamp(MIN_PUMP_INTERVAL_MS, MAX_PUMP_INTERVAL_MS)))
    .unwrap_or(DEFAULT_PUMP_INTERVAL)
}
