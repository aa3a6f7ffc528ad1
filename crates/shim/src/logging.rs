//! Opt-in logging for the shim.
//!
//! A DLL must not install a global subscriber behind its host's back, so this
//! only happens when `MSSTORE_WINRT_LOG` is set, and a subscriber the host
//! installed first always wins.

use std::sync::Once;

use tracing_subscriber::EnvFilter;

use crate::config::ShimConfig;

/// Install a stderr subscriber if the configuration asks for one. Runs at most
/// once per process.
pub fn init(config: &ShimConfig) {
  static INIT: Once = Once::new();

  INIT.call_once(|| {
    let Some(directive) = config.log_filter.as_deref() else {
      return;
    };

    let filter = EnvFilter::try_new(directive).unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_writer(std::io::stderr)
      .without_time()
      .try_init();
  });
}
