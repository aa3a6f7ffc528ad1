//! The platform seam behind the exported functions.
//!
//! The boundary layer only talks to a [`StoreBackend`]. On Windows that is the
//! WinRT `StoreContext`; elsewhere every call fails with
//! [`ShimError::Unsupported`] so the crate still builds and its boundary
//! behavior can be exercised.

#[cfg(windows)]
mod winrt;

use crate::config::ShimConfig;
use crate::error::ShimError;
use crate::status::{PurchaseStatus, RateAndReviewStatus};

#[cfg(windows)]
pub use winrt::WinRtStore;

/// Blocking access to the Store services of the current application identity.
pub trait StoreBackend {
  /// `StoreAppLicense.ExtendedJsonData` for the current app.
  fn app_license_json(&self) -> Result<String, ShimError>;

  /// Start the purchase flow for `store_id` and wait for it to resolve.
  fn request_purchase(&self, store_id: &str) -> Result<PurchaseStatus, ShimError>;

  /// Show the rating and review dialog and wait for it to close.
  fn request_rate_and_review(&self) -> Result<RateAndReviewStatus, ShimError>;
}

/// Backend for targets without Store services.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedStore;

impl StoreBackend for UnsupportedStore {
  fn app_license_json(&self) -> Result<String, ShimError> {
    Err(ShimError::Unsupported)
  }

  fn request_purchase(&self, _store_id: &str) -> Result<PurchaseStatus, ShimError> {
    Err(ShimError::Unsupported)
  }

  fn request_rate_and_review(&self) -> Result<RateAndReviewStatus, ShimError> {
    Err(ShimError::Unsupported)
  }
}

/// The backend the exported functions use on this target.
#[cfg(windows)]
pub fn platform(config: &ShimConfig) -> WinRtStore {
  WinRtStore::new(config.pump_interval)
}

#[cfg(not(windows))]
pub fn platform(_config: &ShimConfig) -> UnsupportedStore {
  UnsupportedStore
}
