//! Stable status codes exposed across the C ABI.
//!
//! Codes never change meaning once published; new outcomes append. Any
//! platform outcome the shim does not recognize maps to `Unknown`.

use std::ffi::c_int;
use std::fmt;

/// Returned in place of a status code when the call failed.
pub const FAILURE: c_int = -1;

/// Outcome of a purchase request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PurchaseStatus {
  Succeeded,
  AlreadyPurchased,
  NotPurchased,
  NetworkError,
  ServerError,
  Unknown,
}

impl PurchaseStatus {
  pub const ALL: [PurchaseStatus; 6] = [
    PurchaseStatus::Succeeded,
    PurchaseStatus::AlreadyPurchased,
    PurchaseStatus::NotPurchased,
    PurchaseStatus::NetworkError,
    PurchaseStatus::ServerError,
    PurchaseStatus::Unknown,
  ];

  /// Map a raw `Windows.Services.Store.StorePurchaseStatus` value.
  pub fn from_platform(raw: i32) -> Self {
    match raw {
      0 => PurchaseStatus::Succeeded,
      1 => PurchaseStatus::AlreadyPurchased,
      2 => PurchaseStatus::NotPurchased,
      3 => PurchaseStatus::NetworkError,
      4 => PurchaseStatus::ServerError,
      _ => PurchaseStatus::Unknown,
    }
  }

  /// The integer handed to the host.
  pub const fn code(self) -> c_int {
    match self {
      PurchaseStatus::Succeeded => 0,
      PurchaseStatus::AlreadyPurchased => 1,
      PurchaseStatus::NotPurchased => 2,
      PurchaseStatus::NetworkError => 3,
      PurchaseStatus::ServerError => 4,
      PurchaseStatus::Unknown => 5,
    }
  }

  /// Inverse of [`PurchaseStatus::code`], for hosts decoding a return value.
  pub fn from_code(code: c_int) -> Option<Self> {
    Self::ALL.into_iter().find(|status| status.code() == code)
  }

  pub const fn as_str(self) -> &'static str {
    match self {
      PurchaseStatus::Succeeded => "Succeeded",
      PurchaseStatus::AlreadyPurchased => "AlreadyPurchased",
      PurchaseStatus::NotPurchased => "NotPurchased",
      PurchaseStatus::NetworkError => "NetworkError",
      PurchaseStatus::ServerError => "ServerError",
      PurchaseStatus::Unknown => "Unknown",
    }
  }
}

impl fmt::Display for PurchaseStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}

/// Outcome of the rate-and-review dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateAndReviewStatus {
  Succeeded,
  CanceledByUser,
  NetworkError,
  Error,
  Unknown,
}

impl RateAndReviewStatus {
  pub const ALL: [RateAndReviewStatus; 5] = [
    RateAndReviewStatus::Succeeded,
    RateAndReviewStatus::CanceledByUser,
    RateAndReviewStatus::NetworkError,
    RateAndReviewStatus::Error,
    RateAndReviewStatus::Unknown,
  ];

  /// Map a raw `Windows.Services.Store.StoreRateAndReviewStatus` value.
  pub fn from_platform(raw: i32) -> Self {
    match raw {
      0 => RateAndReviewStatus::Succeeded,
      1 => RateAndReviewStatus::CanceledByUser,
      2 => RateAndReviewStatus::NetworkError,
      3 => RateAndReviewStatus::Error,
      _ => RateAndReviewStatus::Unknown,
    }
  }

  pub const fn code(self) -> c_int {
    match self {
      RateAndReviewStatus::Succeeded => 0,
      RateAndReviewStatus::CanceledByUser => 1,
      RateAndReviewStatus::NetworkError => 2,
      RateAndReviewStatus::Error => 3,
      RateAndReviewStatus::Unknown => 4,
    }
  }

  pub fn from_code(code: c_int) -> Option<Self> {
    Self::ALL.into_iter().find(|status| status.code() == code)
  }

  pub const fn as_str(self) -> &'static str {
    match self {
      RateAndReviewStatus::Succeeded => "Succeeded",
      RateAndReviewStatus::CanceledByUser => "CanceledByUser",
      RateAndReviewStatus::NetworkError => "NetworkError",
      RateAndReviewStatus::Error => "Error",
      RateAndReviewStatus::Unknown => "Unknown",
    }
  }
}

impl fmt::Display for RateAndReviewStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.as_str())
  }
}
