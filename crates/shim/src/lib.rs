//! msstore-winrt: Microsoft Store license and purchase services over a C ABI
//!
//! The exported functions wrap the asynchronous, apartment-threaded
//! `Windows.Services.Store.StoreContext` API in blocking calls that a foreign
//! runtime can bind by symbol name:
//! - `msstore_winrt_get_license_json`: license metadata as UTF-8 JSON
//! - `msstore_winrt_get_last_error`: the calling thread's last failure
//! - `msstore_winrt_request_purchase`: the Store purchase flow
//! - `msstore_winrt_request_rate_and_review`: the rating and review dialog
//! - `msstore_winrt_free`: releases any string returned by the above
//!
//! Strings returned by the shim are owned by the caller and must be released
//! exactly once with `msstore_winrt_free`. Failures never cross the boundary
//! as panics; they surface as a `null` pointer or `-1` plus a message readable
//! through `msstore_winrt_get_last_error` on the same thread.

#[cfg(windows)]
mod apartment;
pub mod backend;
pub mod boundary;
pub mod buffer;
pub mod config;
pub mod error;
pub mod last_error;
mod logging;
pub mod pump;
pub mod status;

#[cfg(test)]
mod testutil;

use std::ffi::{c_char, c_int};

use buffer::SystemAllocator;
use config::ShimConfig;

pub use error::ShimError;
pub use status::{FAILURE, PurchaseStatus, RateAndReviewStatus};

fn store() -> impl backend::StoreBackend {
  let config = ShimConfig::global();
  logging::init(config);
  backend::platform(config)
}

/// Returns `StoreAppLicense.ExtendedJsonData` as UTF-8 JSON, or null on error.
///
/// Blocks until the Store answers. A non-null result must be released with
/// [`msstore_winrt_free`].
#[unsafe(no_mangle)]
pub extern "C" fn msstore_winrt_get_license_json() -> *const c_char {
  boundary::license_json(&store(), &SystemAllocator)
}

/// Returns the last error message for the calling thread. Never null unless
/// the allocator is exhausted; empty when the previous call succeeded.
///
/// The result must be released with [`msstore_winrt_free`].
#[unsafe(no_mangle)]
pub extern "C" fn msstore_winrt_get_last_error() -> *const c_char {
  boundary::last_error_copy(&SystemAllocator)
}

/// Requests a purchase for `store_id` and returns a [`PurchaseStatus`] code,
/// or `-1` on error.
///
/// # Safety
///
/// `store_id` must be null or point to a NUL-terminated string that remains
/// valid for the duration of the call.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn msstore_winrt_request_purchase(store_id: *const c_char) -> c_int {
  // SAFETY: forwarded from the caller.
  unsafe { boundary::request_purchase(&store(), store_id) }
}

/// Shows the rating and review dialog and returns a [`RateAndReviewStatus`]
/// code, or `-1` on error.
///
/// The calling thread's message queue keeps being pumped while the dialog is
/// open.
#[unsafe(no_mangle)]
pub extern "C" fn msstore_winrt_request_rate_and_review() -> c_int {
  boundary::request_rate_and_review(&store())
}

/// Releases a string returned by this library. Null is ignored.
///
/// # Safety
///
/// A non-null `ptr` must have been returned by this library and not released
/// already.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn msstore_winrt_free(ptr: *const c_char) {
  // SAFETY: forwarded from the caller.
  unsafe { boundary::release(&SystemAllocator, ptr) }
}
