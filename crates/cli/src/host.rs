//! Host side of the shim's C ABI.
//!
//! This is the contract any foreign runtime has to honor: decode returned
//! strings within a bounded window, release each non-null pointer exactly
//! once, and turn a `null`/`-1` sentinel into an error carrying the text of
//! `msstore_winrt_get_last_error`.

use std::ffi::{CString, c_char};
use std::ptr::NonNull;

use anyhow::{Context, Result, anyhow, bail};
use msstore_winrt::{
  FAILURE, PurchaseStatus, RateAndReviewStatus, msstore_winrt_free, msstore_winrt_get_last_error,
  msstore_winrt_get_license_json, msstore_winrt_request_purchase, msstore_winrt_request_rate_and_review,
};
use tracing::debug;

/// Longest string the host will scan for a terminator.
pub const MAX_STRING_BYTES: usize = 32 * 1024 * 1024;

/// A string owned by the shim's allocator, released on drop.
pub struct NativeString {
  ptr: NonNull<c_char>,
}

impl NativeString {
  /// Take ownership of a pointer returned by the shim. Null yields `None`.
  ///
  /// # Safety
  ///
  /// `ptr` must come from a shim call and must not be owned by anything else.
  pub unsafe fn from_raw(ptr: *const c_char) -> Option<Self> {
    NonNull::new(ptr as *mut c_char).map(|ptr| Self { ptr })
  }

  pub fn decode(&self) -> Result<String> {
    // SAFETY: the shim hands out NUL-terminated buffers; the scan is bounded
    // regardless.
    unsafe { decode_bounded(self.ptr.as_ptr(), MAX_STRING_BYTES) }
  }
}

impl Drop for NativeString {
  fn drop(&mut self) {
    // SAFETY: `ptr` came from the shim and this is its only owner.
    unsafe { msstore_winrt_free(self.ptr.as_ptr()) }
  }
}

/// Decode a NUL-terminated UTF-8 run of at most `limit` bytes.
///
/// # Safety
///
/// `ptr` must be readable up to its terminator or `limit` bytes, whichever
/// comes first.
pub unsafe fn decode_bounded(ptr: *const c_char, limit: usize) -> Result<String> {
  if ptr.is_null() {
    bail!("native string pointer is null");
  }

  let bytes = ptr as *const u8;
  let mut len = 0;

  // SAFETY: every read stays within the window the caller vouched for.
  while len < limit && unsafe { *bytes.add(len) } != 0 {
    len += 1;
  }

  if len == limit {
    bail!("native string is not terminated within {limit} bytes");
  }

  // SAFETY: the `len` bytes before the terminator were just read.
  let slice = unsafe { std::slice::from_raw_parts(bytes, len) };
  String::from_utf8(slice.to_vec()).context("native string is not valid UTF-8")
}

/// The calling thread's last error, or a placeholder if it cannot be read.
pub fn last_error() -> String {
  // SAFETY: fresh pointer from the shim, owned by the guard.
  match unsafe { NativeString::from_raw(msstore_winrt_get_last_error()) } {
    Some(text) => text.decode().unwrap_or_else(|err| format!("unreadable native error ({err})")),
    None => "native error text unavailable".to_string(),
  }
}

fn native_failure() -> anyhow::Error {
  let message = last_error();
  if message.is_empty() {
    anyhow!("native call failed without an error message")
  } else {
    anyhow!(message)
  }
}

/// License metadata JSON for the current app.
pub fn license_json() -> Result<String> {
  debug!("calling msstore_winrt_get_license_json");
  // SAFETY: fresh pointer from the shim, owned by the guard.
  let license = unsafe { NativeString::from_raw(msstore_winrt_get_license_json()) };
  match license {
    Some(license) => license.decode(),
    None => Err(native_failure()),
  }
}

pub fn request_purchase(store_id: &str) -> Result<PurchaseStatus> {
  let store_id = CString::new(store_id).context("store ID contains a NUL byte")?;

  debug!(?store_id, "calling msstore_winrt_request_purchase");
  // SAFETY: `store_id` is NUL-terminated and outlives the call.
  let code = unsafe { msstore_winrt_request_purchase(store_id.as_ptr()) };

  if code == FAILURE {
    return Err(native_failure());
  }
  PurchaseStatus::from_code(code).ok_or_else(|| anyhow!("unknown purchase status code {code}"))
}

pub fn request_rate_and_review() -> Result<RateAndReviewStatus> {
  debug!("calling msstore_winrt_request_rate_and_review");
  let code = msstore_winrt_request_rate_and_review();

  if code == FAILURE {
    return Err(native_failure());
  }
  RateAndReviewStatus::from_code(code).ok_or_else(|| anyhow!("unknown rate and review status code {code}"))
}
