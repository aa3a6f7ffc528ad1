//! Adapters between backend results and the C ABI conventions.
//!
//! Every call ends in exactly one of two states: success, with the calling
//! thread's last-error slot cleared, or the operation's sentinel (`null` or
//! `-1`) with the slot holding a readable sentence. Panics are caught here and
//! never unwind into the host.

use std::ffi::{CStr, c_char, c_int};
use std::panic::{self, AssertUnwindSafe};
use std::ptr;

use tracing::{debug, warn};

use crate::backend::StoreBackend;
use crate::buffer::{self, BufferAllocator};
use crate::error::ShimError;
use crate::last_error;
use crate::status::FAILURE;

/// Run `body`, translating its outcome into the (value, last-error) contract.
fn guarded<T>(operation: &'static str, sentinel: T, body: impl FnOnce() -> Result<T, ShimError>) -> T {
  match panic::catch_unwind(AssertUnwindSafe(body)) {
    Ok(Ok(value)) => {
      last_error::clear();
      value
    }
    Ok(Err(err)) => {
      warn!(operation, error = %err, "store call failed");
      last_error::set(err.to_string());
      sentinel
    }
    Err(_) => {
      warn!(operation, "panic caught at the C ABI boundary");
      last_error::set(ShimError::Panic.to_string());
      sentinel
    }
  }
}

/// License JSON as a fresh buffer, or null on failure.
pub fn license_json<B, A>(backend: &B, alloc: &A) -> *const c_char
where
  B: StoreBackend + ?Sized,
  A: BufferAllocator + ?Sized,
{
  guarded("get_license_json", ptr::null(), || {
    debug!("fetching app license");
    let json = backend.app_license_json()?;
    let buffer = buffer::copy_to_buffer(alloc, &json);
    if buffer.is_null() {
      return Err(ShimError::OutOfMemory);
    }
    Ok(buffer)
  })
}

/// Copy of the calling thread's last error. Leaves the slot untouched.
pub fn last_error_copy<A: BufferAllocator + ?Sized>(alloc: &A) -> *const c_char {
  buffer::copy_to_buffer(alloc, &last_error::get())
}

/// Purchase status code, or [`FAILURE`].
///
/// # Safety
///
/// A non-null `store_id` must point to a NUL-terminated string that stays
/// valid for the duration of the call.
pub unsafe fn request_purchase<B>(backend: &B, store_id: *const c_char) -> c_int
where
  B: StoreBackend + ?Sized,
{
  guarded("request_purchase", FAILURE, || {
    // SAFETY: forwarded from the caller.
    let store_id = unsafe { read_store_id(store_id) }?;
    debug!(store_id, "requesting purchase");
    backend.request_purchase(store_id).map(|status| status.code())
  })
}

/// Rate-and-review status code, or [`FAILURE`].
pub fn request_rate_and_review<B>(backend: &B) -> c_int
where
  B: StoreBackend + ?Sized,
{
  guarded("request_rate_and_review", FAILURE, || {
    debug!("requesting rate and review");
    backend.request_rate_and_review().map(|status| status.code())
  })
}

/// Release a buffer returned by this module.
///
/// # Safety
///
/// See [`buffer::release_buffer`].
pub unsafe fn release<A: BufferAllocator + ?Sized>(alloc: &A, ptr: *const c_char) {
  // SAFETY: forwarded from the caller.
  unsafe { buffer::release_buffer(alloc, ptr) }
}

/// # Safety
///
/// A non-null `ptr` must point to a NUL-terminated string valid for `'a`.
unsafe fn read_store_id<'a>(ptr: *const c_char) -> Result<&'a str, ShimError> {
  if ptr.is_null() {
    return Err(ShimError::EmptyStoreId);
  }

  // SAFETY: non-null and NUL-terminated per the caller.
  let raw = unsafe { CStr::from_ptr(ptr) };

  if raw.is_empty() {
    return Err(ShimError::EmptyStoreId);
  }

  raw.to_str().map_err(|_| ShimError::InvalidStoreId)
}

#[cfg(test)]
mod tests {
  use std::ffi::CString;
  use std::sync::{Arc, Barrier};
  use std::thread;

  use tracing_test::traced_test;

  use super::*;
  use crate::status::{PurchaseStatus, RateAndReviewStatus};
  use crate::testutil::{ScriptedStore, TrackingAllocator};

  fn read_and_release(alloc: &TrackingAllocator, ptr: *const c_char) -> String {
    assert!(!ptr.is_null());
    let text = unsafe { CStr::from_ptr(ptr) }.to_str().unwrap().to_string();
    unsafe { release(alloc, ptr) };
    text
  }

  fn last_error_text() -> String {
    let alloc = TrackingAllocator::default();
    read_and_release(&alloc, last_error_copy(&alloc))
  }

  #[test]
  fn license_success_returns_owned_json() {
    let alloc = TrackingAllocator::default();
    let store = ScriptedStore::succeeding();

    let ptr = license_json(&store, &alloc);
    assert_eq!(alloc.outstanding(), 1);

    let json = read_and_release(&alloc, ptr);
    assert!(json.contains("\"isActive\":true"));
    assert_eq!(alloc.allocations(), 1);
    assert_eq!(alloc.releases(), 1);
    assert_eq!(alloc.outstanding(), 0);
  }

  #[test]
  fn license_failure_returns_null_and_sets_error() {
    let alloc = TrackingAllocator::default();

    let ptr = license_json(&ScriptedStore::failing(), &alloc);

    assert!(ptr.is_null());
    assert_eq!(alloc.allocations(), 0);
    assert_eq!(last_error_text(), "Element not found.");
  }

  #[test]
  fn license_allocation_failure_is_reported() {
    let ptr = license_json(&ScriptedStore::succeeding(), &TrackingAllocator::exhausted());
    assert!(ptr.is_null());
    assert_eq!(last_error_text(), "Failed to allocate the result buffer.");
  }

  #[test]
  fn last_error_read_is_idempotent() {
    request_rate_and_review(&ScriptedStore::failing());

    let first = last_error_text();
    let second = last_error_text();
    assert_eq!(first, "StoreRateAndReviewResult is null.");
    assert_eq!(first, second);
  }

  #[test]
  fn success_clears_previous_error() {
    assert_eq!(request_rate_and_review(&ScriptedStore::failing()), FAILURE);
    assert!(!last_error_text().is_empty());

    let code = request_rate_and_review(&ScriptedStore::succeeding());
    assert_eq!(code, RateAndReviewStatus::Succeeded.code());
    assert_eq!(last_error_text(), "");
  }

  #[test]
  fn purchase_rejects_null_store_id_before_platform() {
    let store = ScriptedStore::succeeding();

    let code = unsafe { request_purchase(&store, ptr::null()) };

    assert_eq!(code, FAILURE);
    assert_eq!(store.calls(), 0);
    assert_eq!(last_error_text(), "Store ID is null or empty.");
  }

  #[test]
  fn purchase_rejects_empty_store_id_before_platform() {
    let store = ScriptedStore::succeeding();
    let empty = CString::new("").unwrap();

    let code = unsafe { request_purchase(&store, empty.as_ptr()) };

    assert_eq!(code, FAILURE);
    assert_eq!(store.calls(), 0);
    assert_eq!(last_error_text(), "Store ID is null or empty.");
  }

  #[test]
  fn purchase_rejects_non_utf8_store_id() {
    let store = ScriptedStore::succeeding();
    let invalid = CString::new(vec![0xff, 0xfe, 0x41]).unwrap();

    let code = unsafe { request_purchase(&store, invalid.as_ptr()) };

    assert_eq!(code, FAILURE);
    assert_eq!(store.calls(), 0);
    assert_eq!(last_error_text(), "Store ID is not valid UTF-8.");
  }

  #[test]
  fn purchase_passes_store_id_and_maps_status() {
    let mut store = ScriptedStore::succeeding();
    store.purchase = |id| {
      assert_eq!(id, "9NBLGGH4R315");
      Ok(PurchaseStatus::AlreadyPurchased)
    };
    let id = CString::new("9NBLGGH4R315").unwrap();

    let code = unsafe { request_purchase(&store, id.as_ptr()) };

    assert_eq!(code, 1);
    assert_eq!(store.calls(), 1);
  }

  #[test]
  fn purchase_failure_reports_platform_text() {
    let id = CString::new("9NBLGGH4R315").unwrap();
    let code = unsafe { request_purchase(&ScriptedStore::failing(), id.as_ptr()) };

    assert_eq!(code, FAILURE);
    assert_eq!(last_error_text(), "No foreground window handle available for Store UI.");
  }

  #[test]
  fn panics_do_not_escape() {
    let mut store = ScriptedStore::succeeding();
    store.review = || panic!("backend exploded");
    store.license = || panic!("backend exploded");

    assert_eq!(request_rate_and_review(&store), FAILURE);
    assert_eq!(last_error_text(), "Unknown native error.");

    let alloc = TrackingAllocator::default();
    assert!(license_json(&store, &alloc).is_null());
    assert_eq!(alloc.outstanding(), 0);
  }

  #[test]
  fn errors_are_isolated_between_threads() {
    let barrier = Arc::new(Barrier::new(2));

    let failing = {
      let barrier = Arc::clone(&barrier);
      thread::spawn(move || {
        let code = request_rate_and_review(&ScriptedStore::failing());
        barrier.wait();
        barrier.wait();
        (code, last_error_text())
      })
    };

    let succeeding = {
      let barrier = Arc::clone(&barrier);
      thread::spawn(move || {
        barrier.wait();
        let code = request_rate_and_review(&ScriptedStore::succeeding());
        barrier.wait();
        (code, last_error_text())
      })
    };

    assert_eq!(failing.join().unwrap(), (FAILURE, "StoreRateAndReviewResult is null.".to_string()));
    assert_eq!(succeeding.join().unwrap(), (0, String::new()));
  }

  #[test]
  fn every_returned_buffer_is_released_once() {
    let alloc = TrackingAllocator::default();
    let store = ScriptedStore::succeeding();

    for _ in 0..10 {
      let ptr = license_json(&store, &alloc);
      read_and_release(&alloc, ptr);
      let err = last_error_copy(&alloc);
      read_and_release(&alloc, err);
    }

    assert_eq!(alloc.allocations(), 20);
    assert_eq!(alloc.releases(), 20);
    assert_eq!(alloc.outstanding(), 0);
  }

  #[test]
  #[traced_test]
  fn failures_are_logged() {
    request_rate_and_review(&ScriptedStore::failing());
    assert!(logs_contain("store call failed"));
    assert!(logs_contain("request_rate_and_review"));
  }
}
