//! Test doubles for the allocator and the platform backend.

use std::alloc::{Layout, alloc, dealloc};
use std::cell::Cell;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::backend::StoreBackend;
use crate::buffer::BufferAllocator;
use crate::error::ShimError;
use crate::status::{PurchaseStatus, RateAndReviewStatus};

/// Allocator that records every block it hands out and panics on a release
/// it does not recognize, which catches double frees and foreign pointers.
#[derive(Default)]
pub struct TrackingAllocator {
  live: Mutex<HashMap<usize, Layout>>,
  allocations: Cell<usize>,
  releases: Cell<usize>,
  exhausted: bool,
}

impl TrackingAllocator {
  pub fn exhausted() -> Self {
    Self {
      exhausted: true,
      ..Self::default()
    }
  }

  pub fn outstanding(&self) -> usize {
    self.live.lock().unwrap().len()
  }

  pub fn allocations(&self) -> usize {
    self.allocations.get()
  }

  pub fn releases(&self) -> usize {
    self.releases.get()
  }
}

impl BufferAllocator for TrackingAllocator {
  fn allocate(&self, size: usize) -> *mut u8 {
    if self.exhausted {
      return std::ptr::null_mut();
    }

    let layout = Layout::array::<u8>(size.max(1)).unwrap();
    let ptr = unsafe { alloc(layout) };
    self.live.lock().unwrap().insert(ptr as usize, layout);
    self.allocations.set(self.allocations.get() + 1);
    ptr
  }

  unsafe fn release(&self, ptr: *mut u8) {
    let layout = self
      .live
      .lock()
      .unwrap()
      .remove(&(ptr as usize))
      .expect("released a pointer this allocator does not own");
    unsafe { dealloc(ptr, layout) };
    self.releases.set(self.releases.get() + 1);
  }
}

/// Backend that replays fixed answers and counts how often it was reached.
pub struct ScriptedStore {
  pub license: fn() -> Result<String, ShimError>,
  pub purchase: fn(&str) -> Result<PurchaseStatus, ShimError>,
  pub review: fn() -> Result<RateAndReviewStatus, ShimError>,
  calls: Cell<usize>,
}

impl ScriptedStore {
  /// Every call succeeds.
  pub fn succeeding() -> Self {
    Self {
      license: || Ok(r#"{"productId":"9NBLGGH4R315","isActive":true}"#.to_string()),
      purchase: |_| Ok(PurchaseStatus::Succeeded),
      review: || Ok(RateAndReviewStatus::Succeeded),
      calls: Cell::new(0),
    }
  }

  /// Every call fails the way an unpackaged process does.
  pub fn failing() -> Self {
    Self {
      license: || Err(ShimError::platform(0x8007_0490_u32 as i32, "Element not found.")),
      purchase: |_| Err(ShimError::NoForegroundWindow),
      review: || Err(ShimError::NullResult("StoreRateAndReviewResult")),
      calls: Cell::new(0),
    }
  }

  pub fn calls(&self) -> usize {
    self.calls.get()
  }

  fn record(&self) {
    self.calls.set(self.calls.get() + 1);
  }
}

impl StoreBackend for ScriptedStore {
  fn app_license_json(&self) -> Result<String, ShimError> {
    self.record();
    (self.license)()
  }

  fn request_purchase(&self, store_id: &str) -> Result<PurchaseStatus, ShimError> {
    self.record();
    (self.purchase)(store_id)
  }

  fn request_rate_and_review(&self) -> Result<RateAndReviewStatus, ShimError> {
    self.record();
    (self.review)()
  }
}
