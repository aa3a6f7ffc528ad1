//! Single-threaded apartment setup for the calling thread.

use std::cell::Cell;

use tracing::debug;
use windows_sys::Win32::Foundation::{S_FALSE, S_OK};
use windows_sys::Win32::System::Com::{COINIT_APARTMENTTHREADED, CoInitializeEx};

use crate::error::ShimError;

thread_local! {
  static INITIALIZED: Cell<bool> = const { Cell::new(false) };
}

/// Make sure the calling thread is a COM single-threaded apartment.
///
/// Repeat calls on the same thread return immediately. The apartment is never
/// torn down: the host owns the thread and may keep calling into the shim.
/// A thread the host already joined to the multithreaded apartment fails with
/// `RPC_E_CHANGED_MODE`.
pub fn ensure_single_threaded() -> Result<(), ShimError> {
  if INITIALIZED.with(Cell::get) {
    return Ok(());
  }

  // SAFETY: the reserved parameter must be null; the flags are a valid COINIT.
  let hr = unsafe { CoInitializeEx(std::ptr::null(), COINIT_APARTMENTTHREADED as _) };

  if hr != S_OK && hr != S_FALSE {
    return Err(windows::core::Error::from(windows::core::HRESULT(hr)).into());
  }

  debug!(already_initialized = hr == S_FALSE, "calling thread joined a single-threaded apartment");
  INITIALIZED.with(|flag| flag.set(true));
  Ok(())
}
