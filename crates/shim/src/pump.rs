//! Cooperative message pump for Store calls that show modal UI.
//!
//! A blocking wait on `RequestRateAndReviewAppAsync` can starve the thread the
//! dialog's window procedure runs on. Instead the caller's queue is drained
//! and dispatched, then the thread sleeps for at most one interval or until
//! new input arrives, and the operation status is checked again.

use std::time::Duration;

use tracing::debug;

use crate::error::ShimError;

/// The calling thread's UI message queue.
pub trait MessageQueue {
  /// Remove and dispatch every pending message. Returns how many were dispatched.
  fn drain(&mut self) -> usize;

  /// Block until input arrives or `timeout` elapses, whichever is first.
  fn wait(&mut self, timeout: Duration);
}

/// An asynchronous platform operation observed by polling.
pub trait PendingOperation {
  type Output;

  /// Whether the operation is still in progress.
  fn is_running(&self) -> Result<bool, ShimError>;

  /// Retrieve the result once the operation left the running state.
  fn finish(self) -> Result<Self::Output, ShimError>;
}

/// Pump `queue` until `operation` completes, then return its result.
///
/// Each iteration fully drains the queue before waiting, and each wait is
/// bounded by `interval`. There is no overall deadline.
pub fn pump_until_complete<O, Q>(operation: O, queue: &mut Q, interval: Duration) -> Result<O::Output, ShimError>
where
  O: PendingOperation,
  Q: MessageQueue + ?Sized,
{
  let mut iterations = 0usize;
  let mut dispatched = 0usize;

  while operation.is_running()? {
    dispatched += queue.drain();
    queue.wait(interval);
    iterations += 1;
  }

  debug!(iterations, dispatched, "operation left the running state");
  operation.finish()
}

/// The Win32 message queue of the calling thread.
#[cfg(windows)]
#[derive(Debug, Default)]
pub struct ThreadMessageQueue;

#[cfg(windows)]
impl MessageQueue for ThreadMessageQueue {
  fn drain(&mut self) -> usize {
    use windows_sys::Win32::UI::WindowsAndMessaging::{DispatchMessageW, MSG, PM_REMOVE, PeekMessageW, TranslateMessage};

    let mut dispatched = 0;

    // SAFETY: MSG is a plain data struct that is valid when zero-initialized.
    // A null HWND selects every window and thread message of this thread.
    unsafe {
      let mut message: MSG = std::mem::zeroed();
      while PeekMessageW(&mut message, std::ptr::null_mut(), 0, 0, PM_REMOVE) != 0 {
        TranslateMessage(&message);
        DispatchMessageW(&message);
        dispatched += 1;
      }
    }

    dispatched
  }

  fn wait(&mut self, timeout: Duration) {
    use windows_sys::Win32::UI::WindowsAndMessaging::{MWMO_INPUTAVAILABLE, MsgWaitForMultipleObjectsEx, QS_ALLINPUT};

    let millis = u32::try_from(timeout.as_millis()).unwrap_or(u32::MAX);

    // SAFETY: no handles are passed, so the null handle array is never read.
    unsafe {
      MsgWaitForMultipleObjectsEx(0, std::ptr::null(), millis, QS_ALLINPUT, MWMO_INPUTAVAILABLE);
    }
  }
}
