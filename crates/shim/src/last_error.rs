//! Per-thread last-error slot.
//!
//! Concurrent host threads never observe each other's failures: the slot lives
//! in thread-local storage and nothing else in the shim is shared mutably.

use std::cell::RefCell;

thread_local! {
  static LAST_ERROR: RefCell<String> = const { RefCell::new(String::new()) };
}

/// Overwrite the calling thread's error text.
pub fn set(message: impl Into<String>) {
  let message = message.into();
  LAST_ERROR.with(|slot| *slot.borrow_mut() = message);
}

/// Reset the calling thread's error text to the empty string.
pub fn clear() {
  LAST_ERROR.with(|slot| slot.borrow_mut().clear());
}

/// Copy of the calling thread's error text. Does not clear the slot.
pub fn get() -> String {
  LAST_ERROR.with(|slot| slot.borrow().clone())
}
