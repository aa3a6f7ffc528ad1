//! Buffers handed across the C ABI.
//!
//! Every string the shim returns is a NUL-terminated UTF-8 copy allocated by a
//! [`BufferAllocator`], and must be released through the same allocator. On
//! Windows that is `CoTaskMemAlloc`/`CoTaskMemFree`, which stays valid across
//! modules built against different C runtimes.

use std::ffi::c_char;
use std::ptr;

/// Raw allocator used for buffers that outlive the call that produced them.
pub trait BufferAllocator {
  /// Allocate `size` bytes. Returns null on exhaustion.
  fn allocate(&self, size: usize) -> *mut u8;

  /// Release a block returned by [`BufferAllocator::allocate`].
  ///
  /// # Safety
  ///
  /// `ptr` must be non-null, must come from `allocate` on this allocator and
  /// must not have been released already.
  unsafe fn release(&self, ptr: *mut u8);
}

/// The allocator the exported functions use.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemAllocator;

#[cfg(windows)]
impl BufferAllocator for SystemAllocator {
  fn allocate(&self, size: usize) -> *mut u8 {
    // SAFETY: CoTaskMemAlloc has no preconditions and returns null on failure.
    unsafe { windows_sys::Win32::System::Com::CoTaskMemAlloc(size) as *mut u8 }
  }

  unsafe fn release(&self, ptr: *mut u8) {
    // SAFETY: the caller guarantees `ptr` came from CoTaskMemAlloc.
    unsafe { windows_sys::Win32::System::Com::CoTaskMemFree(ptr as *const core::ffi::c_void) }
  }
}

#[cfg(not(windows))]
impl BufferAllocator for SystemAllocator {
  fn allocate(&self, size: usize) -> *mut u8 {
    // SAFETY: malloc has no preconditions and returns null on failure.
    unsafe { libc::malloc(size) as *mut u8 }
  }

  unsafe fn release(&self, ptr: *mut u8) {
    // SAFETY: the caller guarantees `ptr` came from malloc.
    unsafe { libc::free(ptr as *mut libc::c_void) }
  }
}

/// Copy `value` into a fresh NUL-terminated buffer owned by the caller.
///
/// Returns null only when the allocator is exhausted.
pub fn copy_to_buffer<A: BufferAllocator + ?Sized>(alloc: &A, value: &str) -> *const c_char {
  let bytes = value.as_bytes();
  let buffer = alloc.allocate(bytes.len() + 1);

  if buffer.is_null() {
    return ptr::null();
  }

  // SAFETY: `buffer` holds `bytes.len() + 1` bytes and cannot overlap `value`.
  unsafe {
    ptr::copy_nonoverlapping(bytes.as_ptr(), buffer, bytes.len());
    *buffer.add(bytes.len()) = 0;
  }

  buffer as *const c_char
}

/// Release a buffer produced by [`copy_to_buffer`]. Null is ignored.
///
/// # Safety
///
/// A non-null `ptr` must come from `copy_to_buffer` with the same allocator and
/// must not have been released already.
pub unsafe fn release_buffer<A: BufferAllocator + ?Sized>(alloc: &A, ptr: *const c_char) {
  if ptr.is_null() {
    return;
  }

  // SAFETY: forwarded from the caller.
  unsafe { alloc.release(ptr as *mut u8) }
}
