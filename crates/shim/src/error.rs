//! Failure taxonomy for the Store shim.
//!
//! The `Display` text of every variant is exactly what a host reads back from
//! `msstore_winrt_get_last_error`, so each message is a complete sentence.

use thiserror::Error;

/// Errors that can occur while servicing a call across the C ABI.
#[derive(Debug, Error)]
pub enum ShimError {
  /// The store ID pointer was null or pointed at an empty string.
  #[error("Store ID is null or empty.")]
  EmptyStoreId,

  /// The store ID bytes were not UTF-8.
  #[error("Store ID is not valid UTF-8.")]
  InvalidStoreId,

  /// Store UI needs an owner window and the desktop has none in the foreground.
  #[error("No foreground window handle available for Store UI.")]
  NoForegroundWindow,

  /// The platform completed the call but handed back no result object.
  #[error("{0} is null.")]
  NullResult(&'static str),

  /// The platform reported a failing HRESULT.
  #[error("{message}")]
  Platform { code: i32, message: String },

  /// The shim was built for a platform without Store services.
  #[error("Microsoft Store services are only available on Windows.")]
  Unsupported,

  /// The allocator could not provide a result buffer.
  #[error("Failed to allocate the result buffer.")]
  OutOfMemory,

  /// A panic was caught at the boundary.
  #[error("Unknown native error.")]
  Panic,
}

impl ShimError {
  /// Build a platform error, falling back to the raw HRESULT when the system
  /// has no message text for it.
  pub fn platform(code: i32, message: impl Into<String>) -> Self {
    let message = message.into();
    let message = message.trim();
    let message = if message.is_empty() {
      format!("Store call failed with HRESULT 0x{:08X}.", code as u32)
    } else {
      message.to_string()
    };
    ShimError::Platform { code, message }
  }

  /// Whether the failure was detected before any platform call was made.
  pub fn is_validation(&self) -> bool {
    matches!(
      self,
      ShimError::EmptyStoreId | ShimError::InvalidStoreId | ShimError::NoForegroundWindow
    )
  }
}

#[cfg(windows)]
impl From<windows::core::Error> for ShimError {
  fn from(err: windows::core::Error) -> Self {
    ShimError::platform(err.code().0, err.message().to_string())
  }
}
