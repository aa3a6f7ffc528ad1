//! `Windows.Services.Store` backend.

use std::time::Duration;

use tracing::debug;
use windows::Foundation::{AsyncStatus, IAsyncOperation};
use windows::Services::Store::{StoreContext, StoreRateAndReviewResult};
use windows::Win32::Foundation::HWND;
use windows::Win32::UI::Shell::IInitializeWithWindow;
use windows::core::{HSTRING, Interface};
use windows_sys::Win32::UI::WindowsAndMessaging::GetForegroundWindow;

use super::StoreBackend;
use crate::apartment;
use crate::error::ShimError;
use crate::pump::{self, PendingOperation, ThreadMessageQueue};
use crate::status::{PurchaseStatus, RateAndReviewStatus};

/// Store access through `StoreContext::GetDefault`, which uses the identity
/// of the current package.
#[derive(Debug, Clone, Copy)]
pub struct WinRtStore {
  pump_interval: Duration,
}

impl WinRtStore {
  pub fn new(pump_interval: Duration) -> Self {
    Self { pump_interval }
  }

  fn default_context() -> Result<StoreContext, ShimError> {
    apartment::ensure_single_threaded()?;
    Ok(StoreContext::GetDefault()?)
  }
}

impl StoreBackend for WinRtStore {
  fn app_license_json(&self) -> Result<String, ShimError> {
    let context = Self::default_context()?;

    // License lookup shows no UI, so a plain blocking wait is fine here.
    let license = context
      .GetAppLicenseAsync()?
      .get()
      .map_err(null_or_platform("StoreAppLicense"))?;

    Ok(license.ExtendedJsonData()?.to_string())
  }

  fn request_purchase(&self, store_id: &str) -> Result<PurchaseStatus, ShimError> {
    let context = Self::default_context()?;
    bind_ui_owner(&context)?;

    let result = context
      .RequestPurchaseAsync(&HSTRING::from(store_id))?
      .get()
      .map_err(null_or_platform("StorePurchaseResult"))?;

    let status = result.Status()?;
    debug!(raw_status = status.0, "purchase flow resolved");
    Ok(PurchaseStatus::from_platform(status.0))
  }

  fn request_rate_and_review(&self) -> Result<RateAndReviewStatus, ShimError> {
    let context = Self::default_context()?;
    bind_ui_owner(&context)?;

    let operation = RateAndReviewOperation(context.RequestRateAndReviewAppAsync()?);
    let result = pump::pump_until_complete(operation, &mut ThreadMessageQueue, self.pump_interval)?;

    let status = result.Status()?;
    debug!(raw_status = status.0, "rate and review dialog closed");
    Ok(RateAndReviewStatus::from_platform(status.0))
  }
}

/// Desktop apps must give Store modal UI an owner window.
fn bind_ui_owner(context: &StoreContext) -> Result<(), ShimError> {
  // SAFETY: GetForegroundWindow has no preconditions.
  let owner = unsafe { GetForegroundWindow() };

  if owner.is_null() {
    return Err(ShimError::NoForegroundWindow);
  }

  let initialize: IInitializeWithWindow = context.cast()?;
  // SAFETY: `owner` is a window handle the system just handed out. If the
  // window is destroyed meanwhile the Store call fails with an HRESULT.
  unsafe { initialize.Initialize(HWND(owner))? };

  debug!("bound store UI to the foreground window");
  Ok(())
}

/// WinRT reports a null result object as an error carrying a success code.
fn null_or_platform(what: &'static str) -> impl Fn(windows::core::Error) -> ShimError {
  move |err| {
    if err.code().is_ok() {
      ShimError::NullResult(what)
    } else {
      err.into()
    }
  }
}

struct RateAndReviewOperation(IAsyncOperation<StoreRateAndReviewResult>);

impl PendingOperation for RateAndReviewOperation {
  type Output = StoreRateAndReviewResult;

  fn is_running(&self) -> Result<bool, ShimError> {
    Ok(self.0.Status()? == AsyncStatus::Started)
  }

  fn finish(self) -> Result<Self::Output, ShimError> {
    self.0.GetResults().map_err(null_or_platform("StoreRateAndReviewResult"))
  }
}
