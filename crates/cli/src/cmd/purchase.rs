use anyhow::{Context, Result};
use msstore_winrt::PurchaseStatus;
use serde_json::json;

use crate::host;
use crate::output::{OutputFormat, print_json, print_success, print_warning};

pub fn cmd_purchase(store_id: &str, output: OutputFormat) -> Result<()> {
  let status = host::request_purchase(store_id).context("Purchase request failed")?;

  if output.is_json() {
    return print_json(&json!({
      "storeId": store_id,
      "status": status.as_str(),
      "code": status.code(),
    }));
  }

  match status {
    PurchaseStatus::Succeeded => print_success(&format!("Purchased {}", store_id)),
    PurchaseStatus::AlreadyPurchased => print_success(&format!("{} is already owned", store_id)),
    other => print_warning(&format!("Purchase of {} ended with {}", store_id, other)),
  }

  Ok(())
}
