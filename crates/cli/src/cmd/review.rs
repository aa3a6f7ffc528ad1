use anyhow::{Context, Result};
use msstore_winrt::RateAndReviewStatus;
use serde_json::json;

use crate::host;
use crate::output::{OutputFormat, print_json, print_success, print_warning};

pub fn cmd_review(output: OutputFormat) -> Result<()> {
  let status = host::request_rate_and_review().context("Rate and review request failed")?;

  if output.is_json() {
    return print_json(&json!({
      "status": status.as_str(),
      "code": status.code(),
    }));
  }

  match status {
    RateAndReviewStatus::Succeeded => print_success("Review submitted"),
    other => print_warning(&format!("Rate and review ended with {}", other)),
  }

  Ok(())
}
