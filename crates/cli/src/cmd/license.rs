use anyhow::{Context, Result};

use crate::host;
use crate::license::AppLicense;
use crate::output::{OutputFormat, or_dash, print_info, print_json, print_stat};

pub fn cmd_license(raw: bool, output: OutputFormat) -> Result<()> {
  let json = host::license_json().context("Failed to read the app license")?;

  if raw {
    println!("{}", json);
    return Ok(());
  }

  let license = AppLicense::from_json(&json).context("License JSON is malformed")?;

  if output.is_json() {
    return print_json(&license);
  }

  print_info("App license");
  print_stat("Product", or_dash(&license.product_id));
  print_stat("SKU", or_dash(&license.sku_id));
  print_stat("Active", &license.is_active.to_string());
  print_stat("Trial", &license.is_trial.to_string());
  if license.is_trial {
    print_stat("Trial remaining", or_dash(&license.trial_time_remaining));
  }
  print_stat("Expires", or_dash(&license.expiration));

  if license.add_on_licenses.is_empty() {
    return Ok(());
  }

  println!();
  print_info(&format!(
    "Add-ons ({} active of {})",
    license.active_add_ons().count(),
    license.add_on_licenses.len()
  ));
  for add_on in &license.add_on_licenses {
    let state = if add_on.is_active { "active" } else { "inactive" };
    print_stat(or_dash(&add_on.in_app_offer_token), &format!("{} ({})", or_dash(&add_on.product_id), state));
  }

  Ok(())
}
