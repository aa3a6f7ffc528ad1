//! Typed view over `StoreAppLicense.ExtendedJsonData`.
//!
//! The payload is treated as forward-compatible: unknown keys are ignored and
//! every field falls back to a default when it is missing or null.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AppLicense {
  #[serde(deserialize_with = "lenient_string")]
  pub product_id: String,
  #[serde(deserialize_with = "lenient_string")]
  pub sku_id: String,
  #[serde(deserialize_with = "lenient_string")]
  pub expiration: String,
  #[serde(deserialize_with = "lenient_bool")]
  pub is_active: bool,
  #[serde(deserialize_with = "lenient_bool")]
  pub is_trial: bool,
  #[serde(deserialize_with = "lenient_string")]
  pub trial_time_remaining: String,
  #[serde(deserialize_with = "lenient_string")]
  pub in_app_offer_token: String,
  #[serde(deserialize_with = "lenient_list")]
  pub add_on_licenses: Vec<AddOnLicense>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AddOnLicense {
  #[serde(deserialize_with = "lenient_string")]
  pub product_id: String,
  #[serde(deserialize_with = "lenient_string")]
  pub sku_id: String,
  #[serde(deserialize_with = "lenient_string")]
  pub expiration: String,
  #[serde(deserialize_with = "lenient_bool")]
  pub is_active: bool,
  #[serde(deserialize_with = "lenient_string")]
  pub in_app_offer_token: String,
}

impl AppLicense {
  pub fn from_json(json: &str) -> serde_json::Result<Self> {
    serde_json::from_str(json)
  }

  pub fn active_add_ons(&self) -> impl Iterator<Item = &AddOnLicense> {
    self.add_on_licenses.iter().filter(|add_on| add_on.is_active)
  }
}

/// Strings, numbers and booleans all become text; null and containers become
/// the empty string.
fn lenient_string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
  Ok(match Value::deserialize(deserializer)? {
    Value::String(text) => text,
    Value::Number(number) => number.to_string(),
    Value::Bool(flag) => flag.to_string(),
    _ => String::new(),
  })
}

fn lenient_bool<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
  Ok(match Value::deserialize(deserializer)? {
    Value::Bool(flag) => flag,
    Value::String(text) => text.eq_ignore_ascii_case("true"),
    _ => false,
  })
}

/// Entries that do not parse as add-ons are skipped.
fn lenient_list<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<AddOnLicense>, D::Error> {
  Ok(match Value::deserialize(deserializer)? {
    Value::Array(items) => items
      .into_iter()
      .filter_map(|item| serde_json::from_value(item).ok())
      .collect(),
    _ => Vec::new(),
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_full_payload() {
    let json = r#"{
      "productId": "9NBLGGH4R315",
      "skuId": "0010",
      "expiration": "9999-12-31T23:59:59Z",
      "isActive": true,
      "isTrial": false,
      "trialTimeRemaining": "P0D",
      "inAppOfferToken": "",
      "addOnLicenses": [
        { "productId": "9P1A", "skuId": "0010", "isActive": true, "inAppOfferToken": "premium" },
        { "productId": "9P1B", "skuId": "0010", "isActive": false, "inAppOfferToken": "themes" }
      ]
    }"#;

    let license = AppLicense::from_json(json).unwrap();

    assert_eq!(license.product_id, "9NBLGGH4R315");
    assert!(license.is_active);
    assert!(!license.is_trial);
    assert_eq!(license.add_on_licenses.len(), 2);
    let active: Vec<&str> = license.active_add_ons().map(|a| a.in_app_offer_token.as_str()).collect();
    assert_eq!(active, vec!["premium"]);
  }

  #[test]
  fn unknown_keys_are_ignored() {
    let json = r#"{"productId":"9NBLGGH4R315","futureField":{"nested":[1,2,3]},"isActive":true}"#;
    let license = AppLicense::from_json(json).unwrap();
    assert_eq!(license.product_id, "9NBLGGH4R315");
    assert!(license.is_active);
  }

  #[test]
  fn missing_fields_default() {
    assert_eq!(AppLicense::from_json("{}").unwrap(), AppLicense::default());
  }

  #[test]
  fn null_and_mistyped_fields_default() {
    let json = r#"{"productId":null,"isActive":"True","trialTimeRemaining":86400,"addOnLicenses":null}"#;
    let license = AppLicense::from_json(json).unwrap();
    assert_eq!(license.product_id, "");
    assert!(license.is_active);
    assert_eq!(license.trial_time_remaining, "86400");
    assert!(license.add_on_licenses.is_empty());
  }

  #[test]
  fn malformed_add_on_entries_are_skipped() {
    let json = r#"{"addOnLicenses":[42,{"productId":"9P1A","isActive":true}]}"#;
    let license = AppLicense::from_json(json).unwrap();
    assert_eq!(license.add_on_licenses.len(), 1);
    assert_eq!(license.add_on_licenses[0].product_id, "9P1A");
  }

  #[test]
  fn non_object_payload_is_an_error() {
    assert!(AppLicense::from_json("42").is_err());
    assert!(AppLicense::from_json("not json").is_err());
  }
}
