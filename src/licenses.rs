//! License key membership check. Runs before any provider call so that
//! unauthorized traffic never spends model quota.

use std::collections::HashSet;

/// Fixed set of authorized keys, built once at startup.
#[derive(Clone, Debug)]
pub struct LicenseKeySet {
  keys: HashSet<String>,
}

impl LicenseKeySet {
  pub fn new(keys: impl IntoIterator<Item = String>) -> Self {
    Self { keys: keys.into_iter().collect() }
  }

  /// Empty keys are never authorized.
  pub fn is_authorized(&self, key: &str) -> bool {
    !key.is_empty() && self.keys.contains(key)
  }
}
