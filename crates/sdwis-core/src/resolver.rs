//! Reference code resolver. Turns coded fields into human-readable labels.
//!
//! The reference table is small and static, so the whole thing is read once
//! into a two-level map (`value_type → value_code → description`) and never
//! invalidated. Build it with [`RefCodeResolver::load`] at startup (or lazily
//! on first use) and pass it to whoever needs to decode.

use std::collections::HashMap;

use crate::{Error, Result, entity::RefCodeValue, store::SdwisStore};

// ─── Code types ──────────────────────────────────────────────────────────────

pub const PWS_TYPE_CODE: &str = "PWS_TYPE_CODE";
pub const PRIMARY_SOURCE_CODE: &str = "PRIMARY_SOURCE_CODE";
pub const OWNER_TYPE_CODE: &str = "OWNER_TYPE_CODE";
pub const PWS_ACTIVITY_CODE: &str = "PWS_ACTIVITY_CODE";
pub const VIOLATION_CODE: &str = "VIOLATION_CODE";
pub const VIOLATION_CATEGORY_CODE: &str = "VIOLATION_CATEGORY_CODE";
pub const CONTAMINANT_CODE: &str = "CONTAMINANT_CODE";
pub const FACILITY_TYPE_CODE: &str = "FACILITY_TYPE_CODE";
pub const FACILITY_ACTIVITY_CODE: &str = "FACILITY_ACTIVITY_CODE";
pub const WATER_TYPE_CODE: &str = "WATER_TYPE_CODE";
pub const AVAILABILITY_CODE: &str = "AVAILABILITY_CODE";
pub const VISIT_REASON_CODE: &str = "VISIT_REASON_CODE";
/// Shared by all four site-visit evaluation columns.
pub const EVALUATION_CODE: &str = "EVALUATION_CODE";

// ─── Resolver ────────────────────────────────────────────────────────────────

/// Immutable code → label lookup.
#[derive(Debug, Clone, Default)]
pub struct RefCodeResolver {
  by_type: HashMap<String, HashMap<String, String>>,
}

impl RefCodeResolver {
  /// Build a resolver from reference rows. Rows without a description are
  /// skipped; they would resolve to the raw code anyway.
  pub fn from_rows(rows: impl IntoIterator<Item = RefCodeValue>) -> Self {
    let mut by_type: HashMap<String, HashMap<String, String>> = HashMap::new();
    for row in rows {
      let Some(description) = row.value_description.filter(|d| !d.is_empty())
      else {
        continue;
      };
      by_type
        .entry(row.value_type)
        .or_default()
        .insert(row.value_code, description);
    }
    Self { by_type }
  }

  /// Read the full reference table from `store`.
  pub async fn load<S: SdwisStore>(store: &S) -> Result<Self, S::Error> {
    let rows = store.list_ref_codes(None).await.map_err(Error::Store)?;
    Ok(Self::from_rows(rows))
  }

  /// Decode `code` as a value of `code_type`.
  ///
  /// Returns `None` for a missing or empty code. A code with no matching
  /// reference row comes back unchanged, so callers always have something
  /// to show.
  pub fn resolve(&self, code_type: &str, code: Option<&str>) -> Option<String> {
    let code = code.filter(|c| !c.is_empty())?;
    let label = self
      .by_type
      .get(code_type)
      .and_then(|codes| codes.get(code))
      .map_or(code, String::as_str);
    Some(label.to_owned())
  }

  /// Number of code types loaded.
  pub fn type_count(&self) -> usize { self.by_type.len() }
}
