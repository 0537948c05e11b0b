//! System search: optional filters, pagination, and the filter pickers that
//! go with them.
//!
//! Text filters are case-insensitive substring matches. Every search is
//! implicitly restricted to active systems; no filter can lift that.

use serde::Serialize;

use crate::{
  Error, Result,
  entity::RefCodeValue,
  resolver::{PRIMARY_SOURCE_CODE, PWS_TYPE_CODE},
  store::SdwisStore,
  system::WaterSystem,
};

pub const DEFAULT_LIMIT: usize = 50;
pub const MAX_LIMIT: usize = 200;

// ─── Query ───────────────────────────────────────────────────────────────────

/// Normalised search parameters.
///
/// Blank filters are stored as `None` ("no constraint") and limit/offset are
/// always within bounds, so backends can use the fields as they are.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemQuery {
  /// Substring of the system name, PWSID, or organisation name.
  pub text:        Option<String>,
  /// Substring of the city name.
  pub city:        Option<String>,
  /// Exact `pws_type_code`.
  pub system_type: Option<String>,
  /// Exact `primary_source_code`.
  pub source_type: Option<String>,
  pub limit:       usize,
  pub offset:      usize,
}

impl Default for SystemQuery {
  fn default() -> Self {
    Self {
      text:        None,
      city:        None,
      system_type: None,
      source_type: None,
      limit:       DEFAULT_LIMIT,
      offset:      0,
    }
  }
}

impl SystemQuery {
  pub fn text(mut self, text: impl Into<String>) -> Self {
    self.text = non_blank(Some(text.into()));
    self
  }

  pub fn city(mut self, city: impl Into<String>) -> Self {
    self.city = non_blank(Some(city.into()));
    self
  }

  pub fn system_type(mut self, code: impl Into<String>) -> Self {
    self.system_type = non_blank(Some(code.into()));
    self
  }

  pub fn source_type(mut self, code: impl Into<String>) -> Self {
    self.source_type = non_blank(Some(code.into()));
    self
  }

  /// Set the page size, clamped to `1..=MAX_LIMIT`.
  pub fn limit(mut self, limit: usize) -> Self {
    self.limit = limit.clamp(1, MAX_LIMIT);
    self
  }

  pub fn offset(mut self, offset: usize) -> Self {
    self.offset = offset;
    self
  }

  /// Build a query from untrusted request parameters.
  ///
  /// Malformed pagination is corrected rather than rejected: a limit or
  /// offset that is not an integer falls back to its default, a negative
  /// offset becomes zero, and the limit is clamped to `1..=MAX_LIMIT`.
  pub fn from_params(
    text:        Option<String>,
    city:        Option<String>,
    system_type: Option<String>,
    source_type: Option<String>,
    limit:       Option<&str>,
    offset:      Option<&str>,
  ) -> Self {
    let limit = parse_int(limit).unwrap_or(DEFAULT_LIMIT as i64);
    let offset = parse_int(offset).unwrap_or(0).max(0);

    Self {
      text:        non_blank(text),
      city:        non_blank(city),
      system_type: non_blank(system_type),
      source_type: non_blank(source_type),
      limit:       limit.clamp(1, MAX_LIMIT as i64) as usize,
      offset:      usize::try_from(offset).unwrap_or(usize::MAX),
    }
  }
}

fn non_blank(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.trim().is_empty())
}

fn parse_int(raw: Option<&str>) -> Option<i64> {
  raw.and_then(|s| s.trim().parse::<i64>().ok())
}

// ─── Response ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
  pub total:    u64,
  pub limit:    usize,
  pub offset:   usize,
  pub has_more: bool,
}

impl Pagination {
  pub fn new(total: u64, limit: usize, offset: usize) -> Self {
    let has_more = (offset as u64).saturating_add(limit as u64) < total;
    Self { total, limit, offset, has_more }
  }
}

/// Reference rows for rendering the type/source pickers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
  pub system_types: Vec<RefCodeValue>,
  pub source_types: Vec<RefCodeValue>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
  pub results:    Vec<WaterSystem>,
  pub pagination: Pagination,
  pub filters:    FilterOptions,
}

// ─── Operation ───────────────────────────────────────────────────────────────

/// Run `query` and attach the filter picker options.
pub async fn search<S: SdwisStore>(
  store: &S,
  query: &SystemQuery,
) -> Result<SearchResponse, S::Error> {
  let page = store.search_systems(query).await.map_err(Error::Store)?;

  let system_types = store
    .list_ref_codes(Some(PWS_TYPE_CODE))
    .await
    .map_err(Error::Store)?;
  let source_types = store
    .list_ref_codes(Some(PRIMARY_SOURCE_CODE))
    .await
    .map_err(Error::Store)?;

  Ok(SearchResponse {
    pagination: Pagination::new(page.total, query.limit, query.offset),
    results:    page.rows,
    filters:    FilterOptions { system_types, source_types },
  })
}
