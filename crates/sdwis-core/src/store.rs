//! The `SdwisStore` trait and supporting query/result types.
//!
//! The trait is implemented by storage backends (e.g. `sdwis-store-sqlite`).
//! The search, county and detail operations in this crate, and the HTTP
//! layer above them, depend on this abstraction, not on any concrete backend.

use std::future::Future;

use crate::{
  entity::{
    EventMilestone, Facility, GeographicArea, LcrSample, RefCodeValue, SiteVisit,
    Violation,
  },
  search::SystemQuery,
  system::WaterSystem,
};

// ─── Per-list caps ───────────────────────────────────────────────────────────

// Hard truncations that bound response size for systems with long histories.
// They are not pagination: there is no way to ask for the rows past the cap.

pub const VIOLATION_CAP: usize = 100;
pub const SITE_VISIT_CAP: usize = 20;
pub const LCR_SAMPLE_CAP: usize = 50;
pub const EVENT_CAP: usize = 20;

// ─── Result types ────────────────────────────────────────────────────────────

/// One page of [`SdwisStore::search_systems`] results.
#[derive(Debug, Clone, Default)]
pub struct SystemPage {
  pub rows:  Vec<WaterSystem>,
  /// Number of rows matching the predicates, ignoring limit and offset.
  pub total: u64,
}

/// Per-county system totals, before violations are merged in.
///
/// Each system is counted once per county it serves, however many service
/// area rows it has there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountySystems {
  pub county:           String,
  pub system_count:     u64,
  pub total_population: i64,
}

/// Number of violation rows attributed to a county.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CountyViolations {
  pub county:          String,
  pub violation_count: u64,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Read-only access to a loaded SDWIS extract.
///
/// Nothing on this trait writes. Dependent-entity lookups for a `pwsid` that
/// has no rows (or no water system at all) return an empty list.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait SdwisStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Systems ───────────────────────────────────────────────────────────

  /// Retrieve a water system by PWSID. Returns `None` if not found.
  fn get_system<'a>(
    &'a self,
    pwsid: &'a str,
  ) -> impl Future<Output = Result<Option<WaterSystem>, Self::Error>> + Send + 'a;

  /// Run a filtered, sorted, paginated search over active systems.
  ///
  /// Rows are ordered by `pws_name` then `pwsid`. The query's limit and
  /// offset are taken as given; [`SystemQuery`] clamps them on construction.
  fn search_systems<'a>(
    &'a self,
    query: &'a SystemQuery,
  ) -> impl Future<Output = Result<SystemPage, Self::Error>> + Send + 'a;

  // ── Dependent entities ────────────────────────────────────────────────

  /// Up to [`VIOLATION_CAP`] violations, newest non-compliance period first.
  fn list_violations<'a>(
    &'a self,
    pwsid: &'a str,
  ) -> impl Future<Output = Result<Vec<Violation>, Self::Error>> + Send + 'a;

  /// Total number of violations for a system, unaffected by the cap.
  fn count_violations<'a>(
    &'a self,
    pwsid: &'a str,
  ) -> impl Future<Output = Result<u64, Self::Error>> + Send + 'a;

  /// All facilities, ordered by name.
  fn list_facilities<'a>(
    &'a self,
    pwsid: &'a str,
  ) -> impl Future<Output = Result<Vec<Facility>, Self::Error>> + Send + 'a;

  /// All service areas, ordered by `geo_id`.
  fn list_geographic_areas<'a>(
    &'a self,
    pwsid: &'a str,
  ) -> impl Future<Output = Result<Vec<GeographicArea>, Self::Error>> + Send + 'a;

  /// Up to [`SITE_VISIT_CAP`] visits, most recent first.
  fn list_site_visits<'a>(
    &'a self,
    pwsid: &'a str,
  ) -> impl Future<Output = Result<Vec<SiteVisit>, Self::Error>> + Send + 'a;

  /// Up to [`LCR_SAMPLE_CAP`] samples, latest sampling end date first.
  fn list_lcr_samples<'a>(
    &'a self,
    pwsid: &'a str,
  ) -> impl Future<Output = Result<Vec<LcrSample>, Self::Error>> + Send + 'a;

  /// Up to [`EVENT_CAP`] events, latest actual date first.
  fn list_events<'a>(
    &'a self,
    pwsid: &'a str,
  ) -> impl Future<Output = Result<Vec<EventMilestone>, Self::Error>> + Send + 'a;

  // ── Reference codes ───────────────────────────────────────────────────

  /// Reference rows ordered by type then code, optionally restricted to a
  /// single `value_type`.
  fn list_ref_codes<'a>(
    &'a self,
    value_type: Option<&'a str>,
  ) -> impl Future<Output = Result<Vec<RefCodeValue>, Self::Error>> + Send + 'a;

  // ── County rollups ────────────────────────────────────────────────────

  /// Distinct active systems and their summed population per county served,
  /// restricted to systems whose `state_code` is `state`. Areas with no
  /// county are skipped.
  fn county_systems<'a>(
    &'a self,
    state: &'a str,
  ) -> impl Future<Output = Result<Vec<CountySystems>, Self::Error>> + Send + 'a;

  /// Violation rows per county over the same system set as
  /// [`county_systems`](Self::county_systems). Counties without violations
  /// may be absent.
  fn county_violations<'a>(
    &'a self,
    state: &'a str,
  ) -> impl Future<Output = Result<Vec<CountyViolations>, Self::Error>> + Send + 'a;
}
