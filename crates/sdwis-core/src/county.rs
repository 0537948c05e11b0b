//! County rollup: systems, population and violations per county served,
//! plus the top-N rankings derived from them.
//!
//! The backend supplies the two grouped aggregates
//! ([`SdwisStore::county_systems`] and [`SdwisStore::county_violations`]);
//! merging, ranking and the statewide summary happen here so the summary is
//! always computed from exactly the rows in the per-county list.

use std::collections::HashMap;

use serde::Serialize;

use crate::{
  Error, Result,
  store::{CountySystems, CountyViolations, SdwisStore},
};

/// Length of each ranking list.
pub const TOP_N: usize = 10;

// ─── Types ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountyStat {
  pub county:           String,
  pub system_count:     u64,
  pub total_population: i64,
  pub violation_count:  u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountySummary {
  pub total_counties:   usize,
  pub total_systems:    u64,
  pub total_population: i64,
  pub total_violations: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCounties {
  pub by_population: Vec<CountyStat>,
  pub by_violations: Vec<CountyStat>,
  pub by_systems:    Vec<CountyStat>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountyReport {
  pub counties:     Vec<CountyStat>,
  pub summary:      CountySummary,
  pub top_counties: TopCounties,
}

// ─── Merge & rank ────────────────────────────────────────────────────────────

/// Join the two aggregates on county name, ordered by county.
///
/// Only counties with at least one system appear. A county with no violation
/// entry gets `violation_count = 0`.
pub fn merge(
  systems:    Vec<CountySystems>,
  violations: Vec<CountyViolations>,
) -> Vec<CountyStat> {
  let violations: HashMap<String, u64> = violations
    .into_iter()
    .map(|v| (v.county, v.violation_count))
    .collect();

  let mut counties: Vec<CountyStat> = systems
    .into_iter()
    .map(|s| CountyStat {
      violation_count:  violations.get(&s.county).copied().unwrap_or(0),
      county:           s.county,
      system_count:     s.system_count,
      total_population: s.total_population,
    })
    .collect();

  counties.sort_by(|a, b| a.county.cmp(&b.county));
  counties
}

/// Top [`TOP_N`] counties by `metric`, descending, ties broken by county
/// name ascending.
fn top_by<K: Ord>(counties: &[CountyStat], metric: impl Fn(&CountyStat) -> K) -> Vec<CountyStat> {
  let mut ranked = counties.to_vec();
  ranked.sort_by(|a, b| {
    metric(b)
      .cmp(&metric(a))
      .then_with(|| a.county.cmp(&b.county))
  });
  ranked.truncate(TOP_N);
  ranked
}

pub fn rank(counties: &[CountyStat]) -> TopCounties {
  let with_violations: Vec<CountyStat> = counties
    .iter()
    .filter(|c| c.violation_count > 0)
    .cloned()
    .collect();

  TopCounties {
    by_population: top_by(counties, |c| c.total_population),
    by_violations: top_by(&with_violations, |c| c.violation_count),
    by_systems:    top_by(counties, |c| c.system_count),
  }
}

pub fn summarize(counties: &[CountyStat]) -> CountySummary {
  CountySummary {
    total_counties:   counties.len(),
    total_systems:    counties.iter().map(|c| c.system_count).sum(),
    total_population: counties.iter().map(|c| c.total_population).sum(),
    total_violations: counties.iter().map(|c| c.violation_count).sum(),
  }
}

// ─── Operation ───────────────────────────────────────────────────────────────

/// Build the full county report for systems registered in `state`.
pub async fn aggregate_by_county<S: SdwisStore>(
  store: &S,
  state: &str,
) -> Result<CountyReport, S::Error> {
  let systems = store.county_systems(state).await.map_err(Error::Store)?;
  let violations = store.county_violations(state).await.map_err(Error::Store)?;

  let counties = merge(systems, violations);
  Ok(CountyReport {
    summary:      summarize(&counties),
    top_counties: rank(&counties),
    counties,
  })
}
