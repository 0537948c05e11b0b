//! Dependent entities (records owned by a single water system) and the
//! global reference-code table.
//!
//! All of these are loaded once from the upstream extract and never mutated.
//! Dependent keys are unique within their `pwsid`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ─── Violations ──────────────────────────────────────────────────────────────

/// A violation. A `None` end date means the non-compliance is ongoing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
  pub submission_year_quarter:     String,
  pub pwsid:                       String,
  pub violation_id:                String,
  pub violation_code:              Option<String>,
  pub violation_category_code:     Option<String>,
  pub contaminant_code:            Option<String>,
  pub non_compl_period_begin_date: Option<NaiveDate>,
  pub non_compl_period_end_date:   Option<NaiveDate>,
  pub violation_explanation:       Option<String>,
  pub violation_measure:           Option<f64>,
  pub unit_of_measure:             Option<String>,
  pub mcl:                         Option<f64>,
  pub mclg:                        Option<f64>,
  pub first_reported_date:         Option<NaiveDate>,
  pub last_reported_date:          Option<NaiveDate>,
}

// ─── Facilities ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Facility {
  pub submission_year_quarter: String,
  pub pwsid:                   String,
  pub facility_id:             String,
  pub facility_name:           Option<String>,
  pub facility_type_code:      Option<String>,
  pub facility_activity_code:  Option<String>,
  pub water_type_code:         Option<String>,
  pub availability_code:       Option<String>,
  pub first_reported_date:     Option<NaiveDate>,
  pub last_reported_date:      Option<NaiveDate>,
}

// ─── Service areas ───────────────────────────────────────────────────────────

/// A geographic area served by a system. `county_served` drives the county
/// rollup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeographicArea {
  pub submission_year_quarter: String,
  pub pwsid:                   String,
  pub geo_id:                  String,
  pub area_type_code:          Option<String>,
  pub state_served:            Option<String>,
  pub zip_code_served:         Option<String>,
  pub city_served:             Option<String>,
  pub county_served:           Option<String>,
  pub last_reported_date:      Option<NaiveDate>,
}

// ─── Inspections ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteVisit {
  pub submission_year_quarter:  String,
  pub pwsid:                    String,
  pub visit_id:                 String,
  pub visit_date:               Option<NaiveDate>,
  pub agency_type_code:         Option<String>,
  pub visit_reason_code:        Option<String>,
  pub management_ops_eval_code: Option<String>,
  pub source_water_eval_code:   Option<String>,
  pub compliance_eval_code:     Option<String>,
  pub treatment_eval_code:      Option<String>,
}

// ─── Samples ─────────────────────────────────────────────────────────────────

/// A Lead and Copper Rule sample result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LcrSample {
  pub submission_year_quarter: String,
  pub pwsid:                   String,
  pub sample_id:               String,
  pub sar_id:                  Option<i64>,
  pub sampling_start_date:     Option<NaiveDate>,
  pub sampling_end_date:       Option<NaiveDate>,
  pub contaminant_code:        Option<String>,
  pub result_sign_code:        Option<String>,
  pub sample_measure:          Option<f64>,
  pub unit_of_measure:         Option<String>,
}

// ─── Events ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventMilestone {
  pub submission_year_quarter: String,
  pub pwsid:                   String,
  pub event_schedule_id:       String,
  pub event_end_date:          Option<NaiveDate>,
  pub event_actual_date:       Option<NaiveDate>,
  pub event_comments_text:     Option<String>,
  pub event_milestone_code:    Option<String>,
  pub event_reason_code:       Option<String>,
  pub first_reported_date:     Option<NaiveDate>,
  pub last_reported_date:      Option<NaiveDate>,
}

// ─── Reference codes ─────────────────────────────────────────────────────────

/// One row of the global code → label lookup table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefCodeValue {
  pub value_type:        String,
  pub value_code:        String,
  pub value_description: Option<String>,
}
