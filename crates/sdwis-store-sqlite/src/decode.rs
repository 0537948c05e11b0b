//! Decoding helpers between SQLite rows and `sdwis-core` entity types.
//!
//! Column lists are kept next to the function that reads them so positional
//! indices stay in sync. Dates are stored as ISO-8601 text, rewritten to that
//! form by [`SqliteStore::import_sql`](crate::SqliteStore::import_sql); an
//! empty string is treated the same as `NULL`.

use chrono::NaiveDate;
use rusqlite::Row;
use sdwis_core::{
  entity::{
    EventMilestone, Facility, GeographicArea, LcrSample, RefCodeValue, SiteVisit,
    Violation,
  },
  system::WaterSystem,
};

// ─── Dates ───────────────────────────────────────────────────────────────────

/// Storage format for every date column.
pub const ISO_DATE: &str = "%Y-%m-%d";

/// Every entity table selects `pwsid` second.
const PWSID: usize = 1;

/// Parse a date as it arrives in an extract. Accepts `YYYY-MM-DD` (a trailing
/// time component is dropped) and the `MM/DD/YYYY` form some extracts use.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
  let head = s.get(..10).unwrap_or(s);
  NaiveDate::parse_from_str(head, ISO_DATE)
    .ok()
    .or_else(|| NaiveDate::parse_from_str(s, "%m/%d/%Y").ok())
}

/// Read a stored date. Text that is not an ISO date decodes to `None` and is
/// logged; one bad cell never fails the row.
fn date(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<NaiveDate>> {
  let raw: Option<String> = row.get(idx)?;
  let Some(raw) = raw.as_deref().map(str::trim).filter(|s| !s.is_empty()) else {
    return Ok(None);
  };

  let parsed = NaiveDate::parse_from_str(raw, ISO_DATE).ok();
  if parsed.is_none() {
    let pwsid: Option<String> = row.get(PWSID).ok().flatten();
    tracing::warn!(
      pwsid = pwsid.as_deref(),
      column = idx,
      value = raw,
      "ignoring unreadable date"
    );
  }
  Ok(parsed)
}

// ─── Water systems ───────────────────────────────────────────────────────────

pub const WATER_SYSTEM_COLUMNS: &str = "
  submission_year_quarter, pwsid, pws_name, primacy_agency_code, epa_region,
  season_begin_date, season_end_date, pws_activity_code, pws_deactivation_date,
  pws_type_code, owner_type_code, population_served_count, primary_source_code,
  org_name, admin_name, email_addr, phone_number, address_line1, address_line2,
  city_name, zip_code, state_code, first_reported_date, last_reported_date";

pub fn water_system(row: &Row<'_>) -> rusqlite::Result<WaterSystem> {
  Ok(WaterSystem {
    submission_year_quarter: row.get(0)?,
    pwsid:                   row.get(1)?,
    pws_name:                row.get(2)?,
    primacy_agency_code:     row.get(3)?,
    epa_region:              row.get(4)?,
    season_begin_date:       row.get(5)?,
    season_end_date:         row.get(6)?,
    pws_activity_code:       row.get(7)?,
    pws_deactivation_date:   date(row, 8)?,
    pws_type_code:           row.get(9)?,
    owner_type_code:         row.get(10)?,
    population_served_count: row.get(11)?,
    primary_source_code:     row.get(12)?,
    org_name:                row.get(13)?,
    admin_name:              row.get(14)?,
    email_addr:              row.get(15)?,
    phone_number:            row.get(16)?,
    address_line1:           row.get(17)?,
    address_line2:           row.get(18)?,
    city_name:               row.get(19)?,
    zip_code:                row.get(20)?,
    state_code:              row.get(21)?,
    first_reported_date:     date(row, 22)?,
    last_reported_date:      date(row, 23)?,
  })
}

// ─── Violations ──────────────────────────────────────────────────────────────

pub const VIOLATION_COLUMNS: &str = "
  submission_year_quarter, pwsid, violation_id, violation_code,
  violation_category_code, contaminant_code, non_compl_period_begin_date,
  non_compl_period_end_date, violation_explanation, violation_measure,
  unit_of_measure, mcl, mclg, first_reported_date, last_reported_date";

pub fn violation(row: &Row<'_>) -> rusqlite::Result<Violation> {
  Ok(Violation {
    submission_year_quarter:     row.get(0)?,
    pwsid:                       row.get(1)?,
    violation_id:                row.get(2)?,
    violation_code:              row.get(3)?,
    violation_category_code:     row.get(4)?,
    contaminant_code:            row.get(5)?,
    non_compl_period_begin_date: date(row, 6)?,
    non_compl_period_end_date:   date(row, 7)?,
    violation_explanation:       row.get(8)?,
    violation_measure:           row.get(9)?,
    unit_of_measure:             row.get(10)?,
    mcl:                         row.get(11)?,
    mclg:                        row.get(12)?,
    first_reported_date:         date(row, 13)?,
    last_reported_date:          date(row, 14)?,
  })
}

// ─── Facilities ──────────────────────────────────────────────────────────────

pub const FACILITY_COLUMNS: &str = "
  submission_year_quarter, pwsid, facility_id, facility_name,
  facility_type_code, facility_activity_code, water_type_code,
  availability_code, first_reported_date, last_reported_date";

pub fn facility(row: &Row<'_>) -> rusqlite::Result<Facility> {
  Ok(Facility {
    submission_year_quarter: row.get(0)?,
    pwsid:                   row.get(1)?,
    facility_id:             row.get(2)?,
    facility_name:           row.get(3)?,
    facility_type_code:      row.get(4)?,
    facility_activity_code:  row.get(5)?,
    water_type_code:         row.get(6)?,
    availability_code:       row.get(7)?,
    first_reported_date:     date(row, 8)?,
    last_reported_date:      date(row, 9)?,
  })
}

// ─── Geographic areas ────────────────────────────────────────────────────────

pub const GEOGRAPHIC_AREA_COLUMNS: &str = "
  submission_year_quarter, pwsid, geo_id, area_type_code, state_served,
  zip_code_served, city_served, county_served, last_reported_date";

pub fn geographic_area(row: &Row<'_>) -> rusqlite::Result<GeographicArea> {
  Ok(GeographicArea {
    submission_year_quarter: row.get(0)?,
    pwsid:                   row.get(1)?,
    geo_id:                  row.get(2)?,
    area_type_code:          row.get(3)?,
    state_served:            row.get(4)?,
    zip_code_served:         row.get(5)?,
    city_served:             row.get(6)?,
    county_served:           row.get(7)?,
    last_reported_date:      date(row, 8)?,
  })
}

// ─── Site visits ─────────────────────────────────────────────────────────────

pub const SITE_VISIT_COLUMNS: &str = "
  submission_year_quarter, pwsid, visit_id, visit_date, agency_type_code,
  visit_reason_code, management_ops_eval_code, source_water_eval_code,
  compliance_eval_code, treatment_eval_code";

pub fn site_visit(row: &Row<'_>) -> rusqlite::Result<SiteVisit> {
  Ok(SiteVisit {
    submission_year_quarter:  row.get(0)?,
    pwsid:                    row.get(1)?,
    visit_id:                 row.get(2)?,
    visit_date:               date(row, 3)?,
    agency_type_code:         row.get(4)?,
    visit_reason_code:        row.get(5)?,
    management_ops_eval_code: row.get(6)?,
    source_water_eval_code:   row.get(7)?,
    compliance_eval_code:     row.get(8)?,
    treatment_eval_code:      row.get(9)?,
  })
}

// ─── LCR samples ─────────────────────────────────────────────────────────────

pub const LCR_SAMPLE_COLUMNS: &str = "
  submission_year_quarter, pwsid, sample_id, sar_id, sampling_start_date,
  sampling_end_date, contaminant_code, result_sign_code, sample_measure,
  unit_of_measure";

pub fn lcr_sample(row: &Row<'_>) -> rusqlite::Result<LcrSample> {
  Ok(LcrSample {
    submission_year_quarter: row.get(0)?,
    pwsid:                   row.get(1)?,
    sample_id:               row.get(2)?,
    sar_id:                  row.get(3)?,
    sampling_start_date:     date(row, 4)?,
    sampling_end_date:       date(row, 5)?,
    contaminant_code:        row.get(6)?,
    result_sign_code:        row.get(7)?,
    sample_measure:          row.get(8)?,
    unit_of_measure:         row.get(9)?,
  })
}

// ─── Events ──────────────────────────────────────────────────────────────────

pub const EVENT_COLUMNS: &str = "
  submission_year_quarter, pwsid, event_schedule_id, event_end_date,
  event_actual_date, event_comments_text, event_milestone_code,
  event_reason_code, first_reported_date, last_reported_date";

pub fn event(row: &Row<'_>) -> rusqlite::Result<EventMilestone> {
  Ok(EventMilestone {
    submission_year_quarter: row.get(0)?,
    pwsid:                   row.get(1)?,
    event_schedule_id:       row.get(2)?,
    event_end_date:          date(row, 3)?,
    event_actual_date:       date(row, 4)?,
    event_comments_text:     row.get(5)?,
    event_milestone_code:    row.get(6)?,
    event_reason_code:       row.get(7)?,
    first_reported_date:     date(row, 8)?,
    last_reported_date:      date(row, 9)?,
  })
}

// ─── Reference codes ─────────────────────────────────────────────────────────

pub fn ref_code(row: &Row<'_>) -> rusqlite::Result<RefCodeValue> {
  Ok(RefCodeValue {
    value_type:        row.get(0)?,
    value_code:        row.get(1)?,
    value_description: row.get(2)?,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_iso_dates() {
    assert_eq!(parse_date("2023-04-01"), NaiveDate::from_ymd_opt(2023, 4, 1));
  }

  #[test]
  fn drops_time_component() {
    assert_eq!(
      parse_date("2023-04-01T00:00:00"),
      NaiveDate::from_ymd_opt(2023, 4, 1)
    );
    assert_eq!(
      parse_date("2023-04-01 12:30:00"),
      NaiveDate::from_ymd_opt(2023, 4, 1)
    );
  }

  #[test]
  fn parses_us_dates() {
    assert_eq!(parse_date("12/31/2020"), NaiveDate::from_ymd_opt(2020, 12, 31));
    assert_eq!(parse_date("1/5/2020"), NaiveDate::from_ymd_opt(2020, 1, 5));
  }

  fn read_date(value: &str) -> Option<NaiveDate> {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    conn
      .query_row("SELECT '2025Q1', 'GA0000001', ?1", [value], |row| date(row, 2))
      .unwrap()
  }

  #[test]
  fn stored_dates_read_as_iso_only() {
    assert_eq!(read_date("2023-04-01"), NaiveDate::from_ymd_opt(2023, 4, 1));
    assert_eq!(read_date(" "), None);
    assert_eq!(read_date("N/A"), None);
    assert_eq!(read_date("12/31/2020"), None);
  }

  #[test]
  fn rejects_garbage() {
    assert_eq!(parse_date("soon"), None);
    assert_eq!(parse_date("2023-13-01"), None);
  }
}
