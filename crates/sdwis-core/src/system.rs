//! The water system, the root entity every other SDWIS record hangs off.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// `pws_activity_code` value marking a system as currently active.
pub const ACTIVE: &str = "A";

/// A public water system, keyed by its PWSID.
///
/// Every coded field is the raw upstream code; labels come from
/// [`RefCodeResolver`](crate::resolver::RefCodeResolver).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaterSystem {
  pub submission_year_quarter: String,
  pub pwsid:                   String,
  pub pws_name:                Option<String>,
  pub primacy_agency_code:     Option<String>,
  pub epa_region:              Option<String>,
  pub season_begin_date:       Option<String>,
  pub season_end_date:         Option<String>,
  pub pws_activity_code:       Option<String>,
  pub pws_deactivation_date:   Option<NaiveDate>,
  pub pws_type_code:           Option<String>,
  pub owner_type_code:         Option<String>,
  pub population_served_count: Option<i64>,
  pub primary_source_code:     Option<String>,
  pub org_name:                Option<String>,
  pub admin_name:              Option<String>,
  pub email_addr:              Option<String>,
  pub phone_number:            Option<String>,
  pub address_line1:           Option<String>,
  pub address_line2:           Option<String>,
  pub city_name:               Option<String>,
  pub zip_code:                Option<String>,
  pub state_code:              Option<String>,
  pub first_reported_date:     Option<NaiveDate>,
  pub last_reported_date:      Option<NaiveDate>,
}

impl WaterSystem {
  pub fn is_active(&self) -> bool {
    self.pws_activity_code.as_deref() == Some(ACTIVE)
  }
}
