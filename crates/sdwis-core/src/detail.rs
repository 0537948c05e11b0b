//! System detail: one water system with everything that hangs off it, coded
//! fields decoded into labels.
//!
//! Decoded values sit next to the raw entity in explicit wrapper structs
//! rather than being merged into it, so it is always clear which fields came
//! from the extract and which from the reference table. In JSON the raw
//! fields are flattened alongside the `*Decoded` ones.

use serde::Serialize;

use crate::{
  Error, Result,
  entity::{EventMilestone, Facility, GeographicArea, LcrSample, SiteVisit, Violation},
  resolver::{
    AVAILABILITY_CODE, CONTAMINANT_CODE, EVALUATION_CODE, FACILITY_ACTIVITY_CODE,
    FACILITY_TYPE_CODE, OWNER_TYPE_CODE, PRIMARY_SOURCE_CODE, PWS_ACTIVITY_CODE,
    PWS_TYPE_CODE, RefCodeResolver, VIOLATION_CATEGORY_CODE, VIOLATION_CODE,
    VISIT_REASON_CODE, WATER_TYPE_CODE,
  },
  store::SdwisStore,
  system::WaterSystem,
};

// ─── Decoded wrappers ────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedSystem {
  #[serde(flatten)]
  pub system:                 WaterSystem,
  pub pws_type_decoded:       Option<String>,
  pub primary_source_decoded: Option<String>,
  pub owner_type_decoded:     Option<String>,
  pub activity_decoded:       Option<String>,
}

impl DecodedSystem {
  pub fn decode(system: WaterSystem, codes: &RefCodeResolver) -> Self {
    Self {
      pws_type_decoded:       codes.resolve(PWS_TYPE_CODE, system.pws_type_code.as_deref()),
      primary_source_decoded: codes
        .resolve(PRIMARY_SOURCE_CODE, system.primary_source_code.as_deref()),
      owner_type_decoded:     codes.resolve(OWNER_TYPE_CODE, system.owner_type_code.as_deref()),
      activity_decoded:       codes
        .resolve(PWS_ACTIVITY_CODE, system.pws_activity_code.as_deref()),
      system,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedViolation {
  #[serde(flatten)]
  pub violation:                  Violation,
  pub violation_code_decoded:     Option<String>,
  pub violation_category_decoded: Option<String>,
  pub contaminant_decoded:        Option<String>,
}

impl DecodedViolation {
  pub fn decode(violation: Violation, codes: &RefCodeResolver) -> Self {
    Self {
      violation_code_decoded:     codes
        .resolve(VIOLATION_CODE, violation.violation_code.as_deref()),
      violation_category_decoded: codes.resolve(
        VIOLATION_CATEGORY_CODE,
        violation.violation_category_code.as_deref(),
      ),
      contaminant_decoded:        codes
        .resolve(CONTAMINANT_CODE, violation.contaminant_code.as_deref()),
      violation,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedFacility {
  #[serde(flatten)]
  pub facility:              Facility,
  pub facility_type_decoded: Option<String>,
  pub water_type_decoded:    Option<String>,
  pub activity_decoded:      Option<String>,
  pub availability_decoded:  Option<String>,
}

impl DecodedFacility {
  pub fn decode(facility: Facility, codes: &RefCodeResolver) -> Self {
    Self {
      facility_type_decoded: codes
        .resolve(FACILITY_TYPE_CODE, facility.facility_type_code.as_deref()),
      water_type_decoded:    codes.resolve(WATER_TYPE_CODE, facility.water_type_code.as_deref()),
      activity_decoded:      codes
        .resolve(FACILITY_ACTIVITY_CODE, facility.facility_activity_code.as_deref()),
      availability_decoded:  codes
        .resolve(AVAILABILITY_CODE, facility.availability_code.as_deref()),
      facility,
    }
  }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedSiteVisit {
  #[serde(flatten)]
  pub visit:                       SiteVisit,
  pub visit_reason_decoded:        Option<String>,
  pub management_ops_eval_decoded: Option<String>,
  pub source_water_eval_decoded:   Option<String>,
  pub compliance_eval_decoded:     Option<String>,
  pub treatment_eval_decoded:      Option<String>,
}

impl DecodedSiteVisit {
  pub fn decode(visit: SiteVisit, codes: &RefCodeResolver) -> Self {
    let eval = |code: &Option<String>| codes.resolve(EVALUATION_CODE, code.as_deref());
    Self {
      visit_reason_decoded:        codes
        .resolve(VISIT_REASON_CODE, visit.visit_reason_code.as_deref()),
      management_ops_eval_decoded: eval(&visit.management_ops_eval_code),
      source_water_eval_decoded:   eval(&visit.source_water_eval_code),
      compliance_eval_decoded:     eval(&visit.compliance_eval_code),
      treatment_eval_decoded:      eval(&visit.treatment_eval_code),
      visit,
    }
  }
}

// ─── Composite ───────────────────────────────────────────────────────────────

/// Counts shown alongside the detail lists.
///
/// `total_*` are true totals. `recent_*` are the lengths of the capped lists
/// actually returned, i.e. how many rows the response holds, not how many
/// exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailSummary {
  pub total_violations: u64,
  pub total_facilities: usize,
  pub total_areas:      usize,
  pub recent_visits:    usize,
  pub recent_samples:   usize,
  pub recent_events:    usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemDetail {
  pub system:           DecodedSystem,
  pub violations:       Vec<DecodedViolation>,
  pub facilities:       Vec<DecodedFacility>,
  /// Raw codes only.
  pub geographic_areas: Vec<GeographicArea>,
  pub site_visits:      Vec<DecodedSiteVisit>,
  /// Raw codes only.
  pub lcr_samples:      Vec<LcrSample>,
  /// Raw codes only.
  pub events:           Vec<EventMilestone>,
  pub summary:          DetailSummary,
}

// ─── Operation ───────────────────────────────────────────────────────────────

/// Assemble the detail view for `pwsid`.
///
/// Fails with [`Error::SystemNotFound`] if there is no such system. Any store
/// failure aborts the whole assembly; partial details are never returned.
pub async fn system_detail<S: SdwisStore>(
  store: &S,
  codes: &RefCodeResolver,
  pwsid: &str,
) -> Result<SystemDetail, S::Error> {
  let system = store
    .get_system(pwsid)
    .await
    .map_err(Error::Store)?
    .ok_or_else(|| Error::SystemNotFound(pwsid.to_owned()))?;

  let violations = store.list_violations(pwsid).await.map_err(Error::Store)?;
  let total_violations = store.count_violations(pwsid).await.map_err(Error::Store)?;
  let facilities = store.list_facilities(pwsid).await.map_err(Error::Store)?;
  let geographic_areas = store
    .list_geographic_areas(pwsid)
    .await
    .map_err(Error::Store)?;
  let site_visits = store.list_site_visits(pwsid).await.map_err(Error::Store)?;
  let lcr_samples = store.list_lcr_samples(pwsid).await.map_err(Error::Store)?;
  let events = store.list_events(pwsid).await.map_err(Error::Store)?;

  let summary = DetailSummary {
    total_violations,
    total_facilities: facilities.len(),
    total_areas: geographic_areas.len(),
    recent_visits: site_visits.len(),
    recent_samples: lcr_samples.len(),
    recent_events: events.len(),
  };

  Ok(SystemDetail {
    system: DecodedSystem::decode(system, codes),
    violations: violations
      .into_iter()
      .map(|v| DecodedViolation::decode(v, codes))
      .collect(),
    facilities: facilities
      .into_iter()
      .map(|f| DecodedFacility::decode(f, codes))
      .collect(),
    geographic_areas,
    site_visits: site_visits
      .into_iter()
      .map(|v| DecodedSiteVisit::decode(v, codes))
      .collect(),
    lcr_samples,
    events,
    summary,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::entity::RefCodeValue;

  fn system(pws_type_code: Option<&str>) -> WaterSystem {
    WaterSystem {
      submission_year_quarter: "2025Q1".into(),
      pwsid:                   "GA0670000".into(),
      pws_name:                Some("Example Water Authority".into()),
      primacy_agency_code:     Some("GA".into()),
      epa_region:              Some("04".into()),
      season_begin_date:       None,
      season_end_date:         None,
      pws_activity_code:       Some("A".into()),
      pws_deactivation_date:   None,
      pws_type_code:           pws_type_code.map(Into::into),
      owner_type_code:         Some("L".into()),
      population_served_count: Some(1200),
      primary_source_code:     Some("SW".into()),
      org_name:                None,
      admin_name:              None,
      email_addr:              None,
      phone_number:            None,
      address_line1:           None,
      address_line2:           None,
      city_name:               Some("ATLANTA".into()),
      zip_code:                None,
      state_code:              Some("GA".into()),
      first_reported_date:     None,
      last_reported_date:      None,
    }
  }

  fn codes() -> RefCodeResolver {
    RefCodeResolver::from_rows([RefCodeValue {
      value_type:        PWS_TYPE_CODE.into(),
      value_code:        "CWS".into(),
      value_description: Some("Community Water System".into()),
    }])
  }

  #[test]
  fn decodes_known_system_type() {
    let decoded = DecodedSystem::decode(system(Some("CWS")), &codes());
    assert_eq!(decoded.pws_type_decoded.as_deref(), Some("Community Water System"));
    // Raw value is preserved next to the label.
    assert_eq!(decoded.system.pws_type_code.as_deref(), Some("CWS"));
  }

  #[test]
  fn unknown_system_type_decodes_to_raw_code() {
    let decoded = DecodedSystem::decode(system(Some("TNCWS")), &codes());
    assert_eq!(decoded.pws_type_decoded.as_deref(), Some("TNCWS"));
    assert_eq!(decoded.primary_source_decoded.as_deref(), Some("SW"));
  }

  #[test]
  fn missing_code_decodes_to_none() {
    let decoded = DecodedSystem::decode(system(None), &codes());
    assert_eq!(decoded.pws_type_decoded, None);
  }

  #[test]
  fn decoded_system_flattens_raw_fields_in_json() {
    let decoded = DecodedSystem::decode(system(Some("CWS")), &codes());
    let json = serde_json::to_value(&decoded).unwrap();

    assert_eq!(json["pwsid"], "GA0670000");
    assert_eq!(json["pwsTypeCode"], "CWS");
    assert_eq!(json["pwsTypeDecoded"], "Community Water System");
    assert_eq!(json["populationServedCount"], 1200);
    assert!(json["orgName"].is_null());
  }

  #[test]
  fn site_visit_evaluations_share_one_code_type() {
    let codes = RefCodeResolver::from_rows([RefCodeValue {
      value_type:        EVALUATION_CODE.into(),
      value_code:        "N".into(),
      value_description: Some("No deficiencies".into()),
    }]);
    let visit = SiteVisit {
      submission_year_quarter:  "2025Q1".into(),
      pwsid:                    "GA0670000".into(),
      visit_id:                 "V1".into(),
      visit_date:               None,
      agency_type_code:         None,
      visit_reason_code:        Some("SNSV".into()),
      management_ops_eval_code: Some("N".into()),
      source_water_eval_code:   None,
      compliance_eval_code:     Some("R".into()),
      treatment_eval_code:      Some("N".into()),
    };

    let decoded = DecodedSiteVisit::decode(visit, &codes);
    assert_eq!(decoded.visit_reason_decoded.as_deref(), Some("SNSV"));
    assert_eq!(decoded.management_ops_eval_decoded.as_deref(), Some("No deficiencies"));
    assert_eq!(decoded.source_water_eval_decoded, None);
    assert_eq!(decoded.compliance_eval_decoded.as_deref(), Some("R"));
    assert_eq!(decoded.treatment_eval_decoded.as_deref(), Some("No deficiencies"));
  }
}
