//! Integration tests for `SqliteStore` against an in-memory database.

use sdwis_core::{
  county::aggregate_by_county,
  detail::system_detail,
  resolver::RefCodeResolver,
  search::{SystemQuery, search},
  store::{LCR_SAMPLE_CAP, SITE_VISIT_CAP, SdwisStore, VIOLATION_CAP},
};

use crate::SqliteStore;

/// A small Georgia extract:
///
/// - Fulton is served by three active GA systems (populations 300, 200, 100).
///   Only `GA0000002` has violations (two). `GA0000001` has two service-area
///   rows in Fulton and also serves DeKalb.
/// - Fulton is also served by an inactive system and an Alabama system, both
///   with violations that must not count.
/// - `GA0000007` (Pike, unknown population) has 120 violations, one of them
///   undated.
/// - `GA0000002` has 25 site visits and a handful of samples/events.
const FIXTURE: &str = "
INSERT INTO ref_code_values (value_type, value_code, value_description) VALUES
  ('PWS_TYPE_CODE',       'CWS',    'Community Water System'),
  ('PWS_TYPE_CODE',       'NTNCWS', 'Non-Transient Non-Community Water System'),
  ('PRIMARY_SOURCE_CODE', 'GW',     'Ground water'),
  ('PRIMARY_SOURCE_CODE', 'SW',     'Surface water'),
  ('OWNER_TYPE_CODE',     'L',      'Local government'),
  ('VIOLATION_CODE',      '03',     'Monitoring, Regular'),
  ('CONTAMINANT_CODE',    '1040',   'Nitrate'),
  ('FACILITY_TYPE_CODE',  'WL',     'Well'),
  ('WATER_TYPE_CODE',     'GW',     'Ground water'),
  ('VISIT_REASON_CODE',   'SNSV',   'Sanitary Survey');

INSERT INTO water_systems (
  submission_year_quarter, pwsid, pws_name, pws_activity_code, pws_type_code,
  owner_type_code, population_served_count, primary_source_code, org_name,
  city_name, state_code, first_reported_date
) VALUES
  ('2025Q1', 'GA0000001', 'ATLANTA WATERSHED',       'A', 'CWS',    'L', 300,  'SW', 'City of Atlanta', 'ATLANTA',     'GA', '1985-01-01'),
  ('2025Q1', 'GA0000002', 'BUCKHEAD UTILITIES',      'A', 'CWS',    'P', 200,  'GW', 'Fulton County',   'ATLANTA',     'GA', NULL),
  ('2025Q1', 'GA0000003', 'EAST POINT WATER',        'A', 'NTNCWS', 'L', 100,  'GW', NULL,              'EAST POINT',  'GA', ''),
  ('2025Q1', 'GA0000004', 'COBB COUNTY WATER',       'A', 'CWS',    'L', 1000, 'SW', 'Cobb County',     'MARIETTA',    'GA', NULL),
  ('2025Q1', 'GA0000005', 'OLD MILL WATER',          'I', 'CWS',    'P', 50,   'GW', 'Old Mill LLC',    'ATLANTA',     'GA', NULL),
  ('2025Q1', 'AL0000006', 'ALABAMA RIVER WATER',     'A', 'CWS',    'L', 5000, 'SW', NULL,              'PHENIX CITY', 'AL', NULL),
  ('2025Q1', 'GA0000007', 'Zebulon 100% Pure_Water', 'A', 'CWS',    'P', NULL, 'GW', NULL,              'ZEBULON',     'GA', NULL);

INSERT INTO geographic_areas (submission_year_quarter, pwsid, geo_id, county_served) VALUES
  ('2025Q1', 'GA0000001', 'G1', 'Fulton'),
  ('2025Q1', 'GA0000001', 'G2', 'Fulton'),
  ('2025Q1', 'GA0000001', 'G3', 'DeKalb'),
  ('2025Q1', 'GA0000002', 'G1', 'Fulton'),
  ('2025Q1', 'GA0000003', 'G1', 'Fulton'),
  ('2025Q1', 'GA0000004', 'G1', 'Cobb'),
  ('2025Q1', 'GA0000004', 'G2', NULL),
  ('2025Q1', 'GA0000005', 'G1', 'Fulton'),
  ('2025Q1', 'AL0000006', 'G1', 'Fulton'),
  ('2025Q1', 'GA0000007', 'G1', 'Pike'),
  ('2025Q1', 'GA9999999', 'G1', 'Fulton');

INSERT INTO violations (
  submission_year_quarter, pwsid, violation_id, violation_code,
  violation_category_code, contaminant_code, non_compl_period_begin_date,
  non_compl_period_end_date
) VALUES
  ('2025Q1', 'GA0000002', 'V1', '03', 'MR',  '1040', NULL,         NULL),
  ('2025Q1', 'GA0000002', 'V2', '02', 'MCL', '9999', '2024-06-01', NULL),
  ('2025Q1', 'GA0000005', 'V1', '03', 'MR',  '1040', '2020-01-01', '2020-03-31'),
  ('2025Q1', 'AL0000006', 'V1', '03', 'MR',  '1040', '2021-01-01', NULL),
  ('2025Q1', 'GA9999999', 'V1', '03', 'MR',  '1040', '2021-01-01', NULL);

WITH RECURSIVE seq(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM seq WHERE n < 119)
INSERT INTO violations (submission_year_quarter, pwsid, violation_id, non_compl_period_begin_date)
SELECT '2025Q1', 'GA0000007', printf('P%03d', n), date('2000-01-01', '+' || n || ' days')
FROM seq;

INSERT INTO violations (submission_year_quarter, pwsid, violation_id, non_compl_period_begin_date)
VALUES ('2025Q1', 'GA0000007', 'P999', NULL);

INSERT INTO facilities (
  submission_year_quarter, pwsid, facility_id, facility_name,
  facility_type_code, water_type_code
) VALUES
  ('2025Q1', 'GA0000002', 'F2', 'Well #2', 'WL', 'GW'),
  ('2025Q1', 'GA0000002', 'F1', 'Well #1', 'WL', 'GW'),
  ('2025Q1', 'GA0000002', 'F3', NULL,      'TP', 'SW');

WITH RECURSIVE seq(n) AS (SELECT 1 UNION ALL SELECT n + 1 FROM seq WHERE n < 25)
INSERT INTO site_visits (submission_year_quarter, pwsid, visit_id, visit_date, visit_reason_code)
SELECT '2025Q1', 'GA0000002', printf('S%02d', n), date('2010-01-01', '+' || n || ' months'), 'SNSV'
FROM seq;

INSERT INTO lcr_samples (
  submission_year_quarter, pwsid, sample_id, sampling_start_date,
  sampling_end_date, contaminant_code, sample_measure, unit_of_measure
) VALUES
  ('2025Q1', 'GA0000002', 'L1', '2022-06-01', '2022-09-30', 'PB90', 0.002, 'mg/L'),
  ('2025Q1', 'GA0000002', 'L2', '2023-06-01', '2023-09-30', 'PB90', 0.004, 'mg/L'),
  ('2025Q1', 'GA0000002', 'L3', '2021-06-01', NULL,         'CU90', 0.1,   'mg/L');

INSERT INTO events_milestones (
  submission_year_quarter, pwsid, event_schedule_id, event_actual_date,
  event_milestone_code, event_comments_text
) VALUES
  ('2025Q1', 'GA0000002', 'E1', NULL,         'LCRSMP', 'pending'),
  ('2025Q1', 'GA0000002', 'E2', '2023-10-15', 'LCRSMP', 'completed');
";

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn seeded() -> SqliteStore {
  let s = store().await;
  s.import_sql(FIXTURE).await.expect("fixture import");
  s
}

fn pwsids(systems: &[sdwis_core::system::WaterSystem]) -> Vec<&str> {
  systems.iter().map(|s| s.pwsid.as_str()).collect()
}

// ─── Systems ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn get_system_decodes_columns() {
  let s = seeded().await;

  let system = s.get_system("GA0000001").await.unwrap().unwrap();
  assert_eq!(system.pws_name.as_deref(), Some("ATLANTA WATERSHED"));
  assert_eq!(system.population_served_count, Some(300));
  assert_eq!(
    system.first_reported_date,
    chrono::NaiveDate::from_ymd_opt(1985, 1, 1)
  );
  assert!(system.is_active());
}

#[tokio::test]
async fn get_system_treats_empty_date_as_null() {
  let s = seeded().await;
  let system = s.get_system("GA0000003").await.unwrap().unwrap();
  assert_eq!(system.first_reported_date, None);
  assert_eq!(system.org_name, None);
}

#[tokio::test]
async fn get_system_missing_returns_none() {
  let s = seeded().await;
  assert!(s.get_system("GA0000000").await.unwrap().is_none());
}

#[tokio::test]
async fn unparseable_date_does_not_hide_the_system() {
  let s = store().await;
  s.import_sql(
    "INSERT INTO water_systems (
       submission_year_quarter, pwsid, pws_name, pws_activity_code, last_reported_date
     ) VALUES
       ('2025Q1', 'GA0000001', 'ALPHA', 'A', 'N/A'),
       ('2025Q1', 'GA0000002', 'BETA',  'A', '2024-03-31');",
  )
  .await
  .unwrap();

  let page = s.search_systems(&SystemQuery::default()).await.unwrap();
  assert_eq!(pwsids(&page.rows), ["GA0000001", "GA0000002"]);
  assert_eq!(page.rows[0].last_reported_date, None);
  assert_eq!(
    page.rows[1].last_reported_date,
    chrono::NaiveDate::from_ymd_opt(2024, 3, 31)
  );

  let system = s.get_system("GA0000001").await.unwrap().unwrap();
  assert_eq!(system.last_reported_date, None);
}

#[tokio::test]
async fn import_rewrites_dates_to_iso() {
  let s = store().await;
  s.import_sql(
    "INSERT INTO water_systems (
       submission_year_quarter, pwsid, first_reported_date, last_reported_date
     ) VALUES ('2025Q1', 'GA0000001', '7/4/1999', '2024-01-02T00:00:00');",
  )
  .await
  .unwrap();

  let system = s.get_system("GA0000001").await.unwrap().unwrap();
  assert_eq!(system.first_reported_date, chrono::NaiveDate::from_ymd_opt(1999, 7, 4));
  assert_eq!(system.last_reported_date, chrono::NaiveDate::from_ymd_opt(2024, 1, 2));
}

#[tokio::test]
async fn failed_import_keeps_nothing() {
  let s = store().await;
  let result = s
    .import_sql(
      "INSERT INTO water_systems (submission_year_quarter, pwsid) VALUES ('2025Q1', 'GA0000001');
       INSERT INTO no_such_table VALUES (1);",
    )
    .await;

  assert!(result.is_err());
  assert!(s.get_system("GA0000001").await.unwrap().is_none());
}

// ─── Search ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn search_without_filters_returns_active_systems_by_name() {
  let s = seeded().await;
  let page = s.search_systems(&SystemQuery::default()).await.unwrap();

  assert_eq!(page.total, 6);
  assert_eq!(pwsids(&page.rows), [
    "AL0000006",
    "GA0000001",
    "GA0000002",
    "GA0000004",
    "GA0000003",
    "GA0000007",
  ]);
  assert!(page.rows.iter().all(|r| r.is_active()));
}

#[tokio::test]
async fn text_search_is_case_insensitive_substring() {
  let s = seeded().await;

  let page = s
    .search_systems(&SystemQuery::default().text("atlanta"))
    .await
    .unwrap();
  // Name and org both match GA0000001; the inactive Atlanta system is hidden.
  assert_eq!(pwsids(&page.rows), ["GA0000001"]);

  let page = s
    .search_systems(&SystemQuery::default().text("county"))
    .await
    .unwrap();
  assert_eq!(pwsids(&page.rows), ["GA0000002", "GA0000004"]);
}

#[tokio::test]
async fn text_search_matches_pwsid() {
  let s = seeded().await;
  let page = s
    .search_systems(&SystemQuery::default().text("ga000000"))
    .await
    .unwrap();
  assert_eq!(page.total, 5);
  assert!(page.rows.iter().all(|r| r.pwsid.starts_with("GA")));
}

#[tokio::test]
async fn like_wildcards_in_text_match_literally() {
  let s = seeded().await;

  for text in ["%", "_", "100%", "Pure_W"] {
    let page = s
      .search_systems(&SystemQuery::default().text(text))
      .await
      .unwrap();
    assert_eq!(pwsids(&page.rows), ["GA0000007"], "text {text:?}");
  }
}

#[tokio::test]
async fn filters_are_and_composed() {
  let s = seeded().await;

  let page = s
    .search_systems(&SystemQuery::default().city("atl"))
    .await
    .unwrap();
  assert_eq!(pwsids(&page.rows), ["GA0000001", "GA0000002"]);

  let page = s
    .search_systems(&SystemQuery::default().city("atl").source_type("GW"))
    .await
    .unwrap();
  assert_eq!(pwsids(&page.rows), ["GA0000002"]);

  let page = s
    .search_systems(&SystemQuery::default().system_type("NTNCWS"))
    .await
    .unwrap();
  assert_eq!(pwsids(&page.rows), ["GA0000003"]);

  let page = s
    .search_systems(&SystemQuery::default().system_type("NTNCWS").text("atlanta"))
    .await
    .unwrap();
  assert!(page.rows.is_empty());
  assert_eq!(page.total, 0);
}

#[tokio::test]
async fn every_row_satisfies_every_predicate() {
  let s = seeded().await;
  let queries = [
    SystemQuery::default().source_type("SW"),
    SystemQuery::default().system_type("CWS").city("a"),
    SystemQuery::default().text("water").source_type("GW"),
    SystemQuery::default().text("w").city("t").system_type("CWS").source_type("SW"),
  ];

  for query in &queries {
    let page = s.search_systems(query).await.unwrap();
    assert_eq!(page.total as usize, page.rows.len(), "{query:?}");
    for row in &page.rows {
      assert!(row.is_active());
      if let Some(t) = &query.system_type {
        assert_eq!(row.pws_type_code.as_ref(), Some(t));
      }
      if let Some(src) = &query.source_type {
        assert_eq!(row.primary_source_code.as_ref(), Some(src));
      }
      if let Some(city) = &query.city {
        let name = row.city_name.as_deref().unwrap_or_default().to_lowercase();
        assert!(name.contains(&city.to_lowercase()), "{row:?}");
      }
      if let Some(text) = &query.text {
        let text = text.to_lowercase();
        let hit = [row.pws_name.as_deref(), Some(row.pwsid.as_str()), row.org_name.as_deref()]
          .into_iter()
          .flatten()
          .any(|f| f.to_lowercase().contains(&text));
        assert!(hit, "{row:?}");
      }
    }
  }
}

#[tokio::test]
async fn pagination_total_ignores_limit_and_offset() {
  let s = seeded().await;

  let first = s
    .search_systems(&SystemQuery::default().limit(2))
    .await
    .unwrap();
  assert_eq!(first.total, 6);
  assert_eq!(pwsids(&first.rows), ["AL0000006", "GA0000001"]);

  let last = s
    .search_systems(&SystemQuery::default().limit(2).offset(4))
    .await
    .unwrap();
  assert_eq!(last.total, 6);
  assert_eq!(pwsids(&last.rows), ["GA0000003", "GA0000007"]);

  let past_end = s
    .search_systems(&SystemQuery::default().limit(2).offset(6))
    .await
    .unwrap();
  assert_eq!(past_end.total, 6);
  assert!(past_end.rows.is_empty());
}

#[tokio::test]
async fn search_response_reports_has_more_and_filter_options() {
  let s = seeded().await;

  let response = search(&s, &SystemQuery::default().limit(5)).await.unwrap();
  assert_eq!(response.results.len(), 5);
  assert_eq!(response.pagination.total, 6);
  assert!(response.pagination.has_more);

  let codes: Vec<_> = response
    .filters
    .system_types
    .iter()
    .map(|r| r.value_code.as_str())
    .collect();
  assert_eq!(codes, ["CWS", "NTNCWS"]);
  assert_eq!(response.filters.source_types.len(), 2);

  let response = search(&s, &SystemQuery::default().limit(5).offset(1))
    .await
    .unwrap();
  assert!(!response.pagination.has_more);
}

// ─── Dependent entities ──────────────────────────────────────────────────────

#[tokio::test]
async fn violations_are_newest_first_with_undated_last() {
  let s = seeded().await;
  let violations = s.list_violations("GA0000002").await.unwrap();

  let ids: Vec<_> = violations.iter().map(|v| v.violation_id.as_str()).collect();
  assert_eq!(ids, ["V2", "V1"]);
  assert_eq!(violations[0].non_compl_period_end_date, None);
}

#[tokio::test]
async fn mixed_date_formats_sort_chronologically() {
  let s = store().await;
  s.import_sql(
    "INSERT INTO water_systems (submission_year_quarter, pwsid, pws_activity_code)
       VALUES ('2025Q1', 'GA0000001', 'A');
     INSERT INTO violations (
       submission_year_quarter, pwsid, violation_id, non_compl_period_begin_date
     ) VALUES
       ('2025Q1', 'GA0000001', 'OLD',   '12/31/2020'),
       ('2025Q1', 'GA0000001', 'NEW',   '01/05/2023'),
       ('2025Q1', 'GA0000001', 'ISO',   '2022-06-01'),
       ('2025Q1', 'GA0000001', 'JUNK',  'pending'),
       ('2025Q1', 'GA0000001', 'BLANK', '');
     INSERT INTO site_visits (submission_year_quarter, pwsid, visit_id, visit_date)
     VALUES
       ('2025Q1', 'GA0000001', 'S1', '2021-03-01 08:00:00'),
       ('2025Q1', 'GA0000001', 'S2', '3/2/2021');",
  )
  .await
  .unwrap();

  let violations = s.list_violations("GA0000001").await.unwrap();
  let ids: Vec<_> = violations.iter().map(|v| v.violation_id.as_str()).collect();
  assert_eq!(ids, ["NEW", "ISO", "OLD", "BLANK", "JUNK"]);
  assert_eq!(
    violations[0].non_compl_period_begin_date,
    chrono::NaiveDate::from_ymd_opt(2023, 1, 5)
  );
  assert!(violations[3..].iter().all(|v| v.non_compl_period_begin_date.is_none()));

  let visits = s.list_site_visits("GA0000001").await.unwrap();
  let ids: Vec<_> = visits.iter().map(|v| v.visit_id.as_str()).collect();
  assert_eq!(ids, ["S2", "S1"]);
}

#[tokio::test]
async fn violations_are_capped_but_counted_in_full() {
  let s = seeded().await;

  let violations = s.list_violations("GA0000007").await.unwrap();
  assert_eq!(violations.len(), VIOLATION_CAP);
  assert_eq!(violations[0].violation_id, "P119");
  assert!(violations.iter().all(|v| v.non_compl_period_begin_date.is_some()));
  assert!(
    violations
      .windows(2)
      .all(|w| w[0].non_compl_period_begin_date >= w[1].non_compl_period_begin_date)
  );

  assert_eq!(s.count_violations("GA0000007").await.unwrap(), 120);
}

#[tokio::test]
async fn facilities_are_ordered_by_name_with_unnamed_last() {
  let s = seeded().await;
  let facilities = s.list_facilities("GA0000002").await.unwrap();
  let ids: Vec<_> = facilities.iter().map(|f| f.facility_id.as_str()).collect();
  assert_eq!(ids, ["F1", "F2", "F3"]);
}

#[tokio::test]
async fn site_visits_are_capped_and_most_recent_first() {
  let s = seeded().await;
  let visits = s.list_site_visits("GA0000002").await.unwrap();

  assert_eq!(visits.len(), SITE_VISIT_CAP);
  assert_eq!(visits[0].visit_id, "S25");
  assert_eq!(visits.last().unwrap().visit_id, "S06");
}

#[tokio::test]
async fn samples_and_events_put_undated_rows_last() {
  let s = seeded().await;

  let samples = s.list_lcr_samples("GA0000002").await.unwrap();
  assert!(samples.len() <= LCR_SAMPLE_CAP);
  let ids: Vec<_> = samples.iter().map(|x| x.sample_id.as_str()).collect();
  assert_eq!(ids, ["L2", "L1", "L3"]);

  let events = s.list_events("GA0000002").await.unwrap();
  let ids: Vec<_> = events.iter().map(|e| e.event_schedule_id.as_str()).collect();
  assert_eq!(ids, ["E2", "E1"]);
}

#[tokio::test]
async fn dangling_pwsid_lookups_do_not_fail() {
  let s = seeded().await;

  // Rows exist for a system that does not.
  assert_eq!(s.list_violations("GA9999999").await.unwrap().len(), 1);
  assert_eq!(s.list_geographic_areas("GA9999999").await.unwrap().len(), 1);
  // Nothing exists at all.
  assert!(s.list_facilities("XX0000000").await.unwrap().is_empty());
  assert_eq!(s.count_violations("XX0000000").await.unwrap(), 0);
}

#[tokio::test]
async fn ref_codes_filter_by_type() {
  let s = seeded().await;

  let all = s.list_ref_codes(None).await.unwrap();
  assert_eq!(all.len(), 10);

  let sources = s.list_ref_codes(Some("PRIMARY_SOURCE_CODE")).await.unwrap();
  let codes: Vec<_> = sources.iter().map(|r| r.value_code.as_str()).collect();
  assert_eq!(codes, ["GW", "SW"]);

  assert!(s.list_ref_codes(Some("NOPE")).await.unwrap().is_empty());
}

// ─── County rollup ───────────────────────────────────────────────────────────

#[tokio::test]
async fn county_report_matches_fixture() {
  let s = seeded().await;
  let report = aggregate_by_county(&s, "GA").await.unwrap();

  let rows: Vec<_> = report
    .counties
    .iter()
    .map(|c| (c.county.as_str(), c.system_count, c.total_population, c.violation_count))
    .collect();
  assert_eq!(rows, [
    ("Cobb", 1, 1000, 0),
    ("DeKalb", 1, 300, 0),
    ("Fulton", 3, 600, 2),
    ("Pike", 1, 0, 120),
  ]);

  assert_eq!(report.summary.total_counties, 4);
  assert_eq!(report.summary.total_systems, 6);
  assert_eq!(report.summary.total_population, 1900);
  assert_eq!(report.summary.total_violations, 122);
}

#[tokio::test]
async fn county_rankings_follow_metrics() {
  let s = seeded().await;
  let top = aggregate_by_county(&s, "GA").await.unwrap().top_counties;

  fn names(list: &[sdwis_core::county::CountyStat]) -> Vec<&str> {
    list.iter().map(|c| c.county.as_str()).collect()
  }
  assert_eq!(names(&top.by_population), ["Cobb", "Fulton", "DeKalb", "Pike"]);
  assert_eq!(names(&top.by_violations), ["Pike", "Fulton"]);
  assert_eq!(names(&top.by_systems), ["Fulton", "Cobb", "DeKalb", "Pike"]);
}

#[tokio::test]
async fn county_report_is_scoped_to_state() {
  let s = seeded().await;
  let report = aggregate_by_county(&s, "AL").await.unwrap();

  assert_eq!(report.counties.len(), 1);
  let fulton = &report.counties[0];
  assert_eq!(fulton.county, "Fulton");
  assert_eq!(fulton.system_count, 1);
  assert_eq!(fulton.total_population, 5000);
  assert_eq!(fulton.violation_count, 1);
}

#[tokio::test]
async fn county_report_on_empty_store_is_empty() {
  let s = store().await;
  let report = aggregate_by_county(&s, "GA").await.unwrap();
  assert!(report.counties.is_empty());
  assert_eq!(report.summary.total_systems, 0);
  assert!(report.top_counties.by_violations.is_empty());
}

// ─── System detail ───────────────────────────────────────────────────────────

#[tokio::test]
async fn detail_decodes_and_summarises() {
  let s = seeded().await;
  let codes = RefCodeResolver::load(&s).await.unwrap();
  let detail = system_detail(&s, &codes, "GA0000002").await.unwrap();

  assert_eq!(
    detail.system.pws_type_decoded.as_deref(),
    Some("Community Water System")
  );
  assert_eq!(detail.system.primary_source_decoded.as_deref(), Some("Ground water"));
  // No reference row for owner type 'P'.
  assert_eq!(detail.system.owner_type_decoded.as_deref(), Some("P"));

  let v1 = detail
    .violations
    .iter()
    .find(|v| v.violation.violation_id == "V1")
    .unwrap();
  assert_eq!(v1.violation_code_decoded.as_deref(), Some("Monitoring, Regular"));
  assert_eq!(v1.contaminant_decoded.as_deref(), Some("Nitrate"));

  assert_eq!(detail.facilities[0].facility_type_decoded.as_deref(), Some("Well"));
  assert_eq!(detail.facilities[2].facility_type_decoded.as_deref(), Some("TP"));
  assert_eq!(
    detail.site_visits[0].visit_reason_decoded.as_deref(),
    Some("Sanitary Survey")
  );

  assert_eq!(detail.summary.total_violations, 2);
  assert_eq!(detail.summary.total_facilities, 3);
  assert_eq!(detail.summary.total_areas, 1);
  assert_eq!(detail.summary.recent_visits, SITE_VISIT_CAP);
  assert_eq!(detail.summary.recent_samples, 3);
  assert_eq!(detail.summary.recent_events, 2);
}

#[tokio::test]
async fn detail_total_violations_is_not_capped() {
  let s = seeded().await;
  let codes = RefCodeResolver::load(&s).await.unwrap();
  let detail = system_detail(&s, &codes, "GA0000007").await.unwrap();

  assert_eq!(detail.violations.len(), VIOLATION_CAP);
  assert_eq!(detail.summary.total_violations, 120);
}

#[tokio::test]
async fn detail_for_unknown_system_is_not_found() {
  let s = seeded().await;
  let codes = RefCodeResolver::load(&s).await.unwrap();

  let err = system_detail(&s, &codes, "nonexistent-id").await.unwrap_err();
  assert!(matches!(err, sdwis_core::Error::SystemNotFound(ref id) if id == "nonexistent-id"));

  // Dependent rows without a system are still not a detail.
  let err = system_detail(&s, &codes, "GA9999999").await.unwrap_err();
  assert!(matches!(err, sdwis_core::Error::SystemNotFound(_)));
}
