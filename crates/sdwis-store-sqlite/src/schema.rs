//! SQL schema for the SDWIS SQLite store.
//!
//! Mirrors the upstream extract's tables one-to-one. Executed once at
//! connection startup; the serving path never writes.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
/// Dates are ISO-8601 `TEXT` (`YYYY-MM-DD`).
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS water_systems (
    submission_year_quarter TEXT NOT NULL,
    pwsid                   TEXT NOT NULL PRIMARY KEY,
    pws_name                TEXT,
    primacy_agency_code     TEXT,
    epa_region              TEXT,
    season_begin_date       TEXT,   -- 'MM-DD', not a full date
    season_end_date         TEXT,
    pws_activity_code       TEXT,   -- 'A' = active
    pws_deactivation_date   TEXT,
    pws_type_code           TEXT,
    owner_type_code         TEXT,
    population_served_count INTEGER,
    primary_source_code     TEXT,
    org_name                TEXT,
    admin_name              TEXT,
    email_addr              TEXT,
    phone_number            TEXT,
    address_line1           TEXT,
    address_line2           TEXT,
    city_name               TEXT,
    zip_code                TEXT,
    state_code              TEXT,
    first_reported_date     TEXT,
    last_reported_date      TEXT
);

CREATE TABLE IF NOT EXISTS violations (
    submission_year_quarter     TEXT NOT NULL,
    pwsid                       TEXT NOT NULL,
    violation_id                TEXT NOT NULL,
    violation_code              TEXT,
    violation_category_code     TEXT,
    contaminant_code            TEXT,
    non_compl_period_begin_date TEXT,
    non_compl_period_end_date   TEXT,   -- NULL while ongoing
    violation_explanation       TEXT,
    violation_measure           REAL,
    unit_of_measure             TEXT,
    mcl                         REAL,
    mclg                        REAL,
    first_reported_date         TEXT,
    last_reported_date          TEXT,
    PRIMARY KEY (pwsid, violation_id)
);

CREATE TABLE IF NOT EXISTS facilities (
    submission_year_quarter TEXT NOT NULL,
    pwsid                   TEXT NOT NULL,
    facility_id             TEXT NOT NULL,
    facility_name           TEXT,
    facility_type_code      TEXT,
    facility_activity_code  TEXT,
    water_type_code         TEXT,
    availability_code       TEXT,
    first_reported_date     TEXT,
    last_reported_date      TEXT,
    PRIMARY KEY (pwsid, facility_id)
);

CREATE TABLE IF NOT EXISTS geographic_areas (
    submission_year_quarter TEXT NOT NULL,
    pwsid                   TEXT NOT NULL,
    geo_id                  TEXT NOT NULL,
    area_type_code          TEXT,
    state_served            TEXT,
    zip_code_served         TEXT,
    city_served             TEXT,
    county_served           TEXT,
    last_reported_date      TEXT,
    PRIMARY KEY (pwsid, geo_id)
);

CREATE TABLE IF NOT EXISTS site_visits (
    submission_year_quarter  TEXT NOT NULL,
    pwsid                    TEXT NOT NULL,
    visit_id                 TEXT NOT NULL,
    visit_date               TEXT,
    agency_type_code         TEXT,
    visit_reason_code        TEXT,
    management_ops_eval_code TEXT,
    source_water_eval_code   TEXT,
    compliance_eval_code     TEXT,
    treatment_eval_code      TEXT,
    PRIMARY KEY (pwsid, visit_id)
);

CREATE TABLE IF NOT EXISTS lcr_samples (
    submission_year_quarter TEXT NOT NULL,
    pwsid                   TEXT NOT NULL,
    sample_id               TEXT NOT NULL,
    sar_id                  INTEGER,
    sampling_start_date     TEXT,
    sampling_end_date       TEXT,
    contaminant_code        TEXT,
    result_sign_code        TEXT,
    sample_measure          REAL,
    unit_of_measure         TEXT,
    PRIMARY KEY (pwsid, sample_id)
);

CREATE TABLE IF NOT EXISTS events_milestones (
    submission_year_quarter TEXT NOT NULL,
    pwsid                   TEXT NOT NULL,
    event_schedule_id       TEXT NOT NULL,
    event_end_date          TEXT,
    event_actual_date       TEXT,
    event_comments_text     TEXT,
    event_milestone_code    TEXT,
    event_reason_code       TEXT,
    first_reported_date     TEXT,
    last_reported_date      TEXT,
    PRIMARY KEY (pwsid, event_schedule_id)
);

-- Global lookup; not owned by any system.
CREATE TABLE IF NOT EXISTS ref_code_values (
    value_type        TEXT NOT NULL,
    value_code        TEXT NOT NULL,
    value_description TEXT,
    PRIMARY KEY (value_type, value_code)
);

CREATE INDEX IF NOT EXISTS water_systems_name_idx  ON water_systems(pws_name);
CREATE INDEX IF NOT EXISTS water_systems_city_idx  ON water_systems(city_name);
CREATE INDEX IF NOT EXISTS water_systems_state_idx ON water_systems(state_code);
CREATE INDEX IF NOT EXISTS geographic_areas_county_idx ON geographic_areas(county_served);
CREATE INDEX IF NOT EXISTS site_visits_date_idx    ON site_visits(pwsid, visit_date);

PRAGMA user_version = 1;
";

/// Full-date columns per table. `season_*_date` holds `MM-DD` and is not
/// listed.
pub const DATE_COLUMNS: &[(&str, &[&str])] = &[
  ("water_systems", &[
    "pws_deactivation_date",
    "first_reported_date",
    "last_reported_date",
  ]),
  ("violations", &[
    "non_compl_period_begin_date",
    "non_compl_period_end_date",
    "first_reported_date",
    "last_reported_date",
  ]),
  ("facilities", &["first_reported_date", "last_reported_date"]),
  ("geographic_areas", &["last_reported_date"]),
  ("site_visits", &["visit_date"]),
  ("lcr_samples", &["sampling_start_date", "sampling_end_date"]),
  ("events_milestones", &[
    "event_end_date",
    "event_actual_date",
    "first_reported_date",
    "last_reported_date",
  ]),
];
