//! [`SqliteStore`], the SQLite implementation of [`SdwisStore`].

use std::path::Path;

use rusqlite::{OptionalExtension as _, Row, types::Value};
use sdwis_core::{
  entity::{
    EventMilestone, Facility, GeographicArea, LcrSample, RefCodeValue, SiteVisit,
    Violation,
  },
  search::SystemQuery,
  store::{
    CountySystems, CountyViolations, EVENT_CAP, LCR_SAMPLE_CAP, SITE_VISIT_CAP,
    SdwisStore, SystemPage, VIOLATION_CAP,
  },
  system::{ACTIVE, WaterSystem},
};

use crate::{
  Error, Result,
  decode::{
    self, EVENT_COLUMNS, FACILITY_COLUMNS, GEOGRAPHIC_AREA_COLUMNS, ISO_DATE,
    LCR_SAMPLE_COLUMNS, SITE_VISIT_COLUMNS, VIOLATION_COLUMNS, WATER_SYSTEM_COLUMNS,
  },
  schema::{DATE_COLUMNS, SCHEMA},
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// An SDWIS extract backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Load a SQL dump of the extract (`INSERT` statements against the tables
  /// in [`SCHEMA`]) in a single transaction.
  ///
  /// This is the one-time bulk load. Dates are rewritten to `YYYY-MM-DD`
  /// before commit so every date column sorts chronologically. If any
  /// statement fails nothing from the dump is kept.
  pub async fn import_sql(&self, dump: impl Into<String>) -> Result<()> {
    let dump = dump.into();
    tracing::info!(bytes = dump.len(), "importing SQL dump");

    let (rewritten, cleared) = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute_batch(&dump)?;
        let counts = normalize_dates(&tx)?;
        tx.commit()?;
        Ok(counts)
      })
      .await?;

    tracing::info!(rewritten, cleared, "normalised imported dates");
    Ok(())
  }

  /// Run `sql` with `pwsid` bound to `?1` and decode every row with `map`.
  async fn rows_for_system<T>(
    &self,
    sql:   String,
    pwsid: &str,
    map:   fn(&Row<'_>) -> rusqlite::Result<T>,
  ) -> Result<Vec<T>>
  where
    T: Send + 'static,
  {
    let pwsid = pwsid.to_owned();

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![pwsid], map)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows)
  }
}

/// Rewrite every date cell that is not already `YYYY-MM-DD`. Text that is
/// not a date at all, blanks included, becomes `NULL`. Returns the number of
/// cells rewritten and cleared.
fn normalize_dates(tx: &rusqlite::Transaction<'_>) -> rusqlite::Result<(usize, usize)> {
  let mut rewritten = 0;
  let mut cleared = 0;

  for &(table, columns) in DATE_COLUMNS {
    for &column in columns {
      let pending: Vec<(i64, String)> = {
        let mut stmt = tx.prepare(&format!(
          "SELECT rowid, CAST({column} AS TEXT) FROM {table}
           WHERE {column} IS NOT NULL
             AND NOT (length({column}) = 10
                      AND {column} GLOB '[0-9][0-9][0-9][0-9]-[0-9][0-9]-[0-9][0-9]')"
        ))?;
        stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<_>>()?
      };

      let mut update =
        tx.prepare(&format!("UPDATE {table} SET {column} = ?1 WHERE rowid = ?2"))?;
      for (rowid, raw) in pending {
        let raw = raw.trim();
        let iso = decode::parse_date(raw).map(|d| d.format(ISO_DATE).to_string());
        match &iso {
          Some(_) => rewritten += 1,
          None if raw.is_empty() => {}
          None => {
            tracing::warn!(table, column, value = raw, "clearing unparseable date");
            cleared += 1;
          }
        }
        update.execute(rusqlite::params![iso, rowid])?;
      }
    }
  }

  Ok((rewritten, cleared))
}

fn to_count(n: i64) -> Result<u64> {
  u64::try_from(n).map_err(|_| Error::CountOutOfRange(n))
}

// ─── Search helpers ──────────────────────────────────────────────────────────

/// Escape `LIKE` wildcards in user text and wrap it for a substring match.
fn like_pattern(text: &str) -> String {
  let mut pattern = String::with_capacity(text.len() + 2);
  pattern.push('%');
  for c in text.chars() {
    if matches!(c, '\\' | '%' | '_') {
      pattern.push('\\');
    }
    pattern.push(c);
  }
  pattern.push('%');
  pattern
}

/// Build the `WHERE` clause for a search, with positional `?` parameters in
/// the order they appear.
///
/// `LIKE` is ASCII case-insensitive in SQLite, which makes the text and city
/// filters case-insensitive.
fn search_filter(query: &SystemQuery) -> (String, Vec<Value>) {
  let mut conds: Vec<&'static str> = vec!["pws_activity_code = ?"];
  let mut params: Vec<Value> = vec![Value::Text(ACTIVE.to_owned())];

  if let Some(text) = &query.text {
    conds.push(
      "(pws_name LIKE ? ESCAPE '\\' OR pwsid LIKE ? ESCAPE '\\' OR org_name LIKE ? ESCAPE '\\')",
    );
    let pattern = like_pattern(text);
    params.extend(std::iter::repeat_n(Value::Text(pattern), 3));
  }
  if let Some(city) = &query.city {
    conds.push("city_name LIKE ? ESCAPE '\\'");
    params.push(Value::Text(like_pattern(city)));
  }
  if let Some(system_type) = &query.system_type {
    conds.push("pws_type_code = ?");
    params.push(Value::Text(system_type.clone()));
  }
  if let Some(source_type) = &query.source_type {
    conds.push("primary_source_code = ?");
    params.push(Value::Text(source_type.clone()));
  }

  (format!("WHERE {}", conds.join(" AND ")), params)
}

// ─── County helpers ──────────────────────────────────────────────────────────

/// Distinct `(county, system)` pairs for active systems in state `?2`.
/// A system with several service areas in one county appears once.
const SERVED_COUNTIES: &str = "
  WITH served AS (
    SELECT DISTINCT
      g.county_served            AS county,
      w.pwsid                    AS pwsid,
      w.population_served_count  AS population
    FROM geographic_areas g
    JOIN water_systems w ON w.pwsid = g.pwsid
    WHERE w.pws_activity_code = ?1
      AND w.state_code = ?2
      AND g.county_served IS NOT NULL
      AND g.county_served <> ''
  )";

// ─── SdwisStore impl ─────────────────────────────────────────────────────────

impl SdwisStore for SqliteStore {
  type Error = Error;

  // ── Systems ───────────────────────────────────────────────────────────────

  async fn get_system(&self, pwsid: &str) -> Result<Option<WaterSystem>> {
    let pwsid = pwsid.to_owned();

    let system = self
      .conn
      .call(move |conn| {
        Ok(conn
          .query_row(
            &format!("SELECT {WATER_SYSTEM_COLUMNS} FROM water_systems WHERE pwsid = ?1"),
            rusqlite::params![pwsid],
            decode::water_system,
          )
          .optional()?)
      })
      .await?;

    Ok(system)
  }

  async fn search_systems(&self, query: &SystemQuery) -> Result<SystemPage> {
    let (where_clause, params) = search_filter(query);
    let limit = i64::try_from(query.limit).unwrap_or(i64::MAX);
    let offset = i64::try_from(query.offset).unwrap_or(i64::MAX);

    tracing::debug!(
      text = query.text.as_deref(),
      city = query.city.as_deref(),
      system_type = query.system_type.as_deref(),
      source_type = query.source_type.as_deref(),
      limit,
      offset,
      "searching water systems"
    );

    let (rows, total): (Vec<WaterSystem>, i64) = self
      .conn
      .call(move |conn| {
        let total: i64 = conn.query_row(
          &format!("SELECT COUNT(*) FROM water_systems {where_clause}"),
          rusqlite::params_from_iter(params.iter()),
          |row| row.get(0),
        )?;

        let mut page_params = params;
        page_params.push(Value::Integer(limit));
        page_params.push(Value::Integer(offset));

        let sql = format!(
          "SELECT {WATER_SYSTEM_COLUMNS}
           FROM water_systems
           {where_clause}
           ORDER BY pws_name, pwsid
           LIMIT ? OFFSET ?"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(
            rusqlite::params_from_iter(page_params.iter()),
            decode::water_system,
          )?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok((rows, total))
      })
      .await?;

    Ok(SystemPage { rows, total: to_count(total)? })
  }

  // ── Dependent entities ────────────────────────────────────────────────────

  async fn list_violations(&self, pwsid: &str) -> Result<Vec<Violation>> {
    let sql = format!(
      "SELECT {VIOLATION_COLUMNS}
       FROM violations
       WHERE pwsid = ?1
       ORDER BY non_compl_period_begin_date DESC NULLS LAST, violation_id
       LIMIT {VIOLATION_CAP}"
    );
    self.rows_for_system(sql, pwsid, decode::violation).await
  }

  async fn count_violations(&self, pwsid: &str) -> Result<u64> {
    let pwsid = pwsid.to_owned();

    let count: i64 = self
      .conn
      .call(move |conn| {
        Ok(conn.query_row(
          "SELECT COUNT(*) FROM violations WHERE pwsid = ?1",
          rusqlite::params![pwsid],
          |row| row.get(0),
        )?)
      })
      .await?;

    to_count(count)
  }

  async fn list_facilities(&self, pwsid: &str) -> Result<Vec<Facility>> {
    let sql = format!(
      "SELECT {FACILITY_COLUMNS}
       FROM facilities
       WHERE pwsid = ?1
       ORDER BY facility_name NULLS LAST, facility_id"
    );
    self.rows_for_system(sql, pwsid, decode::facility).await
  }

  async fn list_geographic_areas(&self, pwsid: &str) -> Result<Vec<GeographicArea>> {
    let sql = format!(
      "SELECT {GEOGRAPHIC_AREA_COLUMNS}
       FROM geographic_areas
       WHERE pwsid = ?1
       ORDER BY geo_id"
    );
    self.rows_for_system(sql, pwsid, decode::geographic_area).await
  }

  async fn list_site_visits(&self, pwsid: &str) -> Result<Vec<SiteVisit>> {
    let sql = format!(
      "SELECT {SITE_VISIT_COLUMNS}
       FROM site_visits
       WHERE pwsid = ?1
       ORDER BY visit_date DESC NULLS LAST, visit_id
       LIMIT {SITE_VISIT_CAP}"
    );
    self.rows_for_system(sql, pwsid, decode::site_visit).await
  }

  async fn list_lcr_samples(&self, pwsid: &str) -> Result<Vec<LcrSample>> {
    let sql = format!(
      "SELECT {LCR_SAMPLE_COLUMNS}
       FROM lcr_samples
       WHERE pwsid = ?1
       ORDER BY sampling_end_date DESC NULLS LAST, sample_id
       LIMIT {LCR_SAMPLE_CAP}"
    );
    self.rows_for_system(sql, pwsid, decode::lcr_sample).await
  }

  async fn list_events(&self, pwsid: &str) -> Result<Vec<EventMilestone>> {
    let sql = format!(
      "SELECT {EVENT_COLUMNS}
       FROM events_milestones
       WHERE pwsid = ?1
       ORDER BY event_actual_date DESC NULLS LAST, event_schedule_id
       LIMIT {EVENT_CAP}"
    );
    self.rows_for_system(sql, pwsid, decode::event).await
  }

  // ── Reference codes ───────────────────────────────────────────────────────

  async fn list_ref_codes(&self, value_type: Option<&str>) -> Result<Vec<RefCodeValue>> {
    let value_type = value_type.map(str::to_owned);

    let rows = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT value_type, value_code, value_description
           FROM ref_code_values
           WHERE ?1 IS NULL OR value_type = ?1
           ORDER BY value_type, value_code",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![value_type], decode::ref_code)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(rows)
  }

  // ── County rollups ────────────────────────────────────────────────────────

  async fn county_systems(&self, state: &str) -> Result<Vec<CountySystems>> {
    let state = state.to_owned();

    let raws: Vec<(String, i64, i64)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "{SERVED_COUNTIES}
           SELECT county, COUNT(*), COALESCE(SUM(population), 0)
           FROM served
           GROUP BY county
           ORDER BY county"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![ACTIVE, state], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(county, systems, population)| {
        Ok(CountySystems {
          county,
          system_count: to_count(systems)?,
          total_population: population,
        })
      })
      .collect()
  }

  async fn county_violations(&self, state: &str) -> Result<Vec<CountyViolations>> {
    let state = state.to_owned();

    let raws: Vec<(String, i64)> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "{SERVED_COUNTIES}
           SELECT s.county, COUNT(*)
           FROM served s
           JOIN violations v ON v.pwsid = s.pwsid
           GROUP BY s.county
           ORDER BY s.county"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![ACTIVE, state], |row| {
            Ok((row.get(0)?, row.get(1)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(|(county, violations)| {
        Ok(CountyViolations { county, violation_count: to_count(violations)? })
      })
      .collect()
  }
}
