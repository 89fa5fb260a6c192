// SQLite event store - relational adapter behind the report source traits
use crate::application::sources::{FormCatalog, SubmissionSource, ViewSource};
use crate::domain::form::Form;
use crate::domain::period::DateRange;
use crate::domain::series::RawObservation;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::Mutex;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// SQLite-backed store for forms, submission entries, and view counters.
/// One connection behind a mutex; all queries are short and read-mostly.
pub struct SqliteEventStore {
    conn: Mutex<Connection>,
}

impl SqliteEventStore {
    /// Open or create a database at the given path
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            ",
        )?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create the schema if it does not exist yet
    pub fn migrate(&self) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS forms (
                id INTEGER PRIMARY KEY,
                title TEXT NOT NULL,
                is_active INTEGER NOT NULL DEFAULT 1
            );

            CREATE TABLE IF NOT EXISTS entries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                form_id INTEGER NOT NULL,
                status TEXT NOT NULL DEFAULT 'active',
                date_created TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_entries_form_date
                ON entries(form_id, date_created);

            CREATE TABLE IF NOT EXISTS form_views (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                form_id INTEGER NOT NULL,
                date_created TEXT NOT NULL,
                count INTEGER NOT NULL DEFAULT 1
            );
            CREATE INDEX IF NOT EXISTS idx_views_form_date
                ON form_views(form_id, date_created);
            ",
        )?;
        Ok(())
    }

    /// Get the underlying connection (for advanced use)
    pub fn connection(&self) -> std::sync::MutexGuard<'_, Connection> {
        self.conn.lock().unwrap()
    }

    /// Insert or update a form
    pub fn upsert_form(&self, id: u64, title: &str, active: bool) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "
            INSERT INTO forms (id, title, is_active)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                is_active = excluded.is_active
            ",
            params![id as i64, title, active as i64],
        )?;
        Ok(())
    }

    /// Record one submission entry
    pub fn record_submission(&self, form_id: u64, created_at: NaiveDateTime) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO entries (form_id, status, date_created) VALUES (?1, 'active', ?2)",
            params![form_id as i64, created_at.format(TIMESTAMP_FORMAT).to_string()],
        )?;
        Ok(())
    }

    /// Record a view counter row. Counters may arrive pre-aggregated, so the
    /// row carries its own count.
    pub fn record_views(
        &self,
        form_id: u64,
        created_at: NaiveDateTime,
        count: i64,
    ) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO form_views (form_id, date_created, count) VALUES (?1, ?2, ?3)",
            params![
                form_id as i64,
                created_at.format(TIMESTAMP_FORMAT).to_string(),
                count
            ],
        )?;
        Ok(())
    }
}

/// Fetch window for an inclusive date range: whole days, midnight to one
/// second before the next midnight. Timestamps are stored as text in a
/// format whose lexicographic order is chronological.
fn window(range: &DateRange) -> (String, String) {
    (
        format!("{} 00:00:00", range.start.format("%Y-%m-%d")),
        format!("{} 23:59:59", range.end.format("%Y-%m-%d")),
    )
}

fn collect_observations(
    rows: Vec<(String, i64)>,
    form_id: u64,
) -> Vec<RawObservation> {
    let mut observations = Vec::with_capacity(rows.len());
    for (raw, count) in rows {
        match NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT) {
            Ok(timestamp) => observations.push(RawObservation::new(timestamp, count)),
            Err(_) => {
                tracing::warn!(form_id, raw = %raw, "skipping row with malformed timestamp");
            }
        }
    }
    observations
}

#[async_trait]
impl SubmissionSource for SqliteEventStore {
    async fn fetch_submissions(
        &self,
        form_id: u64,
        range: &DateRange,
    ) -> anyhow::Result<Vec<RawObservation>> {
        let (window_start, window_end) = window(range);
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "
            SELECT date_created, COUNT(*)
            FROM entries
            WHERE form_id = ?1
              AND status = 'active'
              AND date_created >= ?2
              AND date_created <= ?3
            GROUP BY date_created
            ORDER BY date_created
            ",
        )?;
        let rows = stmt
            .query_map(params![form_id as i64, window_start, window_end], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(collect_observations(rows, form_id))
    }
}

#[async_trait]
impl ViewSource for SqliteEventStore {
    async fn fetch_views(
        &self,
        form_id: u64,
        range: &DateRange,
    ) -> anyhow::Result<Vec<RawObservation>> {
        let (window_start, window_end) = window(range);
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "
            SELECT date_created, count
            FROM form_views
            WHERE form_id = ?1
              AND date_created >= ?2
              AND date_created <= ?3
            ORDER BY date_created
            ",
        )?;
        let rows = stmt
            .query_map(params![form_id as i64, window_start, window_end], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(collect_observations(rows, form_id))
    }
}

#[async_trait]
impl FormCatalog for SqliteEventStore {
    async fn resolve_title(&self, form_id: u64) -> anyhow::Result<String> {
        let conn = self.conn.lock().unwrap();
        let title = conn
            .query_row(
                "SELECT title FROM forms WHERE id = ?1",
                params![form_id as i64],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        title.ok_or_else(|| anyhow::anyhow!("form {} not found", form_id))
    }

    async fn list_forms(&self) -> anyhow::Result<Vec<Form>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare("SELECT id, title FROM forms WHERE is_active = 1 ORDER BY id")?;
        let forms = stmt
            .query_map([], |row| {
                Ok(Form::new(row.get::<_, i64>(0)? as u64, row.get(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(forms)
    }
}
