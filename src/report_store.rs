// src/report_store.rs

use crate::aggregate;
use crate::error::IngestError;
use crate::report::SalesReport;
use rusqlite::{Connection, OptionalExtension, params};
use std::path::Path;
use tracing::{info, warn};

/// Owns the live report: a single-row SQLite table holding the report as
/// a JSON document. Single-writer by assumption (one interactive
/// session), so no locking beyond what SQLite provides.
pub struct ReportStore {
    conn: Connection,
}

impl ReportStore {
    pub fn new<P: AsRef<Path>>(db_path: P) -> Result<Self, IngestError> {
        let db_path = db_path.as_ref();
        if let Some(dir) = db_path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        Self::with_connection(Connection::open(db_path)?)
    }

    #[cfg(test)]
    pub fn in_memory() -> Result<Self, IngestError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, IngestError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS report (
                id INTEGER PRIMARY KEY CHECK (id = 1),
                body TEXT NOT NULL,
                updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )",
            [],
        )?;
        Ok(ReportStore { conn })
    }

    /// The stored report, or `None` when nothing has been saved yet or
    /// the stored value is structurally unusable (callers fall back to
    /// the default dataset either way). Derived fields are recomputed on
    /// the way out, so a loaded report always satisfies the invariants.
    pub fn load(&self) -> Result<Option<SalesReport>, IngestError> {
        let body: Option<String> = self
            .conn
            .query_row("SELECT body FROM report WHERE id = 1", [], |row| row.get(0))
            .optional()?;

        let Some(body) = body else {
            return Ok(None);
        };

        match serde_json::from_str::<SalesReport>(&body) {
            Ok(report) if !report.branches.is_empty() => {
                Ok(Some(aggregate::recompute_report(report)))
            }
            Ok(_) => {
                warn!("stored report has no branches — ignoring it");
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "stored report is not parseable — ignoring it");
                Ok(None)
            }
        }
    }

    /// Replace the stored report. The value is passed through a full
    /// recompute first, so the store never holds stale derived fields.
    pub fn save(&self, report: &SalesReport) -> Result<(), IngestError> {
        let consistent = aggregate::recompute_report(report.clone());
        let body = serde_json::to_string(&consistent)?;
        self.conn.execute(
            "INSERT INTO report (id, body) VALUES (1, ?1)
             ON CONFLICT(id) DO UPDATE SET
                body = excluded.body,
                updated_at = CURRENT_TIMESTAMP",
            params![body],
        )?;
        info!(branches = consistent.branches.len(), "Report saved");
        Ok(())
    }

    /// Drop whatever is stored and go back to the fixed default dataset.
    pub fn reset(&self) -> Result<SalesReport, IngestError> {
        let report = SalesReport::default_dataset();
        self.save(&report)?;
        info!("Report reset to default dataset");
        Ok(report)
    }
}
