//! SQLite event log for a game session.
//!
//! RULE: Only the store talks to the database.
//! The engine calls store methods; it never executes SQL directly.
//!
//! The store is an audit trail, not a save file: nothing here is ever
//! read back to resume a game.

use crate::{
    error::SimResult,
    event::EventLogEntry,
    types::Round,
};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};

mod round_metrics;

pub use round_metrics::RoundMetricsRow;

pub struct SimStore {
    conn: Connection,
}

impl SimStore {
    /// Open (or create) a database file at `path`.
    pub fn open(path: &str) -> SimResult<Self> {
        let conn = Connection::open(path)?;
        // WAL mode only matters for real files; :memory: ignores it.
        let _ = conn.execute_batch("PRAGMA journal_mode=WAL;");
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (the default for sessions and tests).
    pub fn in_memory() -> SimResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        Ok(Self { conn })
    }

    /// Apply all schema migrations in order.
    pub fn migrate(&self) -> SimResult<()> {
        self.conn
            .execute_batch(include_str!("../../../migrations/001_foundation.sql"))?;
        self.conn
            .execute_batch(include_str!("../../../migrations/002_round_metrics.sql"))?;
        Ok(())
    }

    // ── Run ────────────────────────────────────────────────────

    pub fn insert_run(
        &self,
        run_id:     &str,
        seed:       u64,
        difficulty: &str,
        version:    &str,
        started_at: DateTime<Utc>,
    ) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO run (run_id, seed, difficulty, version, started_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![run_id, seed as i64, difficulty, version, started_at.to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn run_exists(&self, run_id: &str) -> SimResult<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM run WHERE run_id = ?1",
            params![run_id],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    // ── Event log ──────────────────────────────────────────────

    pub fn append_event(&self, entry: &EventLogEntry) -> SimResult<()> {
        self.conn.execute(
            "INSERT INTO event_log (run_id, round, event_type, payload)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                entry.run_id,
                i64::from(entry.round),
                entry.event_type,
                entry.payload,
            ],
        )?;
        Ok(())
    }

    pub fn events_for_round(&self, run_id: &str, round: Round) -> SimResult<Vec<EventLogEntry>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, run_id, round, event_type, payload
             FROM event_log WHERE run_id = ?1 AND round = ?2
             ORDER BY id ASC"
        )?;
        let entries = stmt.query_map(params![run_id, i64::from(round)], |row| {
            Ok(EventLogEntry {
                id:         Some(row.get(0)?),
                run_id:     row.get(1)?,
                round:      row.get::<_, i64>(2)? as Round,
                event_type: row.get(3)?,
                payload:    row.get(4)?,
            })
        })?.collect::<Result<Vec<_>, _>>()?;
        Ok(entries)
    }

    /// Every payload for a run, in append order.
    pub fn event_payloads(&self, run_id: &str) -> SimResult<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT payload FROM event_log WHERE run_id = ?1 ORDER BY id ASC"
        )?;
        let payloads = stmt
            .query_map(params![run_id], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(payloads)
    }

    pub fn event_count(&self, run_id: &str, event_type: &str) -> SimResult<i64> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM event_log WHERE run_id = ?1 AND event_type = ?2",
            params![run_id, event_type],
            |row| row.get(0),
        )?;
        Ok(count)
    }
}
