//! Store methods for per-round resource and metric history.

use crate::{
    error::SimResult,
    hospital::HospitalState,
    summary::RoundSummary,
    types::Round,
};
use rusqlite::params;
use serde::Serialize;

use super::SimStore;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoundMetricsRow {
    pub round:          Round,
    pub available_beds: u32,
    pub staff_capacity: u32,
    pub survival_score: f64,
    pub staff_stress:   f64,
    pub reputation:     f64,
    pub treated:        u32,
    pub died:           u32,
    pub deteriorated:   u32,
}

impl SimStore {
    /// Persist the hospital state as it stands right after a round resolves.
    pub fn record_round_metrics(
        &self,
        run_id:   &str,
        summary:  &RoundSummary,
        hospital: &HospitalState,
    ) -> SimResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO round_metrics
               (run_id, round, available_beds, staff_capacity,
                survival_score, staff_stress, reputation,
                treated, died, deteriorated)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            params![
                run_id,
                i64::from(summary.round_number()),
                i64::from(hospital.available_beds),
                i64::from(hospital.staff_capacity_this_round),
                hospital.survival_score,
                hospital.staff_stress,
                hospital.reputation,
                summary.patients_treated().len() as i64,
                summary.patients_died().len() as i64,
                summary.patients_deteriorated().len() as i64,
            ],
        )?;
        Ok(())
    }

    /// All recorded rounds for a run, oldest first.
    pub fn round_metrics(&self, run_id: &str) -> SimResult<Vec<RoundMetricsRow>> {
        let mut stmt = self.conn.prepare(
            "SELECT round, available_beds, staff_capacity,
                    survival_score, staff_stress, reputation,
                    treated, died, deteriorated
             FROM round_metrics WHERE run_id = ?1
             ORDER BY round ASC"
        )?;
        let rows = stmt.query_map(params![run_id], |row| {
            Ok(RoundMetricsRow {
                round:          row.get::<_, i64>(0)? as Round,
                available_beds: row.get::<_, i64>(1)? as u32,
                staff_capacity: row.get::<_, i64>(2)? as u32,
                survival_score: row.get(3)?,
                staff_stress:   row.get(4)?,
                reputation:     row.get(5)?,
                treated:        row.get::<_, i64>(6)? as u32,
                died:           row.get::<_, i64>(7)? as u32,
                deteriorated:   row.get::<_, i64>(8)? as u32,
            })
        })?.collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}
