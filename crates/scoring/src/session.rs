use std::collections::BTreeMap;

use chrono::Utc;
use storage::SessionStore;
use storage::models::{
    FINAL_SIMSESSION_NUMBER, FINAL_SIMSESSION_TYPE, SessionResult, SessionSegment,
};
use tracing::{info, warn};

use crate::error::{Result, ScoringError};
use crate::fastlap::annotate_fastest_lap;
use crate::points::PointTables;
use crate::provider::{RACE, SessionPhase, SessionResultDocument, SimSession};
use crate::scorer::{RowOutcome, SessionIds, SkippedRow, score_segment};

/// Summary of one processing pass over a session document.
#[derive(Debug, Default)]
pub struct SessionReport {
    /// Rows written, the synthetic overall rows included.
    pub scored: usize,
    /// Raw rows dropped for a missing field.
    pub skipped: Vec<SkippedRow>,
    /// Fastest-lap bonuses newly applied in this pass.
    pub fast_laps: usize,
}

/// Scores one session document end to end: per-simsession rows, the
/// fastest-lap bonuses, and the folded overall row per driver under the
/// reserved simsession number 99.
///
/// Re-processing the same document is safe: every write is an upsert by
/// key and the fastest-lap bonus is never applied twice. Writes are not
/// transactional across rows; callers must serialize passes per session.
pub struct SessionProcessor<'a, S: SessionStore> {
    store: &'a S,
    tables: PointTables,
}

impl<'a, S: SessionStore> SessionProcessor<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            tables: PointTables::default(),
        }
    }

    pub fn with_tables(store: &'a S, tables: PointTables) -> Self {
        Self { store, tables }
    }

    pub async fn process_session(&self, document: &SessionResultDocument) -> Result<SessionReport> {
        let ids = SessionIds {
            league_id: document.league_id,
            season_id: document.league_season_id,
            session_id: document.subsession_id,
        };
        let mut report = SessionReport::default();

        for simsession in &document.session_results {
            self.store
                .upsert_segment(&segment_metadata(&ids, simsession))
                .await?;
            self.score_and_store(&ids, simsession, &mut report).await?;

            if SessionPhase::classify(simsession.simsession_type) == SessionPhase::Race {
                self.award_fast_lap(ids.session_id, simsession.simsession_number, &mut report)
                    .await?;
            }
        }

        self.store
            .upsert_segment(&final_segment_metadata(&ids))
            .await?;

        let rows = self.store.results_for_session(ids.session_id).await?;
        for (cust_id, totals) in compute_final_scores(&rows) {
            let final_row = totals.final_row(&ids, cust_id);
            self.upsert_scored(&final_row, &mut report).await?;
        }

        self.award_fast_lap(ids.session_id, FINAL_SIMSESSION_NUMBER, &mut report)
            .await?;

        info!(
            session_id = ids.session_id,
            scored = report.scored,
            skipped = report.skipped.len(),
            fast_laps = report.fast_laps,
            "session scored"
        );
        Ok(report)
    }

    async fn score_and_store(
        &self,
        ids: &SessionIds,
        simsession: &SimSession,
        report: &mut SessionReport,
    ) -> Result<()> {
        for outcome in score_segment(&self.tables, ids, simsession) {
            match outcome {
                RowOutcome::Scored(row) => self.upsert_scored(&row, report).await?,
                RowOutcome::Skipped(skip) => {
                    warn!(
                        cust_id = skip.cust_id,
                        display_name = skip.display_name.as_deref(),
                        simsession_number = simsession.simsession_number,
                        missing = skip.field,
                        "raw row skipped"
                    );
                    report.skipped.push(skip);
                }
            }
        }
        Ok(())
    }

    /// Upserts one scored row. An unexpected uniqueness conflict drops
    /// that row and the pass continues; other storage errors abort.
    async fn upsert_scored(&self, row: &SessionResult, report: &mut SessionReport) -> Result<()> {
        match self.store.upsert_result(row).await {
            Ok(()) => {
                report.scored += 1;
                Ok(())
            }
            Err(e) if e.is_unique_violation() => {
                warn!(
                    cust_id = row.cust_id,
                    simsession_number = row.simsession_number,
                    error = %e,
                    "integrity conflict, row not written"
                );
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// A simsession with no eligible candidate simply goes without the
    /// bonus.
    async fn award_fast_lap(
        &self,
        session_id: i64,
        simsession_number: i64,
        report: &mut SessionReport,
    ) -> Result<()> {
        match annotate_fastest_lap(self.store, &self.tables, session_id, simsession_number).await {
            Ok(award) => {
                if !award.already_awarded {
                    report.fast_laps += 1;
                }
                Ok(())
            }
            Err(ScoringError::NoFastLapCandidate { .. }) => {
                warn!(
                    session_id,
                    simsession_number, "no eligible fastest-lap candidate, bonus skipped"
                );
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

fn segment_metadata(ids: &SessionIds, simsession: &SimSession) -> SessionSegment {
    SessionSegment {
        league_id: ids.league_id,
        season_id: ids.season_id,
        session_id: ids.session_id,
        simsession_number: simsession.simsession_number,
        simsession_type: simsession.simsession_type,
        simsession_type_name: simsession.simsession_type_name.clone(),
        simsession_subtype: simsession.simsession_subtype.unwrap_or(0),
        simsession_name: simsession.simsession_name.clone(),
        date_modified: Utc::now().naive_utc(),
    }
}

fn final_segment_metadata(ids: &SessionIds) -> SessionSegment {
    SessionSegment {
        league_id: ids.league_id,
        season_id: ids.season_id,
        session_id: ids.session_id,
        simsession_number: FINAL_SIMSESSION_NUMBER,
        simsession_type: FINAL_SIMSESSION_TYPE,
        simsession_type_name: Some("final".to_string()),
        simsession_subtype: 0,
        simsession_name: Some("OVERALL".to_string()),
        date_modified: Utc::now().naive_utc(),
    }
}

/// Running totals for one driver across the simsessions of a session.
#[derive(Debug, Default, Clone)]
pub struct DriverTotals {
    pub display_name: Option<String>,
    pub points: i64,
    pub incidents: i64,
    average_lap_sum: i64,
    average_lap_count: i64,
    position_sum: i64,
    position_count: i64,
    pub best_lap_time: Option<i64>,
}

/// Folds the stored rows of one session into per-driver totals, skipping
/// rows of the synthetic overall simsession itself.
///
/// `average_lap` is the mean of the per-simsession averages (a mean of
/// means, matching how these standings have always been computed), over
/// simsessions where a time was set. Best lap and finishing position only
/// count race simsessions; a race only counts toward the position average
/// when the driver was classified and completed a lap.
pub fn compute_final_scores(rows: &[SessionResult]) -> BTreeMap<i64, DriverTotals> {
    let mut finals: BTreeMap<i64, DriverTotals> = BTreeMap::new();

    for row in rows {
        if row.simsession_number == FINAL_SIMSESSION_NUMBER {
            continue;
        }

        let driver = finals.entry(row.cust_id).or_default();
        if driver.display_name.is_none() {
            driver.display_name = row.display_name.clone();
        }

        driver.points += row.points.unwrap_or(0);
        driver.incidents += row.incidents.unwrap_or(0);

        if let Some(average_lap) = row.average_lap.filter(|v| *v > 0) {
            driver.average_lap_sum += average_lap;
            driver.average_lap_count += 1;
        }

        if row.simsession_type == RACE {
            if let Some(best) = row.best_lap_time.filter(|v| *v > 0) {
                driver.best_lap_time = Some(driver.best_lap_time.map_or(best, |cur| cur.min(best)));
            }

            if let Some(position) = row.finish_position {
                if position >= 0 && row.laps_complete.unwrap_or(0) > 0 {
                    driver.position_sum += position + 1;
                    driver.position_count += 1;
                }
            }
        }
    }

    finals
}

impl DriverTotals {
    /// Average race finishing position, 1-based and integer-divided;
    /// `None` when no race counted.
    pub fn average_position(&self) -> Option<i64> {
        int_average(self.position_sum, self.position_count)
    }

    pub fn average_lap(&self) -> Option<i64> {
        int_average(self.average_lap_sum, self.average_lap_count)
    }

    fn final_row(&self, ids: &SessionIds, cust_id: i64) -> SessionResult {
        SessionResult {
            league_id: ids.league_id,
            season_id: ids.season_id,
            session_id: ids.session_id,
            simsession_number: FINAL_SIMSESSION_NUMBER,
            simsession_type: FINAL_SIMSESSION_TYPE,
            cust_id,
            display_name: self.display_name.clone(),
            finish_position: self.average_position(),
            finish_position_in_class: None,
            laps_lead: None,
            laps_complete: None,
            average_lap: self.average_lap(),
            best_lap_time: self.best_lap_time,
            fast_lap: false,
            incidents: Some(self.incidents),
            points: Some(self.points),
            date_modified: Utc::now().naive_utc(),
        }
    }
}

/// Integer mean; `None` on an empty set rather than zero or a NaN.
fn int_average(total: i64, count: i64) -> Option<i64> {
    (count != 0).then(|| total / count)
}
