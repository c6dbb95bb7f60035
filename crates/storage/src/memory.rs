use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::Result;
use crate::models::{FINAL_SIMSESSION_NUMBER, SeasonStanding, SessionResult, SessionSegment};
use crate::store::SessionStore;

/// In-memory [`SessionStore`] with the same upsert-by-key semantics as the
/// Postgres implementation. Used by the engine's tests and for scoring
/// dry runs without a database.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    segments: HashMap<(i64, i64, i64, i64), SessionSegment>,
    results: HashMap<(i64, i64, i64, i64, i64), SessionResult>,
    standings: HashMap<(i64, i64, i64), SeasonStanding>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn segment_count(&self) -> usize {
        self.inner.lock().expect("store poisoned").segments.len()
    }

    pub fn result_count(&self) -> usize {
        self.inner.lock().expect("store poisoned").results.len()
    }

    pub fn standings_for_season(&self, season_id: i64) -> Vec<SeasonStanding> {
        let inner = self.inner.lock().expect("store poisoned");
        let mut rows: Vec<SeasonStanding> = inner
            .standings
            .values()
            .filter(|s| s.season_id == season_id)
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.cust_id);
        rows
    }
}

#[async_trait::async_trait]
impl SessionStore for MemoryStore {
    async fn upsert_segment(&self, segment: &SessionSegment) -> Result<()> {
        let mut inner = self.inner.lock().expect("store poisoned");
        inner.segments.insert(segment.key(), segment.clone());
        Ok(())
    }

    async fn upsert_result(&self, row: &SessionResult) -> Result<()> {
        let mut inner = self.inner.lock().expect("store poisoned");
        inner.results.insert(row.key(), row.clone());
        Ok(())
    }

    async fn results_for_segment(
        &self,
        session_id: i64,
        simsession_number: i64,
    ) -> Result<Vec<SessionResult>> {
        let inner = self.inner.lock().expect("store poisoned");
        let mut rows: Vec<SessionResult> = inner
            .results
            .values()
            .filter(|r| r.session_id == session_id && r.simsession_number == simsession_number)
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.cust_id);
        Ok(rows)
    }

    async fn results_for_session(&self, session_id: i64) -> Result<Vec<SessionResult>> {
        let inner = self.inner.lock().expect("store poisoned");
        let mut rows: Vec<SessionResult> = inner
            .results
            .values()
            .filter(|r| r.session_id == session_id)
            .cloned()
            .collect();
        rows.sort_by_key(|r| (r.simsession_number, r.cust_id));
        Ok(rows)
    }

    async fn season_final_results(&self, season_id: i64) -> Result<Vec<SessionResult>> {
        let inner = self.inner.lock().expect("store poisoned");
        let mut rows: Vec<SessionResult> = inner
            .results
            .values()
            .filter(|r| {
                r.season_id == season_id && r.simsession_number == FINAL_SIMSESSION_NUMBER
            })
            .cloned()
            .collect();
        rows.sort_by_key(|r| (r.session_id, r.cust_id));
        Ok(rows)
    }

    async fn upsert_standing(&self, row: &SeasonStanding) -> Result<()> {
        let mut inner = self.inner.lock().expect("store poisoned");
        inner.standings.insert(row.key(), row.clone());
        Ok(())
    }
}
