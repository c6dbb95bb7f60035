use crate::error::Result;
use crate::models::{SeasonStanding, SessionResult, SessionSegment};

/// Persistence seam for the scoring engine.
///
/// Every write is a single-row upsert keyed by the model's unique tuple;
/// the engine assumes each call is individually atomic but makes no
/// transactional claim across calls.
#[async_trait::async_trait]
pub trait SessionStore: Send + Sync {
    async fn upsert_segment(&self, segment: &SessionSegment) -> Result<()>;

    async fn upsert_result(&self, row: &SessionResult) -> Result<()>;

    /// All rows of one simsession of a session.
    async fn results_for_segment(
        &self,
        session_id: i64,
        simsession_number: i64,
    ) -> Result<Vec<SessionResult>>;

    /// All rows of a session across every simsession, the synthetic
    /// overall rows included.
    async fn results_for_session(&self, session_id: i64) -> Result<Vec<SessionResult>>;

    /// The synthetic overall rows (simsession 99) for every session of a
    /// season.
    async fn season_final_results(&self, season_id: i64) -> Result<Vec<SessionResult>>;

    async fn upsert_standing(&self, row: &SeasonStanding) -> Result<()>;
}
