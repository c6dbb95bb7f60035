use chrono::Utc;
use storage::SessionStore;
use storage::models::SessionResult;
use tracing::debug;

use crate::error::{Result, ScoringError};
use crate::points::PointTables;

/// The row holding the fastest-lap bonus after an annotation pass.
#[derive(Debug, Clone)]
pub struct FastLapAward {
    pub cust_id: i64,
    pub best_lap_time: i64,
    /// The stored row already carried the bonus and nothing was written.
    pub already_awarded: bool,
}

/// Awards the fastest-lap bonus for one simsession of a session.
///
/// Eligibility follows the league's historical filter: a set lap time and
/// `finish_position >= 3` but not exactly 3 — which leaves the top four
/// finishers out of contention, not the top three. Kept as-is to stay
/// consistent with previously scored seasons.
///
/// The bonus is applied at most once: if the winning row already has
/// `fast_lap` set, the award is reported without touching the stored
/// points, so re-running the pass never adds the point twice.
pub async fn annotate_fastest_lap<S: SessionStore>(
    store: &S,
    tables: &PointTables,
    session_id: i64,
    simsession_number: i64,
) -> Result<FastLapAward> {
    let rows = store
        .results_for_segment(session_id, simsession_number)
        .await?;

    let mut candidates: Vec<(i64, &SessionResult)> = rows
        .iter()
        .filter(|r| r.finish_position.is_some_and(|p| p >= 3 && p != 3))
        .filter_map(|r| r.best_lap_time.filter(|t| *t > 0).map(|t| (t, r)))
        .collect();
    candidates.sort_by_key(|(time, row)| (*time, row.cust_id));

    let Some((best_lap_time, fastest)) = candidates.first().copied() else {
        return Err(ScoringError::NoFastLapCandidate {
            session_id,
            simsession_number,
        });
    };

    if fastest.fast_lap {
        debug!(
            cust_id = fastest.cust_id,
            session_id, simsession_number, "fastest-lap bonus already applied"
        );
        return Ok(FastLapAward {
            cust_id: fastest.cust_id,
            best_lap_time,
            already_awarded: true,
        });
    }

    let mut winner = fastest.clone();
    winner.fast_lap = true;
    winner.points = Some(winner.points.unwrap_or(0) + tables.fast_lap_bonus);
    winner.date_modified = Utc::now().naive_utc();
    store.upsert_result(&winner).await?;

    debug!(
        cust_id = winner.cust_id,
        best_lap_time, session_id, simsession_number, "fastest-lap bonus awarded"
    );

    Ok(FastLapAward {
        cust_id: winner.cust_id,
        best_lap_time,
        already_awarded: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::MemoryStore;

    const SESSION: i64 = 55523231;

    fn row(cust_id: i64, finish_position: i64, best_lap_time: Option<i64>) -> SessionResult {
        SessionResult {
            league_id: 4403,
            season_id: 81776,
            session_id: SESSION,
            simsession_number: 0,
            simsession_type: 6,
            cust_id,
            display_name: Some(format!("Driver {cust_id}")),
            finish_position: Some(finish_position),
            finish_position_in_class: Some(finish_position),
            laps_lead: Some(0),
            laps_complete: Some(14),
            average_lap: Some(96_000),
            best_lap_time,
            fast_lap: false,
            incidents: Some(0),
            points: Some(10),
            date_modified: Utc::now().naive_utc(),
        }
    }

    async fn store_with(rows: Vec<SessionResult>) -> MemoryStore {
        let store = MemoryStore::new();
        for r in &rows {
            store.upsert_result(r).await.unwrap();
        }
        store
    }

    #[tokio::test]
    async fn picks_the_minimum_lap_outside_the_top_four() {
        let store = store_with(vec![
            row(1, 0, Some(90_000)), // podium, ineligible
            row(2, 3, Some(90_500)), // position 3 excluded too
            row(3, 4, Some(93_000)),
            row(4, 5, Some(92_000)),
            row(5, 6, None),
        ])
        .await;

        let award = annotate_fastest_lap(&store, &PointTables::default(), SESSION, 0)
            .await
            .unwrap();
        assert_eq!(award.cust_id, 4);
        assert_eq!(award.best_lap_time, 92_000);
        assert!(!award.already_awarded);

        let rows = store.results_for_segment(SESSION, 0).await.unwrap();
        let winner = rows.iter().find(|r| r.cust_id == 4).unwrap();
        assert!(winner.fast_lap);
        assert_eq!(winner.points, Some(11));

        // Exactly one row carries the flag.
        assert_eq!(rows.iter().filter(|r| r.fast_lap).count(), 1);
    }

    #[tokio::test]
    async fn empty_candidate_set_is_an_explicit_error() {
        let store = store_with(vec![
            row(1, 0, Some(90_000)),
            row(2, 1, Some(91_000)),
            row(3, 4, None),
        ])
        .await;

        let err = annotate_fastest_lap(&store, &PointTables::default(), SESSION, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, ScoringError::NoFastLapCandidate { .. }));
    }

    #[tokio::test]
    async fn second_run_does_not_double_the_bonus() {
        let store = store_with(vec![row(3, 4, Some(93_000)), row(4, 5, Some(92_000))]).await;
        let tables = PointTables::default();

        let first = annotate_fastest_lap(&store, &tables, SESSION, 0).await.unwrap();
        let second = annotate_fastest_lap(&store, &tables, SESSION, 0).await.unwrap();

        assert_eq!(first.cust_id, second.cust_id);
        assert!(second.already_awarded);

        let rows = store.results_for_segment(SESSION, 0).await.unwrap();
        let winner = rows.iter().find(|r| r.cust_id == 4).unwrap();
        assert_eq!(winner.points, Some(11));
    }

    #[tokio::test]
    async fn lap_time_ties_break_on_cust_id() {
        let store = store_with(vec![row(9, 5, Some(92_000)), row(4, 6, Some(92_000))]).await;

        let award = annotate_fastest_lap(&store, &PointTables::default(), SESSION, 0)
            .await
            .unwrap();
        assert_eq!(award.cust_id, 4);
    }
}
