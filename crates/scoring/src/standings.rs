use std::collections::BTreeMap;

use chrono::Utc;
use storage::SessionStore;
use storage::models::{LeagueSeason, SeasonStanding, SessionResult};
use tracing::info;

use crate::error::Result;

/// Number of best session results that count toward the season total.
pub const BEST_SESSIONS: usize = 8;

/// Computes season standings from the stored per-session overall rows.
pub struct StandingsCalculator<'a, S: SessionStore> {
    store: &'a S,
}

impl<'a, S: SessionStore> StandingsCalculator<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Recomputes the standings table for a season, one row per driver
    /// with at least one overall result. Always a full recompute: rows
    /// are overwritten by key, and a driver whose sessions were removed
    /// upstream keeps their previous row.
    ///
    /// The provider's `no_drops_on_or_after_race_num` season setting is
    /// carried on [`LeagueSeason`] but not applied here; the drop rule is
    /// the fixed best-of-[`BEST_SESSIONS`] count.
    pub async fn calculate(&self, season: &LeagueSeason) -> Result<Vec<SeasonStanding>> {
        let finals = self.store.season_final_results(season.season_id).await?;

        let mut per_driver: BTreeMap<i64, Vec<&SessionResult>> = BTreeMap::new();
        for row in &finals {
            per_driver.entry(row.cust_id).or_default().push(row);
        }

        let mut standings = Vec::with_capacity(per_driver.len());
        for (cust_id, mut rows) in per_driver {
            rows.sort_by_key(|r| std::cmp::Reverse(r.points.unwrap_or(0)));
            rows.truncate(BEST_SESSIONS);

            let points: i64 = rows.iter().map(|r| r.points.unwrap_or(0)).sum();
            let incidents: i64 = rows.iter().map(|r| r.incidents.unwrap_or(0)).sum();
            let best_finish = rows.iter().filter_map(|r| r.finish_position).min();
            let average_finish = mean(rows.iter().filter_map(|r| r.finish_position));

            let standing = SeasonStanding {
                league_id: season.league_id,
                season_id: season.season_id,
                cust_id,
                display_name: rows.first().and_then(|r| r.display_name.clone()),
                points: Some(points),
                best_finish,
                average_finish,
                incidents: Some(incidents),
                date_modified: Utc::now().naive_utc(),
            };
            self.store.upsert_standing(&standing).await?;
            standings.push(standing);
        }

        info!(
            league_id = season.league_id,
            season_id = season.season_id,
            drivers = standings.len(),
            "season standings recomputed"
        );
        Ok(standings)
    }
}

/// Mean over the present values; `None` on an empty set, never a NaN.
fn mean(values: impl Iterator<Item = i64>) -> Option<f64> {
    let mut sum = 0i64;
    let mut count = 0usize;
    for value in values {
        sum += value;
        count += 1;
    }
    (count > 0).then(|| sum as f64 / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::MemoryStore;
    use storage::models::{FINAL_SIMSESSION_NUMBER, FINAL_SIMSESSION_TYPE};

    const LEAGUE: i64 = 4403;
    const SEASON: i64 = 81776;

    fn season() -> LeagueSeason {
        LeagueSeason {
            league_id: LEAGUE,
            season_id: SEASON,
            season_name: Some("Season 4".to_string()),
            no_drops_on_or_after_race_num: None,
        }
    }

    fn final_row(session_id: i64, cust_id: i64, points: i64) -> SessionResult {
        SessionResult {
            league_id: LEAGUE,
            season_id: SEASON,
            session_id,
            simsession_number: FINAL_SIMSESSION_NUMBER,
            simsession_type: FINAL_SIMSESSION_TYPE,
            cust_id,
            display_name: Some(format!("Driver {cust_id}")),
            finish_position: Some(2),
            finish_position_in_class: None,
            laps_lead: None,
            laps_complete: None,
            average_lap: Some(95_000),
            best_lap_time: Some(94_000),
            fast_lap: false,
            incidents: Some(1),
            points: Some(points),
            date_modified: Utc::now().naive_utc(),
        }
    }

    #[tokio::test]
    async fn nine_sessions_drop_the_worst() {
        let store = MemoryStore::new();
        let scores = [40, 35, 30, 25, 20, 15, 10, 5, 1];
        for (i, points) in scores.iter().enumerate() {
            store
                .upsert_result(&final_row(100 + i as i64, 7, *points))
                .await
                .unwrap();
        }

        let standings = StandingsCalculator::new(&store)
            .calculate(&season())
            .await
            .unwrap();

        assert_eq!(standings.len(), 1);
        // The 1-point session is dropped by the best-8 rule.
        assert_eq!(standings[0].points, Some(180));
        assert_eq!(standings[0].incidents, Some(8));
    }

    #[tokio::test]
    async fn fewer_than_eight_sessions_all_count() {
        let store = MemoryStore::new();
        store.upsert_result(&final_row(100, 7, 28)).await.unwrap();
        store.upsert_result(&final_row(101, 7, 18)).await.unwrap();

        let standings = StandingsCalculator::new(&store)
            .calculate(&season())
            .await
            .unwrap();

        assert_eq!(standings[0].points, Some(46));
        assert_eq!(standings[0].incidents, Some(2));
    }

    #[tokio::test]
    async fn best_and_average_finish_come_from_selected_sessions() {
        let store = MemoryStore::new();
        let mut first = final_row(100, 7, 28);
        first.finish_position = Some(1);
        let mut second = final_row(101, 7, 18);
        second.finish_position = Some(4);
        store.upsert_result(&first).await.unwrap();
        store.upsert_result(&second).await.unwrap();

        let standings = StandingsCalculator::new(&store)
            .calculate(&season())
            .await
            .unwrap();

        assert_eq!(standings[0].best_finish, Some(1));
        assert_eq!(standings[0].average_finish, Some(2.5));
    }

    #[tokio::test]
    async fn missing_finish_positions_never_produce_nan() {
        let store = MemoryStore::new();
        let mut row = final_row(100, 7, 10);
        row.finish_position = None;
        store.upsert_result(&row).await.unwrap();

        let standings = StandingsCalculator::new(&store)
            .calculate(&season())
            .await
            .unwrap();

        assert_eq!(standings[0].best_finish, None);
        assert_eq!(standings[0].average_finish, None);
    }

    #[tokio::test]
    async fn standings_rank_multiple_drivers() {
        let store = MemoryStore::new();
        store.upsert_result(&final_row(100, 7, 28)).await.unwrap();
        store.upsert_result(&final_row(100, 8, 18)).await.unwrap();
        store.upsert_result(&final_row(101, 8, 25)).await.unwrap();

        let standings = StandingsCalculator::new(&store)
            .calculate(&season())
            .await
            .unwrap();

        assert_eq!(standings.len(), 2);
        let seven = standings.iter().find(|s| s.cust_id == 7).unwrap();
        let eight = standings.iter().find(|s| s.cust_id == 8).unwrap();
        assert_eq!(seven.points, Some(28));
        assert_eq!(eight.points, Some(43));

        // Recalculating overwrites rather than duplicates.
        StandingsCalculator::new(&store)
            .calculate(&season())
            .await
            .unwrap();
        assert_eq!(store.standings_for_season(SEASON).len(), 2);
    }
}
