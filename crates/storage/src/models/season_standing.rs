use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Cumulative season standing for one driver, recomputed wholesale on
/// every standings run from the best session results of the season.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SeasonStanding {
    pub league_id: i64,
    pub season_id: i64,
    pub cust_id: i64,
    pub display_name: Option<String>,
    pub points: Option<i64>,
    pub best_finish: Option<i64>,
    pub average_finish: Option<f64>,
    pub incidents: Option<i64>,
    pub date_modified: NaiveDateTime,
}

impl SeasonStanding {
    pub fn key(&self) -> (i64, i64, i64) {
        (self.league_id, self.season_id, self.cust_id)
    }
}
