use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One scored row per driver per simsession, plus one synthetic row per
/// driver per session under the reserved simsession number 99.
///
/// Lap-time fields (`average_lap`, `best_lap_time`) are stored in the
/// provider's unit (1/10 000 s) and are `None` when no time was set; a raw
/// value of zero or below must never reach the database.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SessionResult {
    pub league_id: i64,
    pub season_id: i64,
    pub session_id: i64,
    pub simsession_number: i64,
    pub simsession_type: i64,
    pub cust_id: i64,
    pub display_name: Option<String>,
    pub finish_position: Option<i64>,
    pub finish_position_in_class: Option<i64>,
    pub laps_lead: Option<i64>,
    pub laps_complete: Option<i64>,
    pub average_lap: Option<i64>,
    pub best_lap_time: Option<i64>,
    pub fast_lap: bool,
    pub incidents: Option<i64>,
    pub points: Option<i64>,
    pub date_modified: NaiveDateTime,
}

impl SessionResult {
    /// Unique key within the results table.
    pub fn key(&self) -> (i64, i64, i64, i64, i64) {
        (
            self.league_id,
            self.season_id,
            self.session_id,
            self.simsession_number,
            self.cust_id,
        )
    }
}
