use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Metadata for one simsession of a session, written before any of its
/// per-driver rows. The synthetic overall simsession (number 99) gets a
/// row here too.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SessionSegment {
    pub league_id: i64,
    pub season_id: i64,
    pub session_id: i64,
    pub simsession_number: i64,
    pub simsession_type: i64,
    pub simsession_type_name: Option<String>,
    pub simsession_subtype: i64,
    pub simsession_name: Option<String>,
    pub date_modified: NaiveDateTime,
}

impl SessionSegment {
    pub fn key(&self) -> (i64, i64, i64, i64) {
        (
            self.league_id,
            self.season_id,
            self.session_id,
            self.simsession_number,
        )
    }
}
