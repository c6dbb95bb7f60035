//! Deserialized shape of the provider's session-result document.
//!
//! Field names mirror the upstream API exactly so real documents parse
//! without translation. Finish positions count from 0 (0 = winner, -1 =
//! not classified); simsession numbers count up to 0, the main event,
//! with practices and qualifying heats on negative numbers before it.

use serde::{Deserialize, Serialize};

pub const PRACTICE: i64 = 3;
pub const QUALIFYING: i64 = 5;
pub const RACE: i64 = 6;

/// One full session result as fetched from the provider.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SessionResultDocument {
    pub league_id: i64,
    pub league_season_id: i64,
    pub subsession_id: i64,
    pub session_results: Vec<SimSession>,
}

/// One simsession (practice, qualifying heat, or race) within a session.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SimSession {
    pub simsession_number: i64,
    pub simsession_type: i64,
    pub simsession_type_name: Option<String>,
    pub simsession_subtype: Option<i64>,
    pub simsession_name: Option<String>,
    pub results: Vec<RawResultRow>,
}

/// One participant's raw result within a simsession.
///
/// Every field is optional so a key the provider left out of the JSON is
/// representable; the scorer skips such rows instead of failing the whole
/// document.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawResultRow {
    pub cust_id: Option<i64>,
    pub display_name: Option<String>,
    pub finish_position: Option<i64>,
    pub finish_position_in_class: Option<i64>,
    pub laps_lead: Option<i64>,
    pub laps_complete: Option<i64>,
    pub average_lap: Option<i64>,
    pub best_lap_time: Option<i64>,
    pub incidents: Option<i64>,
}

/// How a simsession is scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    Practice,
    Qualifying,
    Race,
}

impl SessionPhase {
    /// Provider codes: 3 practice, 5 qualifying, 6 race. Anything
    /// unrecognized is scored like a practice (zero points).
    pub fn classify(simsession_type: i64) -> Self {
        match simsession_type {
            QUALIFYING => SessionPhase::Qualifying,
            RACE => SessionPhase::Race,
            _ => SessionPhase::Practice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_known_codes() {
        assert_eq!(SessionPhase::classify(PRACTICE), SessionPhase::Practice);
        assert_eq!(SessionPhase::classify(QUALIFYING), SessionPhase::Qualifying);
        assert_eq!(SessionPhase::classify(RACE), SessionPhase::Race);
    }

    #[test]
    fn unknown_codes_fall_back_to_practice() {
        assert_eq!(SessionPhase::classify(0), SessionPhase::Practice);
        assert_eq!(SessionPhase::classify(42), SessionPhase::Practice);
    }

    #[test]
    fn document_parses_with_missing_row_fields() {
        let json = r#"{
            "league_id": 4403,
            "league_season_id": 81776,
            "subsession_id": 55523231,
            "session_results": [
                {
                    "simsession_number": 0,
                    "simsession_type": 6,
                    "simsession_type_name": "Race",
                    "simsession_subtype": 0,
                    "simsession_name": "RACE",
                    "results": [
                        { "cust_id": 111, "display_name": "A" },
                        { "display_name": "no id" }
                    ]
                }
            ]
        }"#;

        let document: SessionResultDocument = serde_json::from_str(json).unwrap();
        assert_eq!(document.session_results.len(), 1);
        let rows = &document.session_results[0].results;
        assert_eq!(rows[0].cust_id, Some(111));
        assert_eq!(rows[1].cust_id, None);
        assert_eq!(rows[0].finish_position, None);
    }
}
