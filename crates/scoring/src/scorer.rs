use chrono::Utc;
use storage::models::SessionResult;

use crate::points::PointTables;
use crate::provider::{RawResultRow, SessionPhase, SimSession};

/// Identifiers of the session document being scored.
#[derive(Debug, Clone, Copy)]
pub struct SessionIds {
    pub league_id: i64,
    pub season_id: i64,
    pub session_id: i64,
}

/// Per-row scoring outcome: either a storable row or an explicit skip
/// naming the field the provider left out of the raw row.
#[derive(Debug)]
pub enum RowOutcome {
    Scored(SessionResult),
    Skipped(SkippedRow),
}

#[derive(Debug, Clone)]
pub struct SkippedRow {
    pub cust_id: Option<i64>,
    pub display_name: Option<String>,
    pub field: &'static str,
}

/// Scores every raw row of one simsession. A malformed row skips only
/// itself; the rest of the simsession still scores.
pub fn score_segment(
    tables: &PointTables,
    ids: &SessionIds,
    simsession: &SimSession,
) -> Vec<RowOutcome> {
    simsession
        .results
        .iter()
        .map(|raw| match build_row(tables, ids, simsession, raw) {
            Ok(row) => RowOutcome::Scored(row),
            Err(field) => RowOutcome::Skipped(SkippedRow {
                cust_id: raw.cust_id,
                display_name: raw.display_name.clone(),
                field,
            }),
        })
        .collect()
}

fn build_row(
    tables: &PointTables,
    ids: &SessionIds,
    simsession: &SimSession,
    raw: &RawResultRow,
) -> Result<SessionResult, &'static str> {
    let cust_id = require(raw.cust_id, "cust_id")?;
    let display_name = require(raw.display_name.clone(), "display_name")?;
    let finish_position = require(raw.finish_position, "finish_position")?;
    let finish_position_in_class =
        require(raw.finish_position_in_class, "finish_position_in_class")?;
    let laps_lead = require(raw.laps_lead, "laps_lead")?;
    let laps_complete = require(raw.laps_complete, "laps_complete")?;
    let average_lap = require(raw.average_lap, "average_lap")?;
    let best_lap_time = require(raw.best_lap_time, "best_lap_time")?;
    let incidents = require(raw.incidents, "incidents")?;

    let points = match SessionPhase::classify(simsession.simsession_type) {
        SessionPhase::Practice => 0,
        SessionPhase::Qualifying => tables.qualifying_points(finish_position),
        SessionPhase::Race => {
            tables.race_points(finish_position) + tables.clean_race_points(average_lap, incidents)
        }
    };

    Ok(SessionResult {
        league_id: ids.league_id,
        season_id: ids.season_id,
        session_id: ids.session_id,
        simsession_number: simsession.simsession_number,
        simsession_type: simsession.simsession_type,
        cust_id,
        display_name: Some(display_name),
        finish_position: Some(finish_position),
        finish_position_in_class: Some(finish_position_in_class),
        laps_lead: Some(laps_lead),
        laps_complete: Some(laps_complete),
        average_lap: positive_time(average_lap),
        best_lap_time: positive_time(best_lap_time),
        fast_lap: false,
        incidents: Some(incidents),
        points: Some(points),
        date_modified: Utc::now().naive_utc(),
    })
}

/// Zero or negative lap times mean "no time set" and are stored as NULL,
/// never as 0.
fn positive_time(value: i64) -> Option<i64> {
    (value > 0).then_some(value)
}

fn require<T>(value: Option<T>, field: &'static str) -> Result<T, &'static str> {
    value.ok_or(field)
}
