pub mod league_season;
pub mod season_standing;
pub mod session_result;
pub mod session_segment;

pub use league_season::LeagueSeason;
pub use season_standing::SeasonStanding;
pub use session_result::SessionResult;
pub use session_segment::SessionSegment;

/// Reserved simsession number for the synthetic per-session overall row.
/// Real simsessions count up to 0 (0 = main event, negatives before it),
/// so 99 can never collide with provider data.
pub const FINAL_SIMSESSION_NUMBER: i64 = 99;

/// Reserved simsession type for the synthetic overall row.
pub const FINAL_SIMSESSION_TYPE: i64 = 99;
