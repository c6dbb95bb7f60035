pub mod error;
pub mod fastlap;
pub mod points;
pub mod provider;
pub mod scorer;
pub mod session;
pub mod standings;

pub use error::{Result, ScoringError};
pub use fastlap::{FastLapAward, annotate_fastest_lap};
pub use points::PointTables;
pub use provider::{RawResultRow, SessionPhase, SessionResultDocument, SimSession};
pub use scorer::{RowOutcome, SessionIds, SkippedRow, score_segment};
pub use session::{SessionProcessor, SessionReport, compute_final_scores};
pub use standings::{BEST_SESSIONS, StandingsCalculator};
