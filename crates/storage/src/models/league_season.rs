use serde::{Deserialize, Serialize};

/// The slice of the provider's league-season metadata the scoring side
/// cares about. `no_drops_on_or_after_race_num` is carried through from
/// the provider but not applied by the standings calculator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueSeason {
    pub league_id: i64,
    pub season_id: i64,
    pub season_name: Option<String>,
    pub no_drops_on_or_after_race_num: Option<i64>,
}
