/// Position-to-points tables plus the fixed bonus values.
///
/// Pure data, owned by whoever scores; there is no shared mutable table.
/// The defaults are the FIA race scale (25-18-15-12-10-8-6-4-2-1), a
/// 3-2-1 qualifying scale, +3 for a clean race and +1 for the fastest
/// eligible lap.
#[derive(Debug, Clone)]
pub struct PointTables {
    race: [i64; 10],
    qualifying: [i64; 3],
    pub clean_race_bonus: i64,
    pub fast_lap_bonus: i64,
}

impl Default for PointTables {
    fn default() -> Self {
        Self {
            race: [25, 18, 15, 12, 10, 8, 6, 4, 2, 1],
            qualifying: [3, 2, 1],
            clean_race_bonus: 3,
            fast_lap_bonus: 1,
        }
    }
}

impl PointTables {
    /// Race points for a 0-based finish position. Positions off the table
    /// (11th and beyond, or -1 for "not classified") score zero.
    pub fn race_points(&self, finish_position: i64) -> i64 {
        usize::try_from(finish_position)
            .ok()
            .and_then(|p| self.race.get(p))
            .copied()
            .unwrap_or(0)
    }

    /// Qualifying points for a 0-based finish position; top three only.
    pub fn qualifying_points(&self, finish_position: i64) -> i64 {
        usize::try_from(finish_position)
            .ok()
            .and_then(|p| self.qualifying.get(p))
            .copied()
            .unwrap_or(0)
    }

    /// Clean-race bonus: at least one timed lap and zero incidents.
    pub fn clean_race_points(&self, average_lap: i64, incidents: i64) -> i64 {
        if average_lap > 0 && incidents == 0 {
            self.clean_race_bonus
        } else {
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn race_table_matches_fia_scale() {
        let tables = PointTables::default();
        let expected = [25, 18, 15, 12, 10, 8, 6, 4, 2, 1];
        for (position, points) in expected.iter().enumerate() {
            assert_eq!(tables.race_points(position as i64), *points);
        }
    }

    #[test]
    fn positions_off_the_race_table_score_zero() {
        let tables = PointTables::default();
        assert_eq!(tables.race_points(10), 0);
        assert_eq!(tables.race_points(35), 0);
        assert_eq!(tables.race_points(-1), 0);
    }

    #[test]
    fn qualifying_top_three_only() {
        let tables = PointTables::default();
        assert_eq!(tables.qualifying_points(0), 3);
        assert_eq!(tables.qualifying_points(1), 2);
        assert_eq!(tables.qualifying_points(2), 1);
        assert_eq!(tables.qualifying_points(3), 0);
        assert_eq!(tables.qualifying_points(-1), 0);
    }

    #[test]
    fn clean_race_needs_a_timed_lap_and_zero_incidents() {
        let tables = PointTables::default();
        assert_eq!(tables.clean_race_points(95_000, 0), 3);
        assert_eq!(tables.clean_race_points(95_000, 1), 0);
        assert_eq!(tables.clean_race_points(0, 0), 0);
        assert_eq!(tables.clean_race_points(-1, 0), 0);
    }
}
