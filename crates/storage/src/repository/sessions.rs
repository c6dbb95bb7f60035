use sqlx::PgPool;

use crate::error::Result;
use crate::models::{FINAL_SIMSESSION_NUMBER, SeasonStanding, SessionResult, SessionSegment};
use crate::store::SessionStore;

/// Postgres-backed [`SessionStore`].
pub struct PgSessionStore {
    pool: PgPool,
}

impl PgSessionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl SessionStore for PgSessionStore {
    async fn upsert_segment(&self, segment: &SessionSegment) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO league_session_segments (
                league_id, season_id, session_id, simsession_number,
                simsession_type, simsession_type_name, simsession_subtype,
                simsession_name, date_modified
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (league_id, season_id, session_id, simsession_number)
            DO UPDATE SET
                simsession_type = EXCLUDED.simsession_type,
                simsession_type_name = EXCLUDED.simsession_type_name,
                simsession_subtype = EXCLUDED.simsession_subtype,
                simsession_name = EXCLUDED.simsession_name,
                date_modified = EXCLUDED.date_modified
            "#,
        )
        .bind(segment.league_id)
        .bind(segment.season_id)
        .bind(segment.session_id)
        .bind(segment.simsession_number)
        .bind(segment.simsession_type)
        .bind(&segment.simsession_type_name)
        .bind(segment.simsession_subtype)
        .bind(&segment.simsession_name)
        .bind(segment.date_modified)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn upsert_result(&self, row: &SessionResult) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO league_session_results (
                league_id, season_id, session_id, simsession_number,
                simsession_type, cust_id, display_name, finish_position,
                finish_position_in_class, laps_lead, laps_complete,
                average_lap, best_lap_time, fast_lap, incidents, points,
                date_modified
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13,
                    $14, $15, $16, $17)
            ON CONFLICT (league_id, season_id, session_id, simsession_number, cust_id)
            DO UPDATE SET
                simsession_type = EXCLUDED.simsession_type,
                display_name = EXCLUDED.display_name,
                finish_position = EXCLUDED.finish_position,
                finish_position_in_class = EXCLUDED.finish_position_in_class,
                laps_lead = EXCLUDED.laps_lead,
                laps_complete = EXCLUDED.laps_complete,
                average_lap = EXCLUDED.average_lap,
                best_lap_time = EXCLUDED.best_lap_time,
                fast_lap = EXCLUDED.fast_lap,
                incidents = EXCLUDED.incidents,
                points = EXCLUDED.points,
                date_modified = EXCLUDED.date_modified
            "#,
        )
        .bind(row.league_id)
        .bind(row.season_id)
        .bind(row.session_id)
        .bind(row.simsession_number)
        .bind(row.simsession_type)
        .bind(row.cust_id)
        .bind(&row.display_name)
        .bind(row.finish_position)
        .bind(row.finish_position_in_class)
        .bind(row.laps_lead)
        .bind(row.laps_complete)
        .bind(row.average_lap)
        .bind(row.best_lap_time)
        .bind(row.fast_lap)
        .bind(row.incidents)
        .bind(row.points)
        .bind(row.date_modified)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn results_for_segment(
        &self,
        session_id: i64,
        simsession_number: i64,
    ) -> Result<Vec<SessionResult>> {
        let rows = sqlx::query_as::<_, SessionResult>(
            r#"
            SELECT league_id, season_id, session_id, simsession_number,
                   simsession_type, cust_id, display_name, finish_position,
                   finish_position_in_class, laps_lead, laps_complete,
                   average_lap, best_lap_time, fast_lap, incidents, points,
                   date_modified
            FROM league_session_results
            WHERE session_id = $1 AND simsession_number = $2
            ORDER BY cust_id
            "#,
        )
        .bind(session_id)
        .bind(simsession_number)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn results_for_session(&self, session_id: i64) -> Result<Vec<SessionResult>> {
        let rows = sqlx::query_as::<_, SessionResult>(
            r#"
            SELECT league_id, season_id, session_id, simsession_number,
                   simsession_type, cust_id, display_name, finish_position,
                   finish_position_in_class, laps_lead, laps_complete,
                   average_lap, best_lap_time, fast_lap, incidents, points,
                   date_modified
            FROM league_session_results
            WHERE session_id = $1
            ORDER BY simsession_number, cust_id
            "#,
        )
        .bind(session_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn season_final_results(&self, season_id: i64) -> Result<Vec<SessionResult>> {
        let rows = sqlx::query_as::<_, SessionResult>(
            r#"
            SELECT league_id, season_id, session_id, simsession_number,
                   simsession_type, cust_id, display_name, finish_position,
                   finish_position_in_class, laps_lead, laps_complete,
                   average_lap, best_lap_time, fast_lap, incidents, points,
                   date_modified
            FROM league_session_results
            WHERE season_id = $1 AND simsession_number = $2
            ORDER BY session_id, cust_id
            "#,
        )
        .bind(season_id)
        .bind(FINAL_SIMSESSION_NUMBER)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    async fn upsert_standing(&self, row: &SeasonStanding) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO league_season_standings (
                league_id, season_id, cust_id, display_name, points,
                best_finish, average_finish, incidents, date_modified
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (league_id, season_id, cust_id)
            DO UPDATE SET
                display_name = EXCLUDED.display_name,
                points = EXCLUDED.points,
                best_finish = EXCLUDED.best_finish,
                average_finish = EXCLUDED.average_finish,
                incidents = EXCLUDED.incidents,
                date_modified = EXCLUDED.date_modified
            "#,
        )
        .bind(row.league_id)
        .bind(row.season_id)
        .bind(row.cust_id)
        .bind(&row.display_name)
        .bind(row.points)
        .bind(row.best_finish)
        .bind(row.average_finish)
        .bind(row.incidents)
        .bind(row.date_modified)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
