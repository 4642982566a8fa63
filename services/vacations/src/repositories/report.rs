//! Report repository for database operations

use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;

use crate::models::report::FollowersReportRow;

/// Aggregate queries over vacations and their followers
#[derive(Clone)]
pub struct ReportRepository {
    pool: PgPool,
}

impl ReportRepository {
    /// Create a new report repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Follower count per vacation, including vacations nobody follows,
    /// ordered by destination
    pub async fn followers_report(&self) -> DatabaseResult<Vec<FollowersReportRow>> {
        sqlx::query_as::<_, FollowersReportRow>(
            r#"
            SELECT v.destination AS destination, COUNT(f.user_id) AS followers
            FROM vacations v
            LEFT JOIN followers f ON f.vacation_id = v.id
            GROUP BY v.id
            ORDER BY v.destination ASC, v.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(DatabaseError::Query)
    }
}
