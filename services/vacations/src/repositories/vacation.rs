//! Vacation repository for database operations

use common::error::{DatabaseError, DatabaseResult};
use sqlx::PgPool;
use tracing::info;

use crate::{
    listing::ListingQuery,
    models::vacation::{NewVacation, VacationListing},
};

/// Vacation repository for database operations
#[derive(Clone)]
pub struct VacationRepository {
    pool: PgPool,
}

impl VacationRepository {
    /// Create a new vacation repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// One page of the listing plus the number of vacations matching the filter
    pub async fn list(&self, query: &ListingQuery) -> DatabaseResult<(Vec<VacationListing>, i64)> {
        let total: i64 = query
            .count_query()
            .build_query_scalar()
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        let vacations = query
            .page_query()
            .build_query_as::<VacationListing>()
            .fetch_all(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok((vacations, total))
    }

    /// Insert a vacation and return its id
    pub async fn create(&self, vacation: &NewVacation) -> DatabaseResult<i64> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO vacations (destination, description, start_date, end_date, price, image_name)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&vacation.destination)
        .bind(&vacation.description)
        .bind(vacation.start_date)
        .bind(vacation.end_date)
        .bind(vacation.price)
        .bind(&vacation.image_name)
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        info!("Created vacation {} ({})", id, vacation.destination);
        Ok(id)
    }

    /// Overwrite a vacation; false when no row has that id
    pub async fn update(&self, id: i64, vacation: &NewVacation) -> DatabaseResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE vacations
            SET destination = $1, description = $2, start_date = $3, end_date = $4,
                price = $5, image_name = $6
            WHERE id = $7
            "#,
        )
        .bind(&vacation.destination)
        .bind(&vacation.description)
        .bind(vacation.start_date)
        .bind(vacation.end_date)
        .bind(vacation.price)
        .bind(&vacation.image_name)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a vacation; its follower rows go with it (ON DELETE CASCADE)
    pub async fn delete(&self, id: i64) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM vacations WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }

    /// Record that a user follows a vacation; false when already following
    pub async fn follow(&self, user_id: i64, vacation_id: i64) -> DatabaseResult<bool> {
        let result = sqlx::query(
            r#"
            INSERT INTO followers (user_id, vacation_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, vacation_id) DO NOTHING
            "#,
        )
        .bind(user_id)
        .bind(vacation_id)
        .execute(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }

    /// Remove a follow; false when there was none
    pub async fn unfollow(&self, user_id: i64, vacation_id: i64) -> DatabaseResult<bool> {
        let result = sqlx::query("DELETE FROM followers WHERE user_id = $1 AND vacation_id = $2")
            .bind(user_id)
            .bind(vacation_id)
            .execute(&self.pool)
            .await
            .map_err(DatabaseError::Query)?;

        Ok(result.rows_affected() > 0)
    }

    /// Number of stored vacations
    pub async fn count(&self) -> DatabaseResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM vacations")
            .fetch_one(&self.pool)
            .await
            .map_err(DatabaseError::Query)
    }
}
