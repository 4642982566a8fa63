//! User repository for database operations

use common::error::{DatabaseError, DatabaseResult};
use sqlx::{PgPool, Row, postgres::PgRow};
use tracing::info;

use crate::models::user::{NewUser, Role, StoredUser, User};

/// User repository
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

fn map_stored_user(row: &PgRow) -> Result<StoredUser, sqlx::Error> {
    let role: String = row.try_get("role")?;
    let role = role.parse::<Role>().map_err(|e| sqlx::Error::ColumnDecode {
        index: "role".to_string(),
        source: e.into(),
    })?;

    Ok(StoredUser {
        user: User {
            id: row.try_get("id")?,
            first_name: row.try_get("first_name")?,
            last_name: row.try_get("last_name")?,
            email: row.try_get("email")?,
            role,
        },
        password_hash: row.try_get("password_hash")?,
    })
}

impl UserRepository {
    /// Create a new user repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new user
    ///
    /// A duplicate email surfaces as a unique violation
    /// (see [`DatabaseError::is_unique_violation`]).
    pub async fn create(&self, new_user: &NewUser) -> DatabaseResult<User> {
        info!("Creating new {} account: {}", new_user.role, new_user.email);

        let row = sqlx::query(
            r#"
            INSERT INTO users (first_name, last_name, email, password_hash, role)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, first_name, last_name, email, password_hash, role
            "#,
        )
        .bind(&new_user.first_name)
        .bind(&new_user.last_name)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(new_user.role.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        let stored = map_stored_user(&row).map_err(DatabaseError::Query)?;
        Ok(stored.user)
    }

    /// Find a user, with password hash, by email
    pub async fn find_by_email(&self, email: &str) -> DatabaseResult<Option<StoredUser>> {
        let row = sqlx::query(
            r#"
            SELECT id, first_name, last_name, email, password_hash, role
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .map_err(DatabaseError::Query)?;

        row.as_ref()
            .map(map_stored_user)
            .transpose()
            .map_err(DatabaseError::Query)
    }
}
