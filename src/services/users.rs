use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use crate::models::AppUser;
use crate::services::postgres::PostgresError;

pub(crate) const USER_COLUMNS: &str =
    "id, email, password_hash, pace, mileage, city, state, profile_image_url, created_at";

pub(crate) fn map_user_row(row: &PgRow) -> AppUser {
    AppUser {
        id: row.get("id"),
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        pace: row.get("pace"),
        mileage: row.get("mileage"),
        city: row.get("city"),
        state: row.get("state"),
        profile_image_url: row.get("profile_image_url"),
        created_at: row.get("created_at"),
    }
}

/// A user about to be registered
#[derive(Debug, Clone)]
pub struct NewUser {
    pub id: String,
    pub email: String,
    pub password_hash: String,
}

/// Repository backing the account flows
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a newly registered user and return the stored record
    pub async fn insert(&self, new: NewUser) -> Result<AppUser, PostgresError> {
        let query = format!(
            "INSERT INTO users (id, email, password_hash) VALUES ($1, $2, $3) RETURNING {}",
            USER_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(&new.id)
            .bind(&new.email)
            .bind(&new.password_hash)
            .fetch_one(&self.pool)
            .await?;

        tracing::debug!("Registered user {}", new.id);

        Ok(map_user_row(&row))
    }

    /// Look up a user by email address
    pub async fn find_by_email(&self, email: &str) -> Result<Option<AppUser>, PostgresError> {
        let query = format!("SELECT {} FROM users WHERE email = $1", USER_COLUMNS);

        let row = sqlx::query(&query)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(map_user_row))
    }
}
