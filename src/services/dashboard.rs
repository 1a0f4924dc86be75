use sqlx::PgPool;

use crate::models::{AppUser, Club, ClubCategory, Race, RaceCategory};
use crate::services::listings::ListingRepository;
use crate::services::postgres::PostgresError;
use crate::services::users::{map_user_row, USER_COLUMNS};

/// Repository behind the per-user dashboard
///
/// The authenticated user id arrives as an explicit parameter; handlers pull
/// it from the request context and pass it down.
pub struct DashboardRepository {
    pool: PgPool,
    clubs: ListingRepository<ClubCategory>,
    races: ListingRepository<RaceCategory>,
}

impl DashboardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            clubs: ListingRepository::new(pool.clone()),
            races: ListingRepository::new(pool.clone()),
            pool,
        }
    }

    /// All clubs owned by the given user
    pub async fn get_all_user_clubs(&self, user_id: &str) -> Result<Vec<Club>, PostgresError> {
        self.clubs.get_all_for_user(user_id).await
    }

    /// All races owned by the given user
    pub async fn get_all_user_races(&self, user_id: &str) -> Result<Vec<Race>, PostgresError> {
        self.races.get_all_for_user(user_id).await
    }

    /// Point lookup of a user record
    pub async fn get_user_by_id(&self, id: &str) -> Result<Option<AppUser>, PostgresError> {
        let query = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(map_user_row))
    }

    /// Persist profile changes, reporting whether a row was written
    pub async fn update_user(&self, user: &AppUser) -> Result<bool, PostgresError> {
        let result = sqlx::query(
            "UPDATE users SET pace = $1, mileage = $2, city = $3, state = $4, profile_image_url = $5 \
             WHERE id = $6",
        )
        .bind(user.pace)
        .bind(user.mileage)
        .bind(&user.city)
        .bind(&user.state)
        .bind(&user.profile_image_url)
        .bind(&user.id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
