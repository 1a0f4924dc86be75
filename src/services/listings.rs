use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::marker::PhantomData;

use crate::models::{Address, Listing, ListingCategory, NewListing};
use crate::services::postgres::PostgresError;

/// Repository for club and race listings
///
/// One generic component instantiated per category type; the table name comes
/// from the category. Reads have no change tracker behind them, so every
/// fetched listing is safe to mutate and re-save.
pub struct ListingRepository<C> {
    pool: PgPool,
    _category: PhantomData<C>,
}

impl<C: ListingCategory> ListingRepository<C> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _category: PhantomData,
        }
    }

    fn select_clause() -> String {
        format!(
            "SELECT l.id, l.title, l.description, l.image_url, l.category, l.app_user_id, \
                    a.id AS address_id, a.street, a.city, a.state \
             FROM {} l \
             JOIN addresses a ON a.id = l.address_id",
            C::TABLE
        )
    }

    fn map_row(row: &PgRow) -> Result<Listing<C>, PostgresError> {
        let raw_category: String = row.get("category");
        let category = C::parse(&raw_category).ok_or_else(|| {
            PostgresError::InvalidInput(format!(
                "Unknown {} category: {}",
                C::LABEL,
                raw_category
            ))
        })?;

        Ok(Listing {
            id: row.get("id"),
            title: row.get("title"),
            description: row.get("description"),
            image_url: row.get("image_url"),
            category,
            app_user_id: row
                .get::<Option<String>, _>("app_user_id")
                .unwrap_or_default(),
            address: Address {
                id: row.get("address_id"),
                street: row.get("street"),
                city: row.get("city"),
                state: row.get("state"),
            },
        })
    }

    /// Fetch the full collection, address joined, ordered by id
    pub async fn get_all(&self) -> Result<Vec<Listing<C>>, PostgresError> {
        let query = format!("{} ORDER BY l.id", Self::select_clause());

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        rows.iter().map(Self::map_row).collect()
    }

    /// Point lookup by id
    pub async fn get_by_id(&self, id: i32) -> Result<Option<Listing<C>>, PostgresError> {
        let query = format!("{} WHERE l.id = $1", Self::select_clause());

        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(Self::map_row).transpose()
    }

    /// All listings owned by the given user, materialized as a list
    pub async fn get_all_for_user(&self, user_id: &str) -> Result<Vec<Listing<C>>, PostgresError> {
        let query = format!(
            "{} WHERE l.app_user_id = $1 ORDER BY l.id",
            Self::select_clause()
        );

        let rows = sqlx::query(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::map_row).collect()
    }

    /// Insert a listing together with its address in one transaction
    pub async fn insert(&self, new: NewListing<C>) -> Result<Listing<C>, PostgresError> {
        let mut tx = self.pool.begin().await?;

        let address_row =
            sqlx::query("INSERT INTO addresses (street, city, state) VALUES ($1, $2, $3) RETURNING id")
                .bind(&new.street)
                .bind(&new.city)
                .bind(&new.state)
                .fetch_one(&mut *tx)
                .await?;
        let address_id: i32 = address_row.get("id");

        // Anonymous submissions carry an empty owner id; stored as NULL to
        // satisfy the users foreign key.
        let owner = if new.app_user_id.is_empty() {
            None
        } else {
            Some(new.app_user_id.as_str())
        };

        let query = format!(
            "INSERT INTO {} (title, description, image_url, category, app_user_id, address_id) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING id",
            C::TABLE
        );
        let row = sqlx::query(&query)
            .bind(&new.title)
            .bind(&new.description)
            .bind(&new.image_url)
            .bind(new.category.as_str())
            .bind(owner)
            .bind(address_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!("Inserted {} {} at address {}", C::LABEL, new.title, address_id);

        Ok(Listing {
            id: row.get("id"),
            title: new.title,
            description: new.description,
            image_url: new.image_url,
            category: new.category,
            app_user_id: new.app_user_id,
            address: Address {
                id: address_id,
                street: new.street,
                city: new.city,
                state: new.state,
            },
        })
    }

    /// Persist scalar field and address changes for an existing listing
    pub async fn update(&self, listing: &Listing<C>) -> Result<bool, PostgresError> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            "UPDATE {} SET title = $1, description = $2, image_url = $3, category = $4 WHERE id = $5",
            C::TABLE
        );
        let result = sqlx::query(&query)
            .bind(&listing.title)
            .bind(&listing.description)
            .bind(&listing.image_url)
            .bind(listing.category.as_str())
            .bind(listing.id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("UPDATE addresses SET street = $1, city = $2, state = $3 WHERE id = $4")
            .bind(&listing.address.street)
            .bind(&listing.address.city)
            .bind(&listing.address.state)
            .bind(listing.address.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a listing and its address in one transaction
    pub async fn delete(&self, listing: &Listing<C>) -> Result<bool, PostgresError> {
        let mut tx = self.pool.begin().await?;

        let query = format!("DELETE FROM {} WHERE id = $1", C::TABLE);
        let result = sqlx::query(&query)
            .bind(listing.id)
            .execute(&mut *tx)
            .await?;

        sqlx::query("DELETE FROM addresses WHERE id = $1")
            .bind(listing.address.id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::debug!("Deleted {} {}", C::LABEL, listing.id);

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClubCategory;

    #[test]
    fn test_select_clause_uses_category_table() {
        let clause = ListingRepository::<ClubCategory>::select_clause();
        assert!(clause.contains("FROM clubs l"));
        assert!(clause.contains("JOIN addresses a"));
    }
}
