//! RunGroup API - backend service for the RunGroup club and race platform
//!
//! This library provides the CRUD surface for running clubs and races, a
//! per-user dashboard, and thin account endpoints, backed by PostgreSQL and
//! an external photo host.

pub mod config;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use models::{Address, AppUser, Club, ClubCategory, Listing, ListingCategory, Race, RaceCategory};
pub use services::{AuthError, DashboardRepository, ListingRepository, PhotoClient, PhotoError, PostgresError, TokenManager, UserRepository};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        let category = ClubCategory::parse("trail");
        assert_eq!(category, Some(ClubCategory::Trail));
    }
}
