// Service exports
pub mod auth;
pub mod dashboard;
pub mod listings;
pub mod photos;
pub mod postgres;
pub mod users;

pub use auth::{AuthError, CurrentUser, MaybeUser, TokenManager};
pub use dashboard::DashboardRepository;
pub use listings::ListingRepository;
pub use photos::{PhotoClient, PhotoError, PhotoUpload, UploadedPhoto};
pub use postgres::{create_pool, health_check, PostgresError};
pub use users::{NewUser, UserRepository};
