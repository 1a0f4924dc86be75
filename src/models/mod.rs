// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{Address, AppUser, Club, ClubCategory, Listing, ListingCategory, NewListing, Race, RaceCategory};
pub use requests::{CreateListingRequest, EditListingRequest, LoginRequest, RegisterRequest, UpdateProfileRequest};
pub use responses::{AuthResponse, CreateFormResponse, DashboardResponse, EditFormResponse, ErrorResponse, HealthResponse};
