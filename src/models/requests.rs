use serde::{Deserialize, Serialize};
use validator::Validate;

/// Submitted fields of a create-listing form
///
/// The image arrives as a separate multipart file part, not as a field here.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateListingRequest {
    #[serde(alias = "app_user_id", rename = "appUserId", default)]
    pub app_user_id: String,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[validate(length(min = 1, message = "Street is required"))]
    pub street: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "State is required"))]
    pub state: String,
}

/// Submitted fields of an edit-listing form
///
/// Carries the anti-forgery token issued with the edit form; an image part is
/// optional and, when present, replaces the stored photo.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EditListingRequest {
    pub id: i32,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(length(min = 1, message = "Category is required"))]
    pub category: String,
    #[validate(length(min = 1, message = "Street is required"))]
    pub street: String,
    #[validate(length(min = 1, message = "City is required"))]
    pub city: String,
    #[validate(length(min = 1, message = "State is required"))]
    pub state: String,
    #[serde(alias = "request_token", rename = "requestToken", default)]
    pub request_token: String,
}

/// Request to register a new account
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Email Address is required"))]
    #[serde(alias = "email_address", rename = "emailAddress")]
    pub email_address: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Password does not match"))]
    #[serde(alias = "confirm_password", rename = "confirmPassword")]
    pub confirm_password: String,
}

/// Request to log in to an existing account
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Email Address is required"))]
    #[serde(alias = "email_address", rename = "emailAddress")]
    pub email_address: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Request to update the profile fields shown on the dashboard
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(range(min = 1, message = "Pace must be positive"))]
    #[serde(default)]
    pub pace: Option<i32>,
    #[validate(range(min = 0, message = "Mileage cannot be negative"))]
    #[serde(default)]
    pub mileage: Option<i32>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
}
