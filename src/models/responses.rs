use serde::{Deserialize, Serialize};

use crate::models::domain::{Club, Listing, Race};

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Creation form view-model, pre-populated with the current user id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateFormResponse {
    #[serde(rename = "appUserId")]
    pub app_user_id: String,
}

/// Edit form view-model: current field values plus the anti-forgery token
#[derive(Debug, Clone, Serialize)]
pub struct EditFormResponse<C> {
    #[serde(flatten)]
    pub listing: Listing<C>,
    #[serde(rename = "requestToken")]
    pub request_token: String,
}

/// Aggregated listings owned by the current user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub clubs: Vec<Club>,
    pub races: Vec<Race>,
}

/// Successful register/login response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "emailAddress")]
    pub email_address: String,
}
