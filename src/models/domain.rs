use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::models::requests::EditListingRequest;

/// Registered account that owns clubs and races
///
/// Identity internals (credentials, sessions) live in the auth layer; this
/// record carries the profile fields shown on the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppUser {
    pub id: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    #[serde(default)]
    pub pace: Option<i32>,
    #[serde(default)]
    pub mileage: Option<i32>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(rename = "profileImageUrl", default)]
    pub profile_image_url: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

/// Street address owned by exactly one club or race
///
/// Created and deleted together with its owning listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub id: i32,
    pub street: String,
    pub city: String,
    pub state: String,
}

/// Category types a listing can be parameterized over
///
/// Supplies the table name, route path and log label for the entity, plus the
/// string codec used for the TEXT category column.
pub trait ListingCategory:
    Clone + Copy + Send + Sync + Serialize + DeserializeOwned + 'static
{
    /// Table the listings of this category live in
    const TABLE: &'static str;
    /// Route scope, e.g. "/clubs"
    const PATH: &'static str;
    /// Singular label used in log and error messages
    const LABEL: &'static str;

    fn as_str(&self) -> &'static str;
    fn parse(value: &str) -> Option<Self>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClubCategory {
    RoadRunner,
    Trail,
    City,
    Social,
    Endurance,
}

impl ListingCategory for ClubCategory {
    const TABLE: &'static str = "clubs";
    const PATH: &'static str = "/clubs";
    const LABEL: &'static str = "club";

    fn as_str(&self) -> &'static str {
        match self {
            ClubCategory::RoadRunner => "road_runner",
            ClubCategory::Trail => "trail",
            ClubCategory::City => "city",
            ClubCategory::Social => "social",
            ClubCategory::Endurance => "endurance",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "road_runner" => Some(ClubCategory::RoadRunner),
            "trail" => Some(ClubCategory::Trail),
            "city" => Some(ClubCategory::City),
            "social" => Some(ClubCategory::Social),
            "endurance" => Some(ClubCategory::Endurance),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaceCategory {
    FiveK,
    TenK,
    HalfMarathon,
    Marathon,
    Ultra,
    Trail,
}

impl ListingCategory for RaceCategory {
    const TABLE: &'static str = "races";
    const PATH: &'static str = "/races";
    const LABEL: &'static str = "race";

    fn as_str(&self) -> &'static str {
        match self {
            RaceCategory::FiveK => "five_k",
            RaceCategory::TenK => "ten_k",
            RaceCategory::HalfMarathon => "half_marathon",
            RaceCategory::Marathon => "marathon",
            RaceCategory::Ultra => "ultra",
            RaceCategory::Trail => "trail",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "five_k" => Some(RaceCategory::FiveK),
            "ten_k" => Some(RaceCategory::TenK),
            "half_marathon" => Some(RaceCategory::HalfMarathon),
            "marathon" => Some(RaceCategory::Marathon),
            "ultra" => Some(RaceCategory::Ultra),
            "trail" => Some(RaceCategory::Trail),
            _ => None,
        }
    }
}

/// Aggregate root for a club or race listing
///
/// Clubs and races share the same shape; only the category enumeration
/// differs, so one generic type is instantiated for both.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing<C> {
    pub id: i32,
    pub title: String,
    pub description: String,
    #[serde(rename = "imageUrl")]
    pub image_url: String,
    pub category: C,
    #[serde(rename = "appUserId")]
    pub app_user_id: String,
    pub address: Address,
}

pub type Club = Listing<ClubCategory>;
pub type Race = Listing<RaceCategory>;

impl<C: ListingCategory> Listing<C> {
    /// Apply the scalar fields of an edit submission
    ///
    /// The image URL is left untouched; image replacement is handled
    /// separately because it involves the photo host.
    pub fn apply_edit(&mut self, edit: &EditListingRequest, category: C) {
        self.title = edit.title.clone();
        self.description = edit.description.clone();
        self.category = category;
        self.address.street = edit.street.clone();
        self.address.city = edit.city.clone();
        self.address.state = edit.state.clone();
    }
}

/// Fields of a listing about to be inserted, before the store assigns ids
#[derive(Debug, Clone)]
pub struct NewListing<C> {
    pub title: String,
    pub description: String,
    pub image_url: String,
    pub category: C,
    pub app_user_id: String,
    pub street: String,
    pub city: String,
    pub state: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_club_category_codec() {
        assert_eq!(ClubCategory::RoadRunner.as_str(), "road_runner");
        assert_eq!(ClubCategory::parse("trail"), Some(ClubCategory::Trail));
        assert_eq!(ClubCategory::parse("marathon"), None);
    }

    #[test]
    fn test_race_category_codec() {
        assert_eq!(RaceCategory::HalfMarathon.as_str(), "half_marathon");
        assert_eq!(RaceCategory::parse("ultra"), Some(RaceCategory::Ultra));
        assert_eq!(RaceCategory::parse("road_runner"), None);
    }
}
