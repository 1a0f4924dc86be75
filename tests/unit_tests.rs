// Unit tests for the RunGroup API

use rungroup_api::models::{
    Address, Club, ClubCategory, CreateListingRequest, EditListingRequest, ListingCategory,
    LoginRequest, RaceCategory, RegisterRequest,
};
use rungroup_api::services::auth::{hash_password, verify_password, TokenManager};
use validator::Validate;

fn create_test_club(id: i32) -> Club {
    Club {
        id,
        title: "Trail Runners".to_string(),
        description: "weekly 5k".to_string(),
        image_url: "https://cdn.example.com/photos/old.jpg".to_string(),
        category: ClubCategory::Trail,
        app_user_id: "user-1".to_string(),
        address: Address {
            id: 7,
            street: "1 Main".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
        },
    }
}

fn create_test_edit(id: i32) -> EditListingRequest {
    EditListingRequest {
        id,
        title: "City Runners".to_string(),
        description: "tempo tuesdays".to_string(),
        category: "city".to_string(),
        street: "2 Oak".to_string(),
        city: "Chicago".to_string(),
        state: "IL".to_string(),
        request_token: "token".to_string(),
    }
}

#[test]
fn test_club_category_round_trip() {
    let categories = [
        ClubCategory::RoadRunner,
        ClubCategory::Trail,
        ClubCategory::City,
        ClubCategory::Social,
        ClubCategory::Endurance,
    ];

    for category in categories {
        assert_eq!(ClubCategory::parse(category.as_str()), Some(category));
    }
}

#[test]
fn test_race_category_round_trip() {
    let categories = [
        RaceCategory::FiveK,
        RaceCategory::TenK,
        RaceCategory::HalfMarathon,
        RaceCategory::Marathon,
        RaceCategory::Ultra,
        RaceCategory::Trail,
    ];

    for category in categories {
        assert_eq!(RaceCategory::parse(category.as_str()), Some(category));
    }
}

#[test]
fn test_unknown_category_rejected() {
    assert_eq!(ClubCategory::parse("swimming"), None);
    assert_eq!(RaceCategory::parse(""), None);
}

#[test]
fn test_create_request_requires_title() {
    let request = CreateListingRequest {
        app_user_id: "user-1".to_string(),
        title: String::new(),
        description: "weekly 5k".to_string(),
        category: "trail".to_string(),
        street: "1 Main".to_string(),
        city: "Springfield".to_string(),
        state: "IL".to_string(),
    };

    let errors = request.validate().expect_err("empty title should fail");
    assert!(errors.to_string().contains("Title is required"));
}

#[test]
fn test_create_request_valid() {
    let request = CreateListingRequest {
        app_user_id: String::new(),
        title: "Trail Runners".to_string(),
        description: "weekly 5k".to_string(),
        category: "trail".to_string(),
        street: "1 Main".to_string(),
        city: "Springfield".to_string(),
        state: "IL".to_string(),
    };

    // The owner id may be empty for anonymous submissions; everything else is required
    assert!(request.validate().is_ok());
}

#[test]
fn test_edit_request_requires_address_fields() {
    let mut request = create_test_edit(1);
    request.street = String::new();

    let errors = request.validate().expect_err("empty street should fail");
    assert!(errors.to_string().contains("Street is required"));
}

#[test]
fn test_register_rejects_mismatched_passwords() {
    let request = RegisterRequest {
        email_address: "runner@example.com".to_string(),
        password: "correct horse".to_string(),
        confirm_password: "battery staple".to_string(),
    };

    let errors = request.validate().expect_err("mismatch should fail");
    assert!(errors.to_string().contains("Password does not match"));
}

#[test]
fn test_register_rejects_invalid_email() {
    let request = RegisterRequest {
        email_address: "not-an-email".to_string(),
        password: "correct horse".to_string(),
        confirm_password: "correct horse".to_string(),
    };

    assert!(request.validate().is_err());
}

#[test]
fn test_register_valid() {
    let request = RegisterRequest {
        email_address: "runner@example.com".to_string(),
        password: "correct horse".to_string(),
        confirm_password: "correct horse".to_string(),
    };

    assert!(request.validate().is_ok());
}

#[test]
fn test_login_requires_password() {
    let request = LoginRequest {
        email_address: "runner@example.com".to_string(),
        password: String::new(),
    };

    assert!(request.validate().is_err());
}

#[test]
fn test_token_round_trip() {
    let tokens = TokenManager::new("unit-test-secret", 3600);

    let token = tokens.issue("user-123").expect("issue should succeed");
    let user_id = tokens.verify(&token).expect("verify should succeed");

    assert_eq!(user_id, "user-123");
}

#[test]
fn test_token_rejects_tampered_secret() {
    let issuer = TokenManager::new("secret-a", 3600);
    let verifier = TokenManager::new("secret-b", 3600);

    let token = issuer.issue("user-123").expect("issue should succeed");

    assert!(verifier.verify(&token).is_err());
}

#[test]
fn test_token_rejects_expired() {
    // A negative TTL produces a token that is already past its expiry
    let tokens = TokenManager::new("unit-test-secret", -3600);

    let token = tokens.issue("user-123").expect("issue should succeed");

    assert!(tokens.verify(&token).is_err());
}

#[test]
fn test_password_hash_round_trip() {
    let hash = hash_password("correct horse").expect("hashing should succeed");

    assert_ne!(hash, "correct horse");
    assert!(verify_password("correct horse", &hash).expect("verify should succeed"));
    assert!(!verify_password("battery staple", &hash).expect("verify should succeed"));
}

#[test]
fn test_apply_edit_updates_scalar_fields() {
    let mut club = create_test_club(1);
    let edit = create_test_edit(1);

    club.apply_edit(&edit, ClubCategory::City);

    assert_eq!(club.title, "City Runners");
    assert_eq!(club.description, "tempo tuesdays");
    assert_eq!(club.category, ClubCategory::City);
    assert_eq!(club.address.street, "2 Oak");
    assert_eq!(club.address.city, "Chicago");
    assert_eq!(club.address.state, "IL");
}

#[test]
fn test_apply_edit_preserves_image_url() {
    let mut club = create_test_club(1);
    let edit = create_test_edit(1);

    club.apply_edit(&edit, ClubCategory::City);

    // Image replacement goes through the photo host, never through apply_edit
    assert_eq!(club.image_url, "https://cdn.example.com/photos/old.jpg");
}

#[test]
fn test_listing_serializes_with_camel_case_keys() {
    let club = create_test_club(1);

    let json = serde_json::to_value(&club).expect("serialization should succeed");

    assert_eq!(json["imageUrl"], "https://cdn.example.com/photos/old.jpg");
    assert_eq!(json["appUserId"], "user-1");
    assert_eq!(json["category"], "trail");
    assert_eq!(json["address"]["street"], "1 Main");
}

#[test]
fn test_absent_listing_serializes_to_null() {
    // The detail route hands the possibly-empty fetch straight to the client
    let json = serde_json::to_value(None::<Club>).expect("serialization should succeed");
    assert!(json.is_null());
}
