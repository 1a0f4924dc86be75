use actix_multipart::Multipart;
use actix_web::cookie::Cookie;
use actix_web::{http::header, web, HttpRequest, HttpResponse, Responder};
use futures_util::TryStreamExt;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::models::{
    ClubCategory, CreateFormResponse, CreateListingRequest, EditFormResponse, EditListingRequest,
    ErrorResponse, ListingCategory, NewListing, RaceCategory,
};
use crate::services::auth::{MaybeUser, TokenManager};
use crate::services::dashboard::DashboardRepository;
use crate::services::listings::ListingRepository;
use crate::services::photos::{PhotoClient, PhotoUpload};
use crate::services::users::UserRepository;

/// Cookie half of the double-submit anti-forgery token
pub const CSRF_COOKIE: &str = "rungroup-csrf";

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub photos: Arc<PhotoClient>,
    pub clubs: Arc<ListingRepository<ClubCategory>>,
    pub races: Arc<ListingRepository<RaceCategory>>,
    pub dashboard: Arc<DashboardRepository>,
    pub users: Arc<UserRepository>,
    pub tokens: Arc<TokenManager>,
    pub auth_enforce: bool,
    pub max_image_bytes: usize,
}

/// Category types with a repository wired into the application state
pub trait RoutedCategory: ListingCategory {
    fn repository(state: &AppState) -> &ListingRepository<Self>;
}

impl RoutedCategory for ClubCategory {
    fn repository(state: &AppState) -> &ListingRepository<ClubCategory> {
        &state.clubs
    }
}

impl RoutedCategory for RaceCategory {
    fn repository(state: &AppState) -> &ListingRepository<RaceCategory> {
        &state.races
    }
}

/// Configure the CRUD routes for one listing type
pub fn configure<C: RoutedCategory>(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope(C::PATH)
            .route("", web::get().to(index::<C>))
            .route("/detail/{id}", web::get().to(detail::<C>))
            .route("/create", web::get().to(create_form::<C>))
            .route("/create", web::post().to(create::<C>))
            .route("/edit/{id}", web::get().to(edit_form::<C>))
            .route("/edit", web::post().to(edit::<C>))
            .route("/delete/{id}", web::get().to(delete_confirm::<C>))
            .route("/delete/{id}", web::post().to(delete::<C>)),
    );
}

fn bad_request(error: &str, message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: 400,
    })
}

fn server_error(error: String, message: String) -> HttpResponse {
    HttpResponse::InternalServerError().json(ErrorResponse {
        error,
        message,
        status_code: 500,
    })
}

fn not_found<C: ListingCategory>(id: i32) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse {
        error: format!("{} not found", C::LABEL),
        message: format!("No {} with id {}", C::LABEL, id),
        status_code: 404,
    })
}

fn redirect_to_index<C: ListingCategory>() -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, format!("/api/v1{}", C::PATH)))
        .finish()
}

/// A parsed multipart listing form: text fields plus an optional image part
struct ListingForm {
    fields: HashMap<String, String>,
    image: Option<PhotoUpload>,
}

impl ListingForm {
    fn take(&mut self, name: &str) -> String {
        self.fields.remove(name).unwrap_or_default()
    }
}

async fn read_listing_form(
    mut payload: Multipart,
    max_image_bytes: usize,
) -> Result<ListingForm, String> {
    let mut fields = HashMap::new();
    let mut image = None;

    while let Some(mut field) = payload.try_next().await.map_err(|e| e.to_string())? {
        let name = field.name().to_string();

        if name == "image" {
            let file_name = field
                .content_disposition()
                .get_filename()
                .unwrap_or("upload.jpg")
                .to_string();

            let mut buffer = Vec::new();
            while let Some(chunk) = field.try_next().await.map_err(|e| e.to_string())? {
                if buffer.len() + chunk.len() > max_image_bytes {
                    return Err(format!(
                        "Image exceeds the maximum size of {} bytes",
                        max_image_bytes
                    ));
                }
                buffer.extend_from_slice(&chunk);
            }

            // A file input submitted without a selection arrives as an empty part
            if !buffer.is_empty() {
                image = Some(PhotoUpload {
                    file_name,
                    bytes: buffer,
                });
            }
        } else {
            let mut buffer = Vec::new();
            while let Some(chunk) = field.try_next().await.map_err(|e| e.to_string())? {
                buffer.extend_from_slice(&chunk);
            }
            fields.insert(name, String::from_utf8_lossy(&buffer).into_owned());
        }
    }

    Ok(ListingForm { fields, image })
}

/// List endpoint: the full collection, no filtering or pagination
///
/// GET /api/v1/{clubs|races}
async fn index<C: RoutedCategory>(state: web::Data<AppState>) -> impl Responder {
    match C::repository(&state).get_all().await {
        Ok(listings) => HttpResponse::Ok().json(listings),
        Err(e) => {
            tracing::error!("Failed to list {}s: {}", C::LABEL, e);
            server_error(format!("Failed to list {}s", C::LABEL), e.to_string())
        }
    }
}

/// Detail endpoint
///
/// GET /api/v1/{clubs|races}/detail/{id}
///
/// A missing id is passed through to the client as a JSON `null` rather than
/// a 404; the confirmation and edit routes do guard.
async fn detail<C: RoutedCategory>(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> impl Responder {
    let id = path.into_inner();

    match C::repository(&state).get_by_id(id).await {
        Ok(listing) => HttpResponse::Ok().json(listing),
        Err(e) => {
            tracing::error!("Failed to fetch {} {}: {}", C::LABEL, id, e);
            server_error(format!("Failed to fetch {}", C::LABEL), e.to_string())
        }
    }
}

/// Creation form endpoint, pre-populated with the current user id
///
/// GET /api/v1/{clubs|races}/create
async fn create_form<C: RoutedCategory>(
    state: web::Data<AppState>,
    user: MaybeUser,
) -> impl Responder {
    let app_user_id = match user.0 {
        Some(id) => id,
        None if state.auth_enforce => {
            return HttpResponse::Unauthorized().json(ErrorResponse {
                error: "Authentication required".to_string(),
                message: format!("Only signed-in users can create a {}", C::LABEL),
                status_code: 401,
            });
        }
        None => String::new(),
    };

    HttpResponse::Ok().json(CreateFormResponse { app_user_id })
}

/// Create endpoint
///
/// POST /api/v1/{clubs|races}/create (multipart form)
///
/// Uploads the image, then inserts the listing together with its address in
/// one transaction and redirects to the index route.
async fn create<C: RoutedCategory>(
    state: web::Data<AppState>,
    payload: Multipart,
) -> impl Responder {
    let mut form = match read_listing_form(payload, state.max_image_bytes).await {
        Ok(form) => form,
        Err(message) => return bad_request("Invalid form submission", message),
    };

    let request = CreateListingRequest {
        app_user_id: form.take("appUserId"),
        title: form.take("title"),
        description: form.take("description"),
        category: form.take("category"),
        street: form.take("street"),
        city: form.take("city"),
        state: form.take("state"),
    };

    if let Err(errors) = request.validate() {
        tracing::info!("Validation failed for create {}: {}", C::LABEL, errors);
        return bad_request("Validation failed", errors.to_string());
    }

    let category = match C::parse(&request.category) {
        Some(category) => category,
        None => {
            return bad_request(
                "Validation failed",
                format!("Unknown {} category: {}", C::LABEL, request.category),
            );
        }
    };

    let image = match form.image.take() {
        Some(image) => image,
        None => return bad_request("Validation failed", "An image file is required".to_string()),
    };

    let photo = match state.photos.add_photo(image).await {
        Ok(photo) => photo,
        Err(e) => {
            tracing::error!("Photo upload failed while creating {}: {}", C::LABEL, e);
            return server_error(format!("Could not create {}", C::LABEL), e.to_string());
        }
    };

    let new = NewListing {
        title: request.title,
        description: request.description,
        image_url: photo.url,
        category,
        app_user_id: request.app_user_id,
        street: request.street,
        city: request.city,
        state: request.state,
    };

    match C::repository(&state).insert(new).await {
        Ok(listing) => {
            tracing::info!("Created {} {} ({})", C::LABEL, listing.id, listing.title);
            redirect_to_index::<C>()
        }
        Err(e) => {
            tracing::error!("Failed to persist new {}: {}", C::LABEL, e);
            server_error(format!("Could not create {}", C::LABEL), e.to_string())
        }
    }
}

/// Edit form endpoint
///
/// GET /api/v1/{clubs|races}/edit/{id}
///
/// Returns the current field values plus an anti-forgery token; the token is
/// also set as a cookie and both halves must come back with the submission.
async fn edit_form<C: RoutedCategory>(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> impl Responder {
    let id = path.into_inner();

    let listing = match C::repository(&state).get_by_id(id).await {
        Ok(Some(listing)) => listing,
        Ok(None) => return not_found::<C>(id),
        Err(e) => {
            tracing::error!("Failed to fetch {} {} for edit: {}", C::LABEL, id, e);
            return server_error(format!("Failed to fetch {}", C::LABEL), e.to_string());
        }
    };

    let request_token = Uuid::new_v4().to_string();
    let cookie = Cookie::build(CSRF_COOKIE, request_token.clone())
        .path("/")
        .http_only(true)
        .finish();

    HttpResponse::Ok().cookie(cookie).json(EditFormResponse {
        listing,
        request_token,
    })
}

/// Edit endpoint
///
/// POST /api/v1/{clubs|races}/edit (multipart form, anti-forgery token required)
///
/// When a new image is supplied the old photo is deleted first; a delete
/// failure aborts the edit before any mutation. The delete and the following
/// upload are two sequential calls with no rollback between them.
async fn edit<C: RoutedCategory>(
    state: web::Data<AppState>,
    req: HttpRequest,
    payload: Multipart,
) -> impl Responder {
    let mut form = match read_listing_form(payload, state.max_image_bytes).await {
        Ok(form) => form,
        Err(message) => return bad_request("Invalid form submission", message),
    };

    let id = match form.take("id").parse::<i32>() {
        Ok(id) => id,
        Err(_) => {
            return bad_request(
                "Invalid form submission",
                format!("A numeric {} id is required", C::LABEL),
            );
        }
    };

    let request = EditListingRequest {
        id,
        title: form.take("title"),
        description: form.take("description"),
        category: form.take("category"),
        street: form.take("street"),
        city: form.take("city"),
        state: form.take("state"),
        request_token: form.take("requestToken"),
    };

    let cookie_token = req.cookie(CSRF_COOKIE).map(|c| c.value().to_string());
    if request.request_token.is_empty()
        || cookie_token.as_deref() != Some(request.request_token.as_str())
    {
        return HttpResponse::Forbidden().json(ErrorResponse {
            error: "Invalid anti-forgery token".to_string(),
            message: "The edit form token does not match the session cookie".to_string(),
            status_code: 403,
        });
    }

    if let Err(errors) = request.validate() {
        tracing::info!("Validation failed for edit {} {}: {}", C::LABEL, id, errors);
        return bad_request("Validation failed", errors.to_string());
    }

    let category = match C::parse(&request.category) {
        Some(category) => category,
        None => {
            return bad_request(
                "Validation failed",
                format!("Unknown {} category: {}", C::LABEL, request.category),
            );
        }
    };

    let mut listing = match C::repository(&state).get_by_id(request.id).await {
        Ok(Some(listing)) => listing,
        Ok(None) => return not_found::<C>(request.id),
        Err(e) => {
            tracing::error!("Failed to fetch {} {} for edit: {}", C::LABEL, request.id, e);
            return server_error(format!("Failed to fetch {}", C::LABEL), e.to_string());
        }
    };

    if let Some(image) = form.image.take() {
        if let Err(e) = state.photos.delete_photo(&listing.image_url).await {
            tracing::error!("Photo delete failed while editing {} {}: {}", C::LABEL, listing.id, e);
            return bad_request(
                format!("Could not edit {}", C::LABEL).as_str(),
                format!("Could not delete photo: {}", e),
            );
        }

        // The old photo is gone at this point; an upload failure below leaves
        // the stored URL pointing at a deleted image.
        match state.photos.add_photo(image).await {
            Ok(photo) => listing.image_url = photo.url,
            Err(e) => {
                tracing::error!("Photo upload failed while editing {} {}: {}", C::LABEL, listing.id, e);
                return server_error(
                    format!("Could not edit {}", C::LABEL),
                    format!("Could not upload photo: {}", e),
                );
            }
        }
    }

    listing.apply_edit(&request, category);

    match C::repository(&state).update(&listing).await {
        Ok(_) => {
            tracing::info!("Updated {} {}", C::LABEL, listing.id);
            redirect_to_index::<C>()
        }
        Err(e) => {
            tracing::error!("Failed to persist edit of {} {}: {}", C::LABEL, listing.id, e);
            server_error(format!("Could not edit {}", C::LABEL), e.to_string())
        }
    }
}

/// Delete confirmation endpoint
///
/// GET /api/v1/{clubs|races}/delete/{id}
async fn delete_confirm<C: RoutedCategory>(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> impl Responder {
    let id = path.into_inner();

    match C::repository(&state).get_by_id(id).await {
        Ok(Some(listing)) => HttpResponse::Ok().json(listing),
        Ok(None) => not_found::<C>(id),
        Err(e) => {
            tracing::error!("Failed to fetch {} {} for delete: {}", C::LABEL, id, e);
            server_error(format!("Failed to fetch {}", C::LABEL), e.to_string())
        }
    }
}

/// Delete endpoint
///
/// POST /api/v1/{clubs|races}/delete/{id}
async fn delete<C: RoutedCategory>(
    state: web::Data<AppState>,
    path: web::Path<i32>,
) -> impl Responder {
    let id = path.into_inner();

    let listing = match C::repository(&state).get_by_id(id).await {
        Ok(Some(listing)) => listing,
        Ok(None) => return not_found::<C>(id),
        Err(e) => {
            tracing::error!("Failed to fetch {} {} for delete: {}", C::LABEL, id, e);
            return server_error(format!("Failed to fetch {}", C::LABEL), e.to_string());
        }
    };

    match C::repository(&state).delete(&listing).await {
        Ok(_) => {
            tracing::info!("Deleted {} {}", C::LABEL, id);
            redirect_to_index::<C>()
        }
        Err(e) => {
            tracing::error!("Failed to delete {} {}: {}", C::LABEL, id, e);
            server_error(format!("Could not delete {}", C::LABEL), e.to_string())
        }
    }
}
